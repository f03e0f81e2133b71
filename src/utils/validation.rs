use validator::{Validate, ValidationErrors};

/// Human-readable messages for every failed rule, ordered by field name.
pub fn form_errors<T: Validate>(form: &T) -> Vec<String> {
    match form.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => collect_messages(&errors),
    }
}

fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid ({})", field.replace('_', " "), err.code),
            })
        })
        .collect()
}

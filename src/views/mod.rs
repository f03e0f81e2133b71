//! Server-side HTML rendered from the Tera templates under `templates/`.

use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{web, HttpRequest, HttpResponse};
use log::error;
use tera::{Context, Tera};

use crate::errors::AppError;
use crate::models::employee::Employee;
use crate::utils::flash;
use crate::AppState;

pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut templates = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))?;
    // Tera only escapes `.html`, `.htm` and `.xml` names out of the box.
    templates.autoescape_on(vec![".html.tera"]);
    Ok(templates)
}

/// Renders `template` inside the layout, consuming any flash messages the
/// request carried.
pub fn render(
    req: &HttpRequest,
    templates: &Tera,
    user: Option<&Employee>,
    template: &str,
    title: &str,
    mut ctx: Context,
) -> Result<HttpResponse, AppError> {
    let messages = flash::pending(req);

    ctx.insert("title", title);
    ctx.insert("current_user", &user);
    ctx.insert("flashes", &messages);

    let html = templates.render(template, &ctx)?;

    let mut response = HttpResponse::Ok();
    response.content_type("text/html; charset=utf-8");
    if !messages.is_empty() {
        response.cookie(flash::removal_cookie());
    }
    Ok(response.body(html))
}

/// Replaces 4xx/5xx bodies with the `error.html.tera` page.
pub fn error_pages<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler(render_error_page)
}

fn error_page_html(templates: &Tera, status: StatusCode, detail: &str) -> Result<String, tera::Error> {
    let reason = status.canonical_reason().unwrap_or("Error");

    let mut ctx = Context::new();
    ctx.insert("title", reason);
    ctx.insert("current_user", &None::<Employee>);
    ctx.insert("flashes", &Vec::<String>::new());
    ctx.insert("status", &status.as_u16());
    ctx.insert("reason", reason);
    ctx.insert("detail", detail);

    templates.render("error.html.tera", &ctx)
}

fn render_error_page<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let status = res.status();
    let detail = res
        .response()
        .error()
        .and_then(|err| err.as_error::<AppError>())
        .map(AppError::public_message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error").to_string());

    let page = match res.request().app_data::<web::Data<AppState>>() {
        Some(state) => match error_page_html(&state.templates, status, &detail) {
            Ok(html) => Some(html),
            Err(err) => {
                error!("Could not render error page: {}", err);
                None
            }
        },
        None => None,
    };

    match page {
        Some(html) => {
            let (req, _) = res.into_parts();
            let response = HttpResponse::build(status)
                .content_type("text/html; charset=utf-8")
                .body(html);
            Ok(ErrorHandlerResponse::Response(
                ServiceResponse::new(req, response).map_into_right_body(),
            ))
        }
        None => Ok(ErrorHandlerResponse::Response(res.map_into_left_body())),
    }
}

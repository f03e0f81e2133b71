use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};
use tera::Context;
use validator::Validate;

use super::redirect_with_flash;
use crate::errors::AppError;
use crate::models::role::Role;
use crate::utils::session::CurrentUser;
use crate::utils::validation::form_errors;
use crate::views;
use crate::AppState;

const LIST_URL: &str = "/roles";

#[derive(Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct RoleForm {
    #[validate(length(min = 1, max = 60, message = "Name must be between 1 and 60 characters."))]
    name: String,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Description must be between 1 and 200 characters."
    ))]
    description: String,
}

impl RoleForm {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

impl From<&Role> for RoleForm {
    fn from(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            description: role.description.clone(),
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Role not found".to_string())
}

/// The add form when `role` is None, the edit form otherwise.
fn form_page(
    req: &HttpRequest,
    state: &AppState,
    user: &CurrentUser,
    role: Option<&Role>,
    form: &RoleForm,
    errors: &[String],
) -> Result<HttpResponse, AppError> {
    let (title, action) = match role {
        Some(role) => ("Edit Role", format!("/roles/edit/{}", role.id)),
        None => ("Add Role", "/roles/add".to_string()),
    };

    let mut ctx = Context::new();
    ctx.insert("role", &role);
    ctx.insert("form", form);
    ctx.insert("action", &action);
    ctx.insert("errors", errors);

    views::render(
        req,
        &state.templates,
        Some(user.employee()),
        "admin/role.html.tera",
        title,
        ctx,
    )
}

pub async fn list_roles(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let roles = state.repo.list_roles().await?;

    let mut ctx = Context::new();
    ctx.insert("roles", &roles);

    views::render(
        &req,
        &state.templates,
        Some(user.employee()),
        "admin/roles.html.tera",
        "Roles",
        ctx,
    )
}

pub async fn add_role_form(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    form_page(&req, &state, &user, None, &RoleForm::default(), &[])
}

pub async fn add_role(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
    form: web::Form<RoleForm>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let form = form.into_inner().trimmed();
    let errors = form_errors(&form);
    if !errors.is_empty() {
        return form_page(&req, &state, &user, None, &form, &errors);
    }

    match state.repo.create_role(&form.name, &form.description).await {
        Ok(role) => {
            info!("Role {} ({}) created", role.id, role.name);
            Ok(redirect_with_flash(LIST_URL, "You have successfully added a new role."))
        }
        Err(AppError::Conflict(_)) => {
            Ok(redirect_with_flash(LIST_URL, "Error: role name already exists."))
        }
        Err(err) => Err(err),
    }
}

pub async fn edit_role_form(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
    role_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let role = state
        .repo
        .get_role(role_id.into_inner())
        .await?
        .ok_or_else(not_found)?;

    form_page(&req, &state, &user, Some(&role), &RoleForm::from(&role), &[])
}

pub async fn edit_role(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
    role_id: web::Path<i32>,
    form: web::Form<RoleForm>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let role = state
        .repo
        .get_role(role_id.into_inner())
        .await?
        .ok_or_else(not_found)?;

    let form = form.into_inner().trimmed();
    let errors = form_errors(&form);
    if !errors.is_empty() {
        return form_page(&req, &state, &user, Some(&role), &form, &errors);
    }

    match state
        .repo
        .update_role(role.id, &form.name, &form.description)
        .await
    {
        Ok(Some(updated)) => {
            info!("Role {} updated", updated.id);
            Ok(redirect_with_flash(LIST_URL, "You have successfully edited the role."))
        }
        Ok(None) => Err(not_found()),
        Err(AppError::Conflict(_)) => {
            Ok(redirect_with_flash(LIST_URL, "Error: role name already exists."))
        }
        Err(err) => Err(err),
    }
}

pub async fn delete_role(
    user: CurrentUser,
    state: web::Data<AppState>,
    role_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let role_id = role_id.into_inner();
    if !state.repo.delete_role(role_id).await? {
        return Err(not_found());
    }

    info!("Role {} deleted", role_id);
    Ok(redirect_with_flash(LIST_URL, "You have successfully deleted the role."))
}

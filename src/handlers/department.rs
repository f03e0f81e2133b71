use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use serde::{Deserialize, Serialize};
use tera::Context;
use validator::Validate;

use super::redirect_with_flash;
use crate::errors::AppError;
use crate::models::department::Department;
use crate::utils::session::CurrentUser;
use crate::utils::validation::form_errors;
use crate::views;
use crate::AppState;

const LIST_URL: &str = "/departments";

#[derive(Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct DepartmentForm {
    #[validate(length(min = 1, max = 60, message = "Name must be between 1 and 60 characters."))]
    name: String,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Description must be between 1 and 200 characters."
    ))]
    description: String,
}

impl DepartmentForm {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

impl From<&Department> for DepartmentForm {
    fn from(department: &Department) -> Self {
        Self {
            name: department.name.clone(),
            description: department.description.clone(),
        }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Department not found".to_string())
}

/// The add form when `department` is None, the edit form otherwise.
fn form_page(
    req: &HttpRequest,
    state: &AppState,
    user: &CurrentUser,
    department: Option<&Department>,
    form: &DepartmentForm,
    errors: &[String],
) -> Result<HttpResponse, AppError> {
    let (title, action) = match department {
        Some(department) => ("Edit Department", format!("/department/edit/{}", department.id)),
        None => ("Add Department", "/departments/add".to_string()),
    };

    let mut ctx = Context::new();
    ctx.insert("department", &department);
    ctx.insert("form", form);
    ctx.insert("action", &action);
    ctx.insert("errors", errors);

    views::render(
        req,
        &state.templates,
        Some(user.employee()),
        "admin/department.html.tera",
        title,
        ctx,
    )
}

pub async fn list_departments(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let departments = state.repo.list_departments().await?;

    let mut ctx = Context::new();
    ctx.insert("departments", &departments);

    views::render(
        &req,
        &state.templates,
        Some(user.employee()),
        "admin/departments.html.tera",
        "Departments",
        ctx,
    )
}

pub async fn add_department_form(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    form_page(&req, &state, &user, None, &DepartmentForm::default(), &[])
}

pub async fn add_department(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
    form: web::Form<DepartmentForm>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let form = form.into_inner().trimmed();
    let errors = form_errors(&form);
    if !errors.is_empty() {
        return form_page(&req, &state, &user, None, &form, &errors);
    }

    match state.repo.create_department(&form.name, &form.description).await {
        Ok(department) => {
            info!("Department {} ({}) created", department.id, department.name);
            Ok(redirect_with_flash(LIST_URL, "You have successfully added a new department."))
        }
        Err(AppError::Conflict(_)) => {
            Ok(redirect_with_flash(LIST_URL, "Error: department name already exists."))
        }
        Err(err) => Err(err),
    }
}

pub async fn edit_department_form(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
    department_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let department = state
        .repo
        .get_department(department_id.into_inner())
        .await?
        .ok_or_else(not_found)?;

    form_page(&req, &state, &user, Some(&department), &DepartmentForm::from(&department), &[])
}

pub async fn edit_department(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
    department_id: web::Path<i32>,
    form: web::Form<DepartmentForm>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let department = state
        .repo
        .get_department(department_id.into_inner())
        .await?
        .ok_or_else(not_found)?;

    let form = form.into_inner().trimmed();
    let errors = form_errors(&form);
    if !errors.is_empty() {
        return form_page(&req, &state, &user, Some(&department), &form, &errors);
    }

    match state
        .repo
        .update_department(department.id, &form.name, &form.description)
        .await
    {
        Ok(Some(updated)) => {
            info!("Department {} updated", updated.id);
            Ok(redirect_with_flash(LIST_URL, "You have successfully edited the department."))
        }
        Ok(None) => Err(not_found()),
        Err(AppError::Conflict(_)) => {
            Ok(redirect_with_flash(LIST_URL, "Error: department name already exists."))
        }
        Err(err) => Err(err),
    }
}

pub async fn delete_department(
    user: CurrentUser,
    state: web::Data<AppState>,
    department_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let department_id = department_id.into_inner();
    if !state.repo.delete_department(department_id).await? {
        return Err(not_found());
    }

    info!("Department {} deleted", department_id);
    Ok(redirect_with_flash(LIST_URL, "You have successfully deleted the department."))
}

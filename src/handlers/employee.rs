use actix_web::{web, HttpRequest, HttpResponse};
use log::{info, warn};
use serde::Deserialize;
use tera::Context;

use super::redirect_with_flash;
use crate::errors::AppError;
use crate::models::department::Department;
use crate::models::employee::Employee;
use crate::models::role::Role;
use crate::utils::session::CurrentUser;
use crate::views;
use crate::AppState;

const LIST_URL: &str = "/employees";

/// Raw select values; an unselected option arrives as an empty string.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct AssignForm {
    department_id: String,
    role_id: String,
}

fn parse_selection(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

#[allow(clippy::too_many_arguments)]
fn assign_page(
    req: &HttpRequest,
    state: &AppState,
    user: &CurrentUser,
    employee: &Employee,
    departments: &[Department],
    roles: &[Role],
    selected: (Option<i32>, Option<i32>),
    errors: &[String],
) -> Result<HttpResponse, AppError> {
    let mut ctx = Context::new();
    ctx.insert("employee", employee);
    ctx.insert("departments", departments);
    ctx.insert("roles", roles);
    ctx.insert("selected_department", &selected.0);
    ctx.insert("selected_role", &selected.1);
    ctx.insert("errors", errors);

    views::render(
        req,
        &state.templates,
        Some(user.employee()),
        "admin/assign.html.tera",
        "Assign Employee",
        ctx,
    )
}

/// Loads the employee and refuses administrators before anything else happens.
async fn assignable_employee(state: &AppState, employee_id: i32) -> Result<Employee, AppError> {
    let employee = state
        .repo
        .get_employee(employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    if employee.is_admin {
        warn!("Refused to assign department or role to admin {}", employee.id);
        return Err(AppError::Forbidden(
            "Administrators cannot be assigned a department or role.".to_string(),
        ));
    }

    Ok(employee)
}

pub async fn list_employees(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let employees = state.repo.list_employees().await?;

    let mut ctx = Context::new();
    ctx.insert("employees", &employees);

    views::render(
        &req,
        &state.templates,
        Some(user.employee()),
        "admin/employees.html.tera",
        "Employees",
        ctx,
    )
}

pub async fn assign_employee_form(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
    employee_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let employee = assignable_employee(&state, employee_id.into_inner()).await?;
    let departments = state.repo.all_departments().await?;
    let roles = state.repo.all_roles().await?;

    assign_page(
        &req,
        &state,
        &user,
        &employee,
        &departments,
        &roles,
        (employee.department_id, employee.role_id),
        &[],
    )
}

fn validate_selection(
    form: &AssignForm,
    departments: &[Department],
    roles: &[Role],
) -> Result<(i32, i32), Vec<String>> {
    let department_id =
        parse_selection(&form.department_id).filter(|id| departments.iter().any(|d| d.id == *id));
    let role_id = parse_selection(&form.role_id).filter(|id| roles.iter().any(|r| r.id == *id));

    match (department_id, role_id) {
        (Some(department_id), Some(role_id)) => Ok((department_id, role_id)),
        _ => {
            let mut errors = Vec::new();
            if department_id.is_none() {
                errors.push("Please select a department.".to_string());
            }
            if role_id.is_none() {
                errors.push("Please select a role.".to_string());
            }
            Err(errors)
        }
    }
}

pub async fn assign_employee(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
    employee_id: web::Path<i32>,
    form: web::Form<AssignForm>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    let employee = assignable_employee(&state, employee_id.into_inner()).await?;
    let departments = state.repo.all_departments().await?;
    let roles = state.repo.all_roles().await?;

    let (department_id, role_id) = match validate_selection(&form, &departments, &roles) {
        Ok(selection) => selection,
        Err(errors) => {
            return assign_page(
                &req,
                &state,
                &user,
                &employee,
                &departments,
                &roles,
                (parse_selection(&form.department_id), parse_selection(&form.role_id)),
                &errors,
            );
        }
    };

    // The update itself skips admin rows, so None means the employee
    // vanished or was promoted after it was loaded.
    let updated = state
        .repo
        .assign_employee(employee.id, department_id, role_id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("This employee can no longer be assigned.".to_string())
        })?;

    info!(
        "Employee {} assigned to department {} with role {}",
        updated.id, department_id, role_id
    );
    Ok(redirect_with_flash(LIST_URL, "You have successfully assigned a department and role."))
}

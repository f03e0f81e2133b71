use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tera::Context;
use validator::Validate;

use super::redirect_with_flash;
use crate::errors::AppError;
use crate::models::employee::NewEmployee;
use crate::utils::session::{safe_next, session_cookie, session_removal_cookie, CurrentUser};
use crate::utils::validation::form_errors;
use crate::utils::{flash, jwt, password};
use crate::views;
use crate::AppState;

#[derive(Deserialize, Default)]
pub struct LoginQuery {
    next: Option<String>,
}

#[derive(Deserialize, Validate, Default)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email address."))]
    email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    password: String,
}

#[derive(Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 60, message = "Email must be at most 60 characters.")
    )]
    email: String,
    #[validate(length(min = 1, max = 60, message = "Username must be between 1 and 60 characters."))]
    username: String,
    #[validate(length(min = 1, max = 60, message = "First name must be between 1 and 60 characters."))]
    first_name: String,
    #[validate(length(min = 1, max = 60, message = "Last name must be between 1 and 60 characters."))]
    last_name: String,
    #[validate(
        length(min = 8, max = 128, message = "Password must be between 8 and 128 characters."),
        must_match(other = "confirm_password", message = "Passwords must match.")
    )]
    #[serde(skip_serializing)]
    password: String,
    #[serde(skip_serializing)]
    confirm_password: String,
}

impl RegisterForm {
    fn trimmed(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            ..self
        }
    }
}

fn login_form(
    req: &HttpRequest,
    state: &AppState,
    email: &str,
    next: Option<&str>,
    errors: &[String],
) -> Result<HttpResponse, AppError> {
    let next_query = next.map(|next| {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("next", next)
            .finish()
    });

    let mut ctx = Context::new();
    ctx.insert("email", email);
    ctx.insert("next_query", &next_query);
    ctx.insert("errors", errors);

    views::render(req, &state.templates, None, "auth/login.html.tera", "Login", ctx)
}

fn register_form(
    req: &HttpRequest,
    state: &AppState,
    form: &RegisterForm,
    errors: &[String],
) -> Result<HttpResponse, AppError> {
    let mut ctx = Context::new();
    ctx.insert("form", form);
    ctx.insert("errors", errors);

    views::render(req, &state.templates, None, "auth/register.html.tera", "Register", ctx)
}

pub async fn login_page(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, AppError> {
    let next = safe_next(query.next.as_deref());
    login_form(&req, &state, "", next.as_deref(), &[])
}

pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<LoginQuery>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    let next = safe_next(query.next.as_deref());
    let email = form.email.trim();

    let mut errors = form_errors(&LoginForm {
        email: email.to_string(),
        password: form.password.clone(),
    });

    if errors.is_empty() {
        let employee = state.repo.find_employee_by_email(email).await?;
        match employee {
            Some(employee) if password::verify_password(&form.password, &employee.password_hash) => {
                let token = jwt::generate_token(
                    &state.config.jwt_secret,
                    employee.id,
                    state.config.session_ttl_hours,
                )
                .map_err(|_| AppError::InternalServerError("Token generation error".to_string()))?;

                let location = next.unwrap_or_else(|| {
                    if employee.is_admin {
                        "/admin/dashboard".to_string()
                    } else {
                        "/dashboard".to_string()
                    }
                });

                info!("Employee {} logged in", employee.id);
                return Ok(HttpResponse::Found()
                    .insert_header((header::LOCATION, location))
                    .cookie(session_cookie(token, &state.config))
                    .finish());
            }
            _ => {
                debug!("Failed login attempt for {}", email);
                errors.push("Invalid email or password.".to_string());
            }
        }
    }

    login_form(&req, &state, email, next.as_deref(), &errors)
}

pub async fn register_page(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    register_form(&req, &state, &RegisterForm::default(), &[])
}

pub async fn register(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner().trimmed();

    let mut errors = form_errors(&form);
    if errors.is_empty() && state.repo.find_employee_by_email(&form.email).await?.is_some() {
        errors.push("Email is already in use.".to_string());
    }

    if errors.is_empty() {
        let new_employee = NewEmployee {
            email: form.email.clone(),
            username: form.username.clone(),
            first_name: form.first_name.clone(),
            last_name: form.last_name.clone(),
            password_hash: password::hash_password(&form.password)?,
        };

        match state.repo.create_employee(new_employee).await {
            Ok(employee) => {
                info!("Employee {} registered", employee.id);
                return Ok(redirect_with_flash(
                    "/login",
                    "You have successfully registered! You may now login.",
                ));
            }
            Err(AppError::Conflict(_)) => {
                errors.push("Email or username is already in use.".to_string());
            }
            Err(err) => return Err(err),
        }
    }

    register_form(&req, &state, &form, &errors)
}

pub async fn logout(user: CurrentUser) -> HttpResponse {
    info!("Employee {} logged out", user.employee().id);

    HttpResponse::Found()
        .insert_header((header::LOCATION, "/login"))
        .cookie(session_removal_cookie())
        .cookie(flash::cookie(&["You have successfully been logged out.".to_string()]))
        .finish()
}

use actix_web::{web, HttpRequest, HttpResponse};
use tera::Context;

use crate::errors::AppError;
use crate::utils::session::CurrentUser;
use crate::views;
use crate::AppState;

pub async fn homepage(
    req: HttpRequest,
    user: Option<CurrentUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    views::render(
        &req,
        &state.templates,
        user.as_ref().map(CurrentUser::employee),
        "home/index.html.tera",
        "Welcome",
        Context::new(),
    )
}

pub async fn dashboard(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    views::render(
        &req,
        &state.templates,
        Some(user.employee()),
        "home/dashboard.html.tera",
        "Dashboard",
        Context::new(),
    )
}

pub async fn admin_dashboard(
    req: HttpRequest,
    user: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user.require_admin()?;

    views::render(
        &req,
        &state.templates,
        Some(user.employee()),
        "home/admin_dashboard.html.tera",
        "Dashboard",
        Context::new(),
    )
}

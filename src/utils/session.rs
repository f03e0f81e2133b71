use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use log::{debug, warn};

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::employee::Employee;
use crate::utils::jwt;
use crate::AppState;

pub const SESSION_COOKIE: &str = "session";

/// The employee behind the request's session cookie.
///
/// Extracting it from a request without a valid session fails with
/// `AppError::LoginRequired`, which redirects to the login page with the
/// requested path as `next`. The employee is re-read from the repository on
/// every request, so deleted accounts lose access immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Employee);

impl CurrentUser {
    pub fn employee(&self) -> &Employee {
        &self.0
    }

    /// Passes only for administrators.
    pub fn require_admin(&self) -> Result<(), AppError> {
        check_admin(&self.0)
    }
}

pub fn check_admin(employee: &Employee) -> Result<(), AppError> {
    if employee.is_admin {
        Ok(())
    } else {
        warn!("Employee {} denied access to an admin page", employee.id);
        Err(AppError::Forbidden(
            "You do not have permission to access this page.".to_string(),
        ))
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| req.path().to_string());
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                AppError::InternalServerError("Application state is not configured".to_string())
            })?;

            let token = token.ok_or_else(|| AppError::LoginRequired(target.clone()))?;

            let claims = jwt::validate_token(&state.config.jwt_secret, &token).map_err(|err| {
                debug!("Rejected session token: {}", err);
                AppError::LoginRequired(target.clone())
            })?;

            let employee_id = claims
                .employee_id()
                .ok_or_else(|| AppError::LoginRequired(target.clone()))?;

            match state.repo.get_employee(employee_id).await? {
                Some(employee) => Ok(CurrentUser(employee)),
                None => {
                    debug!("Session refers to missing employee {}", employee_id);
                    Err(AppError::LoginRequired(target))
                }
            }
        })
    }
}

pub fn session_cookie(token: String, config: &AppConfig) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(config.profile.secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(config.session_ttl_hours))
        .finish()
}

pub fn session_removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// Keeps a post-login redirect target only when it stays on this site.
pub fn safe_next(next: Option<&str>) -> Option<String> {
    let next = next?.trim();
    // Browsers drop tabs and newlines from URLs, so "/\t/host" would become "//host".
    let hidden = next.chars().any(|c| c.is_control() || c.is_whitespace());
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') && !hidden {
        Some(next.to_string())
    } else {
        None
    }
}

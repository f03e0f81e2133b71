use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use log::error;
use std::fmt;

use crate::utils::flash;

#[derive(Debug)]
pub enum AppError {
    /// No valid session; carries the path to come back to after logging in.
    LoginRequired(String),
    Forbidden(String),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    InternalServerError(String),
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::LoginRequired(next) => write!(f, "Login required: {}", next),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::BadRequest(db_err.message().to_string());
            }
        }
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            other => AppError::DatabaseError(other.to_string()),
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        AppError::InternalServerError(format!("Template error: {:?}", err))
    }
}

impl AppError {
    /// Text safe to show on the error page; server-side details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::LoginRequired(_) => "You must be logged in to access this page.".to_string(),
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                "Something went wrong on our side.".to_string()
            }
        }
    }
}

/// Location of the login page, with `next` pointing back at `target`.
pub fn login_url(target: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", target)
        .finish();
    format!("/login?{}", query)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::LoginRequired(_) => StatusCode::FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired(next) => {
                return HttpResponse::Found()
                    .insert_header((header::LOCATION, login_url(next)))
                    .cookie(flash::cookie(&[self.public_message()]))
                    .finish();
            }
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                error!("{}", msg);
            }
            _ => {}
        }

        // `views::error_pages` swaps this body for the HTML error page.
        HttpResponse::build(self.status_code())
            .content_type("text/plain; charset=utf-8")
            .body(self.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(login_url("/departments"), "/login?next=%2Fdepartments");
        assert_eq!(
            login_url("/roles/edit/3?x=1"),
            "/login?next=%2Froles%2Fedit%2F3%3Fx%3D1"
        );
    }

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(AppError::Forbidden(String::new()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound(String::new()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::LoginRequired("/".into()).status_code(), StatusCode::FOUND);
        assert_eq!(
            AppError::DatabaseError(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_shown() {
        let err = AppError::DatabaseError("connection refused to 10.0.0.7".to_string());
        assert_eq!(err.public_message(), "Something went wrong on our side.");
        assert_eq!(
            AppError::Forbidden("Admins only.".to_string()).public_message(),
            "Admins only."
        );
    }

    #[test]
    fn template_errors_are_internal() {
        let err: AppError = tera::Error::msg("missing template").into();
        assert!(matches!(err, AppError::InternalServerError(_)));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}

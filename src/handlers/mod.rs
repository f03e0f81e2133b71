pub mod auth;
pub mod department;
pub mod employee;
pub mod home;
pub mod role;

use actix_web::http::header;
use actix_web::HttpResponse;

use crate::utils::flash;

pub(crate) fn redirect_with_flash(location: &str, message: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .cookie(flash::cookie(&[message.to_string()]))
        .finish()
}

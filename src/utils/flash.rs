//! One-shot messages carried to the next rendered page in a cookie.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;

pub const FLASH_COOKIE: &str = "flash";

pub fn encode(messages: &[String]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for message in messages {
        serializer.append_pair("m", message);
    }
    serializer.finish()
}

pub fn decode(value: &str) -> Vec<String> {
    url::form_urlencoded::parse(value.as_bytes())
        .filter(|(key, _)| key == "m")
        .map(|(_, message)| message.into_owned())
        .collect()
}

pub fn cookie(messages: &[String]) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, encode(messages))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// Cookie that tells the browser to drop any pending messages.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// Messages attached to the incoming request.
pub fn pending(req: &HttpRequest) -> Vec<String> {
    req.cookie(FLASH_COOKIE)
        .map(|cookie| decode(cookie.value()))
        .unwrap_or_default()
}

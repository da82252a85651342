use actix_web::{cookie::Cookie, HttpRequest};
use rand::distributions::{Alphanumeric, DistString};

use crate::app::AppError;

/// Cookie carrying the anti-forgery value. Readable by page scripts so the
/// like button can echo it back in a header.
pub const CSRF_COOKIE: &str = "csrf";

/// Fresh anti-forgery value.
pub fn issue() -> String {
    Alphanumeric.sample_string(&mut rand::thread_rng(), 32)
}

pub fn cookie(value: &str) -> Cookie<'static> {
    Cookie::build(CSRF_COOKIE, value.to_string()).path("/").finish()
}

/// Returns the request's anti-forgery value and whether it is freshly
/// issued (meaning the response still has to set the cookie).
pub fn for_request(req: &HttpRequest) -> (String, bool) {
    match req.cookie(CSRF_COOKIE) {
        Some(c) => (c.value().to_string(), false),
        None => (issue(), true),
    }
}

/// Double-submit check: a mutating request must echo the cookie value in a
/// form field or the `X-Csrf-Token` header.
pub fn verify(req: &HttpRequest, submitted: &str) -> Result<(), AppError> {
    let cookie = req.cookie(CSRF_COOKIE).ok_or(AppError::Unauthorized)?;
    if submitted.is_empty() || cookie.value() != submitted {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

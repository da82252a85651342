pub mod blog;
pub mod comment;
pub mod like;
pub mod user;

use actix_web::{
    http::{header, header::ContentType},
    HttpRequest, HttpResponse,
};

use crate::auth::csrf;

/// Renders a page, making sure the anti-forgery cookie rides along when the
/// request did not already carry one.
pub(crate) fn html_page(req: &HttpRequest, render: impl FnOnce(&str) -> String) -> HttpResponse {
    let (csrf_token, fresh) = csrf::for_request(req);

    let mut resp = HttpResponse::Ok();
    resp.content_type(ContentType::html());
    if fresh {
        resp.cookie(csrf::cookie(&csrf_token));
    }
    resp.body(render(&csrf_token))
}

/// 303 redirect used after form posts.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Where anonymous requests to page routes that need a session end up.
pub fn redirect_to_login() -> HttpResponse {
    see_other("/login/")
}

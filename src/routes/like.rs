use actix_web::{post, web::Data, HttpRequest, HttpResponse};

use crate::{
    app::{AppError, AppState},
    auth::{self, csrf},
    database::models::{blog::Blog, like::Like},
};

/// Pipe for liking or unliking a blog. A first toggle by a user creates
/// the like, a second one removes it.
/// - url: `{domain}/blog/{blog_id}/like/`
///
/// # HTTP request requirements
/// - `{blog_id}` as a parameter
/// ## header
/// - cookie named `token` containing a login token
/// - `X-Csrf-Token` matching the `csrf` cookie
///
/// # Response
/// ## Ok
/// - `{"likes": <post-toggle count>}`
/// ## Error
/// - Unauthorized
/// - Not found
#[post("/blog/{blog_id}/like/")]
pub async fn toggle_like(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = auth::session_user(&req, &app_state)?;
    let submitted = req
        .headers()
        .get("X-Csrf-Token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    csrf::verify(&req, submitted)?;

    let blog_id = req.match_info().query("blog_id").parse::<i32>()?;
    let mut conn = app_state.psql_pool.get()?;

    Blog::find_by_id(&mut conn, blog_id)?;
    let likes = Like::toggle(&mut conn, blog_id, &user.id)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "likes": likes })))
}

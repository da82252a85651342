pub mod csrf;
pub mod token;

use actix_web::HttpRequest;

use crate::app::{AppError, AppState};
use crate::auth::token::Token;
use crate::database::models::user::User;

/// Resolves the request's `token` cookie to its user.
///
/// A session is either Authenticated or Anonymous: anything short of a live
/// token backed by an existing user row comes back as
/// [`AppError::Unauthorized`].
pub fn session_user(req: &HttpRequest, app_state: &AppState) -> Result<User, AppError> {
    let token = req
        .cookie("token")
        .ok_or(AppError::Unauthorized)?
        .value()
        .to_string();

    let mut redis_conn = app_state.redis_pool.get()?;
    let user_id =
        Token::find(&mut redis_conn, &token).map_err(|_| AppError::Unauthorized)?;

    let mut psql_conn = app_state.psql_pool.get()?;
    User::find_by_id(&mut psql_conn, &user_id).map_err(|_| AppError::Unauthorized)
}

use std::{fmt::Display, num::ParseIntError, sync::Arc};

use actix_web::{HttpResponse, ResponseError};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};
use r2d2_redis::RedisConnectionManager;
use redis::RedisError;

use crate::country::CountryClient;
use crate::database::db_utils::{psql_connect_to_db, redis_connect_to_db};

/// Predicate deciding whether a registration password is acceptable.
pub type PasswordPolicy = fn(&str) -> bool;

/// Policy installed by [`AppState::new`]: at least ten characters.
pub fn default_password_policy(password: &str) -> bool {
    password.len() >= 10
}

/** Used for storing the shared clients while handling requests */
pub struct AppState {
    pub psql_pool: Arc<Pool<ConnectionManager<PgConnection>>>,
    pub redis_pool: Arc<Pool<RedisConnectionManager>>,
    pub country: CountryClient,
    pub password_policy: PasswordPolicy,
}

impl AppState {
    /// Builds the state from the environment (`DATABASE_URL`, `REDIS_URL`,
    /// `COUNTRY_API_URL`), unless an explicit database url is supplied.
    pub fn new(database_url: Option<&str>) -> Self {
        AppState {
            psql_pool: psql_connect_to_db(database_url),
            redis_pool: redis_connect_to_db(None),
            country: CountryClient::from_env(),
            password_policy: default_password_policy,
        }
    }
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            psql_pool: self.psql_pool.clone(),
            redis_pool: self.redis_pool.clone(),
            country: self.country.clone(),
            password_policy: self.password_policy,
        }
    }
}

/** Holds the errors we map requests onto while processing them */
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    /// A referenced blog or user does not exist.
    NotFound,
    /// The input breaks a business rule (empty comment, taken username,
    /// weak password, empty blog fields).
    Validation,
    /// Bad credentials on login.
    AuthFailure,
    /// An action that needs a session was attempted without one, or with a
    /// missing anti-forgery token.
    Unauthorized,
    InternalServerError,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound => f.write_str("Not found"),
            AppError::Validation => f.write_str("Invalid input"),
            AppError::AuthFailure => f.write_str("Authentication failed"),
            AppError::Unauthorized => f.write_str("Unauthorized"),
            AppError::InternalServerError => f.write_str("Internal server error"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            AppError::NotFound => actix_web::http::StatusCode::NOT_FOUND,
            AppError::Validation => actix_web::http::StatusCode::BAD_REQUEST,
            AppError::AuthFailure => actix_web::http::StatusCode::UNAUTHORIZED,
            AppError::Unauthorized => actix_web::http::StatusCode::UNAUTHORIZED,
            AppError::InternalServerError => {
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::new(self.status_code())
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => AppError::NotFound,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => AppError::Validation,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _,
            ) => AppError::NotFound,
            _ => AppError::InternalServerError,
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(_: diesel::r2d2::PoolError) -> Self {
        AppError::InternalServerError
    }
}

impl From<RedisError> for AppError {
    fn from(_: RedisError) -> Self {
        AppError::InternalServerError
    }
}

impl From<ParseIntError> for AppError {
    fn from(_: ParseIntError) -> Self {
        Self::NotFound
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;

    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::AuthFailure.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InternalServerError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_default_password_policy_boundary() {
        assert!(!default_password_policy(""));
        assert!(!default_password_policy("short-pw1"));
        assert!(default_password_policy("long-enough"));
    }

    #[test]
    fn test_missing_row_maps_to_not_found() {
        assert_eq!(
            AppError::from(diesel::result::Error::NotFound),
            AppError::NotFound
        );
    }
}

use std::{env, sync::Arc};

use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};
use dotenv::dotenv;
use r2d2_redis::RedisConnectionManager;

/// Builds the Postgres connection pool.
/// Requires `DATABASE_URL` in the environment unless an url is supplied.
///
/// # Example
/// ```
/// let pool = psql_connect_to_db(None);
/// ```
pub fn psql_connect_to_db(
    database_url: Option<&str>,
) -> Arc<Pool<ConnectionManager<PgConnection>>> {
    dotenv().ok();

    let database_url = match database_url {
        Some(url) => url.to_string(),
        None => env::var("DATABASE_URL").expect("Environment variable 'DATABASE_URL' not set"),
    };

    let manager = ConnectionManager::<PgConnection>::new(&database_url);
    let pool = Pool::builder()
        .build(manager)
        .unwrap_or_else(|err| panic!("Error connecting to {}: {}", database_url, err));

    Arc::new(pool)
}

/// Builds the redis pool that backs session tokens.
/// Reads `REDIS_URL`, defaulting to a local instance.
pub fn redis_connect_to_db(redis_url: Option<&str>) -> Arc<Pool<RedisConnectionManager>> {
    dotenv().ok();

    let redis_url = match redis_url {
        Some(url) => url.to_string(),
        None => env::var("REDIS_URL").unwrap_or_else(|_| String::from("redis://127.0.0.1/")),
    };

    let manager = RedisConnectionManager::new(redis_url.as_str())
        .unwrap_or_else(|err| panic!("Bad redis url {}: {}", redis_url, err));
    let pool = Pool::builder()
        .build(manager)
        .unwrap_or_else(|err| panic!("Error connecting to {}: {}", redis_url, err));

    Arc::new(pool)
}

/// Address the HTTP server binds, `127.0.0.1:8080` unless `BIND_ADDR` says
/// otherwise.
pub fn bind_addr() -> String {
    env::var("BIND_ADDR").unwrap_or_else(|_| String::from("127.0.0.1:8080"))
}

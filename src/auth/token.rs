use rand::distributions::{Alphanumeric, DistString};
use redis::{Commands, RedisError};

/// Seconds an issued session token stays valid.
pub const SESSION_TTL_SECS: usize = 1800;

pub struct Token {}

impl Token {
    /// Issues a fresh session token for the user and stores it with a TTL.
    pub fn new(redis_conn: &mut redis::Connection, user_id: &str) -> String {
        let token = Alphanumeric.sample_string(&mut rand::thread_rng(), 32);

        let _res = redis_conn.set_ex::<&str, &str, ()>(&token, user_id, SESSION_TTL_SECS);

        token
    }

    /// Resolves a token back to the user id it was issued for.
    pub fn find(redis_conn: &mut redis::Connection, token: &str) -> Result<String, RedisError> {
        redis_conn.get::<&str, String>(token)
    }

    /// Revokes a token. A token that is already gone is fine.
    pub fn delete(redis_conn: &mut redis::Connection, token: &str) {
        let _res = redis_conn.del::<&str, i32>(token);
    }
}

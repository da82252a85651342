use diesel::prelude::*;
use uuid::Uuid;

use crate::app::AppError;
use crate::schema::users;

#[derive(Debug, Clone, Queryable)]
pub struct User {
    pub id: String,
    pub username: String,
    ///SHA256 of the password
    pub pass: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct UserInsert {
    id: String,
    username: String,
    pass: String,
}

impl User {
    /// Pushes a new user row and returns it.
    ///
    /// Rejects an empty username and anything that is not a sha256 hex
    /// digest in the `pass` position; a taken username surfaces as
    /// [`AppError::Validation`] through the unique constraint.
    pub fn create(
        conn: &mut PgConnection,
        uname: &str,
        pass_hash: &str,
    ) -> Result<User, AppError> {
        if uname.is_empty() || pass_hash.len() != 64 {
            return Err(AppError::Validation);
        }

        let to_insert = UserInsert {
            id: Uuid::new_v4().to_string(),
            username: uname.to_string(),
            pass: pass_hash.to_string(),
        };

        let ret_user: User = diesel::insert_into(users::table)
            .values(&to_insert)
            .get_result(conn)?;

        Ok(ret_user)
    }

    pub fn find_by_id(conn: &mut PgConnection, user_id: &str) -> Result<User, AppError> {
        use crate::schema::users::dsl::*;

        users
            .filter(id.eq(user_id))
            .first::<User>(conn)
            .map_err(AppError::from)
    }

    /// Returns the user with the specified username, or `None` when there
    /// is no such row.
    pub fn find_by_username(conn: &mut PgConnection, uname: &str) -> Option<User> {
        use crate::schema::users::dsl::*;

        users.filter(username.eq(uname)).first::<User>(conn).ok()
    }

    /// Removes the user row. Their blogs, comments and likes, and the
    /// comments and likes on those blogs, go with it through the foreign
    /// key cascade.
    pub fn delete(&self, conn: &mut PgConnection) -> Result<(), AppError> {
        use crate::schema::users::dsl::*;

        diesel::delete(users.filter(id.eq(&self.id))).execute(conn)?;
        Ok(())
    }
}

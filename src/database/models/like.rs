use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;

use crate::app::AppError;
use crate::schema::likes;

#[derive(Debug, Queryable)]
pub struct Like {
    pub id: i32,
    pub blog_id: i32,
    pub user_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = likes)]
struct LikeInsert {
    blog_id: i32,
    user_id: String,
    created_at: NaiveDateTime,
}

impl Like {
    /// Flips the like for a (blog, user) pair and returns the post-toggle
    /// count.
    ///
    /// The conditional insert rides on the unique (blog_id, user_id) index:
    /// of two concurrent toggles one inserts, the other conflicts and takes
    /// the delete branch. No read-then-write anywhere.
    pub fn toggle(conn: &mut PgConnection, blog: i32, user: &str) -> Result<i64, AppError> {
        use crate::schema::likes::dsl::*;

        let inserted = diesel::insert_into(likes)
            .values(&LikeInsert {
                blog_id: blog,
                user_id: user.to_string(),
                created_at: Utc::now().naive_utc(),
            })
            .on_conflict((blog_id, user_id))
            .do_nothing()
            .execute(conn)?;

        if inserted == 0 {
            diesel::delete(likes.filter(blog_id.eq(blog)).filter(user_id.eq(user)))
                .execute(conn)?;
        }

        Like::count_for_blog(conn, blog)
    }

    pub fn count_for_blog(conn: &mut PgConnection, blog: i32) -> Result<i64, AppError> {
        use crate::schema::likes::dsl::*;

        let total = likes.filter(blog_id.eq(blog)).count().get_result(conn)?;
        Ok(total)
    }
}

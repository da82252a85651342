use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppError;
use crate::database::models::user::User;
use crate::schema::comments;

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct Comment {
    pub id: String,
    pub blog_id: i32,
    pub user_id: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = comments)]
struct CommentInsert {
    id: String,
    blog_id: i32,
    user_id: String,
    body: String,
    created_at: NaiveDateTime,
}

impl Comment {
    /** Creates a comment on the blog specified. An empty (or
    whitespace-only) body is a validation error and inserts nothing. */
    pub fn create(
        conn: &mut PgConnection,
        blog_id_in: i32,
        user_id_in: &str,
        comment_body: &str,
    ) -> Result<Comment, AppError> {
        if comment_body.trim().is_empty() {
            return Err(AppError::Validation);
        }

        let record = CommentInsert {
            id: Uuid::new_v4().to_string(),
            blog_id: blog_id_in,
            user_id: user_id_in.to_string(),
            body: comment_body.to_string(),
            created_at: Utc::now().naive_utc(),
        };

        let ret: Comment = diesel::insert_into(comments::table)
            .values(&record)
            .get_result(conn)?;

        Ok(ret)
    }

    /** Returns all comments posted on a blog with their authors, oldest
    first. */
    pub fn list_for_blog(
        conn: &mut PgConnection,
        blog_id_in: i32,
    ) -> Result<Vec<(Comment, User)>, AppError> {
        use crate::schema::users;

        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::blog_id.eq(blog_id_in))
            .order(comments::created_at.asc())
            .load::<(Comment, User)>(conn)?;

        Ok(rows)
    }
}

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::app::AppError;
use crate::database::models::user::User;
use crate::schema::blogs;

#[derive(Debug, Clone, PartialEq, Queryable, Serialize, Deserialize)]
pub struct Blog {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub country: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = blogs)]
struct BlogInsert {
    title: String,
    body: String,
    country: Option<String>,
    created_by: String,
    created_at: NaiveDateTime,
}

impl Blog {
    /// Inserts a blog for the given author. Title and body must be
    /// non-empty; a blank country tag is stored as no tag at all.
    pub fn create(
        conn: &mut PgConnection,
        creator: &User,
        title_in: &str,
        body_in: &str,
        country_in: Option<&str>,
    ) -> Result<Blog, AppError> {
        if title_in.trim().is_empty() || body_in.trim().is_empty() {
            return Err(AppError::Validation);
        }

        let country_in = country_in.and_then(|c| {
            let c = c.trim();
            if c.is_empty() {
                None
            } else {
                Some(c.to_string())
            }
        });

        let to_insert = BlogInsert {
            title: title_in.to_string(),
            body: body_in.to_string(),
            country: country_in,
            created_by: creator.id.clone(),
            created_at: Utc::now().naive_utc(),
        };

        let ret_blog: Blog = diesel::insert_into(blogs::table)
            .values(&to_insert)
            .get_result(conn)?;

        Ok(ret_blog)
    }

    /// All blogs with their authors, newest first.
    pub fn list_all(conn: &mut PgConnection) -> Result<Vec<(Blog, User)>, AppError> {
        use crate::schema::users;

        let rows = blogs::table
            .inner_join(users::table)
            .order(blogs::created_at.desc())
            .load::<(Blog, User)>(conn)?;

        Ok(rows)
    }

    pub fn find_by_id(conn: &mut PgConnection, blog_id: i32) -> Result<Blog, AppError> {
        use crate::schema::blogs::dsl::*;

        blogs
            .filter(id.eq(blog_id))
            .first::<Blog>(conn)
            .map_err(AppError::from)
    }
}

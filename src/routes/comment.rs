use actix_web::{post, web, web::Data, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    app::{AppError, AppState},
    auth::{self, csrf},
    database::models::{blog::Blog, comment::Comment},
    routes::{redirect_to_login, see_other},
};

#[derive(Deserialize, Serialize)]
pub struct CommentForm {
    pub body: String,
    pub csrf_token: String,
}

/// Pipe for commenting on a blog
/// - url: `{domain}/blog/{blog_id}/comment/`
///
/// # HTTP request requirements
/// - `{blog_id}` as a parameter
/// ## header
/// - cookie named `token` containing a login token
/// - cookie named `csrf` matching the form's `csrf_token`
/// ## body
/// - form fields `body` and `csrf_token`
///
/// # Response
/// ## Ok
/// - 303 back to the blog detail page
/// ## Error
/// - 303 to the login page when anonymous
/// - Not found
/// - Bad request (empty body)
/// - Unauthorized (bad anti-forgery token)
#[post("/blog/{blog_id}/comment/")]
pub async fn add_comment(
    req: HttpRequest,
    form: web::Form<CommentForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = match auth::session_user(&req, &app_state) {
        Ok(user) => user,
        Err(_) => return Ok(redirect_to_login()),
    };
    csrf::verify(&req, &form.csrf_token)?;

    let blog_id = req.match_info().query("blog_id").parse::<i32>()?;
    let mut conn = app_state.psql_pool.get()?;

    //Checks the blog exists first
    Blog::find_by_id(&mut conn, blog_id)?;
    Comment::create(&mut conn, blog_id, &user.id, &form.body)?;

    Ok(see_other(&format!("/blog/{}/", blog_id)))
}

#[cfg(test)]
mod tests {
    use actix_web::{
        cookie::CookieBuilder,
        test::{self, call_service},
        App,
    };
    use sha256::digest;

    use crate::auth::token::Token;
    use crate::database::models::user::User;

    use super::*;

    #[actix_rt::test]
    #[ignore = "needs local postgres and redis"]
    async fn test_empty_comment_is_rejected_and_inserts_nothing() {
        let app_state = AppState::new(None);

        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(app_state.clone()))
                .service(super::add_comment),
        )
        .await;

        let mut conn = app_state.psql_pool.get().unwrap();
        let user = User::create(&mut conn, "Test_commenter", &digest("test_password123")).unwrap();
        let blog = Blog::create(&mut conn, &user, "Test title", "Test body", None).unwrap();
        let token = Token::new(&mut app_state.redis_pool.get().unwrap(), &user.id);

        let req = test::TestRequest::post()
            .uri(format!("/blog/{}/comment/", blog.id).as_str())
            .cookie(CookieBuilder::new("token", &token).finish())
            .cookie(csrf::cookie("test_csrf"))
            .set_form(&CommentForm {
                body: String::from("   "),
                csrf_token: String::from("test_csrf"),
            })
            .to_request();

        let resp = call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
        assert!(Comment::list_for_blog(&mut conn, blog.id).unwrap().is_empty());

        user.delete(&mut conn).unwrap();
        Token::delete(&mut app_state.redis_pool.get().unwrap(), &token);
    }

    #[actix_rt::test]
    #[ignore = "needs local postgres and redis"]
    async fn test_comment_redirects_to_detail() {
        let app_state = AppState::new(None);

        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(app_state.clone()))
                .service(super::add_comment),
        )
        .await;

        let mut conn = app_state.psql_pool.get().unwrap();
        let user = User::create(&mut conn, "Test_commenter2", &digest("test_password123")).unwrap();
        let blog = Blog::create(&mut conn, &user, "Test title", "Test body", None).unwrap();
        let token = Token::new(&mut app_state.redis_pool.get().unwrap(), &user.id);

        let req = test::TestRequest::post()
            .uri(format!("/blog/{}/comment/", blog.id).as_str())
            .cookie(CookieBuilder::new("token", &token).finish())
            .cookie(csrf::cookie("test_csrf"))
            .set_form(&CommentForm {
                body: String::from("First!"),
                csrf_token: String::from("test_csrf"),
            })
            .to_request();

        let resp = call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 303);
        let location = resp.headers().get("location").unwrap().to_str().unwrap();
        pretty_assertions::assert_eq!(location, format!("/blog/{}/", blog.id));

        let comments = Comment::list_for_blog(&mut conn, blog.id).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].0.body, "First!");

        user.delete(&mut conn).unwrap();
        Token::delete(&mut app_state.redis_pool.get().unwrap(), &token);
    }

    #[actix_rt::test]
    #[ignore = "needs local postgres and redis"]
    async fn test_anonymous_comment_redirects_to_login() {
        let app_state = AppState::new(None);

        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(app_state.clone()))
                .service(super::add_comment),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/blog/1/comment/")
            .set_form(&CommentForm {
                body: String::from("hello"),
                csrf_token: String::new(),
            })
            .to_request();

        let resp = call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 303);
        let location = resp.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(location, "/login/");
    }
}

use actix_web::{
    cookie::{time::OffsetDateTime, Cookie, Expiration},
    get,
    http::{header::ContentType, Method},
    post, route, web,
    web::Data,
    HttpRequest, HttpResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha256::digest;

use crate::{
    app::{AppError, AppState},
    auth::{csrf, token::Token, token::SESSION_TTL_SECS},
    database::models::user::User,
    routes::{html_page, redirect_to_login, see_other},
    views,
};

#[derive(Deserialize, Serialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
    pub csrf_token: String,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build("token", token)
        .path("/")
        .expires(Expiration::DateTime(
            OffsetDateTime::from_unix_timestamp(Utc::now().timestamp() + SESSION_TTL_SECS as i64)
                .unwrap(),
        ))
        .finish()
}

/// Pipe for the registration form
/// - url: `{domain}/register/`
#[get("/register/")]
pub async fn register_form(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Ok(html_page(&req, |csrf_token| {
        views::register_page(None, csrf_token)
    }))
}

/// Pipe for creating an user
/// - url: `{domain}/register/`
///
/// # HTTP request requirements
/// ## header
/// - cookie named `csrf` matching the form's `csrf_token`
/// ## body
/// - form fields `username`, `password` and `csrf_token`; the password has
///   to pass the configured strength policy
///
/// # Response
/// ## Ok
/// - set cookie header containing a login token (registering logs you in),
///   303 to the blog list
/// ## Error
/// - Bad request (re-rendered form: taken username or weak password)
/// - Unauthorized (bad anti-forgery token)
#[post("/register/")]
pub async fn register(
    req: HttpRequest,
    form: web::Form<CredentialsForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&req, &form.csrf_token)?;

    let username = form.username.trim().to_string();
    let password = form.password.trim().to_string();

    let reject = |message: &str, req: &HttpRequest| {
        HttpResponse::BadRequest()
            .content_type(ContentType::html())
            .body(views::register_page(Some(message), &csrf::for_request(req).0))
    };

    if username.is_empty() {
        return Ok(reject("Username is required.", &req));
    }
    if !(app_state.password_policy)(&password) {
        return Ok(reject("Password does not meet the strength policy.", &req));
    }

    let mut conn = app_state.psql_pool.get()?;
    if User::find_by_username(&mut conn, &username).is_some() {
        return Ok(reject("Username is already taken.", &req));
    }

    let user = match User::create(&mut conn, &username, &digest(password)) {
        Ok(user) => user,
        // two concurrent registrations of one name race down to the unique
        // constraint; the loser gets the same answer as the pre-check
        Err(AppError::Validation) => return Ok(reject("Username is already taken.", &req)),
        Err(err) => return Err(err),
    };

    let mut redis_conn = app_state.redis_pool.get()?;
    let token = Token::new(&mut redis_conn, &user.id);

    let mut response = see_other("/");
    response
        .add_cookie(&session_cookie(token))
        .map_err(|_| AppError::InternalServerError)?;
    Ok(response)
}

/// Pipe for the login form
/// - url: `{domain}/login/`
///
/// # Response
/// ## Ok
/// - html form; after a failed attempt (`?error=1`) it carries one fixed
///   failure message, whatever the reason for the failure was
#[get("/login/")]
pub async fn login_form(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let failed = req.query_string().contains("error");

    Ok(html_page(&req, |csrf_token| {
        views::login_page(failed, csrf_token)
    }))
}

/// Pipe for logging in
/// - url: `{domain}/login/`
///
/// # HTTP request requirements
/// ## header
/// - cookie named `csrf` matching the form's `csrf_token`
/// ## body
/// - form fields `username`, `password` and `csrf_token`
///
/// # Response
/// ## Ok
/// - set cookie header containing a login token, 303 to the blog list
/// ## Error
/// - 303 back to `/login/?error=1` for an unknown username and for a wrong
///   password alike
/// - Unauthorized (bad anti-forgery token)
#[post("/login/")]
pub async fn login(
    req: HttpRequest,
    form: web::Form<CredentialsForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    csrf::verify(&req, &form.csrf_token)?;

    let mut conn = app_state.psql_pool.get()?;
    let pw = digest(form.password.trim());

    let user = match User::find_by_username(&mut conn, form.username.trim()) {
        Some(user) if user.pass == pw => user,
        _ => return Ok(see_other("/login/?error=1")),
    };

    let mut redis_conn = app_state.redis_pool.get()?;
    let token = Token::new(&mut redis_conn, &user.id);

    let mut response = see_other("/");
    response
        .add_cookie(&session_cookie(token))
        .map_err(|_| AppError::InternalServerError)?;
    Ok(response)
}

#[derive(Deserialize, Serialize)]
pub struct LogoutForm {
    pub csrf_token: String,
}

/// Pipe for ending the session and removing its token from the store
/// - url: `{domain}/logout/`
///
/// # HTTP request requirements
/// ## header
/// - cookie named `token` containing a login token
/// - for POST, cookie named `csrf` matching the form's `csrf_token`
///
/// # Response
/// ## Ok
/// - 303 to the blog list with the token cookie removed
/// ## Error
/// - 303 to the login page when anonymous
#[route("/logout/", method = "POST", method = "GET")]
pub async fn logout(
    req: HttpRequest,
    form: Option<web::Form<LogoutForm>>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if req.method() == Method::POST {
        let submitted = form.as_ref().map(|f| f.csrf_token.as_str()).unwrap_or("");
        csrf::verify(&req, submitted)?;
    }

    let token = match req.cookie("token") {
        Some(cookie) => cookie.value().to_string(),
        None => return Ok(redirect_to_login()),
    };

    let mut redis_conn = app_state.redis_pool.get()?;
    if Token::find(&mut redis_conn, &token).is_err() {
        return Ok(redirect_to_login());
    }
    Token::delete(&mut redis_conn, &token);

    let mut response = see_other("/");
    let removal = Cookie::build("token", "").path("/").finish();
    let _res = response.add_removal_cookie(&removal);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use actix_web::{
        cookie::CookieBuilder,
        test::{self, call_service},
        App,
    };

    use crate::database::models::{blog::Blog, comment::Comment, like::Like};

    use super::*;

    fn credentials(username: &str, password: &str) -> CredentialsForm {
        CredentialsForm {
            username: String::from(username),
            password: String::from(password),
            csrf_token: String::from("test_csrf"),
        }
    }

    #[actix_rt::test]
    #[ignore = "needs local postgres and redis"]
    async fn test_register_logs_the_user_in() {
        let app_state = AppState::new(None);

        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(app_state.clone()))
                .service(super::register),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register/")
            .cookie(csrf::cookie("test_csrf"))
            .set_form(&credentials("Test_register123", "test_password123"))
            .to_request();

        let resp = call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 303);
        assert!(resp.headers().get("set-cookie").is_some());

        let mut conn = app_state.psql_pool.get().unwrap();
        let user = User::find_by_username(&mut conn, "Test_register123").unwrap();
        user.delete(&mut conn).unwrap();
    }

    #[actix_rt::test]
    #[ignore = "needs local postgres"]
    async fn test_weak_password_is_rejected() {
        let app_state = AppState::new(None);

        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(app_state.clone()))
                .service(super::register),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register/")
            .cookie(csrf::cookie("test_csrf"))
            .set_form(&credentials("Test_register124", "short"))
            .to_request();

        let resp = call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);

        let mut conn = app_state.psql_pool.get().unwrap();
        assert!(User::find_by_username(&mut conn, "Test_register124").is_none());
    }

    #[actix_rt::test]
    #[ignore = "needs local postgres and redis"]
    async fn test_login_failure_shape_is_uniform() {
        let app_state = AppState::new(None);

        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(app_state.clone()))
                .service(super::login),
        )
        .await;

        let mut conn = app_state.psql_pool.get().unwrap();
        let user = User::create(
            &mut conn,
            "Test_login123",
            &digest("test_password123"),
        )
        .unwrap();

        // wrong password for a real user
        let req = test::TestRequest::post()
            .uri("/login/")
            .cookie(csrf::cookie("test_csrf"))
            .set_form(&credentials("Test_login123", "wrong_password1"))
            .to_request();
        let wrong_pw = call_service(&app, req).await;

        // a username nobody has
        let req = test::TestRequest::post()
            .uri("/login/")
            .cookie(csrf::cookie("test_csrf"))
            .set_form(&credentials("Test_nobody123", "wrong_password1"))
            .to_request();
        let unknown_user = call_service(&app, req).await;

        assert_eq!(wrong_pw.status(), unknown_user.status());
        pretty_assertions::assert_eq!(
            wrong_pw.headers().get("location").unwrap(),
            unknown_user.headers().get("location").unwrap()
        );

        user.delete(&mut conn).unwrap();
    }

    #[actix_rt::test]
    #[ignore = "needs local postgres and redis"]
    async fn test_logout_revokes_the_token() {
        let app_state = AppState::new(None);

        let app = test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(app_state.clone()))
                .service(super::logout),
        )
        .await;

        let mut conn = app_state.psql_pool.get().unwrap();
        let user = User::create(
            &mut conn,
            "Test_logout123",
            &digest("test_password123"),
        )
        .unwrap();
        let token = Token::new(&mut app_state.redis_pool.get().unwrap(), &user.id);

        let req = test::TestRequest::post()
            .uri("/logout/")
            .cookie(CookieBuilder::new("token", &token).finish())
            .cookie(csrf::cookie("test_csrf"))
            .set_form(&LogoutForm {
                csrf_token: String::from("test_csrf"),
            })
            .to_request();

        let resp = call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 303);
        assert!(Token::find(&mut app_state.redis_pool.get().unwrap(), &token).is_err());

        user.delete(&mut conn).unwrap();
    }

    #[actix_rt::test]
    #[ignore = "needs local postgres"]
    async fn test_deleting_an_user_cascades() {
        let app_state = AppState::new(None);
        let mut conn = app_state.psql_pool.get().unwrap();

        let author = User::create(&mut conn, "Test_cascade_a", &digest("test_password123")).unwrap();
        let fan = User::create(&mut conn, "Test_cascade_b", &digest("test_password123")).unwrap();
        let blog = Blog::create(&mut conn, &author, "Title", "Body", None).unwrap();
        Comment::create(&mut conn, blog.id, &fan.id, "Nice one").unwrap();
        Like::toggle(&mut conn, blog.id, &fan.id).unwrap();

        author.delete(&mut conn).unwrap();

        // the blog and everything hanging off it is gone
        assert!(Blog::find_by_id(&mut conn, blog.id).is_err());
        assert!(Comment::list_for_blog(&mut conn, blog.id).unwrap().is_empty());
        assert_eq!(Like::count_for_blog(&mut conn, blog.id).unwrap(), 0);

        fan.delete(&mut conn).unwrap();
    }
}

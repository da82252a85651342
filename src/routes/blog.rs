use actix_web::{get, http::header::ContentType, post, web, web::Data, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    app::{AppError, AppState},
    auth::{self, csrf},
    database::models::{blog::Blog, comment::Comment, like::Like, user::User},
    routes::{html_page, redirect_to_login, see_other},
    views,
};

/// Pipe for the blog list page
/// - url: `{domain}/`
///
/// # Response
/// ## Ok
/// - html list of all blogs, newest first
#[get("/")]
pub async fn blog_list(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let logged_in = auth::session_user(&req, &app_state).is_ok();

    let mut conn = app_state.psql_pool.get()?;
    let blogs = Blog::list_all(&mut conn)?;

    Ok(html_page(&req, |csrf_token| {
        views::blog_list_page(&blogs, logged_in, csrf_token)
    }))
}

/// Pipe for the blog detail page
/// - url: `{domain}/blog/{blog_id}/`
///
/// # HTTP request requirements
/// - `{blog_id}` as a parameter
///
/// # Response
/// ## Ok
/// - html page with the blog, its comments in posting order, the like
///   count, and whatever the country directory knows about the blog's
///   country tag (the page renders fine without it)
/// ## Error
/// - Not found
#[get("/blog/{blog_id}/")]
pub async fn blog_detail(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let logged_in = auth::session_user(&req, &app_state).is_ok();
    let blog_id = req.match_info().query("blog_id").parse::<i32>()?;

    let mut conn = app_state.psql_pool.get()?;
    let blog = Blog::find_by_id(&mut conn, blog_id)?;
    let author = User::find_by_id(&mut conn, &blog.created_by)?;
    let comments = Comment::list_for_blog(&mut conn, blog_id)?;
    let like_count = Like::count_for_blog(&mut conn, blog_id)?;

    let country_info = match blog.country.as_deref() {
        Some(country_name) => app_state.country.lookup(country_name).await,
        None => None,
    };

    Ok(html_page(&req, |csrf_token| {
        views::blog_detail_page(
            &blog,
            &author,
            &comments,
            like_count,
            country_info.as_ref(),
            logged_in,
            csrf_token,
        )
    }))
}

#[derive(Deserialize, Serialize)]
pub struct NewBlogForm {
    pub title: String,
    pub body: String,
    pub country: String,
    pub csrf_token: String,
}

/// Pipe for the blog creation form
/// - url: `{domain}/blog/new/`
#[get("/blog/new/")]
pub async fn new_blog_form(
    req: HttpRequest,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if auth::session_user(&req, &app_state).is_err() {
        return Ok(redirect_to_login());
    }

    Ok(html_page(&req, |csrf_token| {
        views::new_blog_page(None, csrf_token)
    }))
}

/// Pipe for creating a blog
/// - url: `{domain}/blog/new/`
///
/// # HTTP request requirements
/// ## header
/// - cookie named `token` containing a login token
/// - cookie named `csrf` matching the form's `csrf_token`
/// ## body
/// - form fields `title`, `body`, `country` (may be blank) and `csrf_token`
///
/// # Response
/// ## Ok
/// - 303 to the new blog's detail page
/// ## Error
/// - 303 to the login page when anonymous
/// - Bad request (re-rendered form, empty title or body)
/// - Unauthorized (bad anti-forgery token)
#[post("/blog/new/")]
pub async fn create_blog(
    req: HttpRequest,
    form: web::Form<NewBlogForm>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = match auth::session_user(&req, &app_state) {
        Ok(user) => user,
        Err(_) => return Ok(redirect_to_login()),
    };
    csrf::verify(&req, &form.csrf_token)?;

    let mut conn = app_state.psql_pool.get()?;
    let country = if form.country.trim().is_empty() {
        None
    } else {
        Some(form.country.as_str())
    };

    match Blog::create(&mut conn, &user, &form.title, &form.body, country) {
        Ok(blog) => Ok(see_other(&format!("/blog/{}/", blog.id))),
        Err(AppError::Validation) => Ok(HttpResponse::BadRequest()
            .content_type(ContentType::html())
            .body(views::new_blog_page(
                Some("Title and body are required."),
                &csrf::for_request(&req).0,
            ))),
        Err(err) => Err(err),
    }
}

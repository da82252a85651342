pub mod app;
pub mod country;
pub mod database;
pub mod schema;
pub mod views;

mod auth;
mod routes;

use actix_web::{middleware::Logger, App, HttpServer};

use crate::app::AppState;
use crate::database::db_utils::bind_addr;
use crate::routes::{blog::*, comment::*, like::*, user::*};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let app_state = AppState::new(None);
    let addr = bind_addr();

    log::info!("Server running on {}", addr);
    HttpServer::new(move || {
        App::new()
            .app_data(actix_web::web::Data::new(app_state.clone()))
            .wrap(Logger::default())
            //Blog routes; the creation form has to match before {blog_id}
            .service(blog_list)
            .service(new_blog_form)
            .service(create_blog)
            .service(blog_detail)
            //Comment routes
            .service(add_comment)
            //Like routes
            .service(toggle_like)
            //User routes
            .service(register_form)
            .service(register)
            .service(login_form)
            .service(login)
            .service(logout)
    })
    .bind(addr)?
    .run()
    .await
}

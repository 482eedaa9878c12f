use actix_web::{web, App, HttpServer};
use log::info;

mod chess;
mod models;
mod routes;
mod session;
mod store;
mod websocket;

use models::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("starting chess arena server at http://127.0.0.1:8080");

    // Stores and registry are created once here and shared with every
    // connection; the account and listing services reuse the same state.
    let app_state = web::Data::new(AppState::new());

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(routes::configure_routes)
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}

use std::net::TcpListener;

use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{http, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

pub mod config;
pub mod errors;
pub mod goals;
pub mod handlers;
mod middleware;
pub mod models;
pub mod routes;
pub mod store;
pub mod telemetry;
pub mod utils;

pub use middleware::auth::Claims;

use crate::config::jwt::JwtSettings;
use crate::routes::init_routes;
use crate::store::AppStores;

pub fn run(
    listener: TcpListener,
    stores: AppStores,
    jwt_settings: JwtSettings,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let stores_data = web::Data::new(stores);
    let jwt_settings = web::Data::new(jwt_settings);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://localhost:5174")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Get a pointer copy and attach it to the application state
            .app_data(stores_data.clone())
            .app_data(jwt_settings.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

mod database;
mod error;
mod handlers;
mod models;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::env;

use crate::database::Database;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "8084".to_string());
    let bind_address = format!("{}:{}", host, port);
    let include_inactive = env::var("INCLUDE_INACTIVE_BUSINESSES")
        .map(|value| value == "true")
        .unwrap_or(false);

    let database_url = env::var("DATABASE_URL").map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "DATABASE_URL must be set in environment",
        )
    })?;

    let db = Database::connect(&database_url, include_inactive)
        .await
        .map_err(|err| {
            log::error!("Failed to initialize database: {err:?}");
            std::io::Error::new(std::io::ErrorKind::Other, err)
        })?;

    // Reference data is seeded once here; the read paths never write.
    if let Err(e) = db.ensure_interest_seed().await {
        log::error!("Failed to seed interests, reads will use the static list: {e:?}");
    } else {
        log::info!("Interest seed ensured");
    }

    let db_data = web::Data::new(db);

    log::info!(
        "🚀 Starting LocalBiz Discovery Service on {}",
        bind_address
    );

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            // Health
            .service(handlers::health_check)
            // Business discovery
            .service(handlers::list_businesses)
            .service(handlers::get_business)
            // Lookup lists
            .service(handlers::list_deal_breakers)
            .service(handlers::list_interests)
    })
    .bind(&bind_address)?
    .run()
    .await
}

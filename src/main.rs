use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use std::io;

use todoguard::auth::{PasswordHasher, TokenService};
use todoguard::routes::{self, health};
use todoguard::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let tokens = web::Data::new(TokenService::new(
        &config.jwt_secret,
        config.access_token_ttl(),
    ));
    let hasher = web::Data::new(PasswordHasher::new(config.bcrypt_cost));
    let pool = web::Data::new(pool);

    log::info!("Starting todoguard server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(tokens.clone())
            .app_data(hasher.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}

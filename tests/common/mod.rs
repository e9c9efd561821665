#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use chrono::Duration;
use dotenv::dotenv;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use todoguard::auth::{PasswordHasher, TokenResponse, TokenService};
use todoguard::models::{Role, UserResponse};
use todoguard::routes::{self, health};

pub const TEST_SECRET: &str = "integration_test_secret";

pub fn token_service() -> TokenService {
    TokenService::new(TEST_SECRET, Duration::minutes(30))
}

/// Cheapest bcrypt cost so tests stay fast.
pub fn password_hasher() -> PasswordHasher {
    PasswordHasher::new(4)
}

/// Connects to `DATABASE_URL` and applies migrations.
///
/// Tests that call this are `#[ignore = "requires DATABASE_URL"]`; run them with
/// `cargo test -- --include-ignored`.
pub async fn database_pool() -> PgPool {
    dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A pool that never connects unless a query is actually run.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://todoguard@127.0.0.1:1/unused")
        .expect("Failed to build lazy pool")
}

pub async fn init_app(
    pool: PgPool,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(token_service()))
            .app_data(web::Data::new(password_hasher()))
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config),
    )
    .await
}

pub async fn cleanup_user(pool: &PgPool, username: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await;
}

pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
    role: Role,
) -> UserResponse {
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({
            "username": username,
            "password": password,
            "email": format!("{}@example.com", username),
            "name": format!("{} Tester", username),
            "role": role
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Registration of {} failed. Body: {:?}",
        username,
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to parse registration response")
}

pub async fn login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_form([("username", username), ("password", password)])
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::OK,
        "Login of {} failed. Body: {:?}",
        username,
        String::from_utf8_lossy(&body)
    );
    let token: TokenResponse =
        serde_json::from_slice(&body).expect("Failed to parse login response");
    assert_eq!(token.token_type, "bearer");
    token.access_token
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

/// Liveness and database readiness probe.
///
/// Reports `"database": "up"` or `"down"` when a pool is registered, answering 503 in
/// the latter case. Without a pool only liveness is reported.
#[get("/health")]
pub async fn health(pool: Option<web::Data<PgPool>>) -> impl Responder {
    let database = match pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
            Ok(_) => Some("up"),
            Err(e) => {
                log::warn!("Health check could not reach the database: {}", e);
                Some("down")
            }
        },
        None => None,
    };

    let body = json!({
        "status": if database == Some("down") { "degraded" } else { "ok" },
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "timestamp": Utc::now()
    });

    if database == Some("down") {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}

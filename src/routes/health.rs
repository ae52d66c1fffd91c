use actix_web::{get, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Liveness probe, reachable without a token.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthReport {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        timestamp: Utc::now(),
    })
}

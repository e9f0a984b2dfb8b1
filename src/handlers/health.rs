// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Report liveness and the active cache policy

use crate::services::RefreshService;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /health
pub async fn health_check(service: web::Data<RefreshService>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "atm-finder",
        "version": env!("CARGO_PKG_VERSION"),
        "freshness_window_minutes": service.freshness_window().num_minutes()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

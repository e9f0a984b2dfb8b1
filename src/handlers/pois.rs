// src/handlers/pois.rs
// DOCUMENTATION: HTTP handlers for ATM lookups
// PURPOSE: Parse requests, call the refresh service, return responses

use crate::errors::PoiError;
use crate::models::{NearbyQuery, PoiListResponse};
use crate::services::RefreshService;
use actix_web::{error, web, HttpRequest, HttpResponse, Responder};

/// GET /api/pois?lat=&lng=&radius=
/// ATMs around a location; malformed parameters fall back to defaults
pub async fn list_pois(
    service: web::Data<RefreshService>,
    pairs: web::Query<Vec<(String, String)>>,
) -> Result<impl Responder, PoiError> {
    let query = NearbyQuery::from_pairs(pairs.into_inner());
    let (lat, lng, radius) = (query.lat(), query.lng(), query.radius());

    let pois = service.list_near(lat, lng, radius).await?;
    Ok(HttpResponse::Ok().json(PoiListResponse { pois }))
}

/// GET /api/pois/{id}
/// Retrieve one ATM by id
pub async fn get_poi(
    service: web::Data<RefreshService>,
    path: web::Path<i64>,
) -> Result<impl Responder, PoiError> {
    let poi = service.get_detail(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(poi))
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    PoiError::InvalidPath(err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    PoiError::InvalidQuery(err.to_string()).into()
}

/// Configuration for poi routes
/// Extractor failures answer with the same JSON error body as handler failures
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/pois")
            .app_data(web::PathConfig::default().error_handler(path_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .route("", web::get().to(list_pois))
            .route("/{id}", web::get().to(get_poi)),
    );
}

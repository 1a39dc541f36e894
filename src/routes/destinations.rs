use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{RecommendError, Recommender};
use crate::models::{
    ByCategoryQuery, ByCategoryResponse, ErrorResponse, FilterCriteria, HealthResponse,
    NearestQuery, RecommendRequest, RecommendResponse, RecordSavedResponse,
};
use crate::services::{DestinationStore, StoreError};

/// Hard cap on `top_k` to bound a single response
const MAX_TOP_K: u16 = 100;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DestinationStore>,
    pub recommender: Recommender,
}

/// Configure all destination-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/destinations/recommend", web::post().to(recommend))
        .route("/destinations/nearest", web::get().to(nearest_destination))
        .route(
            "/destinations/by-category",
            web::get().to(destinations_by_category),
        )
        .route("/destinations/records", web::post().to(save_record));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.store.health_check() {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Personalized recommendation endpoint
///
/// POST /api/v1/destinations/recommend
///
/// Request body:
/// ```json
/// {
///   "family": {"miembros": [{"nombre": "Ana", "preferencias": {"playas": 5}}]},
///   "top_k": 10,
///   "ubicacion_actual_lat": -2.19,
///   "ubicacion_actual_lon": -79.88,
///   "max_distancia_km": 200,
///   "provincia_preferida": "Guayas",
///   "tipos_interes": ["playas"]
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("validation failed for recommend request: {}", errors);
        return validation_failed(errors);
    }

    let top_k = req.top_k.min(MAX_TOP_K) as usize;
    let origin = match (req.lat, req.lon) {
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => None,
    };
    let criteria = FilterCriteria {
        province: req.province.clone(),
        interest_categories: req.interest_categories.clone(),
        origin,
        max_distance_km: req.max_distance_km,
    };

    tracing::info!(
        members = req.family.members.len(),
        top_k,
        "recommending destinations"
    );

    let table = match state.store.load_destinations() {
        Ok(table) => table,
        Err(e) => return store_unavailable(e),
    };

    match state
        .recommender
        .recommend(table, &req.family.members, &criteria, top_k)
    {
        Ok(recommendations) => {
            tracing::info!(results = recommendations.len(), "recommendation complete");
            HttpResponse::Ok().json(RecommendResponse { recommendations })
        }
        Err(e) => recommend_error_response(e),
    }
}

/// Nearest-destination endpoint
///
/// GET /api/v1/destinations/nearest?lat=-2.19&lon=-79.88&tipo=playas&min_score=3
async fn nearest_destination(
    state: web::Data<AppState>,
    query: web::Query<NearestQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let table = match state.store.load_destinations() {
        Ok(table) => table,
        Err(e) => return store_unavailable(e),
    };

    match state.recommender.nearest(
        table,
        (query.lat, query.lon),
        query.category.as_deref(),
        query.min_score,
    ) {
        Ok(nearest) => HttpResponse::Ok().json(nearest),
        Err(e) => recommend_error_response(e),
    }
}

/// By-category ranking endpoint
///
/// GET /api/v1/destinations/by-category?tipo=museos&top_k=5&provincia=Guayas
async fn destinations_by_category(
    state: web::Data<AppState>,
    query: web::Query<ByCategoryQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_failed(errors);
    }

    let top_k = query.top_k.min(MAX_TOP_K) as usize;

    let table = match state.store.load_destinations() {
        Ok(table) => table,
        Err(e) => return store_unavailable(e),
    };

    match state
        .recommender
        .by_category(table, &query.category, top_k, query.province.as_deref())
    {
        Ok(results) => HttpResponse::Ok().json(ByCategoryResponse { results }),
        Err(e) => recommend_error_response(e),
    }
}

/// Record capture endpoint for future retraining
///
/// POST /api/v1/destinations/records
async fn save_record(
    state: web::Data<AppState>,
    record: web::Json<serde_json::Map<String, serde_json::Value>>,
) -> impl Responder {
    if record.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_request".to_string(),
            message: "no record fields were provided".to_string(),
            status_code: 400,
        });
    }

    match state.store.append_record(&record) {
        Ok(()) => HttpResponse::Ok().json(RecordSavedResponse {
            status: "ok".to_string(),
            record_id: uuid::Uuid::new_v4().to_string(),
        }),
        Err(e @ (StoreError::MissingField(_) | StoreError::UnknownField(_))) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "invalid_record".to_string(),
                message: e.to_string(),
                status_code: 400,
            })
        }
        Err(e) => {
            tracing::error!("failed to capture record: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "capture_failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Map core failures onto the API's three user-visible outcomes
fn recommend_error_response(err: RecommendError) -> HttpResponse {
    match &err {
        RecommendError::Validation(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_request".to_string(),
            message: message.clone(),
            status_code: 400,
        }),
        RecommendError::UnknownCategory(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "unknown_category".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        RecommendError::EmptyResult => HttpResponse::NotFound().json(ErrorResponse {
            error: "no_results".to_string(),
            message: err.to_string(),
            status_code: 404,
        }),
        RecommendError::Prediction(_) => {
            tracing::error!("prediction failed: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "prediction_failed".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

fn store_unavailable(err: StoreError) -> HttpResponse {
    tracing::error!("destination catalog unavailable: {}", err);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "catalog_unavailable".to_string(),
        message: err.to_string(),
        status_code: 500,
    })
}

fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "validation_failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}

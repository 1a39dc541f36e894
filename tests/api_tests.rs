// Route-level tests for the Harmony Algo HTTP surface

use actix_web::{test, web, App};
use harmony_algo::core::Recommender;
use harmony_algo::routes::configure_routes;
use harmony_algo::routes::destinations::AppState;
use harmony_algo::services::{DestinationStore, LinearModel};
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;

const CATALOG: &str = "\
nombre|provincia|canton|parroquia|lat|lon|Calif promedio playas|Calif promedio museos|score
Playa Murciélago|Manabí|Manta|Tarqui|-0.94|-80.73|4.8|0.5|4.5
Museo Presley Norton|Guayas|Guayaquil|Tarqui|-2.18|-79.89|0.2|4.1|3.8
Malecón 2000|Guayas|Guayaquil|Centro|-2.19|-79.88|2.6|3.0|4.0
";

const MODEL: &str = r#"{
    "feature_columns": ["Calif promedio playas", "Calif promedio museos"],
    "weights": [0.5, 0.5],
    "intercept": 0.0
}"#;

fn app_state(dir: &tempfile::TempDir) -> AppState {
    let data_path = dir.path().join("catalog.csv");
    std::fs::File::create(&data_path)
        .unwrap()
        .write_all(CATALOG.as_bytes())
        .unwrap();

    let model_path = dir.path().join("modelo.json");
    std::fs::File::create(&model_path)
        .unwrap()
        .write_all(MODEL.as_bytes())
        .unwrap();

    let store = Arc::new(DestinationStore::new(
        &data_path,
        dir.path().join("captured.csv"),
    ));
    let model = LinearModel::load(&model_path).unwrap();

    AppState {
        store,
        recommender: Recommender::new(Arc::new(model)),
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_recommend_returns_ranked_list() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/recommend")
        .set_json(json!({
            "family": {"miembros": [{"nombre": "Ana", "preferencias": {"museos": 5.0}}]},
            "top_k": 2
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["nombre"], "Playa Murciélago");
    assert!(recs[0]["predicted_score"].as_f64() >= recs[1]["predicted_score"].as_f64());
    // No origin supplied, so no distance field
    assert!(recs[0].get("distancia_km").is_none());
}

#[actix_web::test]
async fn test_recommend_rejects_empty_family() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/recommend")
        .set_json(json!({"family": {"miembros": []}}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_recommend_unknown_category_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/recommend")
        .set_json(json!({
            "family": {"miembros": [{"nombre": "Ana", "preferencias": {"playas": 5.0}}]},
            "tipos_interes": ["volcanes"]
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unknown_category");
}

#[actix_web::test]
async fn test_recommend_empty_result_is_distinct_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/recommend")
        .set_json(json!({
            "family": {"miembros": [{"nombre": "Ana", "preferencias": {"playas": 5.0}}]},
            "provincia_preferida": "Carchi"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "no_results");
}

#[actix_web::test]
async fn test_nearest_destination_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::get()
        .uri("/api/v1/destinations/nearest?lat=-2.20&lon=-79.88&min_score=3.9")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["nombre"], "Malecón 2000");
    assert!(body["distancia_km"].as_f64().unwrap() < 5.0);
}

#[actix_web::test]
async fn test_by_category_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::get()
        .uri("/api/v1/destinations/by-category?tipo=museos&top_k=1&provincia=Guayas")
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    let results = body["resultados"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["nombre"], "Museo Presley Norton");
    assert_eq!(results[0]["score_general"], 4.1);
}

#[actix_web::test]
async fn test_save_record_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/records")
        .set_json(json!({
            "nombre": "Mirador Nuevo",
            "provincia": "Azuay",
            "lat": -2.9,
            "lon": -79.0
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert!(body["record_id"].as_str().is_some());

    let captured = std::fs::read_to_string(dir.path().join("captured.csv")).unwrap();
    assert!(captured.contains("Mirador Nuevo"));
}

#[actix_web::test]
async fn test_save_record_missing_location_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::post()
        .uri("/api/v1/destinations/records")
        .set_json(json!({"nombre": "Sin ubicación"}))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app!(app_state(&dir));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

use serde::{Deserialize, Serialize};

use crate::models::domain::{CategoryDestination, RecommendedDestination};

/// Response for the recommend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendedDestination>,
}

/// Response for the by-category endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ByCategoryResponse {
    #[serde(rename = "resultados")]
    pub results: Vec<CategoryDestination>,
}

/// Response for the record capture endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSavedResponse {
    pub status: String,
    pub record_id: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::FamilyMember;

/// Family payload: the member list preference aggregation runs over
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Family {
    #[validate(length(min = 1, message = "at least one family member is required"))]
    #[serde(rename = "miembros")]
    pub members: Vec<FamilyMember>,
}

/// Request to recommend destinations for a family
///
/// Wire names follow the original Family Harmony API. All filters are
/// optional and conjunctive; `top_k` defaults to 10 and is capped by the
/// handler.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(nested)]
    pub family: Family,

    #[serde(default = "default_top_k")]
    pub top_k: u16,

    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default, rename = "ubicacion_actual_lat")]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default, rename = "ubicacion_actual_lon")]
    pub lon: Option<f64>,

    #[validate(range(min = 0.0))]
    #[serde(default, rename = "max_distancia_km")]
    pub max_distance_km: Option<f64>,

    #[serde(default, rename = "provincia_preferida")]
    pub province: Option<String>,

    #[serde(default, rename = "tipos_interes")]
    pub interest_categories: Option<Vec<String>>,
}

fn default_top_k() -> u16 {
    10
}

/// Query for the nearest-destination endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearestQuery {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,

    #[serde(default, rename = "tipo")]
    pub category: Option<String>,

    #[serde(default)]
    pub min_score: f64,
}

/// Query for the by-category ranking endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ByCategoryQuery {
    #[validate(length(min = 1, message = "category must not be empty"))]
    #[serde(rename = "tipo")]
    pub category: String,

    #[serde(default = "default_top_k")]
    pub top_k: u16,

    #[serde(default, rename = "provincia")]
    pub province: Option<String>,
}

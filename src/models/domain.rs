use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One family member with their declared category preferences
///
/// Preference keys are free-form category labels (e.g. "playas",
/// "centros_comerciales") rated 0-5. They are matched against the model's
/// feature columns by normalized substring, so the labels do not have to
/// name a column exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMember {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "rol", default = "default_role")]
    pub role: String,
    #[serde(rename = "preferencias", default)]
    pub preferences: HashMap<String, f64>,
}

fn default_role() -> String {
    "Otro".to_string()
}

/// A destination row from the catalog
///
/// Identity and location fields are fixed; everything else the catalog
/// exposes lives in `features`, keyed by the original column name. Only
/// cells that parsed as finite numbers are present.
#[derive(Debug, Clone)]
pub struct Destination {
    pub name: String,
    pub province: String,
    pub canton: String,
    pub parish: String,
    pub lat: f64,
    pub lon: f64,
    /// Pre-computed aggregate quality, present when the catalog carries a
    /// `score` column and the cell parsed.
    pub score: Option<f64>,
    pub features: HashMap<String, f64>,
}

impl Destination {
    pub fn feature(&self, column: &str) -> Option<f64> {
        self.features.get(column).copied()
    }
}

/// The destination catalog as loaded from the store
///
/// `feature_columns` preserves the source header order, which is also the
/// order fuzzy column matching reports its matches in.
#[derive(Debug, Clone, Default)]
pub struct DestinationTable {
    pub feature_columns: Vec<String>,
    /// Whether the source header carried a `score` column
    pub has_score: bool,
    pub rows: Vec<Destination>,
}

impl DestinationTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Conjunctive filters applied to the catalog before scoring
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub province: Option<String>,
    pub interest_categories: Option<Vec<String>>,
    pub origin: Option<(f64, f64)>,
    pub max_distance_km: Option<f64>,
}

/// A catalog row that survived filtering, with its derived distance
///
/// `distance_km` is present only when the request supplied an origin; it
/// is always finite (rows whose distance could not be computed are dropped
/// by the proximity stage).
#[derive(Debug, Clone)]
pub struct Candidate {
    pub destination: Destination,
    pub distance_km: Option<f64>,
}

/// A model-scored recommendation row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedDestination {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "provincia")]
    pub province: String,
    pub canton: String,
    pub lat: f64,
    pub lon: f64,
    pub predicted_score: f64,
    #[serde(rename = "distancia_km", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// The single closest destination to an origin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestDestination {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "provincia")]
    pub province: String,
    pub canton: String,
    pub lat: f64,
    pub lon: f64,
    pub score: f64,
    #[serde(rename = "distancia_km")]
    pub distance_km: f64,
}

/// A destination ranked by its category aggregate score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDestination {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "provincia")]
    pub province: String,
    pub canton: String,
    pub lat: f64,
    pub lon: f64,
    pub score_general: f64,
}

use std::sync::Arc;

use thiserror::Error;

use crate::core::filters::{
    apply_filters, attach_distances, filter_by_province, sanitize_coordinates,
    NEAREST_RELEVANCE_MIN,
};
use crate::core::preferences::aggregate_preferences;
use crate::core::ranking::{
    round2, round3, score_and_rank, score_by_category, PredictionError, Predictor,
};
use crate::core::text::matching_columns;
use crate::models::{
    CategoryDestination, DestinationTable, FamilyMember, FilterCriteria, NearestDestination,
    RecommendedDestination,
};

/// Failures surfaced by the recommendation core
///
/// The three user-visible outcomes stay distinguishable: bad input, a
/// category the catalog does not know, and a query that legitimately
/// matched nothing. Row-level failures (bad coordinates, uncomputable
/// distances) never appear here; those rows are silently excluded.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// Malformed or empty input, rejected before any computation begins
    #[error("invalid request: {0}")]
    Validation(String),

    /// A requested category matches no column in the catalog schema
    #[error("no catalog columns match category: {0}")]
    UnknownCategory(String),

    /// Well-formed query with legitimately zero results after filtering
    #[error("no destinations matched the requested filters")]
    EmptyResult,

    /// The scoring model failed; propagated unmodified
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

/// Recommendation orchestrator
///
/// Owns the trained predictor and composes the shared primitives into the
/// three query paths. Every call works on its own copy of the catalog;
/// nothing is cached or written back.
#[derive(Clone)]
pub struct Recommender {
    predictor: Arc<dyn Predictor>,
}

impl Recommender {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    /// Personalized top-K recommendation
    ///
    /// Aggregates member preferences once, upstream and independent of
    /// filtering, then narrows the catalog and ranks the survivors with
    /// the model.
    pub fn recommend(
        &self,
        table: DestinationTable,
        members: &[FamilyMember],
        criteria: &FilterCriteria,
        top_k: usize,
    ) -> Result<Vec<RecommendedDestination>, RecommendError> {
        let aggregated = aggregate_preferences(members, self.predictor.feature_columns())?;

        let table = sanitize_coordinates(table);
        let candidates = apply_filters(&table, criteria)?;

        tracing::debug!(
            candidates = candidates.len(),
            preference_columns = aggregated.len(),
            "scoring filtered candidates"
        );

        score_and_rank(candidates, &aggregated, self.predictor.as_ref(), top_k)
    }

    /// Single nearest destination to an origin
    ///
    /// The score filter only applies when the catalog carries a score
    /// column. The category filter uses the relaxed `> 0` threshold and is
    /// skipped outright when the category matches no column; this path
    /// never rejects an unknown category.
    pub fn nearest(
        &self,
        table: DestinationTable,
        origin: (f64, f64),
        category: Option<&str>,
        min_score: f64,
    ) -> Result<NearestDestination, RecommendError> {
        let table = sanitize_coordinates(table);

        let mut rows = table.rows;
        if table.has_score {
            rows.retain(|row| row.score.is_some_and(|s| s >= min_score));
        }

        if let Some(category) = category {
            let matched = matching_columns(&table.feature_columns, category);
            if !matched.is_empty() {
                rows.retain(|row| {
                    matched
                        .iter()
                        .any(|col| row.feature(col).is_some_and(|v| v > NEAREST_RELEVANCE_MIN))
                });
            }
        }

        if rows.is_empty() {
            return Err(RecommendError::EmptyResult);
        }

        let candidates = attach_distances(rows, origin);

        candidates
            .into_iter()
            .min_by(|a, b| {
                a.distance_km
                    .partial_cmp(&b.distance_km)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|candidate| NearestDestination {
                name: candidate.destination.name,
                province: candidate.destination.province,
                canton: candidate.destination.canton,
                lat: candidate.destination.lat,
                lon: candidate.destination.lon,
                score: round3(candidate.destination.score.unwrap_or(0.0)),
                distance_km: round2(candidate.distance_km.unwrap_or(0.0)),
            })
            .ok_or(RecommendError::EmptyResult)
    }

    /// Model-free ranking of destinations by one category's aggregate
    ///
    /// The column lookup happens before the empty check, so an unknown
    /// category reports as unknown even when a province filter already
    /// emptied the table.
    pub fn by_category(
        &self,
        table: DestinationTable,
        category: &str,
        top_k: usize,
        province: Option<&str>,
    ) -> Result<Vec<CategoryDestination>, RecommendError> {
        let table = sanitize_coordinates(table);

        let rows = match province {
            Some(province) => filter_by_province(table.rows, province),
            None => table.rows,
        };

        score_by_category(rows, &table.feature_columns, category, top_k)
    }
}

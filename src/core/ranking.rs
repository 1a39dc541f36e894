use std::collections::HashMap;

use thiserror::Error;

use crate::core::recommender::RecommendError;
use crate::core::text::matching_columns;
use crate::models::{Candidate, CategoryDestination, Destination, RecommendedDestination};

/// Batch scoring model consumed by the ranking engine
///
/// The model is trained offline and loaded once at startup; the core only
/// ever calls it with a full feature matrix, one row per candidate, and
/// expects one score per row in the same order.
pub trait Predictor: Send + Sync {
    /// Feature columns the model expects, in matrix column order
    fn feature_columns(&self) -> &[String];

    /// Score every row of the matrix at once
    fn predict(&self, matrix: &[Vec<f64>]) -> Result<Vec<f64>, PredictionError>;
}

/// Failure reported by a `Predictor` implementation
///
/// Predictor failures are a dependency fault; they propagate to the caller
/// unmodified rather than being retried or absorbed.
#[derive(Debug, Error)]
#[error("prediction failed: {0}")]
pub struct PredictionError(pub String);

/// Score the candidates with the model and keep the best `top_k`
///
/// The matrix uses exactly the predictor's feature columns. Columns
/// covered by the aggregated family preferences carry the same scalar on
/// every row (the personalization signal is per-family, not per-row);
/// the rest keep each destination's own values, with an absent cell
/// contributing 0.0. The sort is stable and descending, so equal scores
/// keep their catalog order, and truncation returns at most
/// `min(top_k, candidates)` rows.
pub fn score_and_rank(
    candidates: Vec<Candidate>,
    aggregated: &HashMap<String, f64>,
    predictor: &dyn Predictor,
    top_k: usize,
) -> Result<Vec<RecommendedDestination>, RecommendError> {
    let columns = predictor.feature_columns();

    let matrix: Vec<Vec<f64>> = candidates
        .iter()
        .map(|candidate| {
            columns
                .iter()
                .map(|col| {
                    aggregated
                        .get(col)
                        .copied()
                        .or_else(|| candidate.destination.feature(col))
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    let scores = predictor.predict(&matrix)?;
    if scores.len() != candidates.len() {
        return Err(RecommendError::Prediction(PredictionError(format!(
            "model returned {} scores for {} rows",
            scores.len(),
            candidates.len()
        ))));
    }

    let mut scored: Vec<(Candidate, f64)> = candidates.into_iter().zip(scores).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);

    Ok(scored
        .into_iter()
        .map(|(candidate, score)| RecommendedDestination {
            name: candidate.destination.name,
            province: candidate.destination.province,
            canton: candidate.destination.canton,
            lat: candidate.destination.lat,
            lon: candidate.destination.lon,
            predicted_score: round3(score),
            distance_km: candidate.distance_km.map(round2),
        })
        .collect())
}

/// Rank destinations by their average rating across one category's columns
///
/// Model-free path: the score is the row-wise mean over every column the
/// category matched, ignoring cells without a value. Rows with a mean of
/// zero or less carry no signal and are dropped. Same stable ordering and
/// rounding rules as the model path.
pub fn score_by_category(
    rows: Vec<Destination>,
    feature_columns: &[String],
    category: &str,
    top_k: usize,
) -> Result<Vec<CategoryDestination>, RecommendError> {
    let matched = matching_columns(feature_columns, category);
    if matched.is_empty() {
        return Err(RecommendError::UnknownCategory(category.to_string()));
    }

    let mut scored: Vec<(Destination, f64)> = rows
        .into_iter()
        .filter_map(|row| {
            let values: Vec<f64> = matched.iter().filter_map(|col| row.feature(col)).collect();
            if values.is_empty() {
                return None;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            (mean > 0.0).then_some((row, mean))
        })
        .collect();

    if scored.is_empty() {
        return Err(RecommendError::EmptyResult);
    }

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);

    Ok(scored
        .into_iter()
        .map(|(row, mean)| CategoryDestination {
            name: row.name,
            province: row.province,
            canton: row.canton,
            lat: row.lat,
            lon: row.lon,
            score_general: round3(mean),
        })
        .collect())
}

/// Boundary rounding for scores: three decimal places
#[inline]
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Boundary rounding for distances: two decimal places
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

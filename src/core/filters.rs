use crate::core::distance::haversine_distance;
use crate::core::recommender::RecommendError;
use crate::core::text::matching_columns;
use crate::models::{Candidate, Destination, DestinationTable, FilterCriteria};

/// Relevance cutoff for the recommendation path's interest filter, on the
/// catalog's 0-5 rating scale. A row qualifies for a category only when it
/// rates strictly above this on some matched column.
pub const INTEREST_RELEVANCE_MIN: f64 = 2.0;

/// Relaxed cutoff used by the nearest-destination path. Kept separate from
/// `INTEREST_RELEVANCE_MIN`; the two endpoints filter at different
/// strictness on purpose.
pub const NEAREST_RELEVANCE_MIN: f64 = 0.0;

/// Drop every row whose coordinates did not survive numeric coercion
///
/// This is the single point where malformed source rows are rejected; it
/// must run before any distance computation or geographic filter.
/// Idempotent: a sanitized table passes through unchanged.
pub fn sanitize_coordinates(mut table: DestinationTable) -> DestinationTable {
    table
        .rows
        .retain(|row| row.lat.is_finite() && row.lon.is_finite());
    table
}

/// Stage 1: keep rows whose province equals the criterion, ignoring case
///
/// Province names are a closed vocabulary, so this is an exact match, not
/// a substring match.
pub fn filter_by_province(rows: Vec<Destination>, province: &str) -> Vec<Destination> {
    let wanted = province.to_uppercase();
    rows.into_iter()
        .filter(|row| row.province.to_uppercase() == wanted)
        .collect()
}

/// Stage 2: keep rows relevant to any of the requested interest categories
///
/// A row passes when it rates strictly above `threshold` on any column
/// matched by any requested category (OR across categories and across each
/// category's fan-out). When no requested category matches a column at
/// all, the request named something the catalog does not know, which is a
/// different failure than "no row was relevant enough".
pub fn filter_by_interest(
    rows: Vec<Destination>,
    feature_columns: &[String],
    categories: &[String],
    threshold: f64,
) -> Result<Vec<Destination>, RecommendError> {
    let mut matched: Vec<&str> = Vec::new();
    for category in categories {
        matched.extend(matching_columns(feature_columns, category));
    }

    if matched.is_empty() {
        return Err(RecommendError::UnknownCategory(categories.join(", ")));
    }

    Ok(rows
        .into_iter()
        .filter(|row| {
            matched
                .iter()
                .any(|col| row.feature(col).is_some_and(|v| v > threshold))
        })
        .collect())
}

/// Stage 3: derive a distance from the origin for every row
///
/// Rows whose distance comes out non-finite (bad coordinates that slipped
/// past coercion, NaN origin) are dropped, never defaulted to zero.
pub fn attach_distances(rows: Vec<Destination>, origin: (f64, f64)) -> Vec<Candidate> {
    rows.into_iter()
        .filter_map(|destination| {
            let distance = haversine_distance(origin.0, origin.1, destination.lat, destination.lon);
            distance.is_finite().then_some(Candidate {
                destination,
                distance_km: Some(distance),
            })
        })
        .collect()
}

/// Run the full filter pipeline over a sanitized table
///
/// Stages run in a fixed order: province, interest categories, proximity.
/// All criteria are conjunctive. An empty survivor set after any stage is
/// `EmptyResult` — a legitimate "nothing matched", not a fault.
pub fn apply_filters(
    table: &DestinationTable,
    criteria: &FilterCriteria,
) -> Result<Vec<Candidate>, RecommendError> {
    let mut rows: Vec<Destination> = table.rows.clone();

    if let Some(province) = &criteria.province {
        rows = filter_by_province(rows, province);
        if rows.is_empty() {
            return Err(RecommendError::EmptyResult);
        }
    }

    if let Some(categories) = &criteria.interest_categories {
        if !categories.is_empty() {
            rows = filter_by_interest(
                rows,
                &table.feature_columns,
                categories,
                INTEREST_RELEVANCE_MIN,
            )?;
            if rows.is_empty() {
                return Err(RecommendError::EmptyResult);
            }
        }
    }

    let candidates: Vec<Candidate> = match criteria.origin {
        Some(origin) => {
            let mut candidates = attach_distances(rows, origin);
            if let Some(max_km) = criteria.max_distance_km {
                candidates.retain(|c| c.distance_km.is_some_and(|d| d <= max_km));
            }
            candidates
        }
        None => rows
            .into_iter()
            .map(|destination| Candidate {
                destination,
                distance_km: None,
            })
            .collect(),
    };

    if candidates.is_empty() {
        return Err(RecommendError::EmptyResult);
    }

    Ok(candidates)
}

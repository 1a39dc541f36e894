use std::collections::HashMap;

use crate::core::recommender::RecommendError;
use crate::core::text::matching_columns;
use crate::models::FamilyMember;

/// Merge per-member preference maps into one family-level preference vector
///
/// Every `(label, rating)` pair is credited to every feature column whose
/// normalized name contains the normalized label (fan-out). The value for a
/// column is the mean over the contributions it received, not over all
/// members, so a member with no matching label simply does not dilute the
/// average.
///
/// A label matching no column is ignored. An empty member list is rejected:
/// an aggregate over zero members is meaningless downstream.
pub fn aggregate_preferences(
    members: &[FamilyMember],
    feature_columns: &[String],
) -> Result<HashMap<String, f64>, RecommendError> {
    if members.is_empty() {
        return Err(RecommendError::Validation(
            "no family members were provided".to_string(),
        ));
    }

    let mut sums: HashMap<String, f64> = HashMap::new();
    let mut counts: HashMap<String, u32> = HashMap::new();

    for member in members {
        for (label, rating) in &member.preferences {
            for column in matching_columns(feature_columns, label) {
                *sums.entry(column.to_string()).or_insert(0.0) += rating;
                *counts.entry(column.to_string()).or_insert(0) += 1;
            }
        }
    }

    Ok(sums
        .into_iter()
        .map(|(column, sum)| {
            let count = counts[&column] as f64;
            (column, sum / count)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, prefs: &[(&str, f64)]) -> FamilyMember {
        FamilyMember {
            name: name.to_string(),
            role: "Otro".to_string(),
            preferences: prefs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_member_single_match() {
        let members = vec![member("Ana", &[("playas", 5.0)])];
        let cols = columns(&["Calif promedio playas", "Calif promedio museos"]);

        let agg = aggregate_preferences(&members, &cols).unwrap();
        assert_eq!(agg.len(), 1);
        assert_eq!(agg["Calif promedio playas"], 5.0);
    }

    #[test]
    fn test_mean_over_contributors_not_all_members() {
        // Two members rate museos; a third says nothing about it. The
        // aggregate must be the mean of the two contributors.
        let members = vec![
            member("Ana", &[("museos", 3.0)]),
            member("Luis", &[("museos", 5.0)]),
            member("Eva", &[("playas", 1.0)]),
        ];
        let cols = columns(&["Calif promedio museos", "Calif promedio playas"]);

        let agg = aggregate_preferences(&members, &cols).unwrap();
        assert_eq!(agg["Calif promedio museos"], 4.0);
        assert_eq!(agg["Calif promedio playas"], 1.0);
    }

    #[test]
    fn test_ambiguous_label_fans_out() {
        let members = vec![member("Ana", &[("calif", 4.0)])];
        let cols = columns(&["Calif promedio playas", "Calif promedio museos"]);

        let agg = aggregate_preferences(&members, &cols).unwrap();
        assert_eq!(agg.len(), 2);
        assert_eq!(agg["Calif promedio playas"], 4.0);
        assert_eq!(agg["Calif promedio museos"], 4.0);
    }

    #[test]
    fn test_unknown_label_silently_ignored() {
        let members = vec![member("Ana", &[("volcanes", 5.0), ("playas", 2.0)])];
        let cols = columns(&["Calif promedio playas"]);

        let agg = aggregate_preferences(&members, &cols).unwrap();
        assert_eq!(agg.len(), 1);
        assert_eq!(agg["Calif promedio playas"], 2.0);
    }

    #[test]
    fn test_member_without_preferences_is_not_an_error() {
        let members = vec![member("Ana", &[]), member("Luis", &[("playas", 3.0)])];
        let cols = columns(&["Calif promedio playas"]);

        let agg = aggregate_preferences(&members, &cols).unwrap();
        assert_eq!(agg["Calif promedio playas"], 3.0);
    }

    #[test]
    fn test_empty_member_list_is_rejected() {
        let cols = columns(&["Calif promedio playas"]);
        let err = aggregate_preferences(&[], &cols).unwrap_err();
        assert!(matches!(err, RecommendError::Validation(_)));
    }

    #[test]
    fn test_values_stay_within_contributing_ratings() {
        let members = vec![
            member("Ana", &[("playas", 1.0)]),
            member("Luis", &[("playas", 4.0)]),
            member("Eva", &[("playas", 2.5)]),
        ];
        let cols = columns(&["Calif promedio playas"]);

        let agg = aggregate_preferences(&members, &cols).unwrap();
        let value = agg["Calif promedio playas"];
        assert!(value >= 1.0 && value <= 4.0);
        assert_eq!(value, 2.5);
    }
}

/// Canonicalize a free-form category label for matching
///
/// Lower-cases, trims, and replaces `_` and `-` with spaces so that
/// `"Centros_Comerciales"` and `"centros comerciales"` compare equal.
#[inline]
pub fn normalize_label(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .replace(['_', '-'], " ")
}

/// Find every column whose normalized name contains the normalized label
///
/// Returns matches in the order the columns appear in the catalog header.
/// An ambiguous label matches several columns at once (fan-out); the
/// callers decide what to do with multiple matches. An empty label or a
/// label matching nothing yields an empty vector, never an error.
pub fn matching_columns<'a>(columns: &'a [String], label: &str) -> Vec<&'a str> {
    let needle = normalize_label(label);
    if needle.is_empty() {
        return Vec::new();
    }

    columns
        .iter()
        .filter(|col| normalize_label(col).contains(&needle))
        .map(String::as_str)
        .collect()
}

//! Attribute similarity functions
//!
//! Set and categorical comparisons shared by the ranker and scorers.
//! All functions work on normalized (trimmed, lowercase) terms and return a
//! similarity in [0.0, 1.0] where 1.0 means identical.

use drapex_core::normalize_term;
use std::collections::BTreeSet;

/// Normalized, deduplicated, ordered term set
pub fn term_set<'a, I>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    terms
        .into_iter()
        .map(|t| normalize_term(t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Terms present in both sets, in sorted order
pub fn shared_terms(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Vec<String> {
    a.intersection(b).cloned().collect()
}

/// Jaccard index of two term sets.
///
/// `None` when both sets are empty: there is nothing to compare.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> Option<f32> {
    let union = a.union(b).count();
    if union == 0 {
        return None;
    }
    let intersection = a.intersection(b).count();
    Some(intersection as f32 / union as f32)
}

/// Case-insensitive equality of two optional categorical values.
///
/// `None` when either side is missing.
pub fn categorical_match(a: Option<&str>, b: Option<&str>) -> Option<bool> {
    match (a, b) {
        (Some(a), Some(b)) => Some(normalize_term(a) == normalize_term(b)),
        _ => None,
    }
}

/// Exponential half-life decay: 1.0 at age 0, 0.5 at one half-life
pub fn half_life_decay(age: f64, half_life: f64) -> f64 {
    if half_life <= 0.0 {
        return 1.0;
    }
    0.5f64.powf(age.max(0.0) / half_life)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(terms: &[&str]) -> BTreeSet<String> {
        let owned: Vec<String> = terms.iter().map(|s| s.to_string()).collect();
        term_set(&owned)
    }

    #[test]
    fn test_term_set_normalizes() {
        let s = set(&["Navy", " navy", "", "Cream"]);
        assert_eq!(s.len(), 2);
        assert!(s.contains("navy"));
    }

    #[test]
    fn test_jaccard() {
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["a", "b"])), Some(1.0));
        assert_eq!(jaccard(&set(&["a", "b"]), &set(&["b", "c"])), Some(1.0 / 3.0));
        assert_eq!(jaccard(&set(&["a"]), &set(&[])), Some(0.0));
        assert_eq!(jaccard(&set(&[]), &set(&[])), None);
    }

    #[test]
    fn test_shared_terms_sorted() {
        let shared = shared_terms(&set(&["wool", "Cotton", "silk"]), &set(&["silk", "cotton"]));
        assert_eq!(shared, vec!["cotton", "silk"]);
    }

    #[test]
    fn test_categorical_match() {
        assert_eq!(categorical_match(Some("Dress"), Some("dress")), Some(true));
        assert_eq!(categorical_match(Some("dress"), Some("coat")), Some(false));
        assert_eq!(categorical_match(None, Some("coat")), None);
    }

    #[test]
    fn test_half_life_decay() {
        assert!((half_life_decay(0.0, 30.0) - 1.0).abs() < 1e-12);
        assert!((half_life_decay(30.0, 30.0) - 0.5).abs() < 1e-12);
        assert!((half_life_decay(60.0, 30.0) - 0.25).abs() < 1e-12);
        assert!(half_life_decay(10.0, 30.0) > half_life_decay(20.0, 30.0));
    }
}

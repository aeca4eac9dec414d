//! Explained match results
//!
//! Output structures that carry a score together with the reasons behind it.

use crate::compatibility::CompatibilityScore;
use drapex_core::GarmentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A garment matched against a query image or a style profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GarmentMatch {
    pub garment_id: GarmentId,
    /// Raw cosine similarity, present for visual search results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f32>,
    /// Present for profile-based results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<CompatibilityScore>,
    pub reasons: Vec<String>,
    /// Wardrobe gap this garment fills
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap_category: Option<String>,
}

/// Response structure for search endpoints
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub result: Vec<GarmentMatch>,
    pub stats: SearchStats,
}

impl MatchResponse {
    pub fn new(result: Vec<GarmentMatch>, candidates_count: usize) -> Self {
        let stats = SearchStats::compute(&result, candidates_count);
        Self { result, stats }
    }
}

/// Summary statistics for a search
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchStats {
    /// Number of garments that could have matched
    pub candidates_count: usize,
    pub results_count: usize,
    pub avg_similarity: Option<f32>,
    pub best_similarity: Option<f32>,
    /// Most frequent reason kind among results (text before the colon)
    pub top_reason: Option<String>,
}

impl SearchStats {
    pub fn compute(results: &[GarmentMatch], candidates_count: usize) -> Self {
        let similarities: Vec<f32> = results.iter().filter_map(|r| r.similarity).collect();
        let avg_similarity = if similarities.is_empty() {
            None
        } else {
            Some(similarities.iter().sum::<f32>() / similarities.len() as f32)
        };
        let best_similarity = similarities.iter().copied().reduce(f32::max);

        let mut reason_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for reason in results.iter().flat_map(|r| r.reasons.iter()) {
            let kind = reason.split(':').next().unwrap_or(reason.as_str()).trim();
            *reason_counts.entry(kind).or_insert(0) += 1;
        }
        // max_by_key returns the last maximum; iterate in reverse so ties pick the
        // alphabetically first kind
        let top_reason = reason_counts
            .iter()
            .rev()
            .max_by_key(|(_, count)| **count)
            .map(|(kind, _)| kind.to_string());

        Self {
            candidates_count,
            results_count: results.len(),
            avg_similarity,
            best_similarity,
            top_reason,
        }
    }
}

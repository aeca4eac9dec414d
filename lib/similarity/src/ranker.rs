//! Similarity ranker
//!
//! Turns raw nearest-neighbor hits into explained matches. Reasons come from
//! rule-based attribute comparisons; the embedding itself is opaque past the
//! similarity stage.

use crate::distance::{categorical_match, shared_terms, term_set};
use crate::explain::GarmentMatch;
use drapex_core::{Condition, Garment, ScoredGarment};
use serde::{Deserialize, Serialize};

/// Attributes describing the query side of a visual search.
///
/// Either copied from a stored garment or inferred from the query image by
/// the caller's classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QueryAttributes {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub era: Option<String>,
    #[serde(default)]
    pub condition: Option<Condition>,
}

impl From<&Garment> for QueryAttributes {
    fn from(garment: &Garment) -> Self {
        Self {
            category: Some(garment.category.clone()),
            colors: garment.colors.clone(),
            style_tags: garment.style_tags.clone(),
            materials: garment.materials.clone(),
            era: garment.era.clone(),
            condition: Some(garment.condition),
        }
    }
}

/// Ranker that attaches match reasons to vector search hits
#[derive(Debug, Clone, Default)]
pub struct SimilarityRanker;

impl SimilarityRanker {
    pub fn new() -> Self {
        Self
    }

    /// Explain index hits, keeping the index order and similarity verbatim
    pub fn rank(&self, query: Option<&QueryAttributes>, hits: Vec<ScoredGarment>) -> Vec<GarmentMatch> {
        hits.into_iter()
            .map(|hit| {
                let reasons = query
                    .map(|q| self.match_reasons(q, &hit.garment))
                    .unwrap_or_default();
                GarmentMatch {
                    garment_id: hit.garment.id.clone(),
                    similarity: Some(hit.similarity),
                    compatibility: None,
                    reasons,
                    gap_category: None,
                }
            })
            .collect()
    }

    /// Human-readable reasons why `candidate` matches the query.
    ///
    /// May be empty when no rule applies.
    pub fn match_reasons(&self, query: &QueryAttributes, candidate: &Garment) -> Vec<String> {
        let mut reasons = Vec::new();

        let colors = shared_terms(&term_set(&query.colors), &term_set(&candidate.colors));
        if !colors.is_empty() {
            reasons.push(format!("Shared colors: {}", colors.join(", ")));
        }

        let tags = shared_terms(&term_set(&query.style_tags), &term_set(&candidate.style_tags));
        if !tags.is_empty() {
            reasons.push(format!("Similar style: {}", tags.join(", ")));
        }

        if categorical_match(query.category.as_deref(), Some(&candidate.category)) == Some(true) {
            reasons.push(format!("Same category: {}", candidate.category));
        }

        if categorical_match(query.era.as_deref(), candidate.era.as_deref()) == Some(true) {
            if let Some(era) = &candidate.era {
                reasons.push(format!("Same era: {}", era));
            }
        }

        let materials = shared_terms(&term_set(&query.materials), &term_set(&candidate.materials));
        if !materials.is_empty() {
            reasons.push(format!("Similar texture: {}", materials.join(", ")));
        }

        if let Some(wanted) = query.condition {
            if candidate.condition.rank() >= wanted.rank() {
                reasons.push(format!("Great condition: {}", candidate.condition));
            }
        }

        reasons
    }
}

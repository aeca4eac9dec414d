//! Profile-to-garment compatibility scoring
//!
//! Five independent sub-scores, each from a disjoint attribute comparison,
//! combined by the weight table in [`CompatibilityWeights`].

use crate::distance::term_set;
use crate::profile::StyleProfile;
use crate::weights::CompatibilityWeights;
use drapex_core::{normalize_term, BrandTier, Garment, Result, SizeRank};
use serde::{Deserialize, Serialize};

/// Rank weights for the dominant aesthetic and up to three secondaries
const AESTHETIC_RANK_WEIGHTS: [f32; 4] = [1.0, 0.7, 0.5, 0.35];

/// Score for a sub-dimension with no usable data on one side
const NEUTRAL: f32 = 50.0;

/// A sub-score in [0, 100].
///
/// `known == false` means one side lacked the attribute; the value is then a
/// placeholder (0 for size, neutral 50 elsewhere), not a mismatch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SubScore {
    pub value: f32,
    pub known: bool,
}

impl SubScore {
    pub fn known(value: f32) -> Self {
        Self {
            value: value.clamp(0.0, 100.0),
            known: true,
        }
    }

    pub fn unknown(placeholder: f32) -> Self {
        Self {
            value: placeholder,
            known: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityScore {
    /// Weighted sum of the sub-scores, in [0, 100]
    pub overall: f32,
    pub style: SubScore,
    pub size: SubScore,
    pub color: SubScore,
    pub brand: SubScore,
    pub sustainability: SubScore,
}

/// Scores garments against style profiles
#[derive(Debug, Clone)]
pub struct CompatibilityScorer {
    weights: CompatibilityWeights,
}

impl Default for CompatibilityScorer {
    fn default() -> Self {
        Self {
            weights: CompatibilityWeights::default(),
        }
    }
}

impl CompatibilityScorer {
    /// Fails with `InvalidWeights` if the table does not sum to 1.0
    pub fn new(weights: CompatibilityWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &CompatibilityWeights {
        &self.weights
    }

    pub fn score(&self, profile: &StyleProfile, garment: &Garment) -> CompatibilityScore {
        let style = style_score(profile, garment);
        let size = size_score(profile, garment);
        let color = color_score(profile, garment);
        let brand = brand_score(profile, garment);
        let sustainability = sustainability_score(profile, garment);

        let w = &self.weights;
        let overall = w.style * style.value
            + w.size * size.value
            + w.color * color.value
            + w.brand * brand.value
            + w.sustainability * sustainability.value;

        CompatibilityScore {
            overall: overall.clamp(0.0, 100.0),
            style,
            size,
            color,
            brand,
            sustainability,
        }
    }

    /// Reasons a garment suits the profile, strongest signals first
    pub fn explain(&self, profile: &StyleProfile, garment: &Garment) -> Vec<String> {
        let mut reasons = Vec::new();

        let matched = matched_aesthetics(profile, garment);
        if !matched.is_empty() {
            reasons.push(format!("Matches your style: {}", matched.join(", ")));
        }

        let colors = matched_colors(profile, garment);
        if !colors.is_empty() {
            reasons.push(format!("In your colors: {}", colors.join(", ")));
        }

        if let Some(brand) = &garment.brand {
            if profile.prefers_brand(brand) {
                reasons.push(format!("From a brand you love: {}", brand));
            }
        }

        let size = size_score(profile, garment);
        if size.known && size.value >= 100.0 {
            reasons.push("Fits your usual size".to_string());
        }

        if profile.sustainability_affinity >= 50.0 && garment.sustainability_score() >= 60.0 {
            reasons.push("Aligns with your sustainability values".to_string());
        }

        if profile.vintage_affinity >= 50.0 && garment.is_vintage() {
            reasons.push("Vintage piece for your collection".to_string());
        }

        if let Some(gap) = gap_category(profile, garment) {
            reasons.push(format!("Fills a gap in your wardrobe: {}", gap));
        }

        reasons
    }
}

/// Category the garment adds when the profile shows none of it yet
pub fn gap_category(profile: &StyleProfile, garment: &Garment) -> Option<String> {
    if profile.preferred_categories.is_empty() {
        return None;
    }
    let category = normalize_term(&garment.category);
    if category.is_empty() || profile.preferred_categories.contains_key(&category) {
        None
    } else {
        Some(category)
    }
}

fn matched_aesthetics(profile: &StyleProfile, garment: &Garment) -> Vec<String> {
    let terms = garment.style_terms();
    profile
        .aesthetics()
        .filter(|a| terms.contains(a))
        .cloned()
        .collect()
}

fn matched_colors(profile: &StyleProfile, garment: &Garment) -> Vec<String> {
    term_set(&garment.colors)
        .into_iter()
        .filter(|c| profile.preferred_colors.contains_key(c))
        .collect()
}

fn style_score(profile: &StyleProfile, garment: &Garment) -> SubScore {
    let terms = garment.style_terms();
    if terms.is_empty() || profile.dominant_aesthetic.is_none() {
        return SubScore::unknown(NEUTRAL);
    }
    let matched: f32 = profile
        .aesthetics()
        .zip(AESTHETIC_RANK_WEIGHTS)
        .filter(|(a, _)| terms.contains(a))
        .map(|(_, w)| w)
        .sum();
    SubScore::known(matched.min(1.0) * 100.0)
}

fn size_score(profile: &StyleProfile, garment: &Garment) -> SubScore {
    let steps = profile.typical_size.and_then(|range| {
        garment
            .size
            .as_deref()
            .and_then(SizeRank::parse)
            .and_then(|size| range.steps_outside(&size))
    });
    match steps {
        Some(steps) => SubScore::known(100.0 * 0.5f32.powf(steps)),
        None => SubScore::unknown(0.0),
    }
}

fn color_score(profile: &StyleProfile, garment: &Garment) -> SubScore {
    let top = profile.preferred_colors.values().copied().fold(0.0f32, f32::max);
    if garment.colors.is_empty() || top <= 0.0 {
        return SubScore::unknown(NEUTRAL);
    }
    let best = matched_colors(profile, garment)
        .iter()
        .filter_map(|c| profile.preferred_colors.get(c))
        .copied()
        .fold(0.0f32, f32::max);
    SubScore::known(100.0 * best / top)
}

fn brand_score(profile: &StyleProfile, garment: &Garment) -> SubScore {
    let Some(brand) = garment.brand.as_deref() else {
        return SubScore::unknown(NEUTRAL);
    };
    if profile.prefers_brand(brand) {
        return SubScore::known(100.0);
    }
    let luxury = profile.luxury_affinity / 100.0;
    let sustainable = profile.sustainability_affinity / 100.0;
    let alignment = match BrandTier::of(brand) {
        BrandTier::Luxury => 0.4 + 0.6 * luxury,
        BrandTier::Premium => 0.6 + 0.4 * luxury,
        BrandTier::Sustainable => 0.4 + 0.6 * sustainable,
        BrandTier::MidMarket | BrandTier::Unlisted => 1.0 - 0.5 * luxury,
    };
    SubScore::known(80.0 * alignment)
}

fn sustainability_score(profile: &StyleProfile, garment: &Garment) -> SubScore {
    if !garment.has_provenance() {
        return SubScore::unknown(NEUTRAL);
    }
    let priority = profile.sustainability_affinity / 100.0;
    SubScore::known(100.0 - priority * (100.0 - garment.sustainability_score()))
}

//! Scoring weight tables
//!
//! The single place where "what matters most" is decided. Tables are plain
//! serde data so they can be loaded from versioned configuration, and they
//! are validated once at startup rather than per call.

use drapex_core::{Error, Result};
use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f32 = 0.001;

/// Weights for profile-to-garment compatibility
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityWeights {
    pub style: f32,
    pub size: f32,
    pub color: f32,
    pub brand: f32,
    pub sustainability: f32,
}

impl Default for CompatibilityWeights {
    fn default() -> Self {
        Self {
            style: 0.30,
            size: 0.20,
            color: 0.20,
            brand: 0.15,
            sustainability: 0.15,
        }
    }
}

impl CompatibilityWeights {
    fn named(&self) -> [(&'static str, f32); 5] {
        [
            ("style", self.style),
            ("size", self.size),
            ("color", self.color),
            ("brand", self.brand),
            ("sustainability", self.sustainability),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        validate_table("compatibility", &self.named())
    }
}

/// Weights for garment-to-garment (outfit) compatibility
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OutfitWeights {
    pub color_harmony: f32,
    pub texture_mix: f32,
    pub silhouette_balance: f32,
    pub style_cohesion: f32,
}

impl Default for OutfitWeights {
    fn default() -> Self {
        Self {
            color_harmony: 0.30,
            texture_mix: 0.20,
            silhouette_balance: 0.25,
            style_cohesion: 0.25,
        }
    }
}

impl OutfitWeights {
    fn named(&self) -> [(&'static str, f32); 4] {
        [
            ("color_harmony", self.color_harmony),
            ("texture_mix", self.texture_mix),
            ("silhouette_balance", self.silhouette_balance),
            ("style_cohesion", self.style_cohesion),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        validate_table("outfit", &self.named())
    }
}

/// Versioned scoring policy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringPolicy {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub compatibility: CompatibilityWeights,
    #[serde(default)]
    pub outfit: OutfitWeights,
}

fn default_version() -> u32 {
    1
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            version: 1,
            compatibility: CompatibilityWeights::default(),
            outfit: OutfitWeights::default(),
        }
    }
}

impl ScoringPolicy {
    pub fn validate(&self) -> Result<()> {
        self.compatibility.validate()?;
        self.outfit.validate()
    }
}

fn validate_table(table: &str, weights: &[(&'static str, f32)]) -> Result<()> {
    for (name, weight) in weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(Error::InvalidWeights(format!(
                "{} weight '{}' must be a non-negative number, got {}",
                table, name, weight
            )));
        }
    }
    let sum: f32 = weights.iter().map(|(_, w)| w).sum();
    if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(Error::InvalidWeights(format!(
            "{} weights must sum to 1.0, got {:.4}",
            table, sum
        )));
    }
    Ok(())
}

//! Engine configuration
//!
//! Loaded once at startup from a JSON file; every field has a default so a
//! partial file only overrides what it names. Invalid weight tables are fatal.

use drapex_core::{Error, IndexConfig, Result};
use drapex_pricing::PricingConfig;
use drapex_similarity::{OutfitConfig, ProfileConfig, ScoringPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IndexSettings {
    /// Per-garment mutation locks
    pub lock_stripes: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { lock_stripes: 64 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Dimension of the embeddings handed to the engine
    pub embedding_dim: usize,
    pub index: IndexSettings,
    pub scoring: ScoringPolicy,
    pub profile: ProfileConfig,
    pub outfits: OutfitConfig,
    pub pricing: PricingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            embedding_dim: 512,
            index: IndexSettings::default(),
            scoring: ScoringPolicy::default(),
            profile: ProfileConfig::default(),
            outfits: OutfitConfig::default(),
            pricing: PricingConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            return Err(Error::InvalidConfig("embedding_dim must be at least 1".to_string()));
        }
        if self.index.lock_stripes == 0 {
            return Err(Error::InvalidConfig("index.lock_stripes must be at least 1".to_string()));
        }
        self.scoring.validate()?;
        if !self.profile.half_life_days.is_finite() || self.profile.half_life_days <= 0.0 {
            return Err(Error::InvalidConfig("profile.half_life_days must be positive".to_string()));
        }
        if self.outfits.max_garments < 2 || self.outfits.candidates_per_slot == 0 {
            return Err(Error::InvalidConfig(
                "outfits need max_garments >= 2 and candidates_per_slot >= 1".to_string(),
            ));
        }
        self.pricing.validate()
    }

    pub fn index_config(&self) -> IndexConfig {
        IndexConfig {
            name: "garments".to_string(),
            embedding_dim: self.embedding_dim,
            lock_stripes: self.index.lock_stripes,
        }
    }
}

//! # Drapex
//!
//! A garment discovery and compatibility engine for resale fashion.
//!
//! Drapex answers four questions about a catalog of pre-owned garments:
//! which garments look like this one, which suit this shopper, what goes
//! with what, and what should this sell for.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! drapex --http-port 6340 --config drapex.json
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use drapex::prelude::*;
//!
//! let engine = Engine::new(EngineConfig {
//!     embedding_dim: 3,
//!     ..EngineConfig::default()
//! })
//! .unwrap();
//!
//! let coat = Garment::new("coat-1", "coat", Condition::Excellent)
//!     .with_colors(["navy"])
//!     .with_embedding(Vector::new(vec![0.9, 0.1, 0.0]));
//! engine.add_garment(coat).unwrap();
//!
//! let hits = engine
//!     .visual_search(&Vector::new(vec![1.0, 0.0, 0.0]), 10, None, None)
//!     .unwrap();
//! assert_eq!(hits.result.len(), 1);
//! ```
//!
//! ## Crate Structure
//!
//! - [`drapex-core`](https://docs.rs/drapex-core) - Garment model, embeddings, concurrent vector index
//! - [`drapex-similarity`](https://docs.rs/drapex-similarity) - Ranker, style profiles, compatibility, outfits
//! - [`drapex-pricing`](https://docs.rs/drapex-pricing) - Comparable-sales pricing guidance
//! - [`drapex-api`](https://docs.rs/drapex-api) - Engine facade and REST API

// Re-export core types
pub use drapex_core::{
    AttributeField, AttributeFilter, BrandTier, Condition, Error, FilterCondition, Garment,
    GarmentFilter, GarmentId, GarmentIndex, ListingStatus, Result, SizeRange, Vector,
};

pub use drapex_similarity::{
    CompatibilityScore, CompatibilityScorer, CompatibilityWeights, GarmentMatch, GarmentPairing,
    InteractionKind, MatchResponse, OutfitCombination, OutfitCompatibility, OutfitGenerator,
    OutfitRequest, OutfitWeights, ProfileBuilder, QueryAttributes, ScoringPolicy,
    SimilarityRanker, StyleProfile, UserInteraction,
};

pub use drapex_pricing::{
    MarketDemand, PricingConfig, PricingEngine, PricingFactor, PricingGuidance, SaleRecord,
};

pub use drapex_api::{Engine, EngineConfig, ListingUpdate, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AttributeFilter, Condition, Engine, EngineConfig, Error, FilterCondition, Garment,
        GarmentId, InteractionKind, OutfitRequest, QueryAttributes, Result, SaleRecord,
        StyleProfile, UserInteraction, Vector,
    };
}

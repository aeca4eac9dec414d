//! # Drapex Similarity
//!
//! Style matching and outfit scoring for the Drapex garment engine.
//!
//! This crate sits on top of the `drapex-core` vector index and turns raw
//! numeric results into explained, policy-weighted scores.
//!
//! ## Features
//!
//! - **Similarity Ranker**: rule-based match reasons for visual search hits
//! - **Style Profiles**: recency-weighted aggregation of wardrobe and interactions
//! - **Compatibility**: five independent sub-scores combined by a weight table
//! - **Outfits**: pairwise color, texture, silhouette and style rules, extended to full outfits
//!
//! ## Example
//!
//! ```rust
//! use drapex_core::{Condition, Garment};
//! use drapex_similarity::{CompatibilityScorer, CompatibilityWeights, ProfileBuilder};
//!
//! let wardrobe = vec![
//!     Garment::new("g1", "top", Condition::Good)
//!         .with_style_tags(["minimalist"])
//!         .with_colors(["black"]),
//! ];
//! let profile = ProfileBuilder::default().build(&wardrobe, &[]);
//! assert_eq!(profile.dominant_aesthetic.as_deref(), Some("minimalist"));
//!
//! let scorer = CompatibilityScorer::new(CompatibilityWeights::default()).unwrap();
//! let candidate = Garment::new("g2", "trousers", Condition::Excellent)
//!     .with_style_tags(["Minimalist"]);
//! let score = scorer.score(&profile, &candidate);
//! assert_eq!(score.style.value, 100.0);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Wardrobe + │────>│  Profile    │────>│Compatibility│
//! │ interactions│     │  Builder    │     │   Scorer    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Index hits  │────>│   Ranker    │────>│   Explain   │
//! └─────────────┘     └─────────────┘     │  (results)  │
//!                                         └─────────────┘
//! ┌─────────────┐     ┌─────────────┐
//! │   Pairing   │────>│   Outfit    │
//! │ (color etc.)│     │  Generator  │
//! └─────────────┘     └─────────────┘
//! ```

pub mod color;
pub mod compatibility;
pub mod distance;
pub mod explain;
pub mod outfit;
pub mod pairing;
pub mod profile;
pub mod ranker;
pub mod weights;

// Re-export main types for convenience
pub use color::{ColorRelation, ColorTone};
pub use compatibility::{gap_category, CompatibilityScore, CompatibilityScorer, SubScore};
pub use explain::{GarmentMatch, MatchResponse, SearchStats};
pub use outfit::{OutfitCombination, OutfitConfig, OutfitGenerator, OutfitRequest};
pub use pairing::{GarmentPairing, OutfitCompatibility, Slot};
pub use profile::{InteractionKind, ProfileBuilder, ProfileConfig, StyleProfile, UserInteraction};
pub use ranker::{QueryAttributes, SimilarityRanker};
pub use weights::{CompatibilityWeights, OutfitWeights, ScoringPolicy};

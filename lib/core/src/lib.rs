//! # Drapex Core
//!
//! Core library for the Drapex garment discovery engine.
//!
//! This crate provides the fundamental data structures:
//!
//! - [`Vector`] - Fixed-dimension embedding with cosine similarity
//! - [`Garment`] - A catalog garment with optional embedding
//! - [`GarmentIndex`] - Concurrent corpus answering nearest-neighbor queries
//! - [`AttributeFilter`] - Categorical filters applied before scoring
//!
//! ## Example
//!
//! ```rust
//! use drapex_core::{Condition, Garment, GarmentIndex, IndexConfig, Vector};
//!
//! let index = GarmentIndex::new(IndexConfig {
//!     name: "catalog".to_string(),
//!     embedding_dim: 3,
//!     lock_stripes: 16,
//! });
//!
//! let garment = Garment::new("g1", "jacket", Condition::Good)
//!     .with_embedding(Vector::new(vec![1.0, 0.0, 0.0]));
//! index.upsert(garment).unwrap();
//!
//! let query = Vector::new(vec![1.0, 0.0, 0.0]);
//! let results = index.search(&query, 10, None).unwrap();
//! assert_eq!(results.len(), 1);
//! ```

pub mod brand;
pub mod error;
pub mod filter;
pub mod garment;
pub mod index;
pub mod size;
pub mod vector;

pub use brand::{brand_multiplier, is_known_brand, BrandTier};
pub use error::{Error, Result};
pub use filter::{AttributeField, AttributeFilter, FilterCondition, GarmentFilter};
pub use garment::{normalize_term, Condition, Garment, GarmentId, ListingStatus};
pub use index::{GarmentIndex, IndexConfig, ListingFields, ScoredGarment};
pub use size::{SizeRange, SizeRank, SizeSystem};
pub use vector::Vector;

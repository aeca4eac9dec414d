//! # Drapex Pricing
//!
//! Market-informed pricing guidance for resale listings.
//!
//! Comparable sales are the primary signal: the suggested price starts from
//! their weighted median and every adjustment after that is recorded as a
//! named [`PricingFactor`]. With no usable comparables the engine falls back
//! to a category base rate and reports zero confidence.
//!
//! ```rust
//! use chrono::Utc;
//! use drapex_core::{Condition, Garment};
//! use drapex_pricing::{PricingEngine, SaleRecord};
//!
//! let garment = Garment::new("g1", "coat", Condition::Good).with_brand("COS");
//! let sales = vec![
//!     SaleRecord::new("coat", Condition::Good, 95.0, Utc::now()).with_brand("cos"),
//! ];
//! let guidance = PricingEngine::default().guidance(&garment, &sales, Utc::now());
//! assert!(guidance.confidence > 0.0);
//! assert!(guidance.min_price <= guidance.recommended_price);
//! assert!(guidance.recommended_price <= guidance.max_price);
//! ```

pub mod engine;
pub mod fallback;
pub mod ledger;
pub mod sales;

pub use engine::{
    ComparableSale, FallbackReason, MarketDemand, PricingConfig, PricingEngine, PricingGuidance,
};
pub use ledger::{PriceLedger, PricingFactor};
pub use sales::{SaleRecord, SalesLedger};

//! Brand tiers and their resale value multipliers

use crate::garment::normalize_term;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandTier {
    Luxury,
    Premium,
    MidMarket,
    Sustainable,
    /// Not in the table
    Unlisted,
}

const BRAND_TABLE: &[(&str, BrandTier, f64)] = &[
    ("gucci", BrandTier::Luxury, 2.5),
    ("prada", BrandTier::Luxury, 2.5),
    ("chanel", BrandTier::Luxury, 3.0),
    ("hermes", BrandTier::Luxury, 3.5),
    ("louis vuitton", BrandTier::Luxury, 2.5),
    ("theory", BrandTier::Premium, 1.5),
    ("cos", BrandTier::Premium, 1.3),
    ("everlane", BrandTier::Premium, 1.2),
    ("reformation", BrandTier::Premium, 1.4),
    ("patagonia", BrandTier::Premium, 1.4),
    ("eileen fisher", BrandTier::Premium, 1.4),
    ("j.crew", BrandTier::MidMarket, 1.1),
    ("banana republic", BrandTier::MidMarket, 1.0),
    ("zara", BrandTier::MidMarket, 0.8),
    ("h&m", BrandTier::MidMarket, 0.6),
    ("uniqlo", BrandTier::MidMarket, 0.9),
    ("madewell", BrandTier::MidMarket, 1.2),
    ("organic basics", BrandTier::Sustainable, 1.3),
    ("tentree", BrandTier::Sustainable, 1.3),
    ("kotn", BrandTier::Sustainable, 1.3),
    ("pact", BrandTier::Sustainable, 1.2),
    ("kuyichi", BrandTier::Sustainable, 1.2),
];

fn lookup(brand: &str) -> Option<(BrandTier, f64)> {
    let key = normalize_term(brand);
    BRAND_TABLE
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|(_, tier, mult)| (*tier, *mult))
}

impl BrandTier {
    pub fn of(brand: &str) -> BrandTier {
        lookup(brand).map(|(tier, _)| tier).unwrap_or(BrandTier::Unlisted)
    }
}

/// Price multiplier relative to generic pricing; 1.0 for unlisted brands
pub fn brand_multiplier(brand: &str) -> f64 {
    lookup(brand).map(|(_, mult)| mult).unwrap_or(1.0)
}

pub fn is_known_brand(brand: &str) -> bool {
    lookup(brand).is_some()
}

//! Base-rate estimator used when no comparable sales exist

use crate::ledger::PriceLedger;
use drapex_core::{brand_multiplier, normalize_term, Condition, Garment};

/// Estimated original retail price by category
const CATEGORY_BASE_PRICES: &[(&str, f64)] = &[
    ("dress", 120.0),
    ("shirt", 60.0),
    ("blouse", 70.0),
    ("t-shirt", 35.0),
    ("pants", 80.0),
    ("trousers", 80.0),
    ("jeans", 90.0),
    ("skirt", 65.0),
    ("jacket", 150.0),
    ("coat", 200.0),
    ("sweater", 85.0),
    ("cardigan", 75.0),
    ("shorts", 45.0),
    ("activewear", 70.0),
    ("swimwear", 60.0),
    ("accessory", 50.0),
    ("shoes", 100.0),
    ("bag", 150.0),
];

const DEFAULT_BASE_PRICE: f64 = 75.0;

const CERTIFICATION_BONUSES: &[(&str, f64)] = &[
    ("gots", 10.0),
    ("fair trade", 10.0),
    ("b corp", 8.0),
    ("bluesign", 8.0),
    ("oeko-tex", 5.0),
    ("cradle to cradle", 10.0),
];

const MAX_SUSTAINABILITY_BONUS: f64 = 50.0;

/// Share of original retail a garment keeps in each condition
pub fn condition_multiplier(condition: Condition) -> f64 {
    match condition {
        Condition::New => 0.85,
        Condition::Excellent => 0.70,
        Condition::Good => 0.50,
        Condition::Fair => 0.30,
    }
}

/// Known original price, else the category's retail base
pub fn retail_base(garment: &Garment) -> f64 {
    if let Some(original) = garment.original_price.filter(|p| p.is_finite() && *p > 0.0) {
        return original;
    }
    let category = normalize_term(&garment.category);
    CATEGORY_BASE_PRICES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

pub fn is_known_category(category: &str) -> bool {
    let category = normalize_term(category);
    CATEGORY_BASE_PRICES.iter().any(|(name, _)| *name == category)
}

/// Dollar premium buyers pay for provenance and sustainable attributes
pub fn sustainability_bonus(garment: &Garment) -> f64 {
    let mut bonus = 0.0;
    match garment.source.as_deref().map(normalize_term).as_deref() {
        Some("vintage" | "antique" | "designer archive") => bonus += 15.0,
        Some("secondhand" | "consignment") => bonus += 5.0,
        _ => {}
    }
    if garment.has_sustainable_materials() {
        bonus += 5.0;
    }
    for certification in &garment.certifications {
        let certification = normalize_term(certification);
        if let Some((_, value)) = CERTIFICATION_BONUSES
            .iter()
            .find(|(name, _)| certification.contains(name))
        {
            bonus += value;
        }
    }
    f64::min(bonus, MAX_SUSTAINABILITY_BONUS)
}

/// Apply the base-rate rules to a ledger started at [`retail_base`]
pub fn apply_base_rate(ledger: &mut PriceLedger, garment: &Garment, price_floor: f64) {
    let condition = garment.condition;
    ledger.scale(
        "condition",
        condition_multiplier(condition) - 1.0,
        format!("{} condition keeps {:.0}% of retail", condition, condition_multiplier(condition) * 100.0),
    );
    if let Some(brand) = &garment.brand {
        let multiplier = brand_multiplier(brand);
        ledger.scale("brand", multiplier - 1.0, format!("{} brand value", brand));
    }
    let bonus = sustainability_bonus(garment);
    if bonus > 0.0 {
        ledger.add("sustainability", bonus, "provenance and sustainable attributes");
    }
    ledger.floor("price_floor", price_floor, "minimum listing price");
}

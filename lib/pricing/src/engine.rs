//! Pricing guidance from comparable sales
//!
//! The base price is the weighted median of comparable sale prices, each sale
//! weighted by recency and by how closely it matches the garment. Named
//! adjustments are then applied through a [`PriceLedger`].

use crate::fallback::{apply_base_rate, is_known_category, retail_base};
use crate::ledger::{PriceLedger, PricingFactor};
use crate::sales::SaleRecord;
use chrono::{DateTime, Utc};
use drapex_core::{brand_multiplier, is_known_brand, normalize_term, BrandTier, Condition, Error, Garment, Result, SizeRank};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingConfig {
    /// Days for a sale's weight to halve
    pub recency_half_life_days: f64,
    /// Sales further than this from the garment are not comparable
    pub max_attribute_distance: f64,
    pub max_comparables: usize,
    /// Maximum total adjustment from the comparable median, as a fraction
    pub adjustment_cap: f64,
    /// Range half-width for base-rate estimates
    pub fallback_spread: f64,
    pub min_spread: f64,
    pub max_spread: f64,
    pub price_floor: f64,
    /// Below this confidence the guidance is flagged
    pub low_confidence_threshold: f64,
    /// Window for counting recent comparable sales
    pub demand_window_days: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            recency_half_life_days: 90.0,
            max_attribute_distance: 0.8,
            max_comparables: 20,
            adjustment_cap: 0.30,
            fallback_spread: 0.20,
            min_spread: 0.10,
            max_spread: 0.35,
            price_floor: 5.0,
            low_confidence_threshold: 0.4,
            demand_window_days: 30.0,
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("recency_half_life_days", self.recency_half_life_days),
            ("demand_window_days", self.demand_window_days),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!("pricing.{} must be positive", name)));
            }
        }
        let fractions = [
            ("max_attribute_distance", self.max_attribute_distance),
            ("adjustment_cap", self.adjustment_cap),
            ("fallback_spread", self.fallback_spread),
            ("min_spread", self.min_spread),
            ("max_spread", self.max_spread),
            ("low_confidence_threshold", self.low_confidence_threshold),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "pricing.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.min_spread > self.max_spread {
            return Err(Error::InvalidConfig(
                "pricing.min_spread must not exceed pricing.max_spread".to_string(),
            ));
        }
        if self.max_comparables == 0 {
            return Err(Error::InvalidConfig("pricing.max_comparables must be at least 1".to_string()));
        }
        if !self.price_floor.is_finite() || self.price_floor < 0.0 {
            return Err(Error::InvalidConfig("pricing.price_floor must be non-negative".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketDemand {
    Low,
    Normal,
    High,
}

impl MarketDemand {
    fn adjustment(self) -> f64 {
        match self {
            MarketDemand::Low => -0.07,
            MarketDemand::Normal => 0.0,
            MarketDemand::High => 0.07,
        }
    }

    fn typical_days_to_sell(self) -> f64 {
        match self {
            MarketDemand::High => 7.0,
            MarketDemand::Normal => 18.0,
            MarketDemand::Low => 35.0,
        }
    }
}

/// Why guidance fell back to base rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    InsufficientComparables,
}

/// A sale used as evidence, most recent first in guidance output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparableSale {
    pub price: f64,
    pub sold_at: DateTime<Utc>,
    pub condition: Condition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// 1 - attribute distance
    pub similarity: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingGuidance {
    pub suggested_price: f64,
    /// Comparable weighted median, or the retail base on fallback
    pub base_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    /// Listing price at a common price point, within the range
    pub recommended_price: f64,
    pub market_demand: MarketDemand,
    pub comparables: Vec<ComparableSale>,
    pub factors: Vec<PricingFactor>,
    pub days_to_sell: u32,
    /// In [0, 1]; 0 without comparables
    pub confidence: f64,
    pub low_confidence: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
    pub explanation: String,
}

impl PricingGuidance {
    /// Sum of factor impacts, in percent of the base price
    pub fn total_adjustment_pct(&self) -> f64 {
        self.factors.iter().map(|f| f.impact_pct).sum()
    }
}

/// Comparable candidate with its attribute distance
struct Comparable<'a> {
    sale: &'a SaleRecord,
    distance: f64,
    weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Guidance for `garment` given candidate sales, as of a point in time.
    ///
    /// Sales after `as_of`, in other categories, or too dissimilar are ignored.
    /// Without usable comparables the result is a flagged base-rate estimate
    /// with zero confidence.
    pub fn guidance(&self, garment: &Garment, sales: &[SaleRecord], as_of: DateTime<Utc>) -> PricingGuidance {
        let comparables = self.comparables(garment, sales, as_of);
        if comparables.is_empty() {
            return self.fallback(garment);
        }

        let Some(base) = weighted_median(&comparables) else {
            return self.fallback(garment);
        };
        let demand = self.demand(garment, &comparables, as_of);

        let mut ledger = PriceLedger::new(base).with_cap(self.config.adjustment_cap);
        self.apply_condition(&mut ledger, garment, &comparables);
        self.apply_brand(&mut ledger, garment, &comparables);
        if demand != MarketDemand::Normal {
            ledger.scale(
                "demand",
                demand.adjustment(),
                format!("{} demand for comparable items", label(demand)),
            );
        }
        ledger.floor("price_floor", self.config.price_floor, "minimum listing price");
        let base = ledger.base();
        let (suggested, factors) = ledger.finish();

        let spread = self.relative_spread(&comparables, base);
        let min_price = round_cents(suggested * (1.0 - spread));
        let max_price = round_cents(suggested * (1.0 + spread));
        let confidence = confidence(&comparables);

        PricingGuidance {
            suggested_price: suggested,
            base_price: base,
            min_price,
            max_price,
            recommended_price: price_point(suggested, min_price, max_price),
            market_demand: demand,
            days_to_sell: days_to_sell(demand, &comparables),
            comparables: comparables
                .iter()
                .map(|c| ComparableSale {
                    price: c.sale.price,
                    sold_at: c.sale.sold_at,
                    condition: c.sale.condition,
                    brand: c.sale.brand.clone(),
                    similarity: 1.0 - c.distance,
                    weight: c.weight,
                })
                .collect(),
            factors,
            confidence,
            low_confidence: confidence < self.config.low_confidence_threshold,
            fallback: None,
            explanation: format!(
                "Based on {} comparable {} sale{} with a median of ${:.2}",
                comparables.len(),
                normalize_term(&garment.category),
                if comparables.len() == 1 { "" } else { "s" },
                base
            ),
        }
    }

    /// Base-rate estimate: category retail, condition, brand and provenance
    pub fn fallback(&self, garment: &Garment) -> PricingGuidance {
        let mut ledger = PriceLedger::new(retail_base(garment));
        apply_base_rate(&mut ledger, garment, self.config.price_floor);
        let base = ledger.base();
        let (suggested, factors) = ledger.finish();

        let spread = self.config.fallback_spread;
        let min_price = round_cents(suggested * (1.0 - spread));
        let max_price = round_cents(suggested * (1.0 + spread));
        let demand = engagement_demand(garment).unwrap_or(MarketDemand::Normal);

        let mut explanation = if is_known_category(&garment.category) {
            format!("No comparable sales; estimated from {} retail pricing", normalize_term(&garment.category))
        } else {
            "No comparable sales; estimated from typical resale pricing".to_string()
        };
        if let Some(brand) = garment.brand.as_deref().filter(|b| is_known_brand(b)) {
            explanation.push_str(&format!(" with {} brand value", brand));
        }
        explanation.push_str(&format!(" adjusted for {} condition", garment.condition));

        PricingGuidance {
            suggested_price: suggested,
            base_price: base,
            min_price,
            max_price,
            recommended_price: price_point(suggested, min_price, max_price),
            market_demand: demand,
            comparables: Vec::new(),
            factors,
            days_to_sell: demand.typical_days_to_sell() as u32,
            confidence: 0.0,
            low_confidence: true,
            fallback: Some(FallbackReason::InsufficientComparables),
            explanation,
        }
    }

    fn comparables<'a>(&self, garment: &Garment, sales: &'a [SaleRecord], as_of: DateTime<Utc>) -> Vec<Comparable<'a>> {
        let category = normalize_term(&garment.category);
        let mut comparables: Vec<Comparable<'a>> = sales
            .iter()
            .filter(|s| s.sold_at <= as_of && normalize_term(&s.category) == category)
            .filter(|s| s.price.is_finite() && s.price > 0.0)
            .filter_map(|sale| {
                let distance = attribute_distance(garment, sale);
                if distance > self.config.max_attribute_distance {
                    return None;
                }
                let age_days = (as_of - sale.sold_at).num_seconds() as f64 / 86_400.0;
                let recency = 0.5f64.powf(age_days / self.config.recency_half_life_days);
                Some(Comparable {
                    sale,
                    distance,
                    weight: recency * (1.0 - distance),
                })
            })
            .filter(|c| c.weight > 0.0)
            .collect();
        comparables.sort_by(|a, b| {
            b.sale
                .sold_at
                .cmp(&a.sale.sold_at)
                .then_with(|| OrderedFloat(b.weight).cmp(&OrderedFloat(a.weight)))
        });
        comparables.truncate(self.config.max_comparables);
        comparables
    }

    fn apply_condition(&self, ledger: &mut PriceLedger, garment: &Garment, comparables: &[Comparable]) {
        let total: f64 = comparables.iter().map(|c| c.weight).sum();
        let mean_rank = comparables
            .iter()
            .map(|c| c.sale.condition.rank() as f64 * c.weight)
            .sum::<f64>()
            / total;
        let steps = garment.condition.rank() as f64 - mean_rank;
        if steps.abs() >= 0.05 {
            ledger.scale(
                "condition",
                steps * 0.05,
                format!(
                    "{} condition vs comparables averaging {:.1} on a 4-point scale",
                    garment.condition, mean_rank
                ),
            );
        }
    }

    fn apply_brand(&self, ledger: &mut PriceLedger, garment: &Garment, comparables: &[Comparable]) {
        let Some(brand) = garment.brand.as_deref() else {
            return;
        };
        let total: f64 = comparables.iter().map(|c| c.weight).sum();
        let mean_multiplier = comparables
            .iter()
            .map(|c| c.sale.brand.as_deref().map(brand_multiplier).unwrap_or(1.0) * c.weight)
            .sum::<f64>()
            / total;
        let ratio = brand_multiplier(brand) / mean_multiplier;
        // half the tier gap, the comparables already carry most brand signal
        let fraction = ((ratio - 1.0) * 0.5).clamp(-0.15, 0.15);
        if fraction.abs() >= 0.005 {
            ledger.scale("brand", fraction, format!("{} brand value vs comparable brands", brand));
        }
    }

    fn demand(&self, garment: &Garment, comparables: &[Comparable], as_of: DateTime<Utc>) -> MarketDemand {
        let window = chrono::Duration::seconds((self.config.demand_window_days * 86_400.0) as i64);
        let recent = comparables
            .iter()
            .filter(|c| as_of - c.sale.sold_at <= window)
            .count();
        let engagement = engagement_demand(garment);
        if recent >= 3 || engagement == Some(MarketDemand::High) {
            MarketDemand::High
        } else if recent == 0 && engagement == Some(MarketDemand::Low) {
            MarketDemand::Low
        } else {
            MarketDemand::Normal
        }
    }

    fn relative_spread(&self, comparables: &[Comparable], base: f64) -> f64 {
        let total: f64 = comparables.iter().map(|c| c.weight).sum();
        let deviation = comparables
            .iter()
            .map(|c| (c.sale.price - base).abs() * c.weight)
            .sum::<f64>()
            / total;
        (deviation / base).clamp(self.config.min_spread, self.config.max_spread)
    }
}

fn label(demand: MarketDemand) -> &'static str {
    match demand {
        MarketDemand::Low => "Low",
        MarketDemand::Normal => "Normal",
        MarketDemand::High => "High",
    }
}

/// Demand from the listing's own save-to-view ratio, `None` below 10 views
fn engagement_demand(garment: &Garment) -> Option<MarketDemand> {
    if garment.view_count < 10 {
        return None;
    }
    let ratio = garment.save_count as f64 / garment.view_count as f64;
    Some(if ratio >= 0.15 {
        MarketDemand::High
    } else if ratio < 0.05 {
        MarketDemand::Low
    } else {
        MarketDemand::Normal
    })
}

/// Attribute distance in [0, 1]; 0 is the same brand, condition and size
fn attribute_distance(garment: &Garment, sale: &SaleRecord) -> f64 {
    let mut distance = 0.0;

    distance += match (garment.brand.as_deref(), sale.brand.as_deref()) {
        (Some(a), Some(b)) if normalize_term(a) == normalize_term(b) => 0.0,
        (Some(a), Some(b)) if BrandTier::of(a) == BrandTier::of(b) => 0.2,
        (None, None) => 0.1,
        _ => 0.4,
    };

    let steps = (garment.condition.rank() as f64 - sale.condition.rank() as f64).abs();
    distance += steps * 0.15;

    let sizes = (
        garment.size.as_deref().and_then(SizeRank::parse),
        sale.size.as_deref().and_then(SizeRank::parse),
    );
    if let (Some(a), Some(b)) = sizes {
        distance += a.steps_to(&b).map(|s| (s * 0.05).min(0.1) as f64).unwrap_or(0.1);
    }

    let subcategories = (garment.subcategory.as_deref(), sale.subcategory.as_deref());
    if let (Some(a), Some(b)) = subcategories {
        if normalize_term(a) != normalize_term(b) {
            distance += 0.1;
        }
    }

    f64::min(distance, 1.0)
}

/// Lower weighted median of sale prices
fn weighted_median(comparables: &[Comparable]) -> Option<f64> {
    let mut by_price: Vec<(f64, f64)> = comparables.iter().map(|c| (c.sale.price, c.weight)).collect();
    by_price.sort_by(|a, b| OrderedFloat(a.0).cmp(&OrderedFloat(b.0)));
    let total: f64 = by_price.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return None;
    }
    let mut cumulative = 0.0;
    for (price, weight) in &by_price {
        cumulative += weight;
        if cumulative >= total / 2.0 {
            return Some(*price);
        }
    }
    by_price.last().map(|(price, _)| *price)
}

/// Confidence from sample size, mean similarity and similarity spread
fn confidence(comparables: &[Comparable]) -> f64 {
    let n = comparables.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let similarities: Vec<f64> = comparables.iter().map(|c| 1.0 - c.distance).collect();
    let mean = similarities.iter().sum::<f64>() / n;
    let variance = similarities.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let sample = 1.0 - (-n / 5.0).exp();
    (sample * mean * (1.0 - variance.sqrt())).clamp(0.0, 1.0)
}

fn days_to_sell(demand: MarketDemand, comparables: &[Comparable]) -> u32 {
    let typical = demand.typical_days_to_sell();
    let listed: Vec<f64> = comparables.iter().filter_map(|c| c.sale.days_listed()).collect();
    let days = if listed.is_empty() {
        typical
    } else {
        (typical + listed.iter().sum::<f64>() / listed.len() as f64) / 2.0
    };
    days.round().max(1.0) as u32
}

/// Nearest price ending in 9 (e.g. 180 -> 179), clamped into the range
fn price_point(suggested: f64, min: f64, max: f64) -> f64 {
    let whole = suggested.round();
    let point = if whole < 10.0 {
        whole
    } else {
        (whole / 10.0).round() * 10.0 - 1.0
    };
    point.clamp(min, max)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

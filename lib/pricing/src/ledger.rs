//! Price adjustment ledger
//!
//! Adjustments are applied one at a time and each records its own signed
//! impact relative to the base price, so the recorded factors always sum to
//! the total change from base to final.

use serde::{Deserialize, Serialize};

/// A named, signed adjustment to the base price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingFactor {
    pub name: String,
    /// Percent of the base price, positive raises the price
    pub impact_pct: f64,
    pub description: String,
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub struct PriceLedger {
    base: f64,
    current: f64,
    /// Maximum total deviation from base, as a fraction
    cap: Option<f64>,
    factors: Vec<PricingFactor>,
}

impl PriceLedger {
    pub fn new(base: f64) -> Self {
        let base = round_cents(base);
        Self {
            base,
            current: base,
            cap: None,
            factors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap.abs());
        self
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    /// Scale the running price by `1 + fraction`
    pub fn scale(&mut self, name: &str, fraction: f64, description: impl Into<String>) {
        let target = self.current * (1.0 + fraction);
        self.move_to(name, target, true, description.into());
    }

    /// Add a fixed amount to the running price
    pub fn add(&mut self, name: &str, amount: f64, description: impl Into<String>) {
        let target = self.current + amount;
        self.move_to(name, target, true, description.into());
    }

    /// Raise the running price to at least `floor`.
    ///
    /// The floor is absolute: it is not limited by the adjustment cap.
    pub fn floor(&mut self, name: &str, floor: f64, description: impl Into<String>) {
        if self.current < floor {
            self.move_to(name, floor, false, description.into());
        }
    }

    fn move_to(&mut self, name: &str, target: f64, capped: bool, description: String) {
        if !target.is_finite() {
            return;
        }
        let mut next = target;
        if let (true, Some(cap)) = (capped, self.cap) {
            next = next.clamp(self.base * (1.0 - cap), self.base * (1.0 + cap));
        }
        let next = round_cents(next.max(0.0));
        if next == self.current || self.base <= 0.0 {
            return;
        }
        self.factors.push(PricingFactor {
            name: name.to_string(),
            impact_pct: (next - self.current) / self.base * 100.0,
            description,
        });
        self.current = next;
    }

    /// Final price and the factors that produced it
    pub fn finish(self) -> (f64, Vec<PricingFactor>) {
        (self.current, self.factors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_pct(factors: &[PricingFactor]) -> f64 {
        factors.iter().map(|f| f.impact_pct).sum()
    }

    #[test]
    fn test_factors_reconcile_with_delta() {
        let mut ledger = PriceLedger::new(180.0);
        ledger.scale("condition", 0.05, "better condition than comparables");
        ledger.scale("demand", -0.07, "slow market");
        ledger.add("sustainability", 4.5, "organic cotton");
        let (price, factors) = ledger.finish();
        assert_eq!(factors.len(), 3);
        let expected = (price - 180.0) / 180.0 * 100.0;
        assert!((total_pct(&factors) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cap_limits_total_adjustment() {
        let mut ledger = PriceLedger::new(100.0).with_cap(0.30);
        ledger.scale("brand", 0.25, "");
        ledger.scale("demand", 0.25, "");
        let (price, factors) = ledger.finish();
        assert_eq!(price, 130.0);
        assert!((total_pct(&factors) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_floor_is_not_capped() {
        let mut ledger = PriceLedger::new(3.0).with_cap(0.30);
        ledger.floor("price_floor", 5.0, "minimum listing price");
        let (price, factors) = ledger.finish();
        assert_eq!(price, 5.0);
        assert_eq!(factors.len(), 1);
        assert!((factors[0].impact_pct - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_impact_is_not_recorded() {
        let mut ledger = PriceLedger::new(50.0);
        ledger.scale("noop", 0.0, "");
        ledger.floor("floor", 5.0, "");
        assert!(ledger.clone().finish().1.is_empty());
        ledger.scale("condition", -0.95, "");
        ledger.floor("floor", 5.0, "minimum price");
        let (price, factors) = ledger.finish();
        assert_eq!(price, 5.0);
        assert_eq!(factors.len(), 2);
        assert!((total_pct(&factors) + 90.0).abs() < 1e-9);
    }
}

//! Historical sales used as pricing evidence

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use drapex_core::{normalize_term, Condition, Error, Garment, GarmentId, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A completed marketplace transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleRecord {
    #[serde(default)]
    pub garment_id: Option<GarmentId>,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    pub condition: Condition,
    #[serde(default)]
    pub size: Option<String>,
    pub price: f64,
    pub sold_at: DateTime<Utc>,
    /// When the item was listed, if known; gives time-to-sell
    #[serde(default)]
    pub listed_at: Option<DateTime<Utc>>,
}

impl SaleRecord {
    pub fn new(category: impl Into<String>, condition: Condition, price: f64, sold_at: DateTime<Utc>) -> Self {
        Self {
            garment_id: None,
            category: category.into(),
            subcategory: None,
            brand: None,
            condition,
            size: None,
            price,
            sold_at,
            listed_at: None,
        }
    }

    /// Record a sale of a catalog garment at its listing attributes
    pub fn of_garment(garment: &Garment, price: f64, sold_at: DateTime<Utc>) -> Self {
        Self {
            garment_id: Some(garment.id.clone()),
            category: garment.category.clone(),
            subcategory: garment.subcategory.clone(),
            brand: garment.brand.clone(),
            condition: garment.condition,
            size: garment.size.clone(),
            price,
            sold_at,
            listed_at: Some(garment.created_at),
        }
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    #[must_use]
    pub fn with_listed_at(mut self, listed_at: DateTime<Utc>) -> Self {
        self.listed_at = Some(listed_at);
        self
    }

    /// Days between listing and sale
    pub fn days_listed(&self) -> Option<f64> {
        self.listed_at
            .filter(|listed| *listed <= self.sold_at)
            .map(|listed| (self.sold_at - listed).num_seconds() as f64 / 86_400.0)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "sale price must be a positive number, got {}",
                self.price
            )));
        }
        if normalize_term(&self.category).is_empty() {
            return Err(Error::InvalidInput("sale category must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Append-only store of sales, partitioned by normalized category
#[derive(Debug, Default)]
pub struct SalesLedger {
    by_category: RwLock<AHashMap<String, Vec<SaleRecord>>>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, sale: SaleRecord) -> Result<()> {
        sale.validate()?;
        let key = normalize_term(&sale.category);
        self.by_category.write().entry(key).or_default().push(sale);
        Ok(())
    }

    pub fn record_batch(&self, sales: Vec<SaleRecord>) -> Result<usize> {
        for sale in &sales {
            sale.validate()?;
        }
        let count = sales.len();
        let mut by_category = self.by_category.write();
        for sale in sales {
            by_category
                .entry(normalize_term(&sale.category))
                .or_default()
                .push(sale);
        }
        Ok(count)
    }

    /// Snapshot of the sales in a category, in recording order
    pub fn for_category(&self, category: &str) -> Vec<SaleRecord> {
        self.by_category
            .read()
            .get(&normalize_term(category))
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_category.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

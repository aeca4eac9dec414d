//! Engine facade
//!
//! One shared object per process: the garment corpus, the sales ledger and
//! the scoring components configured from [`EngineConfig`]. Every query
//! takes plain data in and returns plain data out.

use crate::config::EngineConfig;
use chrono::{DateTime, Utc};
use drapex_core::{
    Error, Garment, GarmentFilter, GarmentId, GarmentIndex, ListingStatus, Result, Vector,
};
use drapex_pricing::{PricingEngine, PricingGuidance, SaleRecord, SalesLedger};
use drapex_similarity::{
    gap_category, CompatibilityScore, CompatibilityScorer, GarmentMatch, GarmentPairing,
    MatchResponse, OutfitCombination, OutfitCompatibility, OutfitGenerator, OutfitRequest,
    ProfileBuilder, QueryAttributes, SimilarityRanker, StyleProfile, UserInteraction,
};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Requested change to a garment's listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingUpdate {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: Option<ListingStatus>,
}

pub struct Engine {
    config: EngineConfig,
    index: GarmentIndex,
    sales: SalesLedger,
    ranker: SimilarityRanker,
    scorer: CompatibilityScorer,
    profiles: ProfileBuilder,
    outfits: OutfitGenerator,
    pricing: PricingEngine,
}

impl Engine {
    /// Build an engine; fails on an invalid configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let scorer = CompatibilityScorer::new(config.scoring.compatibility)?;
        let pairing = GarmentPairing::new(config.scoring.outfit)?;
        let pricing = PricingEngine::new(config.pricing.clone())?;
        Ok(Self {
            index: GarmentIndex::new(config.index_config()),
            sales: SalesLedger::new(),
            ranker: SimilarityRanker::new(),
            scorer,
            profiles: ProfileBuilder::new(config.profile.clone()),
            outfits: OutfitGenerator::new(pairing, config.outfits.clone()),
            pricing,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn index(&self) -> &GarmentIndex {
        &self.index
    }

    pub fn garment_count(&self) -> usize {
        self.index.count()
    }

    pub fn sales_count(&self) -> usize {
        self.sales.len()
    }

    // ---- corpus mutation ----

    /// Add or replace a garment; returns true when it replaced one
    pub fn add_garment(&self, garment: Garment) -> Result<bool> {
        let id = garment.id.clone();
        let replaced = self.index.upsert(garment)?;
        debug!(garment = %id, replaced, "garment stored");
        Ok(replaced)
    }

    pub fn add_garments(&self, garments: Vec<Garment>) -> Result<usize> {
        let stored = self.index.upsert_batch(garments)?;
        debug!(count = stored, "garments stored");
        Ok(stored)
    }

    pub fn get_garment(&self, id: &GarmentId) -> Result<Arc<Garment>> {
        self.index.require(id)
    }

    pub fn remove_garment(&self, id: &GarmentId) -> Result<()> {
        if !self.index.remove(id) {
            return Err(Error::GarmentNotFound(id.to_string()));
        }
        debug!(garment = %id, "garment removed");
        Ok(())
    }

    /// Price and listing status are the only mutable garment fields
    pub fn update_listing(&self, id: &GarmentId, update: ListingUpdate) -> Result<Arc<Garment>> {
        let garment = self.index.update_listing(id, |fields| {
            if let Some(price) = update.price {
                fields.price = Some(price);
            }
            if let Some(status) = update.status {
                fields.status = status;
            }
        })?;
        debug!(garment = %id, status = garment.status.as_str(), "listing updated");
        Ok(garment)
    }

    pub fn record_sale(&self, sale: SaleRecord) -> Result<()> {
        let category = sale.category.clone();
        self.sales.record(sale)?;
        debug!(category = %category, "sale recorded");
        Ok(())
    }

    // ---- discovery ----

    /// Garments closest to a query embedding, with match reasons when the
    /// query's attributes are known
    pub fn visual_search(
        &self,
        embedding: &Vector,
        top_k: usize,
        filter: Option<&dyn GarmentFilter>,
        query: Option<&QueryAttributes>,
    ) -> Result<MatchResponse> {
        let (hits, candidates) = self.index.search_counted(embedding, top_k, filter)?;
        Ok(MatchResponse::new(self.ranker.rank(query, hits), candidates))
    }

    /// Garments that look like a stored one, excluding itself
    pub fn visual_search_like(
        &self,
        id: &GarmentId,
        top_k: usize,
        filter: Option<&dyn GarmentFilter>,
    ) -> Result<MatchResponse> {
        let garment = self.index.require(id)?;
        let embedding = garment
            .embedding
            .as_ref()
            .ok_or_else(|| Error::InvalidInput(format!("garment {} has no embedding", id)))?;
        let others = |candidate: &Garment| {
            candidate.id != *id && filter.map(|f| f.matches(candidate)).unwrap_or(true)
        };
        let query = QueryAttributes::from(garment.as_ref());
        self.visual_search(embedding, top_k, Some(&others), Some(&query))
    }

    pub fn compute_compatibility(&self, profile: &StyleProfile, id: &GarmentId) -> Result<CompatibilityScore> {
        let garment = self.index.require(id)?;
        Ok(self.scorer.score(profile, &garment))
    }

    /// Available garments ranked by compatibility with a profile
    pub fn recommend(
        &self,
        profile: &StyleProfile,
        top_k: usize,
        filter: Option<&dyn GarmentFilter>,
    ) -> Result<MatchResponse> {
        if top_k == 0 {
            return Err(Error::InvalidTopK(top_k));
        }
        let candidates: Vec<Arc<Garment>> = self
            .index
            .iter()
            .into_iter()
            .filter(|g| g.is_available())
            .filter(|g| filter.map(|f| f.matches(g)).unwrap_or(true))
            .collect();
        if candidates.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut scored: Vec<(Arc<Garment>, CompatibilityScore)> = candidates
            .iter()
            .map(|g| (g.clone(), self.scorer.score(profile, g)))
            .collect();
        // stable: equal scores keep most-recent-first corpus order
        scored.sort_by(|a, b| OrderedFloat(b.1.overall).cmp(&OrderedFloat(a.1.overall)));
        scored.truncate(top_k);

        let matches = scored
            .into_iter()
            .map(|(garment, score)| GarmentMatch {
                garment_id: garment.id.clone(),
                similarity: None,
                compatibility: Some(score),
                reasons: self.scorer.explain(profile, &garment),
                gap_category: gap_category(profile, &garment),
            })
            .collect();
        Ok(MatchResponse::new(matches, candidates.len()))
    }

    pub fn analyze_style_profile(&self, wardrobe: &[Garment], interactions: &[UserInteraction]) -> StyleProfile {
        self.profiles.build(wardrobe, interactions)
    }

    // ---- outfits ----

    pub fn check_garment_compatibility(&self, a: &GarmentId, b: &GarmentId) -> Result<OutfitCompatibility> {
        if a == b {
            return Err(Error::InvalidInput(format!(
                "cannot pair garment {} with itself",
                a
            )));
        }
        let first = self.index.require(a)?;
        let second = self.index.require(b)?;
        Ok(self.outfits.pairing().pair(&first, &second))
    }

    /// Compatibility of a full outfit: the average of all pairs
    pub fn check_outfit(&self, ids: &[GarmentId]) -> Result<OutfitCompatibility> {
        let garments = self.resolve(ids)?;
        let refs: Vec<&Garment> = garments.iter().map(|g| g.as_ref()).collect();
        self.outfits.pairing().group(&refs)
    }

    pub fn generate_outfit_combinations(&self, wardrobe: &[Garment], request: &OutfitRequest) -> Vec<OutfitCombination> {
        self.outfits.generate(wardrobe, request)
    }

    /// Look up stored garments, failing on the first unknown id
    pub fn resolve(&self, ids: &[GarmentId]) -> Result<Vec<Arc<Garment>>> {
        ids.iter().map(|id| self.index.require(id)).collect()
    }

    // ---- pricing ----

    /// Guidance from recorded sales in the garment's category
    pub fn get_pricing_guidance(&self, garment: &Garment, as_of: DateTime<Utc>) -> PricingGuidance {
        let sales = self.sales.for_category(&garment.category);
        let guidance = self.pricing.guidance(garment, &sales, as_of);
        debug!(
            garment = %garment.id,
            comparables = guidance.comparables.len(),
            confidence = guidance.confidence,
            "pricing guidance"
        );
        guidance
    }

    pub fn pricing_guidance_for(&self, id: &GarmentId, as_of: DateTime<Utc>) -> Result<PricingGuidance> {
        let garment = self.index.require(id)?;
        Ok(self.get_pricing_guidance(&garment, as_of))
    }
}

use crate::garment::{Garment, GarmentId, ListingStatus};
use crate::vector::{cosine_with_norms, Vector};
use crate::{Error, GarmentFilter, Result};
use ahash::{AHashMap, RandomState};
use ordered_float::OrderedFloat;
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Configuration for a garment index
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub name: String,
    pub embedding_dim: usize,
    /// Number of per-garment mutation locks
    pub lock_stripes: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: "garments".to_string(),
            embedding_dim: 512,
            lock_stripes: 64,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    garment: Arc<Garment>,
    /// Insertion sequence; larger is more recent
    seq: u64,
}

/// One nearest-neighbor hit
#[derive(Debug, Clone)]
pub struct ScoredGarment {
    pub garment: Arc<Garment>,
    pub similarity: f32,
    pub seq: u64,
}

/// Garment records plus their embeddings, queried by cosine similarity.
///
/// Mutations of one garment id are serialized through a striped mutex and
/// touch the shared map only for the final swap. Queries copy the eligible
/// entries out under a read lock and score them after releasing it, so a
/// long query never holds up an insert.
pub struct GarmentIndex {
    config: IndexConfig,
    entries: RwLock<AHashMap<GarmentId, Entry>>,
    sequence: AtomicU64,
    stripes: Box<[Mutex<()>]>,
    stripe_hasher: RandomState,
}

impl GarmentIndex {
    pub fn new(config: IndexConfig) -> Self {
        let stripes = (0..config.lock_stripes.max(1))
            .map(|_| Mutex::new(()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            config,
            entries: RwLock::new(AHashMap::new()),
            sequence: AtomicU64::new(0),
            stripes,
            stripe_hasher: RandomState::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Number of garment records
    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Number of garments that carry an embedding
    pub fn indexed_count(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|e| e.garment.embedding.is_some())
            .count()
    }

    fn stripe(&self, id: &GarmentId) -> &Mutex<()> {
        let slot = self.stripe_hasher.hash_one(id) as usize % self.stripes.len();
        &self.stripes[slot]
    }

    /// Insert or replace a garment. Returns true when it replaced an existing record.
    ///
    /// An embedding, when present, must have the index dimension and a non-zero norm. A price must be finite and non-negative.
    pub fn upsert(&self, garment: Garment) -> Result<bool> {
        self.validate(&garment)?;
        self.insert_valid(garment)
    }

    fn validate(&self, garment: &Garment) -> Result<()> {
        if let Some(embedding) = &garment.embedding {
            embedding.validate(self.config.embedding_dim)?;
        }
        if let Some(price) = garment.price {
            check_price(price)?;
        }
        Ok(())
    }

    fn insert_valid(&self, garment: Garment) -> Result<bool> {
        let _guard = self.stripe(&garment.id).lock();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let id = garment.id.clone();
        let entry = Entry {
            garment: Arc::new(garment),
            seq,
        };
        Ok(self.entries.write().insert(id, entry).is_some())
    }

    /// Insert several garments. Every garment is checked before any is
    /// stored, so an invalid one leaves the index unchanged.
    pub fn upsert_batch(&self, garments: Vec<Garment>) -> Result<usize> {
        for garment in &garments {
            self.validate(garment)?;
        }
        let inserted = garments.len();
        for garment in garments {
            self.insert_valid(garment)?;
        }
        Ok(inserted)
    }

    pub fn get(&self, id: &GarmentId) -> Option<Arc<Garment>> {
        self.entries.read().get(id).map(|e| e.garment.clone())
    }

    pub fn require(&self, id: &GarmentId) -> Result<Arc<Garment>> {
        self.get(id)
            .ok_or_else(|| Error::GarmentNotFound(id.to_string()))
    }

    pub fn remove(&self, id: &GarmentId) -> bool {
        let _guard = self.stripe(id).lock();
        self.entries.write().remove(id).is_some()
    }

    /// Change the mutable listing fields of a garment.
    ///
    /// Read-modify-write under the garment's stripe lock, so concurrent updates
    /// of the same garment are never lost. Recency order is unchanged.
    pub fn update_listing<F>(&self, id: &GarmentId, update: F) -> Result<Arc<Garment>>
    where
        F: FnOnce(&mut ListingFields),
    {
        let _guard = self.stripe(id).lock();
        let current = self
            .entries
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::GarmentNotFound(id.to_string()))?;

        let mut fields = ListingFields {
            price: current.garment.price,
            status: current.garment.status,
        };
        update(&mut fields);
        if let Some(price) = fields.price {
            check_price(price)?;
        }

        let mut garment = (*current.garment).clone();
        garment.price = fields.price;
        garment.status = fields.status;
        let garment = Arc::new(garment);
        self.entries.write().insert(
            id.clone(),
            Entry {
                garment: garment.clone(),
                seq: current.seq,
            },
        );
        Ok(garment)
    }

    /// Nearest neighbors of `query` by cosine similarity.
    ///
    /// Results are sorted by descending similarity; equal similarities put the
    /// most recently added garment first. Fewer eligible garments than `top_k`
    /// is not an error; zero eligible garments is `EmptyCorpus`.
    pub fn search(
        &self,
        query: &Vector,
        top_k: usize,
        filter: Option<&dyn GarmentFilter>,
    ) -> Result<Vec<ScoredGarment>> {
        self.search_counted(query, top_k, filter).map(|(hits, _)| hits)
    }

    /// Like [`search`](Self::search), also returning how many eligible
    /// garments were scored
    pub fn search_counted(
        &self,
        query: &Vector,
        top_k: usize,
        filter: Option<&dyn GarmentFilter>,
    ) -> Result<(Vec<ScoredGarment>, usize)> {
        if top_k == 0 {
            return Err(Error::InvalidTopK(top_k));
        }
        query.validate(self.config.embedding_dim)?;
        let query_norm = query.norm();

        let snapshot: Vec<Entry> = self
            .entries
            .read()
            .values()
            .filter(|e| e.garment.embedding.is_some())
            .cloned()
            .collect();

        let mut results: Vec<ScoredGarment> = snapshot
            .into_par_iter()
            .filter(|e| filter.map(|f| f.matches(&e.garment)).unwrap_or(true))
            .filter_map(|e| {
                let embedding = e.garment.embedding.as_ref()?;
                let similarity = cosine_with_norms(query, query_norm, embedding, embedding.norm());
                Some(ScoredGarment {
                    garment: e.garment,
                    similarity,
                    seq: e.seq,
                })
            })
            .collect();

        if results.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        results.sort_by(|a, b| {
            OrderedFloat(b.similarity)
                .cmp(&OrderedFloat(a.similarity))
                .then_with(|| b.seq.cmp(&a.seq))
        });
        let candidates = results.len();
        results.truncate(top_k);
        Ok((results, candidates))
    }

    /// All garment records, most recent first
    pub fn iter(&self) -> Vec<Arc<Garment>> {
        let mut entries: Vec<Entry> = self.entries.read().values().cloned().collect();
        entries.sort_by(|a, b| b.seq.cmp(&a.seq));
        entries.into_iter().map(|e| e.garment).collect()
    }
}

fn check_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidInput(format!("invalid price {}", price)));
    }
    Ok(())
}

/// Fields of a garment that may change after insertion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListingFields {
    pub price: Option<f64>,
    pub status: ListingStatus,
}

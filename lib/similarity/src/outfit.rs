//! Outfit combination generator
//!
//! Composes complete outfits from a wardrobe: a top with a bottom, or a
//! one-piece, optionally layered with outerwear, footwear and an accessory.
//! Every combination scores as the average of all its pairwise scores.

use crate::pairing::{GarmentPairing, OutfitCompatibility, Slot};
use drapex_core::{Garment, GarmentId};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutfitConfig {
    /// Garments considered per slot, best pairing first
    pub candidates_per_slot: usize,
    pub max_results: usize,
    /// Upper bound on garments in one outfit
    pub max_garments: usize,
}

impl Default for OutfitConfig {
    fn default() -> Self {
        Self {
            candidates_per_slot: 6,
            max_results: 10,
            max_garments: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutfitRequest {
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl OutfitRequest {
    pub fn for_occasion(occasion: impl Into<String>) -> Self {
        Self {
            occasion: Some(occasion.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutfitCombination {
    /// Sorted, unique
    pub garment_ids: Vec<GarmentId>,
    pub compatibility: OutfitCompatibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
}

impl OutfitCombination {
    pub fn score(&self) -> f32 {
        self.compatibility.overall
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutfitGenerator {
    pairing: GarmentPairing,
    config: OutfitConfig,
}

impl OutfitGenerator {
    pub fn new(pairing: GarmentPairing, config: OutfitConfig) -> Self {
        Self { pairing, config }
    }

    pub fn pairing(&self) -> &GarmentPairing {
        &self.pairing
    }

    /// Ranked outfits, best first.
    ///
    /// Returns an empty list when fewer than two garments are eligible. A slot
    /// holding more than `candidates_per_slot` garments keeps only those that
    /// pair best, on average, with the garments of every other slot.
    pub fn generate(&self, wardrobe: &[Garment], request: &OutfitRequest) -> Vec<OutfitCombination> {
        let eligible: Vec<&Garment> = wardrobe
            .iter()
            .filter(|g| request.occasion.as_deref().map_or(true, |o| g.suits_occasion(o)))
            .filter(|g| request.season.as_deref().map_or(true, |s| g.suits_season(s)))
            .collect();
        if eligible.len() < 2 {
            return Vec::new();
        }

        let mut by_slot: BTreeMap<Slot, Vec<&Garment>> = BTreeMap::new();
        for garment in eligible {
            let slot = Slot::of(garment);
            if slot == Slot::Other {
                continue;
            }
            by_slot.entry(slot).or_default().push(garment);
        }
        self.shortlist(&mut by_slot);

        let pool: Vec<(Slot, &Garment)> = by_slot
            .iter()
            .flat_map(|(slot, garments)| garments.iter().map(move |g| (*slot, *g)))
            .collect();
        let pairs = PairCache::build(&self.pairing, &pool);
        let slots: Vec<Vec<usize>> = by_slot
            .keys()
            .map(|slot| {
                pool.iter()
                    .enumerate()
                    .filter(|(_, (s, _))| s == slot)
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        let mut selections = Vec::new();
        let mut current = Vec::new();
        let max_garments = self.config.max_garments.max(2);
        enumerate(&slots, 0, max_garments, &mut current, &mut |members: &[usize]| {
            if is_complete(members.iter().map(|&i| pool[i].0)) {
                selections.push(members.to_vec());
            }
        });

        let mut seen: BTreeSet<Vec<GarmentId>> = BTreeSet::new();
        let mut outfits = Vec::new();
        for members in selections {
            let ids: BTreeSet<GarmentId> = members.iter().map(|&i| pool[i].1.id.clone()).collect();
            if ids.len() < 2 {
                continue;
            }
            let ids: Vec<GarmentId> = ids.into_iter().collect();
            if !seen.insert(ids.clone()) {
                continue;
            }
            let garments: Vec<&Garment> = members.iter().map(|&i| pool[i].1).collect();
            let pair_scores: Vec<&OutfitCompatibility> = members
                .iter()
                .enumerate()
                .flat_map(|(k, &i)| members[k + 1..].iter().map(move |&j| (i, j)))
                .map(|(i, j)| pairs.get(i, j))
                .collect();
            outfits.push(OutfitCombination {
                garment_ids: ids,
                compatibility: self.pairing.combine(&pair_scores, &garments),
                occasion: request.occasion.clone(),
            });
        }

        outfits.sort_by(|a, b| {
            OrderedFloat(b.score())
                .cmp(&OrderedFloat(a.score()))
                .then_with(|| a.garment_ids.cmp(&b.garment_ids))
        });
        outfits.truncate(request.max_results.unwrap_or(self.config.max_results));
        outfits
    }
}

impl OutfitGenerator {
    fn shortlist(&self, by_slot: &mut BTreeMap<Slot, Vec<&Garment>>) {
        let limit = self.config.candidates_per_slot;
        let crowded: Vec<Slot> = by_slot
            .iter()
            .filter(|(_, garments)| garments.len() > limit)
            .map(|(slot, _)| *slot)
            .collect();
        for slot in crowded {
            let partners: Vec<&Garment> = by_slot
                .iter()
                .filter(|(other, _)| **other != slot)
                .flat_map(|(_, garments)| garments.iter().copied())
                .collect();
            let Some(garments) = by_slot.get_mut(&slot) else {
                continue;
            };
            let mut ranked: Vec<(f32, &Garment)> = garments
                .iter()
                .map(|g| {
                    let total: f32 = partners.iter().map(|p| self.pairing.pair(g, p).overall).sum();
                    let mean = if partners.is_empty() { 0.0 } else { total / partners.len() as f32 };
                    (mean, *g)
                })
                .collect();
            // stable: equal affinity keeps wardrobe order
            ranked.sort_by(|a, b| OrderedFloat(b.0).cmp(&OrderedFloat(a.0)));
            ranked.truncate(limit);
            *garments = ranked.into_iter().map(|(_, g)| g).collect();
        }
    }
}

/// Top + bottom or a one-piece, never both
fn is_complete(slots: impl Iterator<Item = Slot>) -> bool {
    let slots: Vec<Slot> = slots.collect();
    let has = |s: Slot| slots.contains(&s);
    if has(Slot::OnePiece) {
        !has(Slot::Top) && !has(Slot::Bottom)
    } else {
        has(Slot::Top) && has(Slot::Bottom)
    }
}

/// Visit every selection of at most one garment per slot
fn enumerate(
    slots: &[Vec<usize>],
    from: usize,
    max: usize,
    current: &mut Vec<usize>,
    visit: &mut dyn FnMut(&[usize]),
) {
    if current.len() >= 2 {
        visit(current);
    }
    if current.len() == max {
        return;
    }
    for (offset, members) in slots[from..].iter().enumerate() {
        for &member in members {
            current.push(member);
            enumerate(slots, from + offset + 1, max, current, visit);
            current.pop();
        }
    }
}

/// Pair scores over a pool, computed once per unordered pair
struct PairCache {
    n: usize,
    scores: Vec<OutfitCompatibility>,
}

impl PairCache {
    fn build(pairing: &GarmentPairing, pool: &[(Slot, &Garment)]) -> Self {
        let n = pool.len();
        let mut scores = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                scores.push(pairing.pair(pool[i].1, pool[j].1));
            }
        }
        Self { n, scores }
    }

    fn get(&self, i: usize, j: usize) -> &OutfitCompatibility {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        // rows before i hold (n-1) + (n-2) + ... + (n-i) entries
        let row_start = i * (2 * self.n - i - 1) / 2;
        &self.scores[row_start + (j - i - 1)]
    }
}

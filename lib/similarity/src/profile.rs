//! Style profile builder
//!
//! Aggregates a wardrobe and an interaction history into a [`StyleProfile`].
//! The profile is a derived cache: it can be rebuilt from source data at any
//! time and is never edited directly.

use crate::distance::half_life_decay;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use drapex_core::{normalize_term, BrandTier, Garment, SizeRange, SizeRank, SizeSystem};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    View,
    Like,
    Save,
    Purchase,
}

/// A user interacting with a garment at a point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInteraction {
    pub kind: InteractionKind,
    pub occurred_at: DateTime<Utc>,
    pub garment: Garment,
}

/// Derived summary of a user's aesthetic preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleProfile {
    pub dominant_aesthetic: Option<String>,
    /// Ranked, strongest first
    pub secondary_aesthetics: Vec<String>,
    /// Term -> share of the weighted total
    pub preferred_colors: BTreeMap<String, f32>,
    pub preferred_brands: BTreeMap<String, f32>,
    pub preferred_categories: BTreeMap<String, f32>,
    /// 0-100: how consistently one size is worn
    pub size_consistency: f32,
    pub typical_size: Option<SizeRange>,
    pub sustainability_affinity: f32,
    pub vintage_affinity: f32,
    pub luxury_affinity: f32,
    pub key_terms: Vec<String>,
}

impl StyleProfile {
    /// Aesthetics strongest first: dominant, then secondary
    pub fn aesthetics(&self) -> impl Iterator<Item = &String> {
        self.dominant_aesthetic.iter().chain(self.secondary_aesthetics.iter())
    }

    pub fn prefers_brand(&self, brand: &str) -> bool {
        self.preferred_brands.contains_key(&normalize_term(brand))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    /// Days for an interaction's weight to halve
    pub half_life_days: f64,
    pub wardrobe_weight: f64,
    pub view_weight: f64,
    pub like_weight: f64,
    pub save_weight: f64,
    pub purchase_weight: f64,
    pub max_secondary: usize,
    pub max_preferences: usize,
    pub max_key_terms: usize,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            half_life_days: 30.0,
            wardrobe_weight: 1.0,
            view_weight: 0.25,
            like_weight: 0.5,
            save_weight: 0.75,
            purchase_weight: 1.5,
            max_secondary: 3,
            max_preferences: 5,
            max_key_terms: 8,
        }
    }
}

impl ProfileConfig {
    fn kind_weight(&self, kind: InteractionKind) -> f64 {
        match kind {
            InteractionKind::View => self.view_weight,
            InteractionKind::Like => self.like_weight,
            InteractionKind::Save => self.save_weight,
            InteractionKind::Purchase => self.purchase_weight,
        }
    }
}

/// Weighted tally with a raw count for tie-breaking
#[derive(Default)]
struct Tally {
    terms: AHashMap<String, (f64, u32)>,
    total: f64,
}

impl Tally {
    fn add(&mut self, term: &str, weight: f64) {
        let term = normalize_term(term);
        if term.is_empty() {
            return;
        }
        let slot = self.terms.entry(term).or_insert((0.0, 0));
        slot.0 += weight;
        slot.1 += 1;
        self.total += weight;
    }

    /// Heaviest first; ties by raw frequency, then alphabetically
    fn ranked(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(&String, &(f64, u32))> = self.terms.iter().collect();
        entries.sort_by(|(a_term, (a_w, a_n)), (b_term, (b_w, b_n))| {
            OrderedFloat(*b_w)
                .cmp(&OrderedFloat(*a_w))
                .then_with(|| b_n.cmp(a_n))
                .then_with(|| a_term.cmp(b_term))
        });
        entries
            .into_iter()
            .map(|(term, (weight, _))| (term.clone(), *weight))
            .collect()
    }

    fn shares(&self, limit: usize) -> BTreeMap<String, f32> {
        if self.total <= 0.0 {
            return BTreeMap::new();
        }
        self.ranked()
            .into_iter()
            .take(limit)
            .map(|(term, weight)| (term, (weight / self.total) as f32))
            .collect()
    }
}

/// Builds style profiles from wardrobe and interaction data
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    config: ProfileConfig,
}

impl ProfileBuilder {
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Build a profile. Empty inputs give the default profile.
    ///
    /// Interaction weights decay with age measured from the most recent
    /// interaction, so the result does not depend on the wall clock.
    pub fn build(&self, wardrobe: &[Garment], interactions: &[UserInteraction]) -> StyleProfile {
        let observations = self.observations(wardrobe, interactions);
        let total_weight: f64 = observations.iter().map(|(_, w)| w).sum();
        if observations.is_empty() || total_weight <= 0.0 {
            return StyleProfile::default();
        }

        let mut aesthetics = Tally::default();
        let mut colors = Tally::default();
        let mut brands = Tally::default();
        let mut categories = Tally::default();
        let mut terms = Tally::default();

        for (garment, weight) in &observations {
            let weight = *weight;
            for tag in &garment.style_tags {
                aesthetics.add(tag, weight);
                terms.add(tag, weight);
            }
            for color in &garment.colors {
                colors.add(color, weight);
            }
            if let Some(brand) = &garment.brand {
                brands.add(brand, weight);
            }
            categories.add(&garment.category, weight);
            for term in garment
                .patterns
                .iter()
                .chain(garment.era.iter())
                .chain(garment.mood.iter())
            {
                terms.add(term, weight);
            }
        }

        let ranked_aesthetics = aesthetics.ranked();
        let dominant_aesthetic = ranked_aesthetics.first().map(|(t, _)| t.clone());
        let secondary_aesthetics = ranked_aesthetics
            .iter()
            .skip(1)
            .take(self.config.max_secondary)
            .map(|(t, _)| t.clone())
            .collect();

        let (size_consistency, typical_size) = size_summary(&observations);

        let affinity = |f: &dyn Fn(&Garment) -> f64| -> f32 {
            let sum: f64 = observations.iter().map(|(g, w)| f(g) * w).sum();
            ((sum / total_weight) as f32).clamp(0.0, 100.0)
        };

        StyleProfile {
            dominant_aesthetic,
            secondary_aesthetics,
            preferred_colors: colors.shares(self.config.max_preferences),
            preferred_brands: brands.shares(self.config.max_preferences),
            preferred_categories: categories.shares(self.config.max_preferences),
            size_consistency,
            typical_size,
            sustainability_affinity: affinity(&|g| g.sustainability_score() as f64),
            vintage_affinity: affinity(&|g| if g.is_vintage() { 100.0 } else { 0.0 }),
            luxury_affinity: affinity(&|g| {
                let luxury = g
                    .brand
                    .as_deref()
                    .map(|b| BrandTier::of(b) == BrandTier::Luxury)
                    .unwrap_or(false);
                if luxury {
                    100.0
                } else {
                    0.0
                }
            }),
            key_terms: terms
                .ranked()
                .into_iter()
                .take(self.config.max_key_terms)
                .map(|(t, _)| t)
                .collect(),
        }
    }

    fn observations<'a>(
        &self,
        wardrobe: &'a [Garment],
        interactions: &'a [UserInteraction],
    ) -> Vec<(&'a Garment, f64)> {
        let reference = interactions.iter().map(|i| i.occurred_at).max();
        let mut observations: Vec<(&Garment, f64)> = wardrobe
            .iter()
            .map(|g| (g, self.config.wardrobe_weight))
            .collect();
        for interaction in interactions {
            let age_days = reference
                .map(|r| (r - interaction.occurred_at).num_seconds() as f64 / 86_400.0)
                .unwrap_or(0.0);
            let weight = self.config.kind_weight(interaction.kind)
                * half_life_decay(age_days, self.config.half_life_days);
            observations.push((&interaction.garment, weight));
        }
        observations.retain(|(_, w)| *w > 0.0);
        observations
    }
}

/// Size consistency (0-100) and the typical size range around the modal size
fn size_summary(observations: &[(&Garment, f64)]) -> (f32, Option<SizeRange>) {
    let sized: Vec<(SizeRank, f64)> = observations
        .iter()
        .filter_map(|(g, w)| g.size.as_deref().and_then(SizeRank::parse).map(|s| (s, *w)))
        .collect();
    if sized.is_empty() {
        return (0.0, None);
    }

    let system_weight = |system: SizeSystem| -> f64 {
        sized.iter().filter(|(s, _)| s.system == system).map(|(_, w)| w).sum()
    };
    let system = if system_weight(SizeSystem::Numeric) > system_weight(SizeSystem::Alpha) {
        SizeSystem::Numeric
    } else {
        SizeSystem::Alpha
    };

    let mut by_rank: Vec<(f32, f64)> = Vec::new();
    for (size, weight) in sized.iter().filter(|(s, _)| s.system == system) {
        match by_rank.iter_mut().find(|(rank, _)| *rank == size.rank) {
            Some(slot) => slot.1 += weight,
            None => by_rank.push((size.rank, *weight)),
        }
    }
    // heaviest rank, smaller rank on ties
    by_rank.sort_by(|a, b| {
        OrderedFloat(b.1)
            .cmp(&OrderedFloat(a.1))
            .then_with(|| OrderedFloat(a.0).cmp(&OrderedFloat(b.0)))
    });
    let Some(&(modal_rank, modal_weight)) = by_rank.first() else {
        return (0.0, None);
    };

    let total: f64 = sized.iter().map(|(_, w)| w).sum();
    let consistency = ((modal_weight / total) * 100.0) as f32;

    let modal = SizeRank { system, rank: modal_rank };
    let near: Vec<f32> = by_rank
        .iter()
        .map(|(rank, _)| *rank)
        .filter(|rank| {
            SizeRank { system, rank: *rank }
                .steps_to(&modal)
                .map(|steps| steps <= 1.0)
                .unwrap_or(false)
        })
        .collect();
    let min = near.iter().copied().fold(modal_rank, f32::min);
    let max = near.iter().copied().fold(modal_rank, f32::max);

    (consistency.clamp(0.0, 100.0), Some(SizeRange { system, min, max }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use drapex_core::Condition;

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    fn tagged(id: &str, tags: &[&str]) -> Garment {
        Garment::new(id, "top", Condition::Good).with_style_tags(tags.iter().copied())
    }

    fn interaction(garment: Garment, kind: InteractionKind, day: i64) -> UserInteraction {
        UserInteraction {
            kind,
            occurred_at: at(day),
            garment,
        }
    }

    #[test]
    fn test_empty_inputs_give_default_profile() {
        let profile = ProfileBuilder::default().build(&[], &[]);
        assert_eq!(profile.dominant_aesthetic, None);
        assert_eq!(profile.sustainability_affinity, 0.0);
        assert_eq!(profile.vintage_affinity, 0.0);
        assert_eq!(profile.luxury_affinity, 0.0);
        assert_eq!(profile.size_consistency, 0.0);
        assert_eq!(profile, StyleProfile::default());
    }

    #[test]
    fn test_recent_interactions_outweigh_old_ones() {
        let interactions = vec![
            interaction(tagged("a", &["grunge"]), InteractionKind::Save, 0),
            interaction(tagged("b", &["grunge"]), InteractionKind::Save, 1),
            interaction(tagged("c", &["minimalist"]), InteractionKind::Save, 120),
        ];
        let profile = ProfileBuilder::default().build(&[], &interactions);
        // two saves 4 half-lives old weigh 2 * 0.0625 * 0.75 < one fresh save
        assert_eq!(profile.dominant_aesthetic.as_deref(), Some("minimalist"));
        assert_eq!(profile.secondary_aesthetics, vec!["grunge"]);
    }

    #[test]
    fn test_ties_break_by_frequency_then_alphabetically() {
        let wardrobe = vec![tagged("a", &["Preppy", "boho"])];
        let profile = ProfileBuilder::default().build(&wardrobe, &[]);
        assert_eq!(profile.dominant_aesthetic.as_deref(), Some("boho"));

        // equal weight (1.0 each) but "western" seen twice
        let wardrobe = vec![tagged("a", &["artsy"])];
        let interactions = vec![
            interaction(tagged("b", &["western"]), InteractionKind::Like, 5),
            interaction(tagged("c", &["western"]), InteractionKind::Like, 5),
        ];
        let profile = ProfileBuilder::default().build(&wardrobe, &interactions);
        assert_eq!(profile.dominant_aesthetic.as_deref(), Some("western"));
        assert_eq!(profile.secondary_aesthetics, vec!["artsy"]);
    }

    #[test]
    fn test_preferences_and_affinities() {
        let wardrobe = vec![
            Garment::new("a", "Dress", Condition::Excellent)
                .with_brand("Gucci")
                .with_colors(["Black"])
                .with_source("vintage"),
            Garment::new("b", "dress", Condition::Good)
                .with_brand("Zara")
                .with_colors(["black", "red"]),
        ];
        let profile = ProfileBuilder::default().build(&wardrobe, &[]);
        assert!((profile.preferred_categories["dress"] - 1.0).abs() < 1e-6);
        assert!((profile.preferred_colors["black"] - 2.0 / 3.0).abs() < 1e-6);
        assert!(profile.prefers_brand("GUCCI"));
        assert!((profile.luxury_affinity - 50.0).abs() < 1e-4);
        assert!((profile.vintage_affinity - 50.0).abs() < 1e-4);
        // (40 + 5) and 3
        assert!((profile.sustainability_affinity - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_size_summary() {
        let wardrobe = vec![
            tagged("a", &[]).with_size("M"),
            tagged("b", &[]).with_size("M"),
            tagged("c", &[]).with_size("L"),
            tagged("d", &[]).with_size("XXL"),
        ];
        let profile = ProfileBuilder::default().build(&wardrobe, &[]);
        assert!((profile.size_consistency - 50.0).abs() < 1e-4);
        let range = profile.typical_size.unwrap();
        assert_eq!(range.system, SizeSystem::Alpha);
        assert_eq!((range.min, range.max), (3.0, 4.0));
    }

    #[test]
    fn test_build_is_deterministic() {
        let wardrobe = vec![tagged("a", &["boho", "romantic", "70s"]).with_colors(["rust", "cream"])];
        let interactions = vec![interaction(tagged("b", &["romantic"]), InteractionKind::Like, 3)];
        let builder = ProfileBuilder::default();
        assert_eq!(builder.build(&wardrobe, &interactions), builder.build(&wardrobe, &interactions));
    }
}

//! Garment-to-garment (outfit) compatibility
//!
//! Pairwise attribute comparisons weighted by [`OutfitWeights`]. A set of
//! garments scores as the average over all of its pairs.

use crate::color::{self, ColorRelation};
use crate::distance::{jaccard, term_set};
use crate::weights::OutfitWeights;
use drapex_core::{normalize_term, Error, Garment, Result};
use serde::{Deserialize, Serialize};

const NEUTRAL: f32 = 50.0;

/// Role a garment plays in an outfit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Top,
    Bottom,
    OnePiece,
    Outerwear,
    Footwear,
    Accessory,
    Other,
}

const SLOT_CATEGORIES: &[(Slot, &[&str])] = &[
    (
        Slot::Top,
        &[
            "top", "tops", "shirt", "blouse", "t-shirt", "tee", "sweater", "jumper", "cardigan",
            "tank", "hoodie", "sweatshirt", "polo", "knitwear", "bodysuit", "camisole",
        ],
    ),
    (
        Slot::Bottom,
        &[
            "bottom", "bottoms", "trousers", "pants", "jeans", "skirt", "shorts", "leggings",
            "chinos", "joggers",
        ],
    ),
    (
        Slot::OnePiece,
        &["dress", "dresses", "jumpsuit", "romper", "playsuit", "overalls", "dungarees"],
    ),
    (
        Slot::Outerwear,
        &[
            "outerwear", "jacket", "coat", "blazer", "trench", "parka", "puffer", "gilet",
            "vest", "windbreaker",
        ],
    ),
    (
        Slot::Footwear,
        &[
            "footwear", "shoes", "boots", "sneakers", "trainers", "heels", "sandals", "loafers",
            "flats", "mules",
        ],
    ),
    (
        Slot::Accessory,
        &[
            "accessory", "accessories", "bag", "handbag", "belt", "scarf", "hat", "cap",
            "jewelry", "jewellery", "necklace", "earrings", "sunglasses", "watch",
        ],
    ),
];

impl Slot {
    pub fn of(garment: &Garment) -> Slot {
        let by_category = Self::from_category(&garment.category);
        if by_category != Slot::Other {
            return by_category;
        }
        garment
            .subcategory
            .as_deref()
            .map(Self::from_category)
            .unwrap_or(Slot::Other)
    }

    pub fn from_category(category: &str) -> Slot {
        let category = normalize_term(category);
        SLOT_CATEGORIES
            .iter()
            .find(|(_, names)| names.contains(&category.as_str()))
            .map(|(slot, _)| *slot)
            .unwrap_or(Slot::Other)
    }
}

/// Silhouette balance of two slots, order-independent
fn silhouette(a: Slot, b: Slot) -> f32 {
    use Slot::*;
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    match (a, b) {
        (Other, _) | (_, Other) => NEUTRAL,
        (Accessory, Accessory) => 60.0,
        (Outerwear, Outerwear) => 30.0,
        (x, y) if x == y => 20.0,
        (Top, Bottom) => 95.0,
        (OnePiece, Outerwear) => 90.0,
        (Top, Outerwear) => 85.0,
        (Bottom, Outerwear) => 80.0,
        (_, Footwear) => 85.0,
        (_, Accessory) => 80.0,
        (Top, OnePiece) => 45.0,
        (Bottom, OnePiece) => 40.0,
        _ => NEUTRAL,
    }
}

/// Compatibility of a pair or set of garments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutfitCompatibility {
    pub overall: f32,
    pub color_harmony: f32,
    pub texture_mix: f32,
    pub silhouette_balance: f32,
    pub style_cohesion: f32,
    pub suggestions: Vec<String>,
}

/// Scores how well garments work together
#[derive(Debug, Clone, Default)]
pub struct GarmentPairing {
    weights: OutfitWeights,
}

impl GarmentPairing {
    pub fn new(weights: OutfitWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn pair(&self, a: &Garment, b: &Garment) -> OutfitCompatibility {
        let harmony = color::harmony(&a.colors, &b.colors);
        let color_harmony = harmony
            .map(|(score, _)| score)
            .unwrap_or(ColorRelation::Unknown.score());

        let texture_mix = if a.materials.is_empty() || b.materials.is_empty() {
            NEUTRAL
        } else {
            jaccard(&term_set(&a.materials), &term_set(&b.materials))
                .map(|j| 100.0 - 40.0 * j)
                .unwrap_or(NEUTRAL)
        };

        let silhouette_balance = silhouette(Slot::of(a), Slot::of(b));

        let a_terms = a.style_terms();
        let b_terms = b.style_terms();
        let style_cohesion = if a_terms.is_empty() || b_terms.is_empty() {
            NEUTRAL
        } else {
            jaccard(&term_set(&a_terms), &term_set(&b_terms))
                .map(|j| j * 100.0)
                .unwrap_or(NEUTRAL)
        };

        let mut suggestions = Vec::new();
        if let Some((_, best)) = harmony {
            match best {
                ColorRelation::Complementary => {
                    suggestions.push("Complementary colors make a bold pairing".to_string())
                }
                ColorRelation::Clashing => suggestions
                    .push("Colors clash; a neutral piece would bridge them".to_string()),
                _ => {}
            }
        }

        self.assemble(
            color_harmony,
            texture_mix,
            silhouette_balance,
            style_cohesion,
            suggestions,
        )
    }

    /// Score a set of two or more garments as the average of all pairs
    pub fn group(&self, garments: &[&Garment]) -> Result<OutfitCompatibility> {
        if garments.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "an outfit needs at least two garments, got {}",
                garments.len()
            )));
        }
        let mut pairs = Vec::with_capacity(garments.len() * (garments.len() - 1) / 2);
        for (i, a) in garments.iter().enumerate() {
            for b in &garments[i + 1..] {
                pairs.push(self.pair(a, b));
            }
        }
        let refs: Vec<&OutfitCompatibility> = pairs.iter().collect();
        Ok(self.combine(&refs, garments))
    }

    /// Average precomputed pair scores for `garments`
    pub(crate) fn combine(&self, pairs: &[&OutfitCompatibility], garments: &[&Garment]) -> OutfitCompatibility {
        let n = pairs.len().max(1) as f32;
        let mean = |f: fn(&OutfitCompatibility) -> f32| pairs.iter().map(|p| f(p)).sum::<f32>() / n;

        let mut suggestions: Vec<String> = Vec::new();
        for suggestion in pairs.iter().flat_map(|p| p.suggestions.iter()) {
            if !suggestions.contains(suggestion) {
                suggestions.push(suggestion.clone());
            }
        }
        if garments.len() > 2 {
            let slots: Vec<Slot> = garments.iter().map(|g| Slot::of(g)).collect();
            let dressed = slots.contains(&Slot::OnePiece)
                || (slots.contains(&Slot::Top) && slots.contains(&Slot::Bottom));
            if dressed && !slots.contains(&Slot::Footwear) {
                suggestions.push("Add footwear to complete the look".to_string());
            }
        }

        let mut combined = self.assemble(
            mean(|p| p.color_harmony),
            mean(|p| p.texture_mix),
            mean(|p| p.silhouette_balance),
            mean(|p| p.style_cohesion),
            suggestions,
        );
        // the overall of a set is the mean pair overall, not a reweighting
        combined.overall = mean(|p| p.overall).clamp(0.0, 100.0);
        combined
    }

    fn assemble(
        &self,
        color_harmony: f32,
        texture_mix: f32,
        silhouette_balance: f32,
        style_cohesion: f32,
        mut suggestions: Vec<String>,
    ) -> OutfitCompatibility {
        let w = &self.weights;
        let overall = w.color_harmony * color_harmony
            + w.texture_mix * texture_mix
            + w.silhouette_balance * silhouette_balance
            + w.style_cohesion * style_cohesion;

        let mut push = |text: &str| {
            if !suggestions.iter().any(|s| s == text) {
                suggestions.push(text.to_string());
            }
        };
        if color_harmony < 60.0 {
            push("Try a neutral piece to soften the color contrast");
        }
        if texture_mix < 70.0 {
            push("Mix in a different fabric for texture contrast");
        }
        if silhouette_balance < 50.0 {
            push("These pieces fill the same role; swap one for a contrasting shape");
        }
        if style_cohesion < 40.0 {
            push("Styles differ; tie them together with a shared accessory");
        }
        if suggestions.is_empty() {
            suggestions.push("Well balanced pairing".to_string());
        }

        OutfitCompatibility {
            overall: overall.clamp(0.0, 100.0),
            color_harmony,
            texture_mix,
            silhouette_balance,
            style_cohesion,
            suggestions,
        }
    }
}

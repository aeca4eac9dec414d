use crate::vector::Vector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Garment identifier as handed out by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GarmentId {
    Integer(u64),
    Uuid(Uuid),
    String(String),
}

impl std::fmt::Display for GarmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GarmentId::String(s) => write!(f, "{}", s),
            GarmentId::Uuid(u) => write!(f, "{}", u),
            GarmentId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for GarmentId {
    fn from(s: String) -> Self {
        GarmentId::String(s)
    }
}

impl From<&str> for GarmentId {
    fn from(s: &str) -> Self {
        GarmentId::String(s.to_string())
    }
}

impl From<u64> for GarmentId {
    fn from(i: u64) -> Self {
        GarmentId::Integer(i)
    }
}

impl From<Uuid> for GarmentId {
    fn from(u: Uuid) -> Self {
        GarmentId::Uuid(u)
    }
}

/// Physical condition, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    New,
    Excellent,
    Good,
    Fair,
}

impl Condition {
    /// 4 for new down to 1 for fair
    pub fn rank(self) -> u8 {
        match self {
            Condition::New => 4,
            Condition::Excellent => 3,
            Condition::Good => 2,
            Condition::Fair => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    #[default]
    Active,
    Reserved,
    Sold,
    Hidden,
}

impl ListingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Reserved => "reserved",
            ListingStatus::Sold => "sold",
            ListingStatus::Hidden => "hidden",
        }
    }
}

/// Materials that earn sustainability credit
pub const SUSTAINABLE_MATERIALS: &[&str] = &[
    "organic cotton",
    "hemp",
    "linen",
    "tencel",
    "lyocell",
    "recycled polyester",
    "recycled nylon",
    "bamboo",
    "peace silk",
    "alpaca",
    "merino wool",
    "wool",
];

const PRE_OWNED_SOURCES: &[&str] = &[
    "secondhand",
    "vintage",
    "thrift",
    "resale",
    "consignment",
    "antique",
    "designer archive",
];

const VINTAGE_SOURCES: &[&str] = &["vintage", "antique", "designer archive"];

const LOCAL_ORIGINS: &[&str] = &["local", "domestic", "artisan"];

/// Lowercase, trimmed form used for every attribute comparison
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// A garment record as supplied by the marketplace catalog.
///
/// The engine only reads garments; price and listing status are the only
/// fields the corpus lets callers change after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Garment {
    pub id: GarmentId,
    #[serde(default)]
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub style_tags: Vec<String>,
    #[serde(default)]
    pub era: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub occasions: Vec<String>,
    #[serde(default)]
    pub season: Option<String>,
    pub condition: Condition,
    /// Provenance: new, secondhand, vintage, consignment, ...
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub made_in: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(default)]
    pub view_count: u32,
    #[serde(default)]
    pub save_count: u32,
    /// Exactly `embedding_dim` components, or absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vector>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Garment {
    #[must_use]
    pub fn new(id: impl Into<GarmentId>, category: impl Into<String>, condition: Condition) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            category: category.into(),
            subcategory: None,
            size: None,
            brand: None,
            colors: Vec::new(),
            materials: Vec::new(),
            patterns: Vec::new(),
            style_tags: Vec::new(),
            era: None,
            mood: None,
            occasions: Vec::new(),
            season: None,
            condition,
            source: None,
            made_in: None,
            certifications: Vec::new(),
            price: None,
            original_price: None,
            status: ListingStatus::Active,
            view_count: 0,
            save_count: 0,
            embedding: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    #[must_use]
    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = materials.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_style_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.style_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_occasions<I, S>(mut self, occasions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.occasions = occasions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == ListingStatus::Active
    }

    pub fn is_pre_owned(&self) -> bool {
        self.source
            .as_deref()
            .map(|s| PRE_OWNED_SOURCES.contains(&normalize_term(s).as_str()))
            .unwrap_or(false)
    }

    /// Vintage by provenance, era, or tag
    pub fn is_vintage(&self) -> bool {
        let by_source = self
            .source
            .as_deref()
            .map(|s| VINTAGE_SOURCES.contains(&normalize_term(s).as_str()))
            .unwrap_or(false);
        by_source
            || self.era.is_some()
            || self.style_tags.iter().any(|t| normalize_term(t) == "vintage")
    }

    pub fn has_sustainable_materials(&self) -> bool {
        self.materials.iter().any(|m| {
            let m = normalize_term(m);
            SUSTAINABLE_MATERIALS.iter().any(|s| m.contains(s))
        })
    }

    /// Whether provenance carries any sustainability signal at all
    pub fn has_provenance(&self) -> bool {
        self.source.is_some()
            || self.made_in.is_some()
            || !self.materials.is_empty()
            || !self.certifications.is_empty()
    }

    /// Eco-score in [0, 100] from provenance and lifecycle
    pub fn sustainability_score(&self) -> f32 {
        let mut score = 0.0f32;
        if self.is_pre_owned() {
            score += 40.0;
        }
        if self.has_sustainable_materials() {
            score += 30.0;
        }
        let local = self
            .made_in
            .as_deref()
            .map(|m| LOCAL_ORIGINS.contains(&normalize_term(m).as_str()))
            .unwrap_or(false);
        if local {
            score += 15.0;
        }
        score += (self.certifications.len() as f32 * 5.0).min(15.0);
        score += match self.condition {
            Condition::New | Condition::Excellent => 5.0,
            Condition::Good => 3.0,
            Condition::Fair => 1.0,
        };
        score.min(100.0)
    }

    /// Style tags, era and mood, normalized and deduplicated in order
    pub fn style_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        let all = self
            .style_tags
            .iter()
            .map(String::as_str)
            .chain(self.era.as_deref())
            .chain(self.mood.as_deref());
        for term in all {
            let term = normalize_term(term);
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        terms
    }

    /// Whether the garment is tagged for an occasion
    pub fn suits_occasion(&self, occasion: &str) -> bool {
        let occasion = normalize_term(occasion);
        self.occasions.iter().any(|o| normalize_term(o) == occasion)
    }

    /// Untagged or all-season garments suit every season
    pub fn suits_season(&self, season: &str) -> bool {
        match self.season.as_deref().map(normalize_term) {
            None => true,
            Some(s) => s == "all" || s == "all-season" || s == normalize_term(season),
        }
    }
}

//! Color wheel rules for outfit color harmony

use drapex_core::normalize_term;
use smallvec::SmallVec;

/// Named fashion colors and their reference RGB values
const PALETTE: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("charcoal", (54, 69, 79)),
    ("white", (255, 255, 255)),
    ("off-white", (250, 249, 246)),
    ("cream", (255, 253, 208)),
    ("navy", (0, 0, 128)),
    ("royal blue", (65, 105, 225)),
    ("sky blue", (135, 206, 235)),
    ("denim blue", (21, 96, 189)),
    ("light blue", (173, 216, 230)),
    ("blue", (0, 0, 255)),
    ("red", (220, 20, 60)),
    ("burgundy", (128, 0, 32)),
    ("coral", (255, 127, 80)),
    ("pink", (255, 192, 203)),
    ("hot pink", (255, 105, 180)),
    ("blush", (222, 93, 131)),
    ("green", (0, 128, 0)),
    ("forest green", (34, 139, 34)),
    ("olive", (128, 128, 0)),
    ("sage", (138, 154, 140)),
    ("mint", (189, 252, 201)),
    ("emerald", (80, 200, 120)),
    ("teal", (0, 128, 128)),
    ("turquoise", (64, 224, 208)),
    ("yellow", (255, 255, 0)),
    ("mustard", (255, 173, 1)),
    ("gold", (255, 215, 0)),
    ("orange", (255, 165, 0)),
    ("rust", (183, 65, 14)),
    ("terracotta", (226, 114, 91)),
    ("purple", (128, 0, 128)),
    ("lavender", (230, 230, 250)),
    ("mauve", (224, 176, 255)),
    ("grey", (128, 128, 128)),
    ("silver", (192, 192, 192)),
    ("taupe", (188, 152, 126)),
    ("beige", (245, 245, 220)),
    ("tan", (210, 180, 140)),
    ("brown", (139, 69, 19)),
    ("chocolate", (123, 63, 0)),
    ("camel", (193, 154, 107)),
];

/// Colors that pair with anything regardless of hue
const NEUTRALS: &[&str] = &[
    "black", "charcoal", "white", "off-white", "cream", "grey", "silver", "taupe", "beige", "tan",
    "camel",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorTone {
    Neutral,
    /// Hue in degrees [0, 360)
    Chromatic(f32),
}

/// How two colors relate on the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRelation {
    Neutral,
    Monochrome,
    Analogous,
    Complementary,
    Triadic,
    Clashing,
    Unknown,
}

impl ColorRelation {
    /// Harmony score in [0, 100]
    pub fn score(self) -> f32 {
        match self {
            ColorRelation::Complementary => 95.0,
            ColorRelation::Analogous => 90.0,
            ColorRelation::Neutral => 85.0,
            ColorRelation::Monochrome => 80.0,
            ColorRelation::Triadic => 75.0,
            ColorRelation::Unknown => 60.0,
            ColorRelation::Clashing => 40.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColorRelation::Neutral => "neutral",
            ColorRelation::Monochrome => "monochrome",
            ColorRelation::Analogous => "analogous",
            ColorRelation::Complementary => "complementary",
            ColorRelation::Triadic => "triadic",
            ColorRelation::Clashing => "clashing",
            ColorRelation::Unknown => "unknown",
        }
    }
}

fn canonical(name: &str) -> String {
    let name = normalize_term(name);
    match name.as_str() {
        "gray" => "grey".to_string(),
        "offwhite" | "off white" | "ivory" => "off-white".to_string(),
        _ => name,
    }
}

/// Tone of a named color, `None` if the name is not in the palette
pub fn tone(name: &str) -> Option<ColorTone> {
    let name = canonical(name);
    if NEUTRALS.contains(&name.as_str()) {
        return Some(ColorTone::Neutral);
    }
    PALETTE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, rgb)| rgb_tone(*rgb))
}

fn rgb_tone((r, g, b): (u8, u8, u8)) -> ColorTone {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let lightness = (max + min) / 2.0;
    let saturation = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * lightness - 1.0).abs())
    };
    if saturation < 0.15 || lightness < 0.08 || lightness > 0.95 {
        return ColorTone::Neutral;
    }
    let hue = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    ColorTone::Chromatic(hue.rem_euclid(360.0))
}

fn hue_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % 360.0;
    d.min(360.0 - d)
}

/// Relation between two named colors
pub fn relation(a: &str, b: &str) -> ColorRelation {
    match (tone(a), tone(b)) {
        (Some(ColorTone::Neutral), Some(_)) | (Some(_), Some(ColorTone::Neutral)) => {
            ColorRelation::Neutral
        }
        (Some(ColorTone::Chromatic(ha)), Some(ColorTone::Chromatic(hb))) => {
            let d = hue_distance(ha, hb);
            if d <= 15.0 {
                ColorRelation::Monochrome
            } else if d <= 45.0 {
                ColorRelation::Analogous
            } else if (d - 180.0).abs() <= 30.0 {
                ColorRelation::Complementary
            } else if (d - 120.0).abs() <= 20.0 {
                ColorRelation::Triadic
            } else {
                ColorRelation::Clashing
            }
        }
        _ if canonical(a) == canonical(b) => ColorRelation::Monochrome,
        _ => ColorRelation::Unknown,
    }
}

/// Mean harmony over every cross pair of the two color lists.
///
/// `None` when either list is empty.
pub fn harmony(a: &[String], b: &[String]) -> Option<(f32, ColorRelation)> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let relations: SmallVec<[ColorRelation; 8]> = a
        .iter()
        .flat_map(|ca| b.iter().map(move |cb| relation(ca, cb)))
        .collect();
    let mean = relations.iter().map(|r| r.score()).sum::<f32>() / relations.len() as f32;
    let best = relations
        .iter()
        .copied()
        .max_by(|x, y| x.score().total_cmp(&y.score()))
        .unwrap_or(ColorRelation::Unknown);
    Some((mean, best))
}

//! Size labels as comparable ranks

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeSystem {
    /// XXS .. XXXL
    Alpha,
    /// Numeric labels such as 8, 10, 32
    Numeric,
}

/// A parsed size label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRank {
    pub system: SizeSystem,
    pub rank: f32,
}

const ALPHA_SIZES: &[(&str, f32)] = &[
    ("xxs", 0.0),
    ("xs", 1.0),
    ("s", 2.0),
    ("small", 2.0),
    ("m", 3.0),
    ("medium", 3.0),
    ("l", 4.0),
    ("large", 4.0),
    ("xl", 5.0),
    ("xxl", 6.0),
    ("2xl", 6.0),
    ("xxxl", 7.0),
    ("3xl", 7.0),
];

impl SizeRank {
    /// Returns `None` for one-size and unrecognized labels
    pub fn parse(label: &str) -> Option<SizeRank> {
        let key = label.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        if let Some((_, rank)) = ALPHA_SIZES.iter().find(|(name, _)| *name == key) {
            return Some(SizeRank {
                system: SizeSystem::Alpha,
                rank: *rank,
            });
        }
        key.parse::<f32>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| SizeRank {
                system: SizeSystem::Numeric,
                rank: v,
            })
    }

    /// Distance in alpha steps; two numeric sizes make one step.
    /// `None` when the systems differ.
    pub fn steps_to(&self, other: &SizeRank) -> Option<f32> {
        if self.system != other.system {
            return None;
        }
        let diff = (self.rank - other.rank).abs();
        Some(match self.system {
            SizeSystem::Alpha => diff,
            SizeSystem::Numeric => diff / 2.0,
        })
    }
}

/// Inclusive range of ranks within one size system
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub system: SizeSystem,
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub fn contains(&self, size: &SizeRank) -> bool {
        size.system == self.system && size.rank >= self.min && size.rank <= self.max
    }

    /// Steps outside the range (0 inside), `None` across systems
    pub fn steps_outside(&self, size: &SizeRank) -> Option<f32> {
        if size.system != self.system {
            return None;
        }
        let raw = if size.rank < self.min {
            self.min - size.rank
        } else if size.rank > self.max {
            size.rank - self.max
        } else {
            0.0
        };
        Some(match self.system {
            SizeSystem::Alpha => raw,
            SizeSystem::Numeric => raw / 2.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alpha_and_numeric() {
        let m = SizeRank::parse(" M ").unwrap();
        assert_eq!(m.system, SizeSystem::Alpha);
        assert_eq!(m.rank, 3.0);
        assert_eq!(SizeRank::parse("2XL").unwrap().rank, 6.0);
        let n = SizeRank::parse("10").unwrap();
        assert_eq!(n.system, SizeSystem::Numeric);
        assert!(SizeRank::parse("One Size").is_none());
        assert!(SizeRank::parse("").is_none());
    }

    #[test]
    fn test_steps() {
        let s = SizeRank::parse("S").unwrap();
        let l = SizeRank::parse("L").unwrap();
        assert_eq!(s.steps_to(&l), Some(2.0));
        let eight = SizeRank::parse("8").unwrap();
        let twelve = SizeRank::parse("12").unwrap();
        assert_eq!(eight.steps_to(&twelve), Some(2.0));
        assert_eq!(s.steps_to(&eight), None);
    }

    #[test]
    fn test_range() {
        let range = SizeRange { system: SizeSystem::Alpha, min: 2.0, max: 3.0 };
        assert!(range.contains(&SizeRank::parse("S").unwrap()));
        assert_eq!(range.steps_outside(&SizeRank::parse("M").unwrap()), Some(0.0));
        assert_eq!(range.steps_outside(&SizeRank::parse("XL").unwrap()), Some(2.0));
        assert_eq!(range.steps_outside(&SizeRank::parse("10").unwrap()), None);
    }
}

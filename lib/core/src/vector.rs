use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A dense embedding handed to the engine by the external embedding service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn dot(&self, other: &Vector) -> f32 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// True when every component is finite and the norm is non-zero
    pub fn is_usable(&self) -> bool {
        self.data.iter().all(|x| x.is_finite()) && self.norm() > f32::EPSILON
    }

    /// Check that this vector can take part in cosine similarity at dimension `dim`
    pub fn validate(&self, dim: usize) -> Result<()> {
        if self.dim() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: self.dim(),
            });
        }
        if !self.is_usable() {
            return Err(Error::DegenerateVector);
        }
        Ok(())
    }

    /// Cosine similarity in [-1, 1].
    ///
    /// Unlike a lenient implementation this never returns a placeholder score:
    /// mismatched dimensions and zero vectors are errors.
    pub fn cosine_similarity(&self, other: &Vector) -> Result<f32> {
        if self.dim() != other.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
            return Err(Error::DegenerateVector);
        }
        Ok(cosine_with_norms(self, norm_a, other, norm_b))
    }

    /// Normalize the vector to unit length
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f32::EPSILON {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Vector::new(data)
    }
}

/// Cosine similarity with precomputed, non-zero norms. Clamped against float drift.
#[inline]
pub(crate) fn cosine_with_norms(a: &Vector, norm_a: f32, b: &Vector, norm_b: f32) -> f32 {
    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

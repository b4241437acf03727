use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A vector of floating point numbers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

    /// Compute cosine similarity with another vector.
    ///
    /// Mismatched dimensions and zero-magnitude operands yield 0.0, never NaN.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        self.dot(other) / (norm_a * norm_b)
    }
}

/// Identity of one encoder fit.
///
/// Every vector produced by a fit is tagged with its id so vectors from
/// different population snapshots can never be compared by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FitId(Uuid);

impl FitId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fit-{}", self.0)
    }
}

/// A profile's feature vector under one specific fit
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector {
    fit: FitId,
    vector: Vector,
}

impl EncodedVector {
    pub fn new(fit: FitId, vector: Vector) -> Self {
        Self { fit, vector }
    }

    #[inline]
    pub fn fit(&self) -> FitId {
        self.fit
    }

    #[inline]
    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.vector.dim()
    }
}

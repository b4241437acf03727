//! Feature Encoder
//!
//! Fits a one-hot + standard-scaler encoding on a population snapshot and
//! transforms profiles into fixed-width vectors under that fit.
//!
//! A fit is an immutable value. It remembers the generation and size of the
//! population it was computed from and tags everything it produces with a
//! unique [`FitId`], so a stale fit or vectors from two different fits are
//! rejected instead of silently compared.

use std::collections::BTreeSet;
use std::ops::Range;

use roomie_core::{Attribute, EncodedVector, Error, FitId, Population, Profile, Result, Vector};
use tracing::debug;

use crate::schema::FeatureSchema;

/// Standard deviations at or below this are treated as zero
pub const ZERO_STD_EPSILON: f64 = 1e-10;

/// Encoder that fits a [`FeatureSchema`] to populations
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self {
            schema: FeatureSchema::roommate(),
        }
    }
}

impl FeatureEncoder {
    /// Create an encoder for a validated schema
    pub fn new(schema: FeatureSchema) -> Result<Self> {
        schema.validate()?;
        Ok(Self { schema })
    }

    /// Get a reference to the schema
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Compute vocabularies and standardization statistics for `population`
    pub fn fit(&self, population: &Population) -> Result<FitParameters> {
        if population.is_empty() {
            return Err(Error::EmptyPopulation);
        }

        let vocabularies: Vec<CategoryVocabulary> = self
            .schema
            .categorical_columns()
            .map(|attribute| {
                let seen: BTreeSet<&'static str> = population
                    .iter()
                    .filter_map(|p| attribute.category(p))
                    .collect();
                CategoryVocabulary {
                    attribute,
                    categories: seen.into_iter().collect(),
                }
            })
            .collect();

        let scalers: Vec<ColumnScaler> = self
            .schema
            .numeric_columns()
            .map(|attribute| ColumnScaler::fit(attribute, population))
            .collect();

        let width = vocabularies.iter().map(|v| v.categories.len()).sum::<usize>() + scalers.len();

        let fit = FitParameters {
            id: FitId::new(),
            generation: population.generation(),
            population_len: population.len(),
            vocabularies,
            scalers,
            width,
        };

        debug!(
            fit = %fit.id,
            generation = fit.generation,
            profiles = fit.population_len,
            width = fit.width,
            "fitted feature encoder"
        );

        Ok(fit)
    }
}

/// Categories observed for one categorical column, sorted
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryVocabulary {
    pub attribute: Attribute,
    pub categories: Vec<&'static str>,
}

/// Population mean and standard deviation of one numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnScaler {
    pub attribute: Attribute,
    pub mean: f64,
    pub std: f64,
}

impl ColumnScaler {
    fn fit(attribute: Attribute, population: &Population) -> Self {
        let values: Vec<f64> = population
            .iter()
            .filter_map(|p| attribute.number(p))
            .map(f64::from)
            .collect();
        let n = values.len().max(1) as f64;
        let mean = values.iter().sum::<f64>() / n;
        // Population std (divide by n)
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Self {
            attribute,
            mean,
            std: variance.sqrt(),
        }
    }

    /// Standardized value; a constant column yields exactly 0.0
    #[inline]
    pub fn scale(&self, value: f64) -> f32 {
        if self.std <= ZERO_STD_EPSILON {
            0.0
        } else {
            ((value - self.mean) / self.std) as f32
        }
    }
}

/// The immutable result of fitting the encoder on one population snapshot
#[derive(Debug, Clone)]
pub struct FitParameters {
    id: FitId,
    generation: u64,
    population_len: usize,
    vocabularies: Vec<CategoryVocabulary>,
    scalers: Vec<ColumnScaler>,
    width: usize,
}

impl FitParameters {
    #[inline]
    pub fn id(&self) -> FitId {
        self.id
    }

    /// Width of every vector produced by this fit
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn population_len(&self) -> usize {
        self.population_len
    }

    pub fn vocabulary(&self, attribute: Attribute) -> Option<&[&'static str]> {
        self.vocabularies
            .iter()
            .find(|v| v.attribute == attribute)
            .map(|v| v.categories.as_slice())
    }

    pub fn scaler(&self, attribute: Attribute) -> Option<&ColumnScaler> {
        self.scalers.iter().find(|s| s.attribute == attribute)
    }

    /// Vector positions owned by each attribute, in layout order
    pub fn layout(&self) -> Vec<(Attribute, Range<usize>)> {
        let mut layout = Vec::with_capacity(self.vocabularies.len() + self.scalers.len());
        let mut offset = 0;
        for vocabulary in &self.vocabularies {
            let end = offset + vocabulary.categories.len();
            layout.push((vocabulary.attribute, offset..end));
            offset = end;
        }
        for scaler in &self.scalers {
            layout.push((scaler.attribute, offset..offset + 1));
            offset += 1;
        }
        layout
    }

    /// Encode one profile.
    ///
    /// A category that was not observed at fit time is rejected with
    /// [`Error::UnknownCategory`].
    pub fn transform(&self, profile: &Profile) -> Result<EncodedVector> {
        let mut components = vec![0.0f32; self.width];
        let mut offset = 0;

        for vocabulary in &self.vocabularies {
            let value = vocabulary
                .attribute
                .category(profile)
                .ok_or_else(|| Error::InvalidSchema(format!(
                    "'{}' is not categorical",
                    vocabulary.attribute
                )))?;
            let slot = vocabulary
                .categories
                .iter()
                .position(|c| *c == value)
                .ok_or_else(|| Error::UnknownCategory {
                    field: vocabulary.attribute.name(),
                    value: value.to_string(),
                })?;
            components[offset + slot] = 1.0;
            offset += vocabulary.categories.len();
        }

        for scaler in &self.scalers {
            let value = scaler.attribute.number(profile).ok_or_else(|| {
                Error::InvalidSchema(format!("'{}' is not numeric", scaler.attribute))
            })?;
            components[offset] = scaler.scale(f64::from(value));
            offset += 1;
        }

        Ok(EncodedVector::new(self.id, Vector::new(components)))
    }

    /// Encode every row of the population this fit was computed from
    pub fn transform_population(&self, population: &Population) -> Result<EncodedMatrix> {
        self.check_current(population)?;

        let rows = population
            .iter()
            .map(|p| self.transform(p).map(|v| v.vector().clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(EncodedMatrix {
            fit: self.id,
            generation: self.generation,
            rows,
        })
    }

    /// Reject a population snapshot this fit was not computed from
    pub fn check_current(&self, population: &Population) -> Result<()> {
        if population.generation() != self.generation || population.len() != self.population_len {
            return Err(Error::StaleFit {
                fitted_generation: self.generation,
                fitted_len: self.population_len,
                generation: population.generation(),
                len: population.len(),
            });
        }
        Ok(())
    }
}

/// Encoded population rows, in population order, under one fit
#[derive(Debug, Clone)]
pub struct EncodedMatrix {
    fit: FitId,
    generation: u64,
    rows: Vec<Vector>,
}

impl EncodedMatrix {
    #[inline]
    pub fn fit(&self) -> FitId {
        self.fit
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&Vector> {
        self.rows.get(index)
    }

    #[inline]
    pub fn rows(&self) -> &[Vector] {
        &self.rows
    }
}

//! Feature schema definitions
//!
//! Declares which profile attributes enter the feature vector. The vector
//! layout is derived from the schema: one-hot blocks for categorical
//! attributes (in schema order), then one standardized value per numeric
//! attribute (in schema order).

use roomie_core::{Attribute, AttributeKind};
use serde::{Deserialize, Serialize};

/// Feature schema version 1
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSchema {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Encoded attributes, in declaration order
    pub columns: Vec<Attribute>,
}

fn default_version() -> u32 {
    1
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::roommate()
    }
}

impl FeatureSchema {
    /// Create a new feature schema with the given columns
    pub fn new(columns: Vec<Attribute>) -> Self {
        Self {
            version: 1,
            columns,
        }
    }

    /// The canonical roommate schema: schedule answers one-hot encoded,
    /// cleanliness, social energy and noise tolerance standardized.
    pub fn roommate() -> Self {
        Self::new(vec![
            Attribute::Wakeup,
            Attribute::Sleep,
            Attribute::StudyTime,
            Attribute::Cleanliness,
            Attribute::SocialEnergy,
            Attribute::NoiseTolerance,
        ])
    }

    /// Compatibility schema for the pet-aware reference dataset.
    ///
    /// Adds `pet_friendly` as a categorical column; profiles without an
    /// answer fall into the explicit `Unspecified` category.
    pub fn pet_aware() -> Self {
        Self::new(vec![
            Attribute::Wakeup,
            Attribute::Sleep,
            Attribute::StudyTime,
            Attribute::PetFriendly,
            Attribute::Cleanliness,
            Attribute::SocialEnergy,
            Attribute::NoiseTolerance,
        ])
    }

    /// Validate the schema: at least one column, no column twice
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].contains(column) {
                return Err(SchemaError::DuplicateColumn(column.name()));
            }
        }

        Ok(())
    }

    /// Categorical columns in layout order
    pub fn categorical_columns(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.columns_of(AttributeKind::Categorical)
    }

    /// Numeric columns in layout order
    pub fn numeric_columns(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.columns_of(AttributeKind::Numeric)
    }

    fn columns_of(&self, kind: AttributeKind) -> impl Iterator<Item = Attribute> + '_ {
        self.columns.iter().copied().filter(move |c| c.kind() == kind)
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(&'static str),
}

impl From<SchemaError> for roomie_core::Error {
    fn from(e: SchemaError) -> Self {
        roomie_core::Error::InvalidSchema(e.to_string())
    }
}

//! Configuration file handling

use roomie_core::{Error, PeerGroup, Result};
use roomie_similarity::FeatureSchema;
use roomie_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default number of matches shown
pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub top_n: usize,
    pub peer_group: PeerGroup,
    /// Include the pet-friendliness column in the feature vector
    pub pet_aware: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            peer_group: PeerGroup::SameGender,
            pet_aware: false,
        }
    }
}

impl MatchingConfig {
    pub fn schema(&self) -> FeatureSchema {
        if self.pet_aware {
            FeatureSchema::pet_aware()
        } else {
            FeatureSchema::roommate()
        }
    }
}

/// Top-level `roomie.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomieConfig {
    pub matching: MatchingConfig,
    pub storage: StorageConfig,
}

impl RoomieConfig {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: RoomieConfig = toml::from_str(&contents)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching.top_n == 0 {
            return Err(Error::InvalidConfig(
                "matching.top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

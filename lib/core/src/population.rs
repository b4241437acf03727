use ahash::AHashSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::profile::{Profile, ProfileKey};

/// An immutable, ordered snapshot of the match universe.
///
/// Row order is insertion order (seed rows first, then submissions by id)
/// and is the tie-break order for ranking. Keys are unique.
#[derive(Debug, Clone)]
pub struct Population {
    generation: u64,
    profiles: Vec<Arc<Profile>>,
}

impl Population {
    pub fn new(generation: u64, profiles: Vec<Arc<Profile>>) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(profiles.len());
        for profile in &profiles {
            if !seen.insert(profile.key()) {
                return Err(Error::DuplicateKey(profile.key().to_string()));
            }
        }
        Ok(Self {
            generation,
            profiles,
        })
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Arc<Profile>> {
        self.profiles.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Profile>> {
        self.profiles.iter()
    }

    pub fn position(&self, key: ProfileKey) -> Option<usize> {
        self.profiles.iter().position(|p| p.key() == key)
    }

    /// A new snapshot with one unpersisted profile appended.
    ///
    /// Used when a submission could not be stored but the query must still
    /// be matched against a fit that knows its categories.
    pub fn with_transient(&self, profile: Profile) -> Result<Self> {
        let mut profiles = self.profiles.clone();
        profiles.push(Arc::new(profile.with_key(ProfileKey::Transient)));
        Population::new(self.generation, profiles)
    }
}

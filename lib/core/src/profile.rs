use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attributes::{Category, Gender, Sleep, StudyTime, Wakeup};
use crate::error::{Error, Result};

/// Inclusive bounds of the 1-5 rating scales
pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// Longest accepted "looking for" description, in characters
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Identity of a profile within a population.
///
/// Display names are not unique, so matching excludes by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileKey {
    /// Row of the reference dataset
    Seed(u32),
    /// Persisted submission id
    Submission(u64),
    /// A query that was never persisted
    Transient,
}

impl fmt::Display for ProfileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKey::Seed(row) => write!(f, "seed:{}", row),
            ProfileKey::Submission(id) => write!(f, "submission:{}", id),
            ProfileKey::Transient => write!(f, "transient"),
        }
    }
}

/// One person's validated lifestyle attributes.
///
/// Only obtainable through [`ProfileDraft::validate`], so every `Profile`
/// satisfies the vocabulary and range invariants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    key: ProfileKey,
    name: String,
    gender: Gender,
    wakeup: Wakeup,
    sleep: Sleep,
    study_time: StudyTime,
    cleanliness: u8,
    noise_tolerance: u8,
    social_energy: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pet_friendly: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ideal_roommate: Option<String>,
}

impl Profile {
    pub fn key(&self) -> ProfileKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn wakeup(&self) -> Wakeup {
        self.wakeup
    }

    pub fn sleep(&self) -> Sleep {
        self.sleep
    }

    pub fn study_time(&self) -> StudyTime {
        self.study_time
    }

    pub fn cleanliness(&self) -> u8 {
        self.cleanliness
    }

    pub fn noise_tolerance(&self) -> u8 {
        self.noise_tolerance
    }

    pub fn social_energy(&self) -> f32 {
        self.social_energy
    }

    pub fn pet_friendly(&self) -> Option<bool> {
        self.pet_friendly
    }

    pub fn ideal_roommate(&self) -> Option<&str> {
        self.ideal_roommate.as_deref()
    }

    /// "Introvert" below 0.5 social energy, "Extrovert" otherwise
    pub fn social_label(&self) -> &'static str {
        if self.social_energy < 0.5 {
            "Introvert"
        } else {
            "Extrovert"
        }
    }

    /// Same attributes under a different identity
    #[must_use]
    pub fn with_key(mut self, key: ProfileKey) -> Self {
        self.key = key;
        self
    }
}

/// Unvalidated answers as collected from the form, a submission record
/// or a seed row.
///
/// Categorical answers are free text (canonical or form labels); numbers
/// are wide so out-of-range input can be reported instead of truncated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    pub gender: String,
    pub wakeup: String,
    pub sleep: String,
    pub study_time: String,
    pub cleanliness: i64,
    pub noise_tolerance: i64,
    pub social_energy: f64,
    #[serde(default)]
    pub pet_friendly: Option<bool>,
    #[serde(default)]
    pub ideal_roommate: Option<String>,
}

impl ProfileDraft {
    /// Check every invariant and produce a canonical profile.
    ///
    /// The first violated field is reported; nothing is clamped.
    pub fn validate(self, key: ProfileKey) -> Result<Profile> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::invalid("name", &self.name, "must not be empty"));
        }

        let gender = Gender::parse(&self.gender)?;
        let wakeup = Wakeup::parse(&self.wakeup)?;
        let sleep = Sleep::parse(&self.sleep)?;
        let study_time = StudyTime::parse(&self.study_time)?;
        let cleanliness = rating("cleanliness", self.cleanliness)?;
        let noise_tolerance = rating("noise_tolerance", self.noise_tolerance)?;

        if !self.social_energy.is_finite() || !(0.0..=1.0).contains(&self.social_energy) {
            return Err(Error::invalid(
                "social_energy",
                self.social_energy,
                "must lie within [0.0, 1.0]",
            ));
        }

        let ideal_roommate = match self.ideal_roommate.as_deref().map(str::trim) {
            Some(text) if text.chars().count() > DESCRIPTION_MAX_CHARS => {
                return Err(Error::invalid(
                    "ideal_roommate",
                    text,
                    "longer than 200 characters",
                ));
            }
            Some("") | None => None,
            Some(text) => Some(text.to_string()),
        };

        Ok(Profile {
            key,
            name: name.to_string(),
            gender,
            wakeup,
            sleep,
            study_time,
            cleanliness,
            noise_tolerance,
            social_energy: self.social_energy as f32,
            pet_friendly: self.pet_friendly,
            ideal_roommate,
        })
    }
}

impl From<&Profile> for ProfileDraft {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            gender: profile.gender.as_str().to_string(),
            wakeup: profile.wakeup.as_str().to_string(),
            sleep: profile.sleep.as_str().to_string(),
            study_time: profile.study_time.as_str().to_string(),
            cleanliness: i64::from(profile.cleanliness),
            noise_tolerance: i64::from(profile.noise_tolerance),
            social_energy: f64::from(profile.social_energy),
            pet_friendly: profile.pet_friendly,
            ideal_roommate: profile.ideal_roommate.clone(),
        }
    }
}

fn rating(field: &'static str, value: i64) -> Result<u8> {
    if (RATING_MIN..=RATING_MAX).contains(&value) {
        Ok(value as u8)
    } else {
        Err(Error::invalid(field, value, "must lie within [1, 5]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProfileDraft {
        ProfileDraft {
            name: "  Kana ".to_string(),
            gender: "Female".to_string(),
            wakeup: "Early".to_string(),
            sleep: "🌌 Early (Before 11 PM)".to_string(),
            study_time: "Morning".to_string(),
            cleanliness: 5,
            noise_tolerance: 2,
            social_energy: 0.2,
            pet_friendly: None,
            ideal_roommate: Some("Quiet and wakes up early".to_string()),
        }
    }

    #[test]
    fn test_validate_normalizes() {
        let profile = draft().validate(ProfileKey::Transient).unwrap();
        assert_eq!(profile.name(), "Kana");
        assert_eq!(profile.sleep(), Sleep::Early);
        assert_eq!(profile.cleanliness(), 5);
        assert_eq!(profile.ideal_roommate(), Some("Quiet and wakes up early"));
        assert_eq!(profile.social_label(), "Introvert");
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut d = draft();
        d.name = "   ".to_string();
        let err = d.validate(ProfileKey::Transient).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_out_of_range_rating_rejected_not_clamped() {
        let mut d = draft();
        d.cleanliness = 6;
        assert_eq!(
            d.validate(ProfileKey::Transient).unwrap_err().field(),
            Some("cleanliness")
        );

        let mut d = draft();
        d.noise_tolerance = 0;
        assert_eq!(
            d.validate(ProfileKey::Transient).unwrap_err().field(),
            Some("noise_tolerance")
        );
    }

    #[test]
    fn test_social_energy_bounds() {
        for bad in [-0.01, 1.01, f64::NAN] {
            let mut d = draft();
            d.social_energy = bad;
            assert_eq!(
                d.validate(ProfileKey::Transient).unwrap_err().field(),
                Some("social_energy")
            );
        }

        let mut d = draft();
        d.social_energy = 1.0;
        assert!(d.validate(ProfileKey::Transient).is_ok());
    }

    #[test]
    fn test_blank_description_becomes_none() {
        let mut d = draft();
        d.ideal_roommate = Some("   ".to_string());
        let profile = d.validate(ProfileKey::Transient).unwrap();
        assert_eq!(profile.ideal_roommate(), None);
    }

    #[test]
    fn test_overlong_description_rejected() {
        let mut d = draft();
        d.ideal_roommate = Some("x".repeat(DESCRIPTION_MAX_CHARS + 1));
        assert_eq!(
            d.validate(ProfileKey::Transient).unwrap_err().field(),
            Some("ideal_roommate")
        );
    }

    #[test]
    fn test_draft_roundtrip_through_profile() {
        let profile = draft().validate(ProfileKey::Seed(0)).unwrap();
        let again = ProfileDraft::from(&profile)
            .validate(ProfileKey::Seed(0))
            .unwrap();
        assert_eq!(profile, again);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(ProfileKey::Seed(3).to_string(), "seed:3");
        assert_eq!(ProfileKey::Submission(12).to_string(), "submission:12");
        assert_eq!(ProfileKey::Transient.to_string(), "transient");
    }
}

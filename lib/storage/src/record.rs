use chrono::{DateTime, Utc};
use roomie_core::{Category, Profile, ProfileDraft, ProfileKey, Result};
use serde::{Deserialize, Serialize};

/// Stored when a submitter leaves "looking for" blank
pub const DEFAULT_LOOKING_FOR: &str = "Looking for a compatible roommate";

/// One persisted submission row.
///
/// Categorical answers are stored as canonical labels, never the decorated
/// form labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: u64,
    pub name: String,
    pub gender: String,
    #[serde(default = "default_looking_for")]
    pub looking_for: String,
    pub wakeup: String,
    pub sleep: String,
    pub study_time: String,
    pub cleanliness: u8,
    pub noise_tolerance: u8,
    pub intro_extro: f32,
    pub submission_time: DateTime<Utc>,
}

fn default_looking_for() -> String {
    DEFAULT_LOOKING_FOR.to_string()
}

impl SubmissionRecord {
    pub fn from_profile(id: u64, submission_time: DateTime<Utc>, profile: &Profile) -> Self {
        Self {
            id,
            name: profile.name().to_string(),
            gender: profile.gender().as_str().to_string(),
            looking_for: profile
                .ideal_roommate()
                .map(str::to_string)
                .unwrap_or_else(default_looking_for),
            wakeup: profile.wakeup().as_str().to_string(),
            sleep: profile.sleep().as_str().to_string(),
            study_time: profile.study_time().as_str().to_string(),
            cleanliness: profile.cleanliness(),
            noise_tolerance: profile.noise_tolerance(),
            intro_extro: profile.social_energy(),
            submission_time,
        }
    }

    /// Re-validate the stored answers into a profile keyed by this id
    pub fn to_profile(&self) -> Result<Profile> {
        ProfileDraft::from(self).validate(ProfileKey::Submission(self.id))
    }
}

impl From<&SubmissionRecord> for ProfileDraft {
    fn from(record: &SubmissionRecord) -> Self {
        ProfileDraft {
            name: record.name.clone(),
            gender: record.gender.clone(),
            wakeup: record.wakeup.clone(),
            sleep: record.sleep.clone(),
            study_time: record.study_time.clone(),
            cleanliness: i64::from(record.cleanliness),
            noise_tolerance: i64::from(record.noise_tolerance),
            social_energy: f64::from(record.intro_extro),
            pet_friendly: None,
            // The placeholder stands in for a blank answer
            ideal_roommate: Some(record.looking_for.as_str())
                .filter(|text| *text != DEFAULT_LOOKING_FOR)
                .map(str::to_string),
        }
    }
}

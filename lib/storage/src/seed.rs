//! Reference population
//!
//! The seed rows every population starts from. A JSON array of
//! [`SeedRecord`]s can replace the built-in set.

use roomie_core::{Error, Profile, ProfileDraft, ProfileKey, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// One row of the reference dataset, in its column naming
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeedRecord {
    pub name: String,
    pub gender: String,
    pub wakeup: String,
    pub sleep: String,
    pub cleanliness: i64,
    pub intro_extro: f64,
    pub study_time: String,
    pub noise_tolerance: i64,
    #[serde(default)]
    pub pet_friendly: Option<bool>,
    #[serde(default)]
    pub ideal_roommate: Option<String>,
}

impl From<SeedRecord> for ProfileDraft {
    fn from(row: SeedRecord) -> Self {
        ProfileDraft {
            name: row.name,
            gender: row.gender,
            wakeup: row.wakeup,
            sleep: row.sleep,
            study_time: row.study_time,
            cleanliness: row.cleanliness,
            noise_tolerance: row.noise_tolerance,
            social_energy: row.intro_extro,
            pet_friendly: row.pet_friendly,
            ideal_roommate: row.ideal_roommate,
        }
    }
}

type Row = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i64,
    f64,
    &'static str,
    i64,
    bool,
    &'static str,
);

#[rustfmt::skip]
const REFERENCE_ROWS: [Row; 10] = [
    ("Kana",   "Female", "Early", "Early", 5, 0.2, "Morning", 2, true,  "Quiet and wakes up early"),
    ("Aki",    "Male",   "Mid",   "Late",  2, 0.7, "Night",   5, false, "Talkative and fun"),
    ("Ritu",   "Female", "Late",  "Late",  3, 0.3, "Night",   3, true,  "Clean and chill"),
    ("Dev",    "Male",   "Early", "Mid",   4, 0.5, "Morning", 4, false, "Loves morning workouts"),
    ("Meera",  "Female", "Late",  "Early", 5, 0.1, "Morning", 1, true,  "Very organized and lowkey"),
    ("Yuki",   "Female", "Mid",   "Mid",   1, 0.9, "Night",   5, false, "Fun and loves music"),
    ("Ishaan", "Male",   "Early", "Late",  3, 0.6, "Night",   3, true,  "Flexible and calm"),
    ("Tara",   "Female", "Late",  "Late",  2, 0.4, "Morning", 2, true,  "Lazy but sweet"),
    ("Rey",    "Male",   "Mid",   "Early", 4, 0.8, "Morning", 4, false, "Chill and peaceful"),
    ("Neha",   "Female", "Early", "Mid",   5, 0.3, "Night",   2, true,  "Early sleeper, early riser"),
];

/// The built-in ten-row reference set
pub fn reference_rows() -> Vec<SeedRecord> {
    REFERENCE_ROWS
        .iter()
        .map(
            |&(name, gender, wakeup, sleep, cleanliness, intro_extro, study_time, noise, pet, ideal)| {
                SeedRecord {
                    name: name.to_string(),
                    gender: gender.to_string(),
                    wakeup: wakeup.to_string(),
                    sleep: sleep.to_string(),
                    cleanliness,
                    intro_extro,
                    study_time: study_time.to_string(),
                    noise_tolerance: noise,
                    pet_friendly: Some(pet),
                    ideal_roommate: Some(ideal.to_string()),
                }
            },
        )
        .collect()
}

/// Load and validate the seed population.
///
/// `None` uses the built-in rows. Rows that fail validation are skipped
/// with a warning; a file that cannot be read or parsed is an error.
pub fn load_seed(path: Option<&Path>) -> Result<Vec<Profile>> {
    let rows = match path {
        Some(path) => {
            let data = std::fs::read(path)?;
            let rows: Vec<SeedRecord> = serde_json::from_slice(&data)
                .map_err(|e| Error::Serialization(format!("{}: {}", path.display(), e)))?;
            info!(path = %path.display(), rows = rows.len(), "loaded seed file");
            rows
        }
        None => reference_rows(),
    };

    let mut profiles = Vec::with_capacity(rows.len());
    for (row, record) in rows.into_iter().enumerate() {
        let name = record.name.clone();
        match ProfileDraft::from(record).validate(ProfileKey::Seed(row as u32)) {
            Ok(profile) => profiles.push(profile),
            Err(e) => warn!(row, name = %name, error = %e, "skipping invalid seed row"),
        }
    }
    Ok(profiles)
}

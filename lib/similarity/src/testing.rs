// Shared fixtures for unit tests
use roomie_core::{Population, Profile, ProfileDraft, ProfileKey};
use std::sync::Arc;

/// (name, gender, wakeup, sleep, study_time, cleanliness, noise_tolerance, social_energy)
pub type Row<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str, i64, i64, f64);

#[allow(clippy::too_many_arguments)]
pub fn profile(
    key: ProfileKey,
    name: &str,
    gender: &str,
    wakeup: &str,
    sleep: &str,
    study_time: &str,
    cleanliness: i64,
    noise_tolerance: i64,
    social_energy: f64,
) -> Profile {
    ProfileDraft {
        name: name.to_string(),
        gender: gender.to_string(),
        wakeup: wakeup.to_string(),
        sleep: sleep.to_string(),
        study_time: study_time.to_string(),
        cleanliness,
        noise_tolerance,
        social_energy,
        ..Default::default()
    }
    .validate(key)
    .unwrap()
}

/// Population of seed rows keyed by row index
pub fn population(rows: &[Row<'_>]) -> Population {
    let profiles = rows
        .iter()
        .enumerate()
        .map(|(i, &(name, gender, wakeup, sleep, study, clean, noise, social))| {
            Arc::new(profile(
                ProfileKey::Seed(i as u32),
                name,
                gender,
                wakeup,
                sleep,
                study,
                clean,
                noise,
                social,
            ))
        })
        .collect();
    Population::new(0, profiles).unwrap()
}

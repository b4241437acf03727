//! # roomie
//!
//! Roommate compatibility matching over a small, growing population.
//!
//! Each person's lifestyle answers are one-hot encoded (wake-up, sleep and
//! study habits) and standard-scaled (cleanliness, social energy, noise
//! tolerance), then ranked by cosine similarity within their peer group.
//! Submissions are stored durably and join the population immediately.
//!
//! ## Quick Start
//!
//! ```bash
//! roomie match --name Asha --gender Female --wakeup Early --sleep Early \
//!     --study Morning --cleanliness 5 --noise 2 --social 0.2
//! roomie view
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use roomie::prelude::*;
//! use std::sync::Arc;
//!
//! let store = PopulationStore::open(&StorageConfig::default())?;
//! let matchmaker = Matchmaker::new(Arc::new(store), MatchingConfig::default())?;
//!
//! let draft = ProfileDraft {
//!     name: "Asha".to_string(),
//!     gender: "Female".to_string(),
//!     wakeup: "🐓 Early (6–8 AM)".to_string(),
//!     sleep: "Early".to_string(),
//!     study_time: "Morning".to_string(),
//!     cleanliness: 5,
//!     noise_tolerance: 2,
//!     social_energy: 0.2,
//!     ..Default::default()
//! };
//! let report = matchmaker.submit(MatchRequest::new(draft))?;
//! for result in report.outcome.results() {
//!     println!("{} {} {:.2}%", result.tier.medal(), result.profile.name(), result.score);
//! }
//! # Ok::<(), roomie::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - `roomie-core` - Profiles, populations, vectors, peer groups, errors
//! - `roomie-similarity` - Feature encoding, cosine ranking, match filter
//! - `roomie-storage` - Submission log / LMDB backends, seed, population store
//! - `roomie-genre` - Movie genre classifier (TF-IDF + Naive Bayes)

pub mod config;
pub mod matchmaker;

pub use config::{MatchingConfig, RoomieConfig, DEFAULT_TOP_N};
pub use matchmaker::{MatchReport, MatchRequest, Matchmaker};

// Re-export core types
pub use roomie_core::{
    Attribute, Error, Gender, PeerGroup, Population, Profile, ProfileDraft, ProfileKey, Result,
    Sleep, StudyTime, Wakeup,
};

// Re-export the scoring pipeline
pub use roomie_similarity::{
    EmptyReason, FeatureEncoder, FeatureSchema, MatchOutcome, MatchResult, MatchStats, ScoreTier,
};

// Re-export storage
pub use roomie_storage::{BackendKind, PopulationStore, StorageConfig, SubmissionRecord};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BackendKind, Error, MatchOutcome, MatchReport, MatchRequest, Matchmaker, MatchingConfig,
        PeerGroup, PopulationStore, ProfileDraft, Result, RoomieConfig, ScoreTier, StorageConfig,
    };
}

/// Genre classifier
pub mod genre {
    pub use roomie_genre::{
        balance, clean_text, parse_corpus, read_corpus, GenreError, GenrePredictor,
        NaiveBayesGenreModel, TrainingSample, MAX_PER_GENRE, TOP_GENRES,
    };
}

//! # roomie Core
//!
//! Core data model for the roomie roommate matcher.
//!
//! This crate provides the types every other crate shares:
//!
//! - [`Profile`] - A validated set of lifestyle answers with an identity
//! - [`ProfileDraft`] - Raw answers, normalized and validated into a `Profile`
//! - [`Population`] - An immutable, ordered snapshot of the match universe
//! - [`Vector`] / [`EncodedVector`] - Dense feature vectors tagged with their fit
//! - [`PeerGroup`] - The peer-group predicate applied before ranking
//!
//! ## Example
//!
//! ```rust
//! use roomie_core::{ProfileDraft, ProfileKey, Wakeup};
//!
//! let draft = ProfileDraft {
//!     name: "Kana".to_string(),
//!     gender: "👩 Female".to_string(),
//!     wakeup: "🐓 Early (6–8 AM)".to_string(),
//!     sleep: "Early".to_string(),
//!     study_time: "Morning".to_string(),
//!     cleanliness: 5,
//!     noise_tolerance: 2,
//!     social_energy: 0.2,
//!     ..Default::default()
//! };
//! let profile = draft.validate(ProfileKey::Transient).unwrap();
//! assert_eq!(profile.wakeup(), Wakeup::Early);
//! ```

pub mod attributes;
pub mod error;
pub mod filter;
pub mod population;
pub mod profile;
pub mod vector;

pub use attributes::{Attribute, AttributeKind, Category, Gender, Sleep, StudyTime, Wakeup};
pub use error::{Error, Result};
pub use filter::{PeerFilter, PeerGroup};
pub use population::Population;
pub use profile::{Profile, ProfileDraft, ProfileKey, DESCRIPTION_MAX_CHARS};
pub use vector::{EncodedVector, FitId, Vector};

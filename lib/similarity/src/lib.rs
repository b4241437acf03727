//! # roomie Similarity
//!
//! The roommate scoring pipeline: feature encoding, cosine ranking and the
//! match filter.
//!
//! ## Features
//!
//! - **Feature Schema**: Which attributes enter the vector, one-hot or standardized
//! - **Feature Encoder**: Versioned fits over a population snapshot
//! - **Similarity Ranker**: Cosine scoring with exclusions applied before truncation
//! - **Match Filter**: Self-exclusion, peer groups, score tiers, explicit empty results
//! - **Explainability**: Per-attribute contribution breakdown
//!
//! ## Example
//!
//! ```rust
//! use roomie_core::{PeerGroup, Population, ProfileDraft, ProfileKey};
//! use roomie_similarity::{CosineRanker, FeatureEncoder, MatchFilter};
//! use std::sync::Arc;
//!
//! let rows = [("Kana", "Female", "Early", 5), ("Tara", "Female", "Late", 2)];
//! let profiles = rows
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &(name, gender, wakeup, cleanliness))| {
//!         let draft = ProfileDraft {
//!             name: name.to_string(),
//!             gender: gender.to_string(),
//!             wakeup: wakeup.to_string(),
//!             sleep: "Early".to_string(),
//!             study_time: "Morning".to_string(),
//!             cleanliness,
//!             noise_tolerance: 2,
//!             social_energy: 0.3,
//!             ..Default::default()
//!         };
//!         Arc::new(draft.validate(ProfileKey::Seed(i as u32)).unwrap())
//!     })
//!     .collect();
//! let population = Population::new(0, profiles).unwrap();
//!
//! let fit = FeatureEncoder::default().fit(&population).unwrap();
//! let matrix = fit.transform_population(&population).unwrap();
//! let requester = population.get(0).unwrap();
//! let query = fit.transform(requester).unwrap();
//!
//! let outcome = MatchFilter::new(CosineRanker)
//!     .filter_and_rank(&query, &matrix, &population, requester, &PeerGroup::SameGender, 3)
//!     .unwrap();
//! assert_eq!(outcome.results()[0].profile.name(), "Tara");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Population  │────>│   Encoder   │────>│   Encoded   │
//! │ (snapshot)  │     │ (fit → id)  │     │   Matrix    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            │  query vector     │
//!                            v                   v
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Ranker    │<────│   Filter    │
//!                     │  (cosine)   │     │ (self/peer) │
//!                     └─────────────┘     └─────────────┘
//!                                                │
//!                                         ┌─────────────┐
//!                                         │   Tiers +   │
//!                                         │   Explain   │
//!                                         └─────────────┘
//! ```

pub mod encoder;
pub mod explain;
pub mod matcher;
pub mod rank;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use encoder::{CategoryVocabulary, ColumnScaler, EncodedMatrix, FeatureEncoder, FitParameters};
pub use explain::{attribute_contributions, MatchStats};
pub use matcher::{EmptyReason, MatchFilter, MatchOutcome, MatchResult, ScoreTier};
pub use rank::{percent_score, CosineRanker, ScoredRow, SimilarityRanker};
pub use schema::{FeatureSchema, SchemaError};

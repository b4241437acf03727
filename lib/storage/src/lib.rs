//! Persistence for roomie
//!
//! Submissions live in a durable backend (append-only JSON log or LMDB);
//! [`PopulationStore`] merges them with the reference seed into immutable
//! [`roomie_core::Population`] snapshots.

pub mod backend;
pub mod lmdb;
pub mod log;
pub mod manager;
pub mod record;
pub mod seed;

pub use backend::SubmissionBackend;
pub use lmdb::LmdbBackend;
pub use log::AppendLog;
pub use manager::{BackendKind, PopulationStore, StorageConfig};
pub use record::{SubmissionRecord, DEFAULT_LOOKING_FOR};
pub use seed::{load_seed, reference_rows, SeedRecord};

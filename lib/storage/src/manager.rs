use ahash::AHashSet;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use roomie_core::{Error, Population, Profile, ProfileDraft, ProfileKey, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::backend::SubmissionBackend;
use crate::lmdb::LmdbBackend;
use crate::log::AppendLog;
use crate::record::SubmissionRecord;
use crate::seed::load_seed;

const LOG_FILE: &str = "submissions.jsonl";
const LMDB_DIR: &str = "lmdb";

/// Which durable backend holds submissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Log,
    Lmdb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    /// JSON seed file; the built-in reference rows when unset
    pub seed_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./roomie_data"),
            backend: BackendKind::Log,
            seed_path: None,
        }
    }
}

struct StoreState {
    submissions: Vec<Arc<Profile>>,
    generation: u64,
}

/// The match universe: reference seed rows followed by every accepted
/// submission.
///
/// Appends are durable before they become visible, and each successful
/// append bumps the generation so fits taken earlier are detectably stale.
pub struct PopulationStore {
    seed: Vec<Arc<Profile>>,
    state: RwLock<StoreState>,
    backend: Arc<dyn SubmissionBackend>,
    // Keeps backend order and in-memory order identical
    writer: Mutex<()>,
}

impl PopulationStore {
    pub fn open(config: &StorageConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let seed = load_seed(config.seed_path.as_deref())?;
        let backend: Arc<dyn SubmissionBackend> = match config.backend {
            BackendKind::Log => Arc::new(
                AppendLog::open(config.data_dir.join(LOG_FILE))
                    .map_err(|e| Error::Storage(format!("{:#}", e)))?,
            ),
            BackendKind::Lmdb => Arc::new(
                LmdbBackend::open(config.data_dir.join(LMDB_DIR))
                    .map_err(|e| Error::Storage(format!("{:#}", e)))?,
            ),
        };

        Self::with_backend(seed, backend)
    }

    /// Build a store over any backend, replaying its records
    pub fn with_backend(seed: Vec<Profile>, backend: Arc<dyn SubmissionBackend>) -> Result<Self> {
        let records = backend
            .records()
            .map_err(|e| Error::Storage(format!("{:#}", e)))?;

        let store = Self {
            seed: seed.into_iter().map(Arc::new).collect(),
            state: RwLock::new(StoreState {
                submissions: replay(&records),
                generation: 0,
            }),
            backend,
            writer: Mutex::new(()),
        };

        // Surface duplicate keys at open rather than on the first query
        let population = store.all_profiles()?;
        info!(
            backend = store.backend.name(),
            seed = store.seed.len(),
            profiles = population.len(),
            "population store ready"
        );
        Ok(store)
    }

    /// Snapshot of seed rows then submissions in id order
    pub fn all_profiles(&self) -> Result<Population> {
        let state = self.state.read();
        let profiles = self
            .seed
            .iter()
            .chain(state.submissions.iter())
            .cloned()
            .collect();
        Population::new(state.generation, profiles)
    }

    /// Validate and persist a submission
    pub fn append(&self, draft: ProfileDraft) -> Result<Arc<Profile>> {
        let profile = draft.validate(ProfileKey::Transient)?;
        self.append_validated(&profile)
    }

    /// Persist an already validated profile under a fresh submission id.
    ///
    /// On failure nothing becomes visible and the error is `StoreWrite`.
    pub fn append_validated(&self, profile: &Profile) -> Result<Arc<Profile>> {
        let _writer = self.writer.lock();

        let record = self
            .backend
            .insert(profile, Utc::now())
            .map_err(|e| Error::StoreWrite(format!("{:#}", e)))?;

        let stored = Arc::new(profile.clone().with_key(ProfileKey::Submission(record.id)));
        let expected = self.state.read().submissions.last().map_or(0, |p| match p.key() {
            ProfileKey::Submission(id) => id,
            _ => 0,
        }) + 1;

        // Another writer on the same data dir appended in between; pick up
        // its rows so ids stay contiguous in memory
        let resynced = if record.id != expected {
            match self.backend.records() {
                Ok(records) => Some(replay(&records)),
                Err(e) => {
                    warn!(error = %e, "could not reload submissions from backend");
                    None
                }
            }
        } else {
            None
        };

        let mut state = self.state.write();
        match resynced {
            Some(submissions) => {
                debug!(id = record.id, rows = submissions.len(), "resynced submissions");
                state.submissions = submissions;
            }
            None => state.submissions.push(Arc::clone(&stored)),
        }
        state.generation += 1;

        info!(
            id = record.id,
            generation = state.generation,
            backend = self.backend.name(),
            "stored submission"
        );
        Ok(stored)
    }

    /// Stored submission rows in id order
    pub fn records(&self) -> Result<Vec<SubmissionRecord>> {
        self.backend
            .records()
            .map_err(|e| Error::Storage(format!("{:#}", e)))
    }

    pub fn submission_count(&self) -> Result<usize> {
        self.backend
            .count()
            .map_err(|e| Error::Storage(format!("{:#}", e)))
    }

    #[inline]
    pub fn seed_len(&self) -> usize {
        self.seed.len()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Write every submission record to `path` as a JSON array, replacing
    /// the file atomically. Returns the number of records written.
    pub fn export_json(&self, path: &Path) -> Result<usize> {
        let records = self.records()?;
        let data = serde_json::to_vec_pretty(&records)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| Error::Storage(format!("exporting to {}: {}", path.display(), e)))?;

        info!(path = %path.display(), records = records.len(), "exported submissions");
        Ok(records.len())
    }

    /// Write every submission record to `path` as CSV, newest first, with
    /// a header row. Returns the number of records written.
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let mut records = self.records()?;
        records.reverse();

        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &records {
            writer
                .serialize(record)
                .map_err(|e| Error::Serialization(e.to_string()))?;
        }
        let data = writer
            .into_inner()
            .map_err(|e| Error::Serialization(e.to_string()))?;

        AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| Error::Storage(format!("exporting to {}: {}", path.display(), e)))?;

        info!(path = %path.display(), records = records.len(), "exported submissions as csv");
        Ok(records.len())
    }
}

/// Stored rows as profiles in id order; invalid rows and repeated ids are
/// skipped so one bad row cannot block the store from opening
fn replay(records: &[SubmissionRecord]) -> Vec<Arc<Profile>> {
    let mut seen = AHashSet::with_capacity(records.len());
    let mut submissions = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            warn!(id = record.id, "skipping duplicate stored submission id");
            continue;
        }
        match record.to_profile() {
            Ok(profile) => submissions.push(Arc::new(profile)),
            Err(e) => warn!(id = record.id, error = %e, "skipping invalid stored submission"),
        }
    }
    submissions
}

// LMDB-backed submission table
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use heed::byteorder::BE;
use heed::types::{Bytes, U64};
use heed::{Database, Env, EnvOpenOptions};
use roomie_core::Profile;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::SubmissionBackend;
use crate::record::SubmissionRecord;

const DB_SUBMISSIONS: &str = "submissions";
const MAP_SIZE: usize = 1024 * 1024 * 1024; // 1GB

/// Submissions keyed by big-endian id so iteration is id order and
/// `last()` is the highest id handed out.
pub struct LmdbBackend {
    env: Arc<Env>,
    submissions_db: Database<U64<BE>, Bytes>,
}

impl LmdbBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        std::fs::create_dir_all(&path)?;

        let env = Arc::new(unsafe {
            EnvOpenOptions::new()
                .map_size(MAP_SIZE)
                .max_dbs(4)
                .open(path.as_ref())
                .with_context(|| format!("opening LMDB env {}", path.as_ref().display()))?
        });

        let mut wtxn = env.write_txn()?;
        let submissions_db = env.create_database(&mut wtxn, Some(DB_SUBMISSIONS))?;
        wtxn.commit()?;

        let backend = Self { env, submissions_db };
        info!(
            path = %path.as_ref().display(),
            records = backend.count()?,
            "opened LMDB submission store"
        );
        Ok(backend)
    }
}

impl SubmissionBackend for LmdbBackend {
    fn insert(&self, profile: &Profile, submitted_at: DateTime<Utc>) -> Result<SubmissionRecord> {
        // The write txn serializes writers, so reading the last key here is race-free
        let mut wtxn = self.env.write_txn()?;
        let id = self
            .submissions_db
            .last(&wtxn)?
            .map_or(1, |(last, _)| last + 1);

        let record = SubmissionRecord::from_profile(id, submitted_at, profile);
        let data = bincode::serialize(&record)
            .map_err(|e| anyhow::anyhow!("Serialization error: {}", e))?;

        self.submissions_db.put(&mut wtxn, &id, &data)?;
        wtxn.commit()?;
        Ok(record)
    }

    fn records(&self) -> Result<Vec<SubmissionRecord>> {
        let rtxn = self.env.read_txn()?;
        let mut records = Vec::new();
        for entry in self.submissions_db.iter(&rtxn)? {
            let (id, data) = entry?;
            match bincode::deserialize::<SubmissionRecord>(data) {
                Ok(record) => records.push(record),
                Err(e) => warn!(id, error = %e, "skipping undecodable LMDB record"),
            }
        }
        Ok(records)
    }

    fn count(&self) -> Result<usize> {
        let rtxn = self.env.read_txn()?;
        Ok(self.submissions_db.len(&rtxn)? as usize)
    }

    fn name(&self) -> &'static str {
        "lmdb"
    }
}

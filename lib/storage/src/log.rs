use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use nix::fcntl::{Flock, FlockArg};
use parking_lot::Mutex;
use roomie_core::Profile;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::backend::SubmissionBackend;
use crate::record::SubmissionRecord;

/// Append-only JSON-lines submission log.
///
/// One record per line, each line written with a single `write_all` and
/// synced with `sync_data` before `insert` returns. Writers hold an
/// exclusive `flock` on the file and take the next id from its current
/// contents, so every process and every handle sharing the file draws from
/// one id sequence. Readers hold a shared lock.
pub struct AppendLog {
    path: PathBuf,
    writer: Mutex<()>,
}

impl AppendLog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let log = Self {
            path,
            writer: Mutex::new(()),
        };

        let (_, records) = {
            let mut file = log.lock(FlockArg::LockExclusive)?;
            log.read_repaired(&mut file)?
        };
        info!(path = %log.path.display(), records = records.len(), "opened submission log");
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self, arg: FlockArg) -> Result<Flock<File>> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening submission log {}", self.path.display()))?;

        Flock::lock(file, arg)
            .map_err(|(_, errno)| errno)
            .with_context(|| format!("locking submission log {}", self.path.display()))
    }

    /// Read every complete line, cutting off a torn tail. Needs the
    /// exclusive lock. Returns the repaired length and the parsed records.
    fn read_repaired(&self, file: &mut File) -> Result<(u64, Vec<SubmissionRecord>)> {
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        // A crash mid-append leaves a partial final line; cut it off so the
        // next record starts on a fresh line.
        let complete = bytes.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
        if complete < bytes.len() {
            warn!(
                path = %self.path.display(),
                bytes = bytes.len() - complete,
                "truncating torn tail of submission log"
            );
            file.set_len(complete as u64)?;
            file.sync_data()?;
        }

        Ok((complete as u64, parse_lines(&bytes[..complete])))
    }
}

fn parse_lines(bytes: &[u8]) -> Vec<SubmissionRecord> {
    let mut records = Vec::new();
    for (line_no, line) in bytes.split(|&b| b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<SubmissionRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(line = line_no + 1, error = %e, "skipping unreadable log line"),
        }
    }
    records
}

impl SubmissionBackend for AppendLog {
    fn insert(&self, profile: &Profile, submitted_at: DateTime<Utc>) -> Result<SubmissionRecord> {
        let _writer = self.writer.lock();
        let mut file = self.lock(FlockArg::LockExclusive)?;

        // Another handle may have appended since our last write
        let (len_before, existing) = self.read_repaired(&mut file)?;
        let id = existing.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = SubmissionRecord::from_profile(id, submitted_at, profile);

        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let written = file.write_all(&line).and_then(|_| file.sync_data());
        if let Err(e) = written {
            // Best effort: drop whatever part of the line reached the file
            if let Err(rollback) = file.set_len(len_before) {
                warn!(error = %rollback, "failed to roll back partial log write");
            }
            return Err(e).context("appending submission");
        }

        debug!(id, path = %self.path.display(), "appended submission");
        Ok(record)
    }

    fn records(&self) -> Result<Vec<SubmissionRecord>> {
        let mut file = self.lock(FlockArg::LockShared)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        // Only a crashed writer leaves an unterminated line; ignore it here
        let complete = bytes.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
        let mut records = parse_lines(&bytes[..complete]);
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records()?.len())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

use anyhow::Result;
use chrono::{DateTime, Utc};
use roomie_core::Profile;

use crate::record::SubmissionRecord;

/// Durable home of submission records.
///
/// `insert` must not return until the record is durable, and must assign
/// ids strictly greater than any id it handed out before, across reopens.
pub trait SubmissionBackend: Send + Sync {
    fn insert(&self, profile: &Profile, submitted_at: DateTime<Utc>) -> Result<SubmissionRecord>;

    /// Every stored record in id order
    fn records(&self) -> Result<Vec<SubmissionRecord>>;

    fn count(&self) -> Result<usize>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

//! Training corpus parsing and balancing
//!
//! Corpus lines look like `id ::: title ::: genre ::: description`.

use ahash::AHashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::Result;

const FIELD_SEPARATOR: &str = " ::: ";

/// Genres kept for training, by frequency
pub const TOP_GENRES: usize = 5;
/// Per-genre sample cap
pub const MAX_PER_GENRE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSample {
    pub genre: String,
    pub description: String,
}

/// Parse corpus text. Lines with missing fields are skipped; for
/// multi-genre rows (`drama|comedy`) only the first genre is kept.
pub fn parse_corpus(text: &str) -> Vec<TrainingSample> {
    let mut samples = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.splitn(4, FIELD_SEPARATOR).collect();
        let (genre, description) = match fields.as_slice() {
            [_, _, genre, description] => (genre, description),
            _ => {
                warn!(line = line_no + 1, "skipping malformed corpus line");
                continue;
            }
        };

        let genre = genre.split('|').next().unwrap_or_default().trim();
        let description = description.trim();
        if genre.is_empty() || description.is_empty() {
            warn!(line = line_no + 1, "skipping corpus line with empty genre or description");
            continue;
        }

        samples.push(TrainingSample {
            genre: genre.to_string(),
            description: description.to_string(),
        });
    }
    samples
}

pub fn read_corpus(path: &Path) -> Result<Vec<TrainingSample>> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_corpus(&text))
}

/// Keep the `top_k` most frequent genres and at most `cap` samples of each.
///
/// Frequency ties go to the alphabetically first genre; within a genre the
/// earliest samples are kept.
pub fn balance(samples: Vec<TrainingSample>, top_k: usize, cap: usize) -> Vec<TrainingSample> {
    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for sample in &samples {
        *counts.entry(sample.genre.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let kept: Vec<String> = ranked
        .into_iter()
        .take(top_k)
        .map(|(genre, _)| genre.to_string())
        .collect();
    debug!(genres = ?kept, "selected training genres");

    let mut taken: AHashMap<String, usize> = AHashMap::new();
    samples
        .into_iter()
        .filter(|sample| {
            if !kept.contains(&sample.genre) {
                return false;
            }
            let n = taken.entry(sample.genre.clone()).or_insert(0);
            *n += 1;
            *n <= cap
        })
        .collect()
}

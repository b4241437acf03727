use ahash::AHashMap;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::clean::{clean_text, tokens};
use crate::corpus::TrainingSample;
use crate::error::{GenreError, Result};

/// Maps a free-text description to a genre label
pub trait GenrePredictor: Send + Sync {
    fn predict(&self, text: &str) -> Result<String>;
}

/// TF-IDF features with a multinomial Naive Bayes classifier.
///
/// IDF is smoothed (`ln((1 + n) / (1 + df)) + 1`), document vectors are
/// l2-normalised and class likelihoods use additive smoothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesGenreModel {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `classes x vocabulary`
    feature_log_prob: Vec<Vec<f64>>,
}

const ALPHA: f64 = 1.0;

type SparseRow = Vec<(usize, f64)>;

impl NaiveBayesGenreModel {
    pub fn train(samples: &[TrainingSample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(GenreError::EmptyCorpus);
        }

        let docs: Vec<String> = samples.iter().map(|s| clean_text(&s.description)).collect();

        let terms: BTreeSet<&str> = docs.iter().flat_map(|d| tokens(d)).collect();
        if terms.is_empty() {
            return Err(GenreError::EmptyVocabulary);
        }
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term.to_string(), i))
            .collect();

        let mut doc_freq = vec![0usize; vocabulary.len()];
        for doc in &docs {
            let unique: BTreeSet<usize> = tokens(doc).filter_map(|t| vocabulary.get(t).copied()).collect();
            for j in unique {
                doc_freq[j] += 1;
            }
        }
        let n = docs.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let classes: Vec<String> = samples
            .iter()
            .map(|s| s.genre.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let class_index: AHashMap<&str, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0f64; vocabulary.len()]; classes.len()];
        for (sample, doc) in samples.iter().zip(&docs) {
            let c = class_index[sample.genre.as_str()];
            class_count[c] += 1;
            for (j, weight) in tfidf(&vocabulary, &idf, doc) {
                feature_count[c][j] += weight;
            }
        }

        let class_log_prior = class_count.iter().map(|&k| (k as f64 / n).ln()).collect();
        let width = vocabulary.len() as f64;
        let feature_log_prob = feature_count
            .into_iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + ALPHA * width;
                counts.into_iter().map(|x| ((x + ALPHA) / total).ln()).collect()
            })
            .collect();

        info!(
            samples = samples.len(),
            classes = classes.len(),
            vocabulary = vocabulary.len(),
            "trained genre model"
        );

        Ok(Self {
            vocabulary,
            idf,
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec(self)?;
        AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => GenreError::Io(e),
            })?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let model: Self = serde_json::from_slice(&data)?;
        model.check()?;
        Ok(model)
    }

    fn check(&self) -> Result<()> {
        let width = self.vocabulary.len();
        let classes = self.classes.len();
        if classes == 0 {
            return Err(GenreError::Untrained);
        }
        if self.idf.len() != width
            || self.class_log_prior.len() != classes
            || self.feature_log_prob.len() != classes
            || self.feature_log_prob.iter().any(|row| row.len() != width)
            || self.vocabulary.values().any(|&j| j >= width)
        {
            return Err(GenreError::CorruptModel("dimension mismatch".to_string()));
        }
        Ok(())
    }
}

/// l2-normalised TF-IDF weights of a cleaned document; unknown terms are ignored
fn tfidf(vocabulary: &BTreeMap<String, usize>, idf: &[f64], cleaned: &str) -> SparseRow {
    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
    for term in tokens(cleaned) {
        if let Some(&j) = vocabulary.get(term) {
            *counts.entry(j).or_insert(0.0) += 1.0;
        }
    }

    let mut row: SparseRow = counts.into_iter().map(|(j, tf)| (j, tf * idf[j])).collect();
    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in &mut row {
            *w /= norm;
        }
    }
    row
}

impl GenrePredictor for NaiveBayesGenreModel {
    fn predict(&self, text: &str) -> Result<String> {
        if self.classes.is_empty() {
            return Err(GenreError::Untrained);
        }

        let row = tfidf(&self.vocabulary, &self.idf, &clean_text(text));
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (c, prior) in self.class_log_prior.iter().enumerate() {
            let score = prior
                + row
                    .iter()
                    .map(|&(j, w)| w * self.feature_log_prob[c][j])
                    .sum::<f64>();
            if score > best_score {
                best = c;
                best_score = score;
            }
        }

        debug!(terms = row.len(), genre = %self.classes[best], "predicted genre");
        Ok(self.classes[best].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(genre: &str, description: &str) -> TrainingSample {
        TrainingSample {
            genre: genre.to_string(),
            description: description.to_string(),
        }
    }

    fn toy_model() -> NaiveBayesGenreModel {
        NaiveBayesGenreModel::train(&[
            sample("sci-fi", "Astronauts pilot a space ship to an alien planet."),
            sample("sci-fi", "A robot and an alien fight over a space station."),
            sample("sci-fi", "Laser battles across the galaxy aboard a star ship."),
            sample("romance", "Two strangers fall in love at a summer wedding."),
            sample("romance", "A love letter reunites old sweethearts."),
            sample("romance", "Their romance blossoms over a kiss in Paris."),
        ])
        .unwrap()
    }

    #[test]
    fn test_separates_toy_genres() {
        let model = toy_model();
        assert_eq!(model.classes(), ["romance", "sci-fi"]);
        assert_eq!(model.predict("An alien space ship lands").unwrap(), "sci-fi");
        assert_eq!(model.predict("A wedding full of LOVE!!").unwrap(), "romance");
    }

    #[test]
    fn test_unknown_terms_fall_back_to_prior() {
        let model = NaiveBayesGenreModel::train(&[
            sample("drama", "family secrets"),
            sample("drama", "a long goodbye"),
            sample("comedy", "silly dog"),
        ])
        .unwrap();
        assert_eq!(model.predict("zzz qqq 123").unwrap(), "drama");
    }

    #[test]
    fn test_empty_inputs_rejected() {
        assert!(matches!(
            NaiveBayesGenreModel::train(&[]),
            Err(GenreError::EmptyCorpus)
        ));
        assert!(matches!(
            NaiveBayesGenreModel::train(&[sample("drama", "1 2 3 !")]),
            Err(GenreError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let model = toy_model();
        model.save(&path).unwrap();

        let loaded = NaiveBayesGenreModel::load(&path).unwrap();
        assert_eq!(loaded.vocabulary_len(), model.vocabulary_len());
        assert_eq!(loaded.predict("alien laser galaxy").unwrap(), "sci-fi");
    }

    #[test]
    fn test_corrupt_model_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(
            &path,
            r#"{"vocabulary":{"love":0},"idf":[],"classes":["romance"],
               "class_log_prior":[0.0],"feature_log_prob":[[0.0]]}"#,
        )
        .unwrap();
        assert!(matches!(
            NaiveBayesGenreModel::load(&path),
            Err(GenreError::CorruptModel(_))
        ));
    }
}

//! Similarity Ranker
//!
//! Scores every row of an encoded population against a query vector and
//! returns the best rows. Exclusions are applied before truncation, and
//! equal scores keep population order.

use ahash::AHashSet;
use rayon::prelude::*;
use roomie_core::{EncodedVector, Error, Result};
use std::cmp::Ordering;
use tracing::debug;

use crate::encoder::EncodedMatrix;

/// One ranked population row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRow {
    /// Row index in the population
    pub index: usize,
    /// Similarity as a percentage in [0, 100], rounded to 2 decimals
    pub score: f32,
}

/// Ranks population rows by similarity to a query.
///
/// The linear [`CosineRanker`] is the only implementation; an indexed
/// nearest-neighbour structure can be substituted behind this trait.
pub trait SimilarityRanker: Send + Sync {
    fn rank(
        &self,
        query: &EncodedVector,
        matrix: &EncodedMatrix,
        excluded: &AHashSet<usize>,
        top_n: usize,
    ) -> Result<Vec<ScoredRow>>;
}

/// Exhaustive cosine-similarity ranking, O(rows x width) per query
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineRanker;

impl SimilarityRanker for CosineRanker {
    fn rank(
        &self,
        query: &EncodedVector,
        matrix: &EncodedMatrix,
        excluded: &AHashSet<usize>,
        top_n: usize,
    ) -> Result<Vec<ScoredRow>> {
        if query.fit() != matrix.fit() {
            return Err(Error::FitMismatch {
                expected: matrix.fit(),
                actual: query.fit(),
            });
        }

        let q = query.vector();
        let mut scored: Vec<ScoredRow> = matrix
            .rows()
            .par_iter()
            .enumerate()
            .filter(|(index, _)| !excluded.contains(index))
            .map(|(index, row)| ScoredRow {
                index,
                score: percent_score(q.cosine_similarity(row)),
            })
            .collect();

        // Stable: equal scores keep population order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_n);

        debug!(
            rows = matrix.len(),
            excluded = excluded.len(),
            returned = scored.len(),
            "ranked population"
        );

        Ok(scored)
    }
}

/// Convert a cosine similarity into a percentage.
///
/// `round(cosine * 100, 2)` clipped to [0, 100]; floating-point overshoot
/// past +/-1 and non-finite input never escape the range.
pub fn percent_score(cosine: f32) -> f32 {
    let percent = f64::from(cosine) * 100.0;
    if !percent.is_finite() {
        return 0.0;
    }
    let rounded = (percent * 100.0).round() / 100.0;
    rounded.clamp(0.0, 100.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FeatureEncoder;
    use crate::testing::population;

    #[test]
    fn test_percent_score() {
        assert_eq!(percent_score(1.0), 100.0);
        assert_eq!(percent_score(1.000_001), 100.0);
        assert_eq!(percent_score(-0.3), 0.0);
        assert_eq!(percent_score(f32::NAN), 0.0);
        assert!((percent_score(0.87234) - 87.23).abs() < 1e-4);
        assert!((percent_score(0.87236) - 87.24).abs() < 1e-4);
    }

    #[test]
    fn test_rank_orders_descending_and_excludes_first() {
        let population = population(&[
            ("Self", "Male", "Early", "Early", "Morning", 5, 2, 0.2),
            ("Near", "Male", "Early", "Early", "Morning", 4, 2, 0.3),
            ("Far", "Male", "Late", "Late", "Night", 1, 5, 0.9),
        ]);
        let fit = FeatureEncoder::default().fit(&population).unwrap();
        let matrix = fit.transform_population(&population).unwrap();
        let query = fit.transform(population.get(0).unwrap()).unwrap();

        let mut excluded = AHashSet::new();
        excluded.insert(0);
        let ranked = CosineRanker.rank(&query, &matrix, &excluded, 1).unwrap();

        // Self is removed before truncation, so the best external row survives
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].index, 1);

        let all = CosineRanker.rank(&query, &matrix, &AHashSet::new(), 10).unwrap();
        assert_eq!(all[0].index, 0);
        assert_eq!(all[0].score, 100.0);
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(all.iter().all(|r| (0.0..=100.0).contains(&r.score)));
    }

    #[test]
    fn test_ties_keep_population_order() {
        let population = population(&[
            ("Query", "Female", "Mid", "Mid", "Night", 3, 3, 0.5),
            ("Twin1", "Female", "Early", "Late", "Morning", 2, 4, 0.1),
            ("Other", "Female", "Late", "Early", "Night", 5, 1, 0.9),
            ("Twin2", "Female", "Early", "Late", "Morning", 2, 4, 0.1),
            ("Twin3", "Female", "Early", "Late", "Morning", 2, 4, 0.1),
        ]);
        let fit = FeatureEncoder::default().fit(&population).unwrap();
        let matrix = fit.transform_population(&population).unwrap();
        let query = fit.transform(population.get(1).unwrap()).unwrap();

        let ranked = CosineRanker.rank(&query, &matrix, &AHashSet::new(), 3).unwrap();
        let indices: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 3, 4]);
    }

    #[test]
    fn test_fit_mismatch_rejected() {
        let population = population(&[
            ("A", "Male", "Early", "Early", "Morning", 5, 2, 0.2),
            ("B", "Male", "Late", "Late", "Night", 1, 5, 0.9),
        ]);
        let encoder = FeatureEncoder::default();
        let fit_a = encoder.fit(&population).unwrap();
        let fit_b = encoder.fit(&population).unwrap();

        let matrix = fit_a.transform_population(&population).unwrap();
        let query = fit_b.transform(population.get(0).unwrap()).unwrap();

        assert!(matches!(
            CosineRanker.rank(&query, &matrix, &AHashSet::new(), 3),
            Err(Error::FitMismatch { .. })
        ));
    }

    #[test]
    fn test_zero_magnitude_scores_zero() {
        // One constant numeric column: every encoded vector is all zeros
        let population = population(&[
            ("A", "Male", "Early", "Early", "Morning", 3, 3, 0.5),
            ("B", "Male", "Early", "Early", "Morning", 3, 3, 0.5),
        ]);
        let encoder = FeatureEncoder::new(crate::schema::FeatureSchema::new(vec![
            roomie_core::Attribute::Cleanliness,
        ]))
        .unwrap();
        let fit = encoder.fit(&population).unwrap();
        let matrix = fit.transform_population(&population).unwrap();
        let query = fit.transform(population.get(0).unwrap()).unwrap();

        let ranked = CosineRanker.rank(&query, &matrix, &AHashSet::new(), 2).unwrap();
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.score == 0.0));
        assert_eq!(ranked[0].index, 0);
    }
}

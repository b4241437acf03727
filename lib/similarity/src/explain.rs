//! Explainability for match results
//!
//! Breaks a cosine score down by attribute and summarises a result list.

use roomie_core::{Attribute, Vector};
use serde::Serialize;

use crate::encoder::FitParameters;
use crate::matcher::MatchResult;

/// Contribution of each attribute block to the cosine similarity.
///
/// The cosine is `sum(q_i * r_i) / (|q| |r|)`; grouping the products by the
/// attribute that owns position `i` splits it into per-attribute parts that
/// add up to the cosine. Zero-magnitude operands give all-zero parts.
pub fn attribute_contributions(
    fit: &FitParameters,
    query: &Vector,
    row: &Vector,
) -> Vec<(Attribute, f32)> {
    let denom = query.norm() * row.norm();
    let q = query.as_slice();
    let r = row.as_slice();

    fit.layout()
        .into_iter()
        .map(|(attribute, range)| {
            if denom == 0.0 || range.end > q.len() || range.end > r.len() {
                return (attribute, 0.0);
            }
            let dot: f32 = q[range.clone()]
                .iter()
                .zip(&r[range])
                .map(|(a, b)| a * b)
                .sum();
            (attribute, dot / denom)
        })
        .collect()
}

/// Summary statistics for one match query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchStats {
    /// Profiles in the population, excluding the requester
    pub candidates_count: usize,
    /// Candidates left after the peer-group filter
    pub pool_size: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Average score of results
    pub avg_score: f32,
    /// Score of best result
    pub best_score: f32,
}

impl MatchStats {
    /// Compute stats from ranked results
    pub fn compute(results: &[MatchResult], candidates_count: usize, pool_size: usize) -> Self {
        if results.is_empty() {
            return Self {
                candidates_count,
                pool_size,
                results_count: 0,
                avg_score: 0.0,
                best_score: 0.0,
            };
        }

        let avg_score = results.iter().map(|r| r.score).sum::<f32>() / results.len() as f32;
        let best_score = results[0].score; // Results are sorted

        Self {
            candidates_count,
            pool_size,
            results_count: results.len(),
            avg_score,
            best_score,
        }
    }
}

//! Match filter and presenter
//!
//! Applies the matching business rules on top of the ranker: the requester
//! never matches themself, candidates outside the peer group are removed
//! before the top-N cut, and every score is bucketed into a display tier.

use ahash::AHashSet;
use roomie_core::{EncodedVector, Error, PeerFilter, Population, Profile, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::encoder::EncodedMatrix;
use crate::rank::SimilarityRanker;

/// Qualitative bucket for a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    /// score > 80
    High,
    /// 60 < score <= 80
    Medium,
    /// score <= 60
    Low,
}

impl ScoreTier {
    pub const HIGH_ABOVE: f32 = 80.0;
    pub const MEDIUM_ABOVE: f32 = 60.0;

    pub fn classify(score: f32) -> Self {
        if score > Self::HIGH_ABOVE {
            ScoreTier::High
        } else if score > Self::MEDIUM_ABOVE {
            ScoreTier::Medium
        } else {
            ScoreTier::Low
        }
    }

    pub fn medal(&self) -> &'static str {
        match self {
            ScoreTier::High => "🥇",
            ScoreTier::Medium => "🥈",
            ScoreTier::Low => "🥉",
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTier::High => f.write_str("high"),
            ScoreTier::Medium => f.write_str("medium"),
            ScoreTier::Low => f.write_str("low"),
        }
    }
}

/// One presented match
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// 1-based position in the result list
    pub rank: usize,
    /// Population row the match came from
    pub index: usize,
    pub profile: Arc<Profile>,
    pub score: f32,
    pub tier: ScoreTier,
}

/// Why a query produced no matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// Nobody in the population except the requester
    NoCandidates,
    /// Candidates exist, but none in the requested peer group
    NoPeersInGroup { group: String },
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoCandidates => f.write_str("no other profiles to match against"),
            EmptyReason::NoPeersInGroup { group } => write!(f, "no peers in group: no {} found", group),
        }
    }
}

/// Result of filtering and ranking one query
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Matches {
        results: Vec<MatchResult>,
        /// How many fewer results than requested were available
        shortfall: usize,
        /// Candidates in the peer group, excluding the requester
        pool_size: usize,
    },
    Empty(EmptyReason),
}

impl MatchOutcome {
    pub fn results(&self) -> &[MatchResult] {
        match self {
            MatchOutcome::Matches { results, .. } => results,
            MatchOutcome::Empty(_) => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, MatchOutcome::Empty(_))
    }
}

/// Match filter over any [`SimilarityRanker`]
#[derive(Debug, Clone, Default)]
pub struct MatchFilter<R> {
    ranker: R,
}

impl<R: SimilarityRanker> MatchFilter<R> {
    pub fn new(ranker: R) -> Self {
        Self { ranker }
    }

    /// Rank `population` against `query` on behalf of `requester`.
    ///
    /// The requester (matched by key) and every candidate the peer filter
    /// rejects are excluded before the top-`top_n` cut.
    pub fn filter_and_rank(
        &self,
        query: &EncodedVector,
        matrix: &EncodedMatrix,
        population: &Population,
        requester: &Profile,
        peer: &dyn PeerFilter,
        top_n: usize,
    ) -> Result<MatchOutcome> {
        if top_n == 0 {
            return Err(Error::InvalidConfig("top_n must be at least 1".to_string()));
        }
        if matrix.len() != population.len() || matrix.generation() != population.generation() {
            return Err(Error::StaleFit {
                fitted_generation: matrix.generation(),
                fitted_len: matrix.len(),
                generation: population.generation(),
                len: population.len(),
            });
        }

        let mut excluded = AHashSet::new();
        let mut candidates = 0usize;
        for (index, candidate) in population.iter().enumerate() {
            if candidate.key() == requester.key() {
                excluded.insert(index);
                continue;
            }
            candidates += 1;
            if !peer.admits(requester, candidate) {
                excluded.insert(index);
            }
        }

        let pool_size = population.len() - excluded.len();
        if candidates == 0 {
            return Ok(MatchOutcome::Empty(EmptyReason::NoCandidates));
        }
        if pool_size == 0 {
            return Ok(MatchOutcome::Empty(EmptyReason::NoPeersInGroup {
                group: peer.describe(requester),
            }));
        }

        let ranked = self.ranker.rank(query, matrix, &excluded, top_n)?;
        let results: Vec<MatchResult> = ranked
            .into_iter()
            .enumerate()
            .filter_map(|(position, row)| {
                population.get(row.index).map(|profile| MatchResult {
                    rank: position + 1,
                    index: row.index,
                    profile: Arc::clone(profile),
                    score: row.score,
                    tier: ScoreTier::classify(row.score),
                })
            })
            .collect();

        Ok(MatchOutcome::Matches {
            shortfall: top_n.saturating_sub(results.len()),
            results,
            pool_size,
        })
    }
}

//! Submission-to-matches orchestration
//!
//! One query runs: validate, persist (or degrade to a transient profile),
//! snapshot, fit, encode, filter and rank. Every query refits on the
//! snapshot it ranks against, so a fit can never be stale.

use roomie_core::{Attribute, Error, FitId, PeerGroup, Population, Profile, ProfileDraft, ProfileKey, Result};
use roomie_similarity::{
    attribute_contributions, CosineRanker, FeatureEncoder, MatchFilter, MatchOutcome, MatchStats,
};
use roomie_storage::PopulationStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::MatchingConfig;

/// Per-query knobs; unset fields fall back to the configured defaults
#[derive(Debug, Clone, Default)]
pub struct MatchRequest {
    pub draft: ProfileDraft,
    pub top_n: Option<usize>,
    pub peer_group: Option<PeerGroup>,
    /// Skip persistence and match as a transient profile
    pub dry_run: bool,
    /// Attach per-attribute contributions to each result
    pub explain: bool,
}

impl MatchRequest {
    pub fn new(draft: ProfileDraft) -> Self {
        Self {
            draft,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchReport {
    /// The requester as matched (submission key when saved)
    pub requester: Arc<Profile>,
    pub outcome: MatchOutcome,
    pub stats: MatchStats,
    /// Whether the submission reached durable storage
    pub saved: bool,
    pub peer_group: PeerGroup,
    pub fit: FitId,
    /// Parallel to `outcome.results()` when explanations were requested
    pub explanations: Vec<Vec<(Attribute, f32)>>,
}

pub struct Matchmaker {
    store: Arc<PopulationStore>,
    encoder: FeatureEncoder,
    filter: MatchFilter<CosineRanker>,
    config: MatchingConfig,
}

impl Matchmaker {
    pub fn new(store: Arc<PopulationStore>, config: MatchingConfig) -> Result<Self> {
        if config.top_n == 0 {
            return Err(Error::InvalidConfig("top_n must be at least 1".to_string()));
        }
        Ok(Self {
            store,
            encoder: FeatureEncoder::new(config.schema())?,
            filter: MatchFilter::new(CosineRanker),
            config,
        })
    }

    pub fn store(&self) -> &Arc<PopulationStore> {
        &self.store
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Submit a profile and return its best matches.
    ///
    /// A storage failure does not fail the query: the profile is matched
    /// as a transient member of the current population and the report says
    /// `saved = false`. Validation errors are returned before anything is
    /// written.
    pub fn submit(&self, request: MatchRequest) -> Result<MatchReport> {
        let profile = request.draft.validate(ProfileKey::Transient)?;
        let top_n = request.top_n.unwrap_or(self.config.top_n);
        let peer_group = request.peer_group.unwrap_or(self.config.peer_group);

        let (population, requester, saved) = if request.dry_run {
            let (population, requester) = self.transient(profile)?;
            (population, requester, false)
        } else {
            match self.store.append_validated(&profile) {
                Ok(stored) => (self.store.all_profiles()?, stored, true),
                Err(Error::StoreWrite(reason)) => {
                    warn!(%reason, "could not save submission, matching without it");
                    let (population, requester) = self.transient(profile)?;
                    (population, requester, false)
                }
                Err(e) => return Err(e),
            }
        };

        let fit = self.encoder.fit(&population)?;
        let matrix = fit.transform_population(&population)?;
        let query = fit.transform(&requester)?;
        debug!(fit = %fit.id(), width = fit.width(), rows = matrix.len(), "encoded population");

        let outcome =
            self.filter
                .filter_and_rank(&query, &matrix, &population, &requester, &peer_group, top_n)?;

        let pool_size = match &outcome {
            MatchOutcome::Matches { pool_size, .. } => *pool_size,
            MatchOutcome::Empty(_) => 0,
        };
        let stats = MatchStats::compute(outcome.results(), population.len().saturating_sub(1), pool_size);

        let explanations = if request.explain {
            outcome
                .results()
                .iter()
                .map(|result| match matrix.row(result.index) {
                    Some(row) => attribute_contributions(&fit, query.vector(), row),
                    None => Vec::new(),
                })
                .collect()
        } else {
            Vec::new()
        };

        info!(
            requester = %requester.key(),
            saved,
            peer_group = %peer_group,
            results = stats.results_count,
            best = stats.best_score,
            "match query complete"
        );

        Ok(MatchReport {
            requester,
            outcome,
            stats,
            saved,
            peer_group,
            fit: fit.id(),
            explanations,
        })
    }

    /// Current population plus `profile` as an unpersisted member
    fn transient(&self, profile: Profile) -> Result<(Population, Arc<Profile>)> {
        let population = self.store.all_profiles()?.with_transient(profile)?;
        let requester = population
            .get(population.len() - 1)
            .cloned()
            .ok_or(Error::EmptyPopulation)?;
        Ok((population, requester))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomie_core::Gender;
    use roomie_similarity::{EmptyReason, ScoreTier};
    use roomie_storage::{load_seed, StorageConfig, SubmissionBackend, SubmissionRecord};
    use tempfile::tempdir;

    fn draft(name: &str, gender: &str) -> ProfileDraft {
        ProfileDraft {
            name: name.to_string(),
            gender: gender.to_string(),
            wakeup: "Early".to_string(),
            sleep: "Early".to_string(),
            study_time: "Morning".to_string(),
            cleanliness: 5,
            noise_tolerance: 2,
            social_energy: 0.2,
            ..Default::default()
        }
    }

    fn matchmaker(dir: &std::path::Path, config: MatchingConfig) -> Matchmaker {
        let store = PopulationStore::open(&StorageConfig {
            data_dir: dir.to_path_buf(),
            ..Default::default()
        })
        .unwrap();
        Matchmaker::new(Arc::new(store), config).unwrap()
    }

    struct ReadOnlyBackend;

    impl SubmissionBackend for ReadOnlyBackend {
        fn insert(
            &self,
            _profile: &Profile,
            _submitted_at: chrono::DateTime<chrono::Utc>,
        ) -> anyhow::Result<SubmissionRecord> {
            anyhow::bail!("read-only file system")
        }

        fn records(&self) -> anyhow::Result<Vec<SubmissionRecord>> {
            Ok(Vec::new())
        }

        fn count(&self) -> anyhow::Result<usize> {
            Ok(0)
        }

        fn name(&self) -> &'static str {
            "read-only"
        }
    }

    #[test]
    fn test_submit_saves_and_matches_same_gender() {
        let dir = tempdir().unwrap();
        let mm = matchmaker(dir.path(), MatchingConfig::default());

        let report = mm.submit(MatchRequest::new(draft("Asha", "Female"))).unwrap();
        assert!(report.saved);
        assert_eq!(report.requester.key(), ProfileKey::Submission(1));

        let results = report.outcome.results();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].profile.name(), "Kana");
        assert!(results.iter().all(|r| r.profile.gender() == Gender::Female));
        assert!(results.iter().all(|r| r.profile.key() != report.requester.key()));
        assert_eq!(report.stats.candidates_count, 10);
        assert_eq!(report.stats.pool_size, 6);
        assert_eq!(mm.store().submission_count().unwrap(), 1);
    }

    #[test]
    fn test_dry_run_does_not_persist() {
        let dir = tempdir().unwrap();
        let mm = matchmaker(dir.path(), MatchingConfig::default());

        let request = MatchRequest {
            dry_run: true,
            explain: true,
            ..MatchRequest::new(draft("Ghost", "Male"))
        };
        let report = mm.submit(request).unwrap();
        assert!(!report.saved);
        assert_eq!(report.requester.key(), ProfileKey::Transient);
        assert_eq!(report.explanations.len(), report.outcome.results().len());
        assert_eq!(mm.store().submission_count().unwrap(), 0);
    }

    #[test]
    fn test_store_failure_degrades() {
        let store =
            PopulationStore::with_backend(load_seed(None).unwrap(), Arc::new(ReadOnlyBackend)).unwrap();
        let mm = Matchmaker::new(Arc::new(store), MatchingConfig::default()).unwrap();

        let report = mm.submit(MatchRequest::new(draft("Asha", "Female"))).unwrap();
        assert!(!report.saved);
        assert_eq!(report.outcome.results()[0].profile.name(), "Kana");
        assert_eq!(report.outcome.results()[0].tier, ScoreTier::High);
    }

    #[test]
    fn test_invalid_submission_writes_nothing() {
        let dir = tempdir().unwrap();
        let mm = matchmaker(dir.path(), MatchingConfig::default());

        let mut bad = draft("Asha", "Female");
        bad.social_energy = 1.5;
        let err = mm.submit(MatchRequest::new(bad)).unwrap_err();
        assert_eq!(err.field(), Some("social_energy"));
        assert_eq!(mm.store().submission_count().unwrap(), 0);
    }

    #[test]
    fn test_empty_peer_group_signalled() {
        let dir = tempdir().unwrap();
        let seed_path = dir.path().join("seed.json");
        std::fs::write(
            &seed_path,
            r#"[{"Name":"Only","Gender":"Male","Wakeup":"Early","Sleep":"Late","Cleanliness":3,
                 "IntroExtro":0.5,"StudyTime":"Night","NoiseTolerance":2}]"#,
        )
        .unwrap();
        let store = PopulationStore::open(&StorageConfig {
            data_dir: dir.path().join("data"),
            seed_path: Some(seed_path),
            ..Default::default()
        })
        .unwrap();
        let mm = Matchmaker::new(Arc::new(store), MatchingConfig::default()).unwrap();

        let report = mm.submit(MatchRequest::new(draft("Asha", "Female"))).unwrap();
        assert!(matches!(
            report.outcome,
            MatchOutcome::Empty(EmptyReason::NoPeersInGroup { .. })
        ));
        assert_eq!(report.stats.results_count, 0);
    }

    #[test]
    fn test_pet_aware_schema() {
        let dir = tempdir().unwrap();
        let config = MatchingConfig {
            pet_aware: true,
            peer_group: PeerGroup::AnyGender,
            ..Default::default()
        };
        let mm = matchmaker(dir.path(), config);

        let mut pets = draft("Asha", "Female");
        pets.pet_friendly = Some(true);
        let report = mm
            .submit(MatchRequest {
                explain: true,
                ..MatchRequest::new(pets)
            })
            .unwrap();
        assert!(report.explanations[0]
            .iter()
            .any(|(attribute, _)| *attribute == Attribute::PetFriendly));
    }
}

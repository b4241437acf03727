// Integration tests for roomie
use roomie::prelude::*;
use roomie::{FeatureEncoder, ProfileKey};
use std::sync::Arc;
use tempfile::tempdir;

fn draft(name: &str, gender: &str, wakeup: &str, sleep: &str, study: &str) -> ProfileDraft {
    ProfileDraft {
        name: name.to_string(),
        gender: gender.to_string(),
        wakeup: wakeup.to_string(),
        sleep: sleep.to_string(),
        study_time: study.to_string(),
        cleanliness: 5,
        noise_tolerance: 2,
        social_energy: 0.2,
        ..Default::default()
    }
}

fn open(dir: &std::path::Path, backend: BackendKind, matching: MatchingConfig) -> Matchmaker {
    let store = PopulationStore::open(&StorageConfig {
        data_dir: dir.to_path_buf(),
        backend,
        seed_path: None,
    })
    .unwrap();
    Matchmaker::new(Arc::new(store), matching).unwrap()
}

#[test]
fn test_seed_query_any_gender_finds_kana() {
    let dir = tempdir().unwrap();
    let mm = open(
        dir.path(),
        BackendKind::Log,
        MatchingConfig {
            peer_group: PeerGroup::AnyGender,
            ..Default::default()
        },
    );

    let report = mm
        .submit(MatchRequest::new(draft("Query", "Male", "Early", "Early", "Morning")))
        .unwrap();
    let results = report.outcome.results();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].profile.name(), "Kana");
    assert!((results[0].score - 100.0).abs() < 0.01);
    assert_eq!(results[0].tier, ScoreTier::High);
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_form_labels_match_canonical_labels() {
    let dir = tempdir().unwrap();
    let mm = open(dir.path(), BackendKind::Log, MatchingConfig::default());

    let canonical = mm
        .submit(MatchRequest {
            dry_run: true,
            ..MatchRequest::new(draft("A", "Female", "Late", "Mid", "Night"))
        })
        .unwrap();
    let decorated = mm
        .submit(MatchRequest {
            dry_run: true,
            ..MatchRequest::new(draft(
                "A",
                "👩 Female",
                "🦥 Late (12 PM or later)",
                "🕰️ Mid (11 PM – 1 AM)",
                "🌙 Night",
            ))
        })
        .unwrap();

    let names = |report: &MatchReport| -> Vec<String> {
        report
            .outcome
            .results()
            .iter()
            .map(|r| r.profile.name().to_string())
            .collect()
    };
    assert_eq!(names(&canonical), names(&decorated));
}

#[test]
fn test_append_then_query_sees_new_profile() {
    for backend in [BackendKind::Log, BackendKind::Lmdb] {
        let dir = tempdir().unwrap();
        let mm = open(dir.path(), backend, MatchingConfig::default());

        let first = mm
            .submit(MatchRequest::new(draft("Omar", "Male", "Late", "Late", "Night")))
            .unwrap();
        assert!(first.saved);

        let second = mm
            .submit(MatchRequest::new(draft("Omar's twin", "Male", "Late", "Late", "Night")))
            .unwrap();
        let top = &second.outcome.results()[0];
        assert_eq!(top.profile.key(), ProfileKey::Submission(1));
        assert_eq!(top.score, 100.0);
        assert!(second
            .outcome
            .results()
            .iter()
            .all(|r| r.profile.key() != ProfileKey::Submission(2)));
    }
}

#[test]
fn test_submissions_persist_across_restart() {
    let dir = tempdir().unwrap();
    {
        let mm = open(dir.path(), BackendKind::Log, MatchingConfig::default());
        mm.submit(MatchRequest::new(draft("Lin", "Female", "Mid", "Mid", "Night")))
            .unwrap();
    }

    let mm = open(dir.path(), BackendKind::Log, MatchingConfig::default());
    let population = mm.store().all_profiles().unwrap();
    assert_eq!(population.len(), 11);
    assert_eq!(population.get(10).unwrap().name(), "Lin");

    let records = mm.store().records().unwrap();
    assert_eq!(records[0].looking_for, "Looking for a compatible roommate");
}

#[test]
fn test_one_fit_gives_fixed_width() {
    let dir = tempdir().unwrap();
    let mm = open(dir.path(), BackendKind::Log, MatchingConfig::default());
    let population = mm.store().all_profiles().unwrap();

    let fit = FeatureEncoder::default().fit(&population).unwrap();
    let matrix = fit.transform_population(&population).unwrap();
    // 3 wakeup + 3 sleep + 2 study one-hot columns, 3 scaled numerics
    assert_eq!(fit.width(), 11);
    assert!(matrix.rows().iter().all(|row| row.dim() == 11));
}

#[test]
fn test_explain_parts_sum_to_score() {
    let dir = tempdir().unwrap();
    let mm = open(dir.path(), BackendKind::Log, MatchingConfig::default());

    let report = mm
        .submit(MatchRequest {
            explain: true,
            dry_run: true,
            ..MatchRequest::new(draft("Ravi", "Male", "Early", "Mid", "Morning"))
        })
        .unwrap();

    for (result, parts) in report.outcome.results().iter().zip(&report.explanations) {
        let total: f32 = parts.iter().map(|(_, share)| share).sum::<f32>() * 100.0;
        assert!((total.clamp(0.0, 100.0) - result.score).abs() < 0.05);
    }
}

//! Property-based tests using proptest.
//!
//! Invariants of the encoder, the ranker and the match filter over random
//! valid populations.

use proptest::prelude::*;
use roomie::genre::clean_text;
use roomie::{FeatureEncoder, MatchOutcome, PeerGroup, Population, ProfileDraft, ProfileKey};
use roomie_similarity::{CosineRanker, MatchFilter};
use std::sync::Arc;

const TIMES: [&str; 3] = ["Early", "Mid", "Late"];
const STUDY: [&str; 2] = ["Morning", "Night"];
const GENDERS: [&str; 2] = ["Male", "Female"];

fn draft_strategy() -> impl Strategy<Value = ProfileDraft> {
    (
        0..2usize,
        0..3usize,
        0..3usize,
        0..2usize,
        1..=5i64,
        1..=5i64,
        0.0..=1.0f64,
    )
        .prop_map(|(gender, wakeup, sleep, study, cleanliness, noise, social)| ProfileDraft {
            name: "p".to_string(),
            gender: GENDERS[gender].to_string(),
            wakeup: TIMES[wakeup].to_string(),
            sleep: TIMES[sleep].to_string(),
            study_time: STUDY[study].to_string(),
            cleanliness,
            noise_tolerance: noise,
            social_energy: social,
            ..Default::default()
        })
}

fn population_strategy() -> impl Strategy<Value = Population> {
    proptest::collection::vec(draft_strategy(), 1..40).prop_map(|drafts| {
        let profiles = drafts
            .into_iter()
            .enumerate()
            .map(|(i, d)| Arc::new(d.validate(ProfileKey::Submission(i as u64 + 1)).unwrap()))
            .collect();
        Population::new(0, profiles).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn every_row_has_fit_width(population in population_strategy()) {
        let fit = FeatureEncoder::default().fit(&population).unwrap();
        let matrix = fit.transform_population(&population).unwrap();
        prop_assert!(fit.width() >= 6 && fit.width() <= 11);
        for row in matrix.rows() {
            prop_assert_eq!(row.dim(), fit.width());
            prop_assert!(row.as_slice().iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn matches_are_bounded_sorted_and_exclude_self(
        population in population_strategy(),
        requester in 0..40usize,
        top_n in 1..6usize,
        any_gender in any::<bool>(),
    ) {
        let requester = Arc::clone(population.get(requester % population.len()).unwrap());
        let fit = FeatureEncoder::default().fit(&population).unwrap();
        let matrix = fit.transform_population(&population).unwrap();
        let query = fit.transform(&requester).unwrap();
        let group = if any_gender { PeerGroup::AnyGender } else { PeerGroup::SameGender };

        let outcome = MatchFilter::new(CosineRanker)
            .filter_and_rank(&query, &matrix, &population, &requester, &group, top_n)
            .unwrap();

        if let MatchOutcome::Matches { results, .. } = &outcome {
            prop_assert!(!results.is_empty());
            prop_assert!(results.len() <= top_n);
            for result in results {
                prop_assert!((0.0..=100.0).contains(&result.score));
                prop_assert_ne!(result.profile.key(), requester.key());
                if !any_gender {
                    prop_assert_eq!(result.profile.gender(), requester.gender());
                }
            }
            prop_assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn clean_text_keeps_only_lowercase_letters_and_whitespace(text in ".{0,80}") {
        let cleaned = clean_text(&text);
        prop_assert!(cleaned
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_whitespace()));
        prop_assert_eq!(clean_text(&cleaned), cleaned.clone());
    }
}

// Peer-group predicates applied before ranking truncation
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Profile;

pub trait PeerFilter: Send + Sync {
    /// Whether `candidate` belongs to the requester's peer group
    fn admits(&self, requester: &Profile, candidate: &Profile) -> bool;

    /// Human-readable name of the group the requester is matched within
    fn describe(&self, requester: &Profile) -> String;
}

/// Which part of the population a query is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerGroup {
    /// Only candidates who declared the requester's gender
    #[default]
    SameGender,
    /// Everyone
    AnyGender,
}

impl PeerFilter for PeerGroup {
    fn admits(&self, requester: &Profile, candidate: &Profile) -> bool {
        match self {
            PeerGroup::SameGender => requester.gender() == candidate.gender(),
            PeerGroup::AnyGender => true,
        }
    }

    fn describe(&self, requester: &Profile) -> String {
        match self {
            PeerGroup::SameGender => format!("{} roommates", requester.gender().to_string().to_lowercase()),
            PeerGroup::AnyGender => "roommates of any gender".to_string(),
        }
    }
}

impl fmt::Display for PeerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerGroup::SameGender => f.write_str("same gender"),
            PeerGroup::AnyGender => f.write_str("any gender"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ProfileDraft, ProfileKey};

    fn person(gender: &str) -> Profile {
        ProfileDraft {
            name: "Someone".to_string(),
            gender: gender.to_string(),
            wakeup: "Early".to_string(),
            sleep: "Early".to_string(),
            study_time: "Morning".to_string(),
            cleanliness: 3,
            noise_tolerance: 3,
            social_energy: 0.5,
            ..Default::default()
        }
        .validate(ProfileKey::Transient)
        .unwrap()
    }

    #[test]
    fn test_same_gender() {
        let (m, f) = (person("Male"), person("Female"));
        assert!(PeerGroup::SameGender.admits(&m, &m));
        assert!(!PeerGroup::SameGender.admits(&m, &f));
        assert_eq!(PeerGroup::SameGender.describe(&f), "female roommates");
    }

    #[test]
    fn test_any_gender() {
        let (m, f) = (person("Male"), person("Female"));
        assert!(PeerGroup::AnyGender.admits(&m, &f));
        assert!(PeerGroup::AnyGender.admits(&f, &m));
    }

    #[test]
    fn test_serde_names() {
        let group: PeerGroup = serde_json::from_str("\"any_gender\"").unwrap();
        assert_eq!(group, PeerGroup::AnyGender);
        assert_eq!(serde_json::to_string(&PeerGroup::SameGender).unwrap(), "\"same_gender\"");
    }
}

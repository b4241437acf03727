//! Lifestyle attribute vocabularies
//!
//! Every categorical answer has one canonical label. The interactive form
//! shows decorated labels ("🐓 Early (6–8 AM)"); both spellings are
//! normalized here so nothing downstream ever sees a decorated label.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::profile::Profile;

/// A closed vocabulary of categorical answers
pub trait Category: Sized + Copy + 'static {
    /// Field name used in error messages
    const FIELD: &'static str;

    /// Every member, in declaration order
    fn all() -> &'static [Self];

    /// Canonical label
    fn as_str(&self) -> &'static str;

    /// Label shown by the interactive form
    fn form_label(&self) -> &'static str;

    /// Parse a canonical label (case-insensitive) or a form label
    fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed) || c.form_label() == trimmed)
            .ok_or_else(|| Error::invalid(Self::FIELD, input, "not a recognised option"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Category for Gender {
    const FIELD: &'static str = "gender";

    fn all() -> &'static [Self] {
        &[Gender::Male, Gender::Female]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    fn form_label(&self) -> &'static str {
        match self {
            Gender::Male => "👨 Male",
            Gender::Female => "👩 Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wakeup {
    Early,
    Mid,
    Late,
}

impl Category for Wakeup {
    const FIELD: &'static str = "wakeup";

    fn all() -> &'static [Self] {
        &[Wakeup::Early, Wakeup::Mid, Wakeup::Late]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Wakeup::Early => "Early",
            Wakeup::Mid => "Mid",
            Wakeup::Late => "Late",
        }
    }

    fn form_label(&self) -> &'static str {
        match self {
            Wakeup::Early => "🐓 Early (6–8 AM)",
            Wakeup::Mid => "😴 Mid (9–11 AM)",
            Wakeup::Late => "🦥 Late (12 PM or later)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sleep {
    Early,
    Mid,
    Late,
}

impl Category for Sleep {
    const FIELD: &'static str = "sleep";

    fn all() -> &'static [Self] {
        &[Sleep::Early, Sleep::Mid, Sleep::Late]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Sleep::Early => "Early",
            Sleep::Mid => "Mid",
            Sleep::Late => "Late",
        }
    }

    fn form_label(&self) -> &'static str {
        match self {
            Sleep::Early => "🌌 Early (Before 11 PM)",
            Sleep::Mid => "🕰️ Mid (11 PM – 1 AM)",
            Sleep::Late => "🌃 Late (2 AM or later)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StudyTime {
    Morning,
    Night,
}

impl Category for StudyTime {
    const FIELD: &'static str = "study_time";

    fn all() -> &'static [Self] {
        &[StudyTime::Morning, StudyTime::Night]
    }

    fn as_str(&self) -> &'static str {
        match self {
            StudyTime::Morning => "Morning",
            StudyTime::Night => "Night",
        }
    }

    fn form_label(&self) -> &'static str {
        match self {
            StudyTime::Morning => "☀️ Morning",
            StudyTime::Night => "🌙 Night",
        }
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_label!(Gender, Wakeup, Sleep, StudyTime);

/// Whether an attribute is one-hot encoded or standardized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Categorical,
    Numeric,
}

/// A profile attribute that can enter the feature vector.
///
/// Gender and the free-text description are deliberately absent: they are
/// used for filtering and display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Wakeup,
    Sleep,
    StudyTime,
    PetFriendly,
    Cleanliness,
    SocialEnergy,
    NoiseTolerance,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Wakeup => "wakeup",
            Attribute::Sleep => "sleep",
            Attribute::StudyTime => "study_time",
            Attribute::PetFriendly => "pet_friendly",
            Attribute::Cleanliness => "cleanliness",
            Attribute::SocialEnergy => "social_energy",
            Attribute::NoiseTolerance => "noise_tolerance",
        }
    }

    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Wakeup
            | Attribute::Sleep
            | Attribute::StudyTime
            | Attribute::PetFriendly => AttributeKind::Categorical,
            Attribute::Cleanliness | Attribute::SocialEnergy | Attribute::NoiseTolerance => {
                AttributeKind::Numeric
            }
        }
    }

    /// Category label of a categorical attribute, `None` for numeric ones
    pub fn category(&self, profile: &Profile) -> Option<&'static str> {
        match self {
            Attribute::Wakeup => Some(profile.wakeup().as_str()),
            Attribute::Sleep => Some(profile.sleep().as_str()),
            Attribute::StudyTime => Some(profile.study_time().as_str()),
            Attribute::PetFriendly => Some(match profile.pet_friendly() {
                Some(true) => "Yes",
                Some(false) => "No",
                None => "Unspecified",
            }),
            _ => None,
        }
    }

    /// Value of a numeric attribute, `None` for categorical ones
    pub fn number(&self, profile: &Profile) -> Option<f32> {
        match self {
            Attribute::Cleanliness => Some(f32::from(profile.cleanliness())),
            Attribute::SocialEnergy => Some(profile.social_energy()),
            Attribute::NoiseTolerance => Some(f32::from(profile.noise_tolerance())),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

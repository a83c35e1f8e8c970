//! Phase, role, and clarification-key enums for Quill.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! [`Phase`] provides `allowed_next_states()` to enforce valid transitions at
//! the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Position of a workspace in its research lifecycle.
///
/// ```text
/// clarification → planning → gathering → summarizing → ongoing
///                                      ↘ ongoing (recovery)
/// ```
///
/// The only edge that skips a step is `gathering → ongoing`, taken by the
/// auto-recovery rule once sources and their analyses are already in place.
/// `summarizing → ongoing` is the normal analysis-complete edge.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Clarification,
    Planning,
    Gathering,
    Summarizing,
    Ongoing,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Clarification,
        Self::Planning,
        Self::Gathering,
        Self::Summarizing,
        Self::Ongoing,
    ];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Clarification => &[Self::Planning],
            Self::Planning => &[Self::Gathering],
            Self::Gathering => &[Self::Summarizing, Self::Ongoing],
            Self::Summarizing => &[Self::Ongoing],
            Self::Ongoing => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether this phase is one of the source-collection phases
    /// (`gathering` or `summarizing`).
    #[must_use]
    pub const fn is_collecting(self) -> bool {
        matches!(self, Self::Gathering | Self::Summarizing)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clarification => "clarification",
            Self::Planning => "planning",
            Self::Gathering => "gathering",
            Self::Summarizing => "summarizing",
            Self::Ongoing => "ongoing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown phase '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Author of a chat turn or language-model message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClarificationKey
// ---------------------------------------------------------------------------

/// The fixed set of soft facts gathered during clarification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClarificationKey {
    AcademicLevel,
    Purpose,
    FocusArea,
}

impl ClarificationKey {
    pub const ALL: [Self; 3] = [Self::AcademicLevel, Self::Purpose, Self::FocusArea];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AcademicLevel => "academic_level",
            Self::Purpose => "purpose",
            Self::FocusArea => "focus_area",
        }
    }

    /// Human-readable label used in prompts and progress replies.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AcademicLevel => "Academic level",
            Self::Purpose => "Purpose",
            Self::FocusArea => "Focus area",
        }
    }
}

impl fmt::Display for ClarificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Phase::Clarification, Phase::Planning, true)]
    #[case(Phase::Planning, Phase::Gathering, true)]
    #[case(Phase::Gathering, Phase::Summarizing, true)]
    #[case(Phase::Gathering, Phase::Ongoing, true)]
    #[case(Phase::Summarizing, Phase::Ongoing, true)]
    #[case(Phase::Clarification, Phase::Gathering, false)]
    #[case(Phase::Planning, Phase::Clarification, false)]
    #[case(Phase::Ongoing, Phase::Summarizing, false)]
    #[case(Phase::Ongoing, Phase::Clarification, false)]
    fn phase_transitions(#[case] from: Phase, #[case] to: Phase, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed, "{from} -> {to}");
    }

    #[test]
    fn every_transition_moves_forward() {
        for phase in Phase::ALL {
            for next in phase.allowed_next_states() {
                assert!(*next > phase, "{phase} -> {next} moves backwards");
            }
        }
    }

    #[test]
    fn phase_string_roundtrip() {
        for phase in Phase::ALL {
            assert_eq!(phase.as_str().parse::<Phase>().unwrap(), phase);
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.as_str()));
        }
        assert!("drafting".parse::<Phase>().is_err());
    }

    #[test]
    fn default_phase_is_clarification() {
        assert_eq!(Phase::default(), Phase::Clarification);
    }

    #[test]
    fn collecting_phases() {
        assert!(Phase::Gathering.is_collecting());
        assert!(Phase::Summarizing.is_collecting());
        assert!(!Phase::Ongoing.is_collecting());
        assert!(!Phase::Planning.is_collecting());
    }
}

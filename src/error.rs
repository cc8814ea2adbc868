//! Error types for the standings engine.
//!
//! All errors are strongly typed using thiserror. A residual tie or a rule
//! that lacks the data it needs is *not* an error; those outcomes live in
//! [`crate::tiebreak::GroupStatus`] and [`crate::tiebreak::RuleOutcome`].

use std::path::PathBuf;

use thiserror::Error;

use crate::game::GameId;
use crate::team::TeamId;
use crate::tiebreak::Rule;

/// Validation errors raised while building or querying a schedule graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Team name cannot be empty")]
    EmptyTeamName,

    #[error("Team '{name}' is already a member of the conference")]
    DuplicateTeam {
        name: String,
    },

    #[error("Team not found: {id}")]
    UnknownTeam {
        id: TeamId,
    },

    #[error("Team not found by name: '{name}'")]
    UnknownTeamName {
        name: String,
    },

    #[error("Game not found: {id}")]
    UnknownGame {
        id: GameId,
    },

    #[error("Team {team} cannot be paired against itself")]
    SelfPairing {
        team: TeamId,
    },

    #[error("Winner {winner} did not play in game {game}")]
    WinnerNotParticipant {
        game: GameId,
        winner: TeamId,
    },

    #[error("Team {team} appears more than once in a tie group")]
    DuplicateMember {
        team: TeamId,
    },

    #[error("Tie group must contain at least one team")]
    EmptyGroup,

    #[error("Team {team} is not a member of conference '{code}'")]
    NotAMember {
        team: TeamId,
        code: String,
    },
}

/// Configuration defects in the rule cascade registry.
///
/// These are fatal for the resolution call: a conference without a cascade
/// is never treated as "no tiebreak".
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("No tiebreak cascade registered for conference '{code}'")]
    CascadeMissing {
        code: String,
    },

    #[error("Unknown tiebreak rule: '{name}'")]
    UnknownRule {
        name: String,
    },

    #[error("Rule '{rule}' only applies to two teams but is registered for multi-team ties at step {step} of '{code}'")]
    ArityMismatch {
        code: String,
        step: usize,
        rule: Rule,
    },

    #[error("Cascade for conference '{code}' has no steps")]
    EmptyCascade {
        code: String,
    },

    #[error("Conference '{code}' is registered more than once")]
    DuplicateCascade {
        code: String,
    },

    #[error("Invalid registry configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Top-level error type for the standings engine.
#[derive(Debug, Error)]
pub enum TiebreakError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to read registry file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse registry configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl TiebreakError {
    /// Returns true if this is a schedule-graph validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this error points at a registry defect.
    ///
    /// Unreadable or unparsable registry files count as configuration defects.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Io { .. } | Self::Parse(_))
    }
}

/// Result type alias for engine operations.
pub type TiebreakResult<T> = Result<T, TiebreakError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_duplicate_team() {
        let err = ValidationError::DuplicateTeam {
            name: "Clemson".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("Clemson"));
        assert!(msg.contains("already a member"));
    }

    #[test]
    fn test_validation_error_winner_not_participant() {
        let err = ValidationError::WinnerNotParticipant {
            game: GameId::from_index(4),
            winner: TeamId::from_index(9),
        };
        let msg = format!("{err}");
        assert!(msg.contains("game#4"));
        assert!(msg.contains("team#9"));
    }

    #[test]
    fn test_configuration_error_cascade_missing() {
        let err = ConfigurationError::CascadeMissing {
            code: "PAC".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("PAC"));
    }

    #[test]
    fn test_configuration_error_arity_mismatch() {
        let err = ConfigurationError::ArityMismatch {
            code: "ACC".to_string(),
            step: 2,
            rule: Rule::HeadToHeadTwo,
        };
        let msg = format!("{err}");
        assert!(msg.contains("head_to_head_two"));
        assert!(msg.contains("step 2"));
    }

    #[test]
    fn test_tiebreak_error_from_validation() {
        let err: TiebreakError = ValidationError::EmptyGroup.into();
        assert!(err.is_validation());
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_tiebreak_error_from_configuration() {
        let err: TiebreakError = ConfigurationError::UnknownRule {
            name: "coin_flip".to_string(),
        }
        .into();
        assert!(err.is_configuration());
        assert!(!err.is_validation());
        assert!(format!("{err}").contains("coin_flip"));
    }

    #[test]
    fn test_tiebreak_error_from_parse() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: TiebreakError = parse_err.into();
        assert!(err.is_configuration());
    }
}

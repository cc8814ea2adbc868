//! Conference games and their results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::team::TeamId;

/// Stable index of a game within its conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(usize);

impl GameId {
    /// Creates a game id from a raw index.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game#{}", self.0)
    }
}

/// A scheduled conference game.
///
/// `winner` is `None` until a result is recorded. When present it is always
/// `home` or `away`; [`Conference`](crate::Conference) rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    /// Stable identifier within the conference.
    pub id: GameId,

    /// Home team.
    pub home: TeamId,

    /// Away team.
    pub away: TeamId,

    /// Winner, or `None` while the game is unplayed.
    pub winner: Option<TeamId>,
}

impl Game {
    /// Returns true if `team` is one of the two participants.
    #[must_use]
    pub fn involves(&self, team: TeamId) -> bool {
        self.home == team || self.away == team
    }

    /// Returns true once a result has been recorded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.winner.is_some()
    }

    /// The other participant, or `None` if `team` did not play in this game.
    #[must_use]
    pub fn opponent_of(&self, team: TeamId) -> Option<TeamId> {
        if self.home == team {
            Some(self.away)
        } else if self.away == team {
            Some(self.home)
        } else {
            None
        }
    }

    /// The losing participant of a completed game.
    #[must_use]
    pub fn loser(&self) -> Option<TeamId> {
        self.winner.and_then(|w| self.opponent_of(w))
    }

    /// Returns true if `team` won this game.
    #[must_use]
    pub fn won_by(&self, team: TeamId) -> bool {
        self.winner == Some(team)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.away, self.home)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(winner: Option<usize>) -> Game {
        Game {
            id: GameId::from_index(0),
            home: TeamId::from_index(1),
            away: TeamId::from_index(2),
            winner: winner.map(TeamId::from_index),
        }
    }

    #[test]
    fn test_opponent_of() {
        let g = game(None);
        assert_eq!(g.opponent_of(TeamId::from_index(1)), Some(TeamId::from_index(2)));
        assert_eq!(g.opponent_of(TeamId::from_index(2)), Some(TeamId::from_index(1)));
        assert_eq!(g.opponent_of(TeamId::from_index(3)), None);
    }

    #[test]
    fn test_loser_requires_result() {
        assert_eq!(game(None).loser(), None);
        assert_eq!(game(Some(2)).loser(), Some(TeamId::from_index(1)));
    }

    #[test]
    fn test_completion_and_winner() {
        let g = game(Some(1));
        assert!(g.is_complete());
        assert!(g.won_by(TeamId::from_index(1)));
        assert!(!g.won_by(TeamId::from_index(2)));
        assert!(!game(None).is_complete());
    }

    #[test]
    fn test_display_is_away_at_home() {
        assert_eq!(game(None).to_string(), "team#2 @ team#1");
    }
}

//! Team identity.
//!
//! Teams are owned by their [`Conference`](crate::Conference); everything
//! else refers to them through a stable [`TeamId`] index. Two teams are the
//! same team exactly when their ids match.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::GameId;

/// Stable index of a team within its conference.
///
/// Ids are assigned in insertion order and never reused, so they double as a
/// deterministic ordering for otherwise-equal teams.
///
/// # Examples
///
/// ```
/// use conference_standings::TeamId;
///
/// let id = TeamId::from_index(3);
/// assert_eq!(id.index(), 3);
/// assert_eq!(id.to_string(), "team#3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(usize);

impl TeamId {
    /// Creates a team id from a raw index.
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

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team#{}", self.0)
    }
}

/// A conference member.
///
/// The game list holds ids into the owning conference's game table; it is
/// only ever extended through [`Conference::add_game`](crate::Conference::add_game).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Stable identifier within the conference.
    pub id: TeamId,

    /// Display name, unique within the conference.
    pub name: String,

    pub(crate) games: Vec<GameId>,

    /// Wins outside the conference schedule (used by total-wins rules).
    pub non_conference_wins: u32,

    /// Losses outside the conference schedule.
    pub non_conference_losses: u32,
}

impl Team {
    pub(crate) fn new(id: TeamId, name: String) -> Self {
        Self {
            id,
            name,
            games: Vec::new(),
            non_conference_wins: 0,
            non_conference_losses: 0,
        }
    }

    /// Conference games this team is scheduled in, played or not.
    #[must_use]
    pub fn game_ids(&self) -> &[GameId] {
        &self.games
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

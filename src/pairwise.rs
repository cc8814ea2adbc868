//! Pairwise record calculator.
//!
//! [`RecordBook`] answers the record questions tiebreak rules ask about an
//! arbitrary subset of teams: games among them, common opponents, win counts,
//! strength of schedule. Only completed games are ever counted.

use std::collections::HashMap;

use crate::conference::Conference;
use crate::game::Game;
use crate::record::{Record, WinPct};
use crate::team::TeamId;

/// Read-only record queries over one conference.
#[derive(Debug, Clone, Copy)]
pub struct RecordBook<'a> {
    conference: &'a Conference,
}

impl<'a> RecordBook<'a> {
    /// Creates a record book over `conference`.
    #[must_use]
    pub const fn new(conference: &'a Conference) -> Self {
        Self { conference }
    }

    /// The underlying schedule graph.
    #[must_use]
    pub const fn conference(&self) -> &'a Conference {
        self.conference
    }

    /// Completed games whose participants are both in `teams`.
    #[must_use]
    pub fn games_among(&self, teams: &[TeamId]) -> Vec<&'a Game> {
        self.conference
            .games()
            .iter()
            .filter(|g| g.is_complete() && teams.contains(&g.home) && teams.contains(&g.away))
            .collect()
    }

    /// Returns true if every unordered pair in `teams` has exactly one
    /// completed meeting, i.e. `|games_among| == n(n-1)/2` with no pair
    /// repeated. A rematch inside the group makes it a partial schedule.
    #[must_use]
    pub fn is_round_robin(&self, teams: &[TeamId]) -> bool {
        let games = self.games_among(teams);
        teams.iter().enumerate().all(|(i, a)| {
            teams[i + 1..].iter().all(|b| {
                games
                    .iter()
                    .filter(|g| g.involves(*a) && g.involves(*b))
                    .count()
                    == 1
            })
        })
    }

    /// Opponents every team in `teams` has a completed game against,
    /// excluding the teams themselves, in id order.
    #[must_use]
    pub fn common_opponents(&self, teams: &[TeamId]) -> Vec<TeamId> {
        let Some((first, rest)) = teams.split_first() else {
            return Vec::new();
        };

        let mut common: Vec<TeamId> = self
            .conference
            .opponents_of(*first)
            .into_iter()
            .filter(|o| !teams.contains(o))
            .collect();
        for team in rest {
            let theirs = self.conference.opponents_of(*team);
            common.retain(|o| theirs.contains(o));
        }
        common.sort_unstable();
        common
    }

    /// Wins of each team in `teams` within `games`. Every team gets an entry,
    /// zero included.
    #[must_use]
    pub fn win_counts(&self, teams: &[TeamId], games: &[&Game]) -> HashMap<TeamId, u32> {
        let mut counts: HashMap<TeamId, u32> = teams.iter().map(|t| (*t, 0)).collect();
        for game in games {
            if let Some(winner) = game.winner {
                if let Some(count) = counts.get_mut(&winner) {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// Record of `team` in completed games against any of `opponents`.
    #[must_use]
    pub fn record_against(&self, team: TeamId, opponents: &[TeamId]) -> Record {
        let mut record = Record::default();
        for game in self.conference.completed_games_of(team) {
            if game.opponent_of(team).is_some_and(|o| opponents.contains(&o)) {
                record.record_result(game.won_by(team));
            }
        }
        record
    }

    /// How many other members of `teams` `team` has a completed game against.
    #[must_use]
    pub fn opponents_met_within(&self, team: TeamId, teams: &[TeamId]) -> usize {
        self.conference
            .opponents_of(team)
            .iter()
            .filter(|o| teams.contains(o))
            .count()
    }

    /// How many other members of `teams` `team` won every completed meeting
    /// against. Each opponent counts once however often they met.
    #[must_use]
    pub fn opponents_beaten_within(&self, team: TeamId, teams: &[TeamId]) -> usize {
        self.conference
            .opponents_of(team)
            .into_iter()
            .filter(|o| teams.contains(o))
            .filter(|o| {
                let record = self.record_against(team, &[*o]);
                record.wins > 0 && record.losses == 0
            })
            .count()
    }

    /// Combined conference winning percentage of every conference opponent
    /// `team` has played.
    #[must_use]
    pub fn strength_of_schedule(&self, team: TeamId) -> WinPct {
        let mut combined = Record::default();
        for opponent in self.conference.opponents_of(team) {
            if let Ok(record) = self.conference.conference_record(opponent) {
                combined += record;
            }
        }
        combined.win_pct()
    }

    /// Conference wins plus non-conference wins.
    #[must_use]
    pub fn total_wins(&self, team: TeamId) -> u32 {
        self.conference
            .season_record(team)
            .map(|r| r.wins)
            .unwrap_or_default()
    }
}

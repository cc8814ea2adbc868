//! The schedule graph for one conference season.
//!
//! A [`Conference`] is the sole owner of its teams and games. Teams refer to
//! their games by [`GameId`] and games refer to their participants by
//! [`TeamId`], so there are no reference cycles. Every mutation goes through
//! a `Conference` method, which keeps the conference game table and both
//! participants' game lists consistent.
//!
//! The tiebreak engine only ever borrows `&Conference`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::game::{Game, GameId};
use crate::record::Record;
use crate::team::{Team, TeamId};

/// Teams, games and results for one conference season.
///
/// # Examples
///
/// ```
/// use conference_standings::{Conference, Record};
///
/// let mut acc = Conference::new("Atlantic Coast Conference", "ACC");
/// let duke = acc.add_team("Duke").unwrap();
/// let smu = acc.add_team("SMU").unwrap();
/// acc.add_game(duke, smu, Some(smu)).unwrap();
///
/// assert_eq!(acc.conference_record(smu).unwrap(), Record::new(1, 0));
/// assert_eq!(acc.game_between(duke, smu).unwrap().winner, Some(smu));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conference {
    name: String,
    code: String,
    teams: Vec<Team>,
    games: Vec<Game>,
    by_name: HashMap<String, TeamId>,
    updated_at: DateTime<Utc>,
}

impl Conference {
    /// Creates an empty conference stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            teams: Vec::new(),
            games: Vec::new(),
            by_name: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Full conference name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short code used to select the tiebreak cascade.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// When the schedule data was last refreshed.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Overrides the refresh timestamp (e.g. when restoring a snapshot).
    pub fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    /// Stamps the conference as refreshed now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Adds a member team.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyTeamName` for a blank name and
    /// `ValidationError::DuplicateTeam` if the name is already taken.
    pub fn add_team(&mut self, name: impl Into<String>) -> Result<TeamId, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTeamName);
        }
        if self.by_name.contains_key(trimmed) {
            return Err(ValidationError::DuplicateTeam {
                name: trimmed.to_string(),
            });
        }

        let id = TeamId::from_index(self.teams.len());
        self.by_name.insert(trimmed.to_string(), id);
        self.teams.push(Team::new(id, trimmed.to_string()));
        Ok(id)
    }

    /// Adds a conference game, optionally with its result.
    ///
    /// The game is attached to the conference game table and to both
    /// participants' schedules.
    ///
    /// # Errors
    ///
    /// Returns an error if either team is unknown, a team is paired with
    /// itself, or `winner` is not one of the participants.
    pub fn add_game(
        &mut self,
        home: TeamId,
        away: TeamId,
        winner: Option<TeamId>,
    ) -> Result<GameId, ValidationError> {
        self.require_team(home)?;
        self.require_team(away)?;
        if home == away {
            return Err(ValidationError::SelfPairing { team: home });
        }

        let id = GameId::from_index(self.games.len());
        if let Some(w) = winner {
            if w != home && w != away {
                return Err(ValidationError::WinnerNotParticipant { game: id, winner: w });
            }
        }

        self.games.push(Game {
            id,
            home,
            away,
            winner,
        });
        self.teams[home.index()].games.push(id);
        self.teams[away.index()].games.push(id);
        Ok(id)
    }

    /// Adds a game using team names, as schedule feeds report them.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownTeamName` for names that are not
    /// members, plus everything [`Conference::add_game`] can return.
    pub fn add_game_by_name(
        &mut self,
        home: &str,
        away: &str,
        winner: Option<&str>,
    ) -> Result<GameId, ValidationError> {
        let home = self.require_name(home)?;
        let away = self.require_name(away)?;
        let winner = winner.map(|w| self.require_name(w)).transpose()?;
        self.add_game(home, away, winner)
    }

    /// Records (or clears, with `None`) the result of an existing game.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownGame` or
    /// `ValidationError::WinnerNotParticipant`.
    pub fn set_result(&mut self, game: GameId, winner: Option<TeamId>) -> Result<(), ValidationError> {
        let entry = self
            .games
            .get_mut(game.index())
            .ok_or(ValidationError::UnknownGame { id: game })?;
        if let Some(w) = winner {
            if !entry.involves(w) {
                return Err(ValidationError::WinnerNotParticipant { game, winner: w });
            }
        }
        entry.winner = winner;
        Ok(())
    }

    /// Tallies a result against a team outside the conference.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownTeam` if `team` is not a member.
    pub fn record_non_conference_result(&mut self, team: TeamId, won: bool) -> Result<(), ValidationError> {
        let entry = self
            .teams
            .get_mut(team.index())
            .ok_or(ValidationError::UnknownTeam { id: team })?;
        if won {
            entry.non_conference_wins += 1;
        } else {
            entry.non_conference_losses += 1;
        }
        Ok(())
    }

    /// All member teams in insertion order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// All conference games in insertion order.
    #[must_use]
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Ids of all member teams in insertion order.
    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.teams.iter().map(|t| t.id)
    }

    /// Looks up a team by id.
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index())
    }

    /// Looks up a team by its exact name.
    #[must_use]
    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.by_name.get(name.trim()).and_then(|id| self.team(*id))
    }

    /// Returns the team's name, or its id when the team is unknown.
    #[must_use]
    pub fn team_name(&self, id: TeamId) -> String {
        self.team(id).map_or_else(|| id.to_string(), |t| t.name.clone())
    }

    /// Returns true if `id` belongs to this conference.
    #[must_use]
    pub fn contains(&self, id: TeamId) -> bool {
        id.index() < self.teams.len()
    }

    /// Looks up a game by id.
    #[must_use]
    pub fn game(&self, id: GameId) -> Option<&Game> {
        self.games.get(id.index())
    }

    /// Every scheduled game of `team`, played or not.
    pub fn games_of(&self, team: TeamId) -> impl Iterator<Item = &Game> + '_ {
        self.team(team)
            .map(|t| t.games.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |id| self.game(*id))
    }

    /// Completed games of `team`.
    pub fn completed_games_of(&self, team: TeamId) -> impl Iterator<Item = &Game> + '_ {
        self.games_of(team).filter(|g| g.is_complete())
    }

    /// The meeting between `a` and `b`. A completed meeting is preferred over
    /// a scheduled one.
    #[must_use]
    pub fn game_between(&self, a: TeamId, b: TeamId) -> Option<&Game> {
        let mut scheduled = None;
        for game in self.games_of(a).filter(|g| g.involves(b)) {
            if game.is_complete() {
                return Some(game);
            }
            scheduled.get_or_insert(game);
        }
        scheduled
    }

    /// Distinct opponents `team` has a completed game against, in schedule order.
    #[must_use]
    pub fn opponents_of(&self, team: TeamId) -> Vec<TeamId> {
        let mut opponents = Vec::new();
        for opp in self.completed_games_of(team).filter_map(|g| g.opponent_of(team)) {
            if !opponents.contains(&opp) {
                opponents.push(opp);
            }
        }
        opponents
    }

    /// Games without a recorded result.
    pub fn unplayed_games(&self) -> impl Iterator<Item = &Game> + '_ {
        self.games.iter().filter(|g| !g.is_complete())
    }

    /// Number of distinct ways the remaining games can finish (`2^unplayed`),
    /// or `None` when that does not fit in a `u128`.
    #[must_use]
    pub fn remaining_outcome_count(&self) -> Option<u128> {
        let unplayed = u32::try_from(self.unplayed_games().count()).ok()?;
        1u128.checked_shl(unplayed)
    }

    /// Conference-only record of `team`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownTeam` if `team` is not a member.
    pub fn conference_record(&self, team: TeamId) -> Result<Record, ValidationError> {
        self.require_team(team)?;
        let mut record = Record::default();
        for game in self.completed_games_of(team) {
            record.record_result(game.won_by(team));
        }
        Ok(record)
    }

    /// Season record of `team`: conference plus non-conference results.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownTeam` if `team` is not a member.
    pub fn season_record(&self, team: TeamId) -> Result<Record, ValidationError> {
        let conference = self.conference_record(team)?;
        let entry = &self.teams[team.index()];
        Ok(conference + Record::new(entry.non_conference_wins, entry.non_conference_losses))
    }

    pub(crate) fn require_team(&self, team: TeamId) -> Result<(), ValidationError> {
        if self.contains(team) {
            Ok(())
        } else {
            Err(ValidationError::UnknownTeam { id: team })
        }
    }

    fn require_name(&self, name: &str) -> Result<TeamId, ValidationError> {
        self.team_by_name(name)
            .map(|t| t.id)
            .ok_or_else(|| ValidationError::UnknownTeamName {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_team() -> (Conference, TeamId, TeamId, TeamId) {
        let mut conf = Conference::new("Test", "TST");
        let a = conf.add_team("A").unwrap();
        let b = conf.add_team("B").unwrap();
        let c = conf.add_team("C").unwrap();
        (conf, a, b, c)
    }

    #[test]
    fn test_add_team_rejects_duplicates_and_blanks() {
        let (mut conf, ..) = three_team();
        assert_eq!(
            conf.add_team(" A "),
            Err(ValidationError::DuplicateTeam { name: "A".to_string() })
        );
        assert_eq!(conf.add_team("   "), Err(ValidationError::EmptyTeamName));
    }

    #[test]
    fn test_add_game_updates_all_three_views() {
        let (mut conf, a, b, _) = three_team();
        let g = conf.add_game(a, b, Some(a)).unwrap();

        assert_eq!(conf.games().len(), 1);
        assert_eq!(conf.team(a).unwrap().game_ids(), &[g]);
        assert_eq!(conf.team(b).unwrap().game_ids(), &[g]);
        assert_eq!(conf.game(g).unwrap().winner, Some(a));
    }

    #[test]
    fn test_add_game_validation() {
        let (mut conf, a, b, c) = three_team();
        assert_eq!(conf.add_game(a, a, None), Err(ValidationError::SelfPairing { team: a }));
        assert!(matches!(
            conf.add_game(a, b, Some(c)),
            Err(ValidationError::WinnerNotParticipant { .. })
        ));
        let ghost = TeamId::from_index(42);
        assert_eq!(conf.add_game(a, ghost, None), Err(ValidationError::UnknownTeam { id: ghost }));
        assert!(conf.games().is_empty());
        assert!(conf.team(a).unwrap().game_ids().is_empty());
    }

    #[test]
    fn test_add_game_by_name() {
        let (mut conf, a, b, _) = three_team();
        let g = conf.add_game_by_name("A", "B", Some("B")).unwrap();
        let game = conf.game(g).unwrap();
        assert_eq!((game.home, game.away, game.winner), (a, b, Some(b)));
        assert!(matches!(
            conf.add_game_by_name("A", "Z", None),
            Err(ValidationError::UnknownTeamName { .. })
        ));
    }

    #[test]
    fn test_set_result() {
        let (mut conf, a, b, c) = three_team();
        let g = conf.add_game(a, b, None).unwrap();
        assert_eq!(conf.unplayed_games().count(), 1);

        conf.set_result(g, Some(b)).unwrap();
        assert_eq!(conf.unplayed_games().count(), 0);
        assert_eq!(conf.conference_record(b).unwrap(), Record::new(1, 0));

        assert!(conf.set_result(g, Some(c)).is_err());
        assert!(conf.set_result(GameId::from_index(9), None).is_err());

        conf.set_result(g, None).unwrap();
        assert_eq!(conf.conference_record(b).unwrap(), Record::default());
    }

    #[test]
    fn test_game_between_prefers_completed_meeting() {
        let (mut conf, a, b, _) = three_team();
        conf.add_game(a, b, None).unwrap();
        let played = conf.add_game(b, a, Some(a)).unwrap();
        assert_eq!(conf.game_between(a, b).unwrap().id, played);
        assert_eq!(conf.game_between(b, a).unwrap().id, played);
    }

    #[test]
    fn test_opponents_only_count_completed_games() {
        let (mut conf, a, b, c) = three_team();
        conf.add_game(a, b, Some(a)).unwrap();
        conf.add_game(a, c, None).unwrap();
        assert_eq!(conf.opponents_of(a), vec![b]);
    }

    #[test]
    fn test_season_record_includes_non_conference() {
        let (mut conf, a, b, _) = three_team();
        conf.add_game(a, b, Some(a)).unwrap();
        conf.record_non_conference_result(a, true).unwrap();
        conf.record_non_conference_result(a, false).unwrap();
        assert_eq!(conf.season_record(a).unwrap(), Record::new(2, 1));
        assert_eq!(conf.conference_record(a).unwrap(), Record::new(1, 0));
    }

    #[test]
    fn test_remaining_outcome_count() {
        let (mut conf, a, b, c) = three_team();
        assert_eq!(conf.remaining_outcome_count(), Some(1));
        conf.add_game(a, b, None).unwrap();
        conf.add_game(b, c, None).unwrap();
        conf.add_game(a, c, Some(c)).unwrap();
        assert_eq!(conf.remaining_outcome_count(), Some(4));
    }

    #[test]
    fn test_team_lookup() {
        let (conf, a, ..) = three_team();
        assert_eq!(conf.team_by_name("A").unwrap().id, a);
        assert!(conf.team_by_name("Z").is_none());
        assert_eq!(conf.team_name(TeamId::from_index(99)), "team#99");
        assert_eq!(conf.team_ids().count(), 3);
    }
}

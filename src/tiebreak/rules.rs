use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::conference::Conference;
use crate::error::ConfigurationError;
use crate::group::{partition_descending, TieGroup};
use crate::pairwise::RecordBook;
use crate::record::WinPct;
use crate::team::TeamId;
use crate::tiebreak::Placements;

/// Largest strength-of-schedule precision (decimal places) a cascade may use.
pub const MAX_SOS_PRECISION: u32 = 9;

/// Group sizes a rule is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// Only defined for a tie between exactly two teams.
    TwoTeam,
    /// Defined for any tie of two or more teams.
    MultiTeam,
}

/// A named tiebreak procedure.
///
/// Rules are pure: evaluation reads the schedule graph through a
/// [`RuleContext`] and never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Winner of the meeting between two tied teams.
    HeadToHeadTwo,

    /// Wins among the tied teams; round robins rank by wins, otherwise only
    /// a team that beat every other tied team is promoted. A rematch never
    /// counts as a second opponent beaten.
    HeadToHeadMulti,

    /// A team that lost to every other tied team is dropped below the rest.
    HeadToHeadLoserMulti,

    /// Wins against opponents every tied team has played.
    CommonOpponents,

    /// Results against common opponents taken one at a time, best-placed
    /// opponent first. Needs every common opponent's final position.
    CommonOpponentsInOrder,

    /// Like [`Rule::CommonOpponentsInOrder`], but opponents sharing a
    /// standings block are compared as one combined group.
    CommonOpponentsInOrderCollective,

    /// Combined conference winning percentage of conference opponents.
    StrengthOfSchedule,

    /// Multi-team form of [`Rule::StrengthOfSchedule`].
    StrengthOfScheduleMulti,

    /// Total season wins, conference and non-conference.
    TotalWins,

    /// Multi-team form of [`Rule::TotalWins`].
    TotalWinsMulti,
}

impl Rule {
    /// Every rule, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::HeadToHeadTwo,
        Self::HeadToHeadMulti,
        Self::HeadToHeadLoserMulti,
        Self::CommonOpponents,
        Self::CommonOpponentsInOrder,
        Self::CommonOpponentsInOrderCollective,
        Self::StrengthOfSchedule,
        Self::StrengthOfScheduleMulti,
        Self::TotalWins,
        Self::TotalWinsMulti,
    ];

    /// The group sizes this rule is written for.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::HeadToHeadTwo | Self::StrengthOfSchedule | Self::TotalWins => Arity::TwoTeam,
            _ => Arity::MultiTeam,
        }
    }

    /// Returns a short stable identifier suitable for configuration and logging.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::HeadToHeadTwo => "head_to_head_two",
            Self::HeadToHeadMulti => "head_to_head_multi",
            Self::HeadToHeadLoserMulti => "head_to_head_loser_multi",
            Self::CommonOpponents => "common_opponents",
            Self::CommonOpponentsInOrder => "common_opponents_in_order",
            Self::CommonOpponentsInOrderCollective => "common_opponents_in_order_collective",
            Self::StrengthOfSchedule => "strength_of_schedule",
            Self::StrengthOfScheduleMulti => "strength_of_schedule_multi",
            Self::TotalWins => "total_wins",
            Self::TotalWinsMulti => "total_wins_multi",
        }
    }

    /// Applies the rule to `group`.
    ///
    /// Groups of fewer than two teams, and groups of any size other than two
    /// for a [`Arity::TwoTeam`] rule, come back [`RuleOutcome::Unchanged`].
    #[must_use]
    pub fn evaluate(self, group: &TieGroup, ctx: &RuleContext<'_>) -> RuleOutcome {
        if group.len() < 2 || (self.arity() == Arity::TwoTeam && group.len() != 2) {
            return RuleOutcome::Unchanged;
        }

        match self {
            Self::HeadToHeadTwo => head_to_head_two(group, ctx),
            Self::HeadToHeadMulti => head_to_head_multi(group, ctx),
            Self::HeadToHeadLoserMulti => head_to_head_loser(group, ctx),
            Self::CommonOpponents => common_opponents(group, ctx),
            Self::CommonOpponentsInOrder => common_opponents_in_order(group, ctx),
            Self::CommonOpponentsInOrderCollective => common_opponents_collective(group, ctx),
            Self::StrengthOfSchedule | Self::StrengthOfScheduleMulti => strength_of_schedule(group, ctx),
            Self::TotalWins | Self::TotalWinsMulti => {
                RuleOutcome::from_partition(partition_descending(group, |t| ctx.book.total_wins(t)))
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rule {
    type Err = ConfigurationError;

    /// Accepts `head_to_head_two` as well as `HeadToHeadTwo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|rule| rule.name().replace('_', "") == wanted)
            .ok_or_else(|| ConfigurationError::UnknownRule {
                name: s.to_string(),
            })
    }
}

/// Why a rule declined to judge a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DeclineReason {
    /// A common opponent has no position in the known standings.
    OpponentNotPlaced {
        /// The opponent in question.
        opponent: TeamId,
    },

    /// A common opponent's position is still tied with other teams.
    OpponentPlacementUnsettled {
        /// The opponent in question.
        opponent: TeamId,
    },
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpponentNotPlaced { opponent } => {
                write!(f, "common opponent {opponent} has no standings position")
            }
            Self::OpponentPlacementUnsettled { opponent } => {
                write!(f, "common opponent {opponent} is not yet separated in the standings")
            }
        }
    }
}

/// Result of applying one rule to one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// The group was split into two or more ordered sub-groups.
    Split(Vec<TieGroup>),

    /// The rule applied but separated nobody.
    Unchanged,

    /// The rule needs data the schedule graph cannot supply yet.
    Declined {
        /// What was missing.
        reason: DeclineReason,
    },
}

impl RuleOutcome {
    fn from_partition(parts: Vec<TieGroup>) -> Self {
        if parts.len() > 1 {
            Self::Split(parts)
        } else {
            Self::Unchanged
        }
    }

    /// Returns true if the rule separated the group.
    #[must_use]
    pub const fn is_split(&self) -> bool {
        matches!(self, Self::Split(_))
    }

    /// The ordered partition this outcome stands for; anything other than a
    /// split is the identity partition `[group]`.
    #[must_use]
    pub fn into_partition(self, group: &TieGroup) -> Vec<TieGroup> {
        match self {
            Self::Split(parts) => parts,
            Self::Unchanged | Self::Declined { .. } => vec![group.clone()],
        }
    }
}

/// Everything a rule may consult while judging a group.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    book: RecordBook<'a>,
    placements: &'a Placements,
    sos_precision: u32,
}

impl<'a> RuleContext<'a> {
    /// Creates a context over `conference` with already-final `placements`.
    #[must_use]
    pub fn new(conference: &'a Conference, placements: &'a Placements, sos_precision: u32) -> Self {
        Self {
            book: RecordBook::new(conference),
            placements,
            sos_precision: sos_precision.min(MAX_SOS_PRECISION),
        }
    }

    /// Record queries over the schedule graph.
    #[must_use]
    pub const fn book(&self) -> &RecordBook<'a> {
        &self.book
    }

    /// Known standings positions.
    #[must_use]
    pub const fn placements(&self) -> &'a Placements {
        self.placements
    }

    /// Decimal places strength-of-schedule scores are compared at.
    #[must_use]
    pub const fn sos_precision(&self) -> u32 {
        self.sos_precision
    }
}

fn head_to_head_two(group: &TieGroup, ctx: &RuleContext<'_>) -> RuleOutcome {
    let teams = group.teams();
    let games = ctx.book.games_among(teams);
    let wins = ctx.book.win_counts(teams, &games);
    RuleOutcome::from_partition(partition_descending(group, |t| wins[&t]))
}

fn head_to_head_multi(group: &TieGroup, ctx: &RuleContext<'_>) -> RuleOutcome {
    let teams = group.teams();

    if ctx.book.is_round_robin(teams) {
        let games = ctx.book.games_among(teams);
        let wins = ctx.book.win_counts(teams, &games);
        return RuleOutcome::from_partition(partition_descending(group, |t| wins[&t]));
    }

    let others = teams.len() - 1;
    match group
        .iter()
        .find(|t| ctx.book.opponents_beaten_within(*t, teams) == others)
    {
        Some(top) => RuleOutcome::Split(vec![TieGroup::singleton(top), without(group, top)]),
        None => RuleOutcome::Unchanged,
    }
}

fn head_to_head_loser(group: &TieGroup, ctx: &RuleContext<'_>) -> RuleOutcome {
    let teams = group.teams();
    let games = ctx.book.games_among(teams);
    let wins = ctx.book.win_counts(teams, &games);

    let mut swept = group
        .iter()
        .filter(|t| wins[t] == 0 && ctx.book.opponents_met_within(*t, teams) == teams.len() - 1);
    match (swept.next(), swept.next()) {
        (Some(bottom), None) => RuleOutcome::Split(vec![without(group, bottom), TieGroup::singleton(bottom)]),
        _ => RuleOutcome::Unchanged,
    }
}

fn common_opponents(group: &TieGroup, ctx: &RuleContext<'_>) -> RuleOutcome {
    let opponents = ctx.book.common_opponents(group.teams());
    if opponents.is_empty() {
        return RuleOutcome::Unchanged;
    }
    RuleOutcome::from_partition(partition_descending(group, |t| {
        ctx.book.record_against(t, &opponents).wins
    }))
}

fn common_opponents_in_order(group: &TieGroup, ctx: &RuleContext<'_>) -> RuleOutcome {
    let opponents = ctx.book.common_opponents(group.teams());
    if opponents.is_empty() {
        return RuleOutcome::Unchanged;
    }

    let mut ordered: Vec<(usize, TeamId)> = Vec::with_capacity(opponents.len());
    for opponent in opponents {
        let Some(position) = ctx.placements.block_index(opponent) else {
            return RuleOutcome::Declined {
                reason: DeclineReason::OpponentNotPlaced { opponent },
            };
        };
        if !ctx.placements.is_final(opponent) {
            return RuleOutcome::Declined {
                reason: DeclineReason::OpponentPlacementUnsettled { opponent },
            };
        }
        ordered.push((position, opponent));
    }
    ordered.sort_unstable();

    RuleOutcome::from_partition(partition_descending(group, |t| {
        ordered
            .iter()
            .map(|(_, o)| ctx.book.record_against(t, &[*o]).win_pct())
            .collect::<Vec<WinPct>>()
    }))
}

fn common_opponents_collective(group: &TieGroup, ctx: &RuleContext<'_>) -> RuleOutcome {
    let opponents = ctx.book.common_opponents(group.teams());
    if opponents.is_empty() {
        return RuleOutcome::Unchanged;
    }

    let mut blocks: BTreeMap<usize, Vec<TeamId>> = BTreeMap::new();
    for opponent in opponents {
        let Some(position) = ctx.placements.block_index(opponent) else {
            return RuleOutcome::Declined {
                reason: DeclineReason::OpponentNotPlaced { opponent },
            };
        };
        blocks.entry(position).or_default().push(opponent);
    }

    RuleOutcome::from_partition(partition_descending(group, |t| {
        blocks
            .values()
            .map(|block| ctx.book.record_against(t, block).win_pct())
            .collect::<Vec<WinPct>>()
    }))
}

fn strength_of_schedule(group: &TieGroup, ctx: &RuleContext<'_>) -> RuleOutcome {
    let scale = 10f64.powi(i32::try_from(ctx.sos_precision).unwrap_or(0));
    RuleOutcome::from_partition(partition_descending(group, |t| {
        #[allow(clippy::cast_possible_truncation)]
        let quantized = (ctx.book.strength_of_schedule(t).as_f64() * scale).round() as i64;
        quantized
    }))
}

fn without(group: &TieGroup, team: TeamId) -> TieGroup {
    TieGroup::from_distinct(group.iter().filter(|t| *t != team).collect())
}

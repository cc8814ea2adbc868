//! Full standings tables.
//!
//! Teams are bucketed by identical conference record, ordered by winning
//! percentage, then more wins, then fewer losses. Every tied bucket is handed to the conference cascade, top bucket first. Once a
//! bucket is resolved its order is written back into the [`Placements`] so
//! that rules comparing results against common opponents "in order of
//! finish" can see every position above and every settled position below.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::conference::Conference;
use crate::error::TiebreakResult;
use crate::group::{partition_descending, TieGroup};
use crate::record::Record;
use crate::team::TeamId;
use crate::tiebreak::{resolve_with_cascade, GroupStatus, Placements, Resolver, TraceEntry};

/// One line of the standings: a single team, or teams still tied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsRow {
    /// Competition rank: one more than the number of teams above.
    pub rank: usize,

    /// Members of the row.
    pub group: TieGroup,

    /// Conference record of each member, aligned with `group`.
    pub records: Vec<Record>,

    /// Whether the row is a single team or a residual tie.
    pub status: GroupStatus,
}

/// A conference standings table, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standings {
    code: String,
    generated_at: DateTime<Utc>,
    source_updated_at: DateTime<Utc>,
    rows: Vec<StandingsRow>,
    trace: Vec<TraceEntry>,
}

impl Standings {
    /// Conference short code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// When the table was built.
    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Refresh timestamp of the schedule data the table was built from.
    #[must_use]
    pub const fn source_updated_at(&self) -> DateTime<Utc> {
        self.source_updated_at
    }

    /// Rows, best first.
    #[must_use]
    pub fn rows(&self) -> &[StandingsRow] {
        &self.rows
    }

    /// Every team, best first; tied teams appear in tie order.
    #[must_use]
    pub fn order(&self) -> Vec<TeamId> {
        self.rows.iter().flat_map(|r| r.group.iter()).collect()
    }

    /// Returns true if no row holds a tie.
    #[must_use]
    pub fn is_fully_ordered(&self) -> bool {
        self.rows.iter().all(|r| r.status == GroupStatus::Resolved)
    }

    /// Rank of `team`, if it is in the table.
    #[must_use]
    pub fn rank_of(&self, team: TeamId) -> Option<usize> {
        self.rows.iter().find(|r| r.group.contains(team)).map(|r| r.rank)
    }

    /// Rule applications for every tied bucket, in resolution order.
    #[must_use]
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }
}

impl Resolver<'_> {
    /// Builds the full standings of `conference`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the conference has no cascade.
    ///
    /// # Examples
    ///
    /// ```
    /// use conference_standings::{CascadeRegistry, Conference, Resolver};
    ///
    /// let registry = CascadeRegistry::builtin();
    /// let mut conf = Conference::new("Southeastern Conference", "SEC");
    /// let uga = conf.add_team("Georgia").unwrap();
    /// let bama = conf.add_team("Alabama").unwrap();
    /// conf.add_game(bama, uga, Some(bama)).unwrap();
    ///
    /// let standings = Resolver::new(&registry).standings(&conf).unwrap();
    /// assert_eq!(standings.order(), vec![bama, uga]);
    /// assert_eq!(standings.rank_of(uga), Some(2));
    /// ```
    pub fn standings(&self, conference: &Conference) -> TiebreakResult<Standings> {
        let cascade = self.registry().get(conference.code())?;

        let mut records = Vec::with_capacity(conference.teams().len());
        for team in conference.team_ids() {
            records.push(conference.conference_record(team)?);
        }
        let record_of = |team: TeamId| records.get(team.index()).copied().unwrap_or_default();

        let buckets = match TieGroup::new(conference.team_ids().collect()) {
            Ok(all) => partition_descending(&all, |t| {
                let record = record_of(t);
                (record.win_pct(), record.wins, Reverse(record.losses))
            }),
            Err(_) => Vec::new(),
        };

        let mut placements = Placements::new();
        for bucket in &buckets {
            placements.push(bucket.clone(), bucket.is_resolved())?;
        }

        let mut rows = Vec::with_capacity(buckets.len());
        let mut trace = Vec::new();
        let mut cursor = 0;
        let mut placed = 0;
        for bucket in buckets {
            let resolved = if bucket.is_resolved() {
                vec![(bucket, GroupStatus::Resolved)]
            } else {
                let resolution = resolve_with_cascade(cascade, conference, &bucket, &placements)?;
                let (groups, steps) = resolution.into_parts();
                trace.extend(steps);
                placements.settle_block(cursor, groups.iter().map(|g| g.group.clone()));
                groups.into_iter().map(|g| (g.group, g.status)).collect()
            };

            cursor += resolved.len();
            for (group, status) in resolved {
                let size = group.len();
                rows.push(StandingsRow {
                    rank: placed + 1,
                    records: group.iter().map(record_of).collect(),
                    group,
                    status,
                });
                placed += size;
            }
        }

        let standings = Standings {
            code: cascade.code().to_string(),
            generated_at: Utc::now(),
            source_updated_at: conference.updated_at(),
            rows,
            trace,
        };
        info!(
            code = standings.code(),
            teams = placed,
            rows = standings.rows.len(),
            fully_ordered = standings.is_fully_ordered(),
            "built conference standings"
        );
        Ok(standings)
    }
}

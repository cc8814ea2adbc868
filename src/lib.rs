//! # Conference Standings
//!
//! Ranks the members of a sports conference by win/loss record and breaks
//! ties between teams with identical records using the conference's
//! published tiebreak procedure.
//!
//! ## Core Concepts
//!
//! - **Conference**: the schedule graph; sole owner of teams and games
//! - **TieGroup**: an ordered set of teams that are still tied
//! - **Rule**: one tiebreak procedure (head-to-head, common opponents, ...)
//! - **Cascade**: a conference's ordered rules, with separate two-team and
//!   multi-team entries per step
//! - **Resolver**: applies a cascade recursively until every team stands
//!   alone or the cascade is exhausted
//!
//! ## Usage
//!
//! ```rust
//! use conference_standings::{CascadeRegistry, Conference, Resolver, TieGroup};
//!
//! let registry = CascadeRegistry::builtin();
//! let mut conf = Conference::new("Atlantic Coast Conference", "ACC");
//! let clemson = conf.add_team("Clemson").unwrap();
//! let fsu = conf.add_team("Florida State").unwrap();
//! let miami = conf.add_team("Miami").unwrap();
//! conf.add_game(clemson, fsu, Some(fsu)).unwrap();
//! conf.add_game(fsu, miami, Some(miami)).unwrap();
//! conf.add_game(miami, clemson, Some(clemson)).unwrap();
//!
//! let resolver = Resolver::new(&registry);
//! let tied = TieGroup::new(vec![clemson, fsu, miami]).unwrap();
//! let resolution = resolver.resolve(&conf, &tied).unwrap();
//! assert_eq!(resolution.teams().len(), 3);
//!
//! let standings = resolver.standings(&conf).unwrap();
//! assert_eq!(standings.order().len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Schedule graph
pub mod conference;
pub mod error;
pub mod game;
pub mod group;
pub mod record;
pub mod team;

// Tiebreaking
pub mod config;
pub mod pairwise;
pub mod standings;
pub mod tiebreak;

pub use conference::Conference;
pub use error::{ConfigurationError, TiebreakError, TiebreakResult, ValidationError};
pub use game::{Game, GameId};
pub use group::TieGroup;
pub use record::{Record, WinPct};
pub use team::{Team, TeamId};

pub use config::{CascadeConfig, RegistryConfig, StepConfig, StepSpec};
pub use pairwise::RecordBook;
pub use standings::{Standings, StandingsRow};
pub use tiebreak::{
    resolve_with_cascade, Arity, Cascade, CascadeRegistry, CascadeStep, DeclineReason, GroupStatus,
    PlacedBlock, Placements, Resolution, ResolvedGroup, Resolver, Rule, RuleContext, RuleOutcome,
    Step, TieReason, TraceEntry, TraceOutcome, DEFAULT_SOS_PRECISION, MAX_SOS_PRECISION,
};

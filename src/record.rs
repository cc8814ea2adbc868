//! Win/loss records and exact win-percentage ordering.
//!
//! Standings and tiebreak rules compare records by winning percentage.
//! [`WinPct`] compares fractions by cross-multiplication so two records with
//! the same percentage (3-1 and 6-2) are always equal, with no float rounding.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// A win/loss tally.
///
/// # Examples
///
/// ```
/// use conference_standings::Record;
///
/// let record = Record::new(6, 2);
/// assert_eq!(record.games(), 8);
/// assert_eq!(record.win_pct(), Record::new(3, 1).win_pct());
/// assert_eq!(record.to_string(), "6-2");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Games won.
    pub wins: u32,
    /// Games lost.
    pub losses: u32,
}

impl Record {
    /// Creates a record.
    #[must_use]
    pub const fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    /// Number of decided games.
    #[must_use]
    pub const fn games(&self) -> u32 {
        self.wins + self.losses
    }

    /// Exact winning percentage, usable as an ordering key.
    #[must_use]
    pub fn win_pct(&self) -> WinPct {
        WinPct::new(u64::from(self.wins), u64::from(self.games()))
    }

    /// Records a single result.
    pub fn record_result(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

impl Add for Record {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            wins: self.wins + rhs.wins,
            losses: self.losses + rhs.losses,
        }
    }
}

impl AddAssign for Record {
    fn add_assign(&mut self, rhs: Self) {
        self.wins += rhs.wins;
        self.losses += rhs.losses;
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

/// Exact winning percentage `wins / games`.
///
/// A record with no decided games counts as `.000`, the same as a winless one.
#[derive(Debug, Clone, Copy)]
pub struct WinPct {
    wins: u64,
    games: u64,
}

impl WinPct {
    /// Creates a percentage from raw counts. `wins` is clamped to `games`.
    #[must_use]
    pub fn new(wins: u64, games: u64) -> Self {
        if games == 0 {
            return Self { wins: 0, games: 1 };
        }
        Self {
            wins: wins.min(games),
            games,
        }
    }

    /// Floating-point value in `[0.0, 1.0]`, for display and quantization.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        self.wins as f64 / self.games as f64
    }
}

impl PartialEq for WinPct {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for WinPct {}

impl PartialOrd for WinPct {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WinPct {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = u128::from(self.wins) * u128::from(other.games);
        let rhs = u128::from(other.wins) * u128::from(self.games);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for WinPct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.as_f64())
    }
}

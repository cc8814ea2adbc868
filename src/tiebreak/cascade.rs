//! Per-conference tiebreak cascades.
//!
//! A [`Cascade`] is pure configuration: the ordered procedure a conference
//! publishes for breaking ties. Each [`CascadeStep`] carries separate
//! entries for two-team and multi-team ties because published policies word
//! those procedures differently. Procedures that cannot be derived from a
//! schedule graph (scoring margin, rating metrics, coin tosses) are kept as
//! explicit [`Step::Unimplemented`] entries rather than dropped.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::error;

use crate::error::ConfigurationError;
use crate::tiebreak::rules::{Arity, Rule, MAX_SOS_PRECISION};

/// Default number of decimal places strength-of-schedule scores are compared at.
pub const DEFAULT_SOS_PRECISION: u32 = 3;

/// What a cascade step does for one group size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Apply a rule.
    Apply(Rule),

    /// The policy has no procedure at this step for this group size.
    NotApplicable,

    /// The policy's procedure is known but not encodable; a tie that
    /// reaches it is reported as unresolved.
    Unimplemented {
        /// The procedure as worded in the policy.
        procedure: String,
    },
}

impl Step {
    /// An unimplemented procedure.
    #[must_use]
    pub fn unimplemented(procedure: impl Into<String>) -> Self {
        Self::Unimplemented {
            procedure: procedure.into(),
        }
    }
}

impl From<Rule> for Step {
    fn from(rule: Rule) -> Self {
        Self::Apply(rule)
    }
}

/// One step of a cascade, with two-team and multi-team entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeStep {
    /// Entry used when exactly two teams are tied.
    pub two_team: Step,

    /// Entry used when three or more teams are tied.
    pub multi_team: Step,
}

impl CascadeStep {
    /// A step with distinct two-team and multi-team entries.
    #[must_use]
    pub fn new(two_team: impl Into<Step>, multi_team: impl Into<Step>) -> Self {
        Self {
            two_team: two_team.into(),
            multi_team: multi_team.into(),
        }
    }

    /// The same rule for every group size.
    #[must_use]
    pub fn same(rule: Rule) -> Self {
        Self::new(rule, rule)
    }

    /// A step that only exists for ties of three or more.
    #[must_use]
    pub fn multi_only(rule: Rule) -> Self {
        Self::new(Step::NotApplicable, rule)
    }

    /// A procedure the engine cannot evaluate, for every group size.
    #[must_use]
    pub fn unimplemented(procedure: &str) -> Self {
        Self::new(Step::unimplemented(procedure), Step::unimplemented(procedure))
    }

    /// The entry for a group of `size` teams.
    #[must_use]
    pub const fn for_size(&self, size: usize) -> &Step {
        if size == 2 {
            &self.two_team
        } else {
            &self.multi_team
        }
    }
}

/// The ordered tiebreak procedure of one conference.
///
/// # Examples
///
/// ```
/// use conference_standings::{Cascade, CascadeStep, Rule};
///
/// let cascade = Cascade::new(
///     "TST",
///     "Test Conference",
///     vec![CascadeStep::new(Rule::HeadToHeadTwo, Rule::HeadToHeadMulti)],
/// )
/// .unwrap();
/// assert_eq!(cascade.len(), 1);
///
/// // A two-team rule cannot handle three-way ties.
/// assert!(Cascade::new("BAD", "Bad", vec![CascadeStep::same(Rule::HeadToHeadTwo)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cascade {
    code: String,
    name: String,
    steps: Vec<CascadeStep>,
    restart_on_reduction: bool,
    sos_precision: u32,
}

impl Cascade {
    /// Creates a validated cascade.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::EmptyCascade` for no steps and
    /// `ConfigurationError::ArityMismatch` if a two-team rule sits in a
    /// multi-team entry.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        steps: Vec<CascadeStep>,
    ) -> Result<Self, ConfigurationError> {
        let code = normalize_code(&code.into());
        if steps.is_empty() {
            return Err(ConfigurationError::EmptyCascade { code });
        }
        for (step, entry) in steps.iter().enumerate() {
            if let Step::Apply(rule) = entry.multi_team {
                if rule.arity() == Arity::TwoTeam {
                    return Err(ConfigurationError::ArityMismatch { code, step, rule });
                }
            }
        }

        Ok(Self {
            code,
            name: name.into(),
            steps,
            restart_on_reduction: false,
            sos_precision: DEFAULT_SOS_PRECISION,
        })
    }

    /// Restart from the first step whenever a rule leaves a smaller tie.
    #[must_use]
    pub fn with_restart_on_reduction(mut self, restart: bool) -> Self {
        self.restart_on_reduction = restart;
        self
    }

    /// Sets the strength-of-schedule comparison precision.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidConfig` above
    /// [`MAX_SOS_PRECISION`] decimal places.
    pub fn with_sos_precision(mut self, places: u32) -> Result<Self, ConfigurationError> {
        if places > MAX_SOS_PRECISION {
            return Err(ConfigurationError::InvalidConfig {
                reason: format!(
                    "sos_precision {places} for '{}' exceeds {MAX_SOS_PRECISION}",
                    self.code
                ),
            });
        }
        self.sos_precision = places;
        Ok(self)
    }

    /// Normalized conference short code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Conference display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All steps in order.
    #[must_use]
    pub fn steps(&self) -> &[CascadeStep] {
        &self.steps
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false for a validated cascade.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether smaller ties restart at step 0.
    #[must_use]
    pub const fn restart_on_reduction(&self) -> bool {
        self.restart_on_reduction
    }

    /// Strength-of-schedule comparison precision in decimal places.
    #[must_use]
    pub const fn sos_precision(&self) -> u32 {
        self.sos_precision
    }

    /// The entry at `index` for a group of `size` teams.
    #[must_use]
    pub fn step_for(&self, index: usize, size: usize) -> Option<&Step> {
        self.steps.get(index).map(|s| s.for_size(size))
    }

    /// A copy of this cascade with `step` appended.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::ArityMismatch` if `step` puts a two-team
    /// rule in its multi-team entry.
    pub fn extended(&self, step: CascadeStep) -> Result<Self, ConfigurationError> {
        let mut steps = self.steps.clone();
        steps.push(step);
        let next = Self::new(self.code.clone(), self.name.clone(), steps)?
            .with_restart_on_reduction(self.restart_on_reduction);
        Ok(Self {
            sos_precision: self.sos_precision,
            ..next
        })
    }
}

/// Cascades keyed by conference short code.
///
/// Built once at startup and passed to a [`Resolver`](crate::Resolver);
/// codes are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadeRegistry {
    cascades: BTreeMap<String, Cascade>,
}

impl CascadeRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cascade.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::DuplicateCascade` if the code is taken.
    pub fn register(&mut self, cascade: Cascade) -> Result<(), ConfigurationError> {
        if self.cascades.contains_key(cascade.code()) {
            return Err(ConfigurationError::DuplicateCascade {
                code: cascade.code().to_string(),
            });
        }
        self.cascades.insert(cascade.code().to_string(), cascade);
        Ok(())
    }

    /// Looks up the cascade for `code`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::CascadeMissing` for unknown codes.
    pub fn get(&self, code: &str) -> Result<&Cascade, ConfigurationError> {
        let key = normalize_code(code);
        self.cascades
            .get(&key)
            .ok_or(ConfigurationError::CascadeMissing { code: key })
    }

    /// Registered codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.cascades.keys().map(String::as_str)
    }

    /// Number of registered conferences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cascades.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cascades.is_empty()
    }

    /// Cascades for the ACC, Big 12, Big Ten and SEC football tiebreaker
    /// policies.
    ///
    /// Every procedure that depends on scores, external ratings or chance is
    /// present as [`Step::Unimplemented`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for built in [acc(), big_12(), big_ten(), sec()] {
            let result = built.and_then(|cascade| registry.register(cascade));
            debug_assert!(result.is_ok(), "built-in cascade rejected: {result:?}");
            if let Err(err) = result {
                error!(%err, "skipping invalid built-in cascade");
            }
        }
        registry
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

// https://theacc.com/documents/2023/5/17/ACC_FOOTBALL_TIEBREAKER_POLICY.pdf
fn acc() -> Result<Cascade, ConfigurationError> {
    Cascade::new(
        "ACC",
        "Atlantic Coast Conference",
        vec![
            CascadeStep::new(Rule::HeadToHeadTwo, Rule::HeadToHeadMulti),
            CascadeStep::same(Rule::CommonOpponents),
            CascadeStep::same(Rule::CommonOpponentsInOrder),
            CascadeStep::new(Rule::StrengthOfSchedule, Rule::StrengthOfScheduleMulti),
            CascadeStep::unimplemented("SportSource Analytics team rating score metric"),
        ],
    )
    .map(|c| c.with_restart_on_reduction(true))
}

// https://big12sports.com/documents/2024/9/5/Big_12_Football_2024_Tiebreaker_Policy.pdf
fn big_12() -> Result<Cascade, ConfigurationError> {
    Cascade::new(
        "B12",
        "Big 12 Conference",
        vec![
            CascadeStep::new(Rule::HeadToHeadTwo, Rule::HeadToHeadMulti),
            CascadeStep::multi_only(Rule::HeadToHeadLoserMulti),
            CascadeStep::same(Rule::CommonOpponents),
            CascadeStep::same(Rule::CommonOpponentsInOrderCollective),
            CascadeStep::new(Rule::StrengthOfSchedule, Rule::StrengthOfScheduleMulti),
            CascadeStep::new(Rule::TotalWins, Rule::TotalWinsMulti),
            CascadeStep::unimplemented("team rating score metric"),
            CascadeStep::unimplemented("coin toss"),
        ],
    )
    .map(|c| c.with_restart_on_reduction(true))
}

// https://bigten.org/fb/article/blt6104802d94ebe1ab/
fn big_ten() -> Result<Cascade, ConfigurationError> {
    Cascade::new(
        "B1G",
        "Big Ten Conference",
        vec![
            CascadeStep::new(Rule::HeadToHeadTwo, Rule::HeadToHeadMulti),
            CascadeStep::same(Rule::CommonOpponents),
            CascadeStep::same(Rule::CommonOpponentsInOrderCollective),
            CascadeStep::new(Rule::StrengthOfSchedule, Rule::StrengthOfScheduleMulti),
            CascadeStep::unimplemented("SportSource Analytics team rating score metric"),
            CascadeStep::unimplemented("random draw"),
        ],
    )
    .map(|c| c.with_restart_on_reduction(true))
}

// https://www.secsports.com/fbtiebreaker
fn sec() -> Result<Cascade, ConfigurationError> {
    Cascade::new(
        "SEC",
        "Southeastern Conference",
        vec![
            CascadeStep::new(Rule::HeadToHeadTwo, Rule::HeadToHeadMulti),
            CascadeStep::same(Rule::CommonOpponents),
            CascadeStep::same(Rule::CommonOpponentsInOrder),
            CascadeStep::new(Rule::StrengthOfSchedule, Rule::StrengthOfScheduleMulti),
            CascadeStep::unimplemented("capped relative total scoring margin versus common conference opponents"),
            CascadeStep::unimplemented("capped relative total scoring margin versus all conference opponents"),
            CascadeStep::unimplemented("random draw"),
        ],
    )
    .map(|c| c.with_restart_on_reduction(true))
}

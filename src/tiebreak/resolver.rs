use serde::Serialize;
use tracing::{debug, trace};

use crate::conference::Conference;
use crate::error::{TiebreakResult, ValidationError};
use crate::group::TieGroup;
use crate::team::TeamId;
use crate::tiebreak::{Cascade, CascadeRegistry, DeclineReason, Placements, Rule, RuleContext, RuleOutcome, Step};

/// Why a group is still tied after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TieReason {
    /// Every step was tried without separating the group.
    CascadeExhausted,

    /// The next step is a procedure the engine cannot evaluate.
    Unimplemented {
        /// Index of the step in the cascade.
        step: usize,
        /// The procedure as worded in the policy.
        procedure: String,
    },
}

/// Final state of one output group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum GroupStatus {
    /// A single team, fully separated.
    Resolved,

    /// More than one team remains tied.
    ResidualTie {
        /// Why resolution stopped.
        reason: TieReason,
    },
}

/// One group of the resolver's ordered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGroup {
    /// Members, in tie order when unresolved.
    pub group: TieGroup,
    /// Whether the group is a single team or a residual tie.
    pub status: GroupStatus,
}

impl ResolvedGroup {
    /// Returns true if the group still holds a tie.
    #[must_use]
    pub const fn is_residual_tie(&self) -> bool {
        matches!(self.status, GroupStatus::ResidualTie { .. })
    }
}

/// What one rule application did, as recorded in the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum TraceOutcome {
    /// The group was separated into these ordered parts.
    Split {
        /// Parts, best first.
        groups: Vec<TieGroup>,
    },
    /// The rule separated nobody.
    Unchanged,
    /// The rule could not judge the group.
    Declined {
        /// What was missing.
        reason: DeclineReason,
    },
}

/// One rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    /// Recursion depth (0 for the starting group).
    pub depth: usize,
    /// Cascade step index.
    pub step: usize,
    /// The rule applied.
    pub rule: Rule,
    /// The group it was applied to.
    pub group: TieGroup,
    /// What happened.
    pub outcome: TraceOutcome,
}

/// Ordered outcome of resolving one tied group.
///
/// Concatenating the groups yields a permutation of the input group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    groups: Vec<ResolvedGroup>,
    trace: Vec<TraceEntry>,
}

impl Resolution {
    /// Output groups, best first.
    #[must_use]
    pub fn groups(&self) -> &[ResolvedGroup] {
        &self.groups
    }

    /// Output groups without their status.
    pub fn tie_groups(&self) -> impl Iterator<Item = &TieGroup> + '_ {
        self.groups.iter().map(|g| &g.group)
    }

    /// Every team, in resolved order.
    #[must_use]
    pub fn teams(&self) -> Vec<TeamId> {
        self.tie_groups().flat_map(TieGroup::iter).collect()
    }

    /// Groups that are still tied.
    pub fn residual_ties(&self) -> impl Iterator<Item = &ResolvedGroup> + '_ {
        self.groups.iter().filter(|g| g.is_residual_tie())
    }

    /// Returns true if every team ended up in a group of its own.
    #[must_use]
    pub fn is_fully_ordered(&self) -> bool {
        self.residual_ties().next().is_none()
    }

    /// Every rule application, in evaluation order.
    #[must_use]
    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    pub(crate) fn into_parts(self) -> (Vec<ResolvedGroup>, Vec<TraceEntry>) {
        (self.groups, self.trace)
    }
}

/// Applies conference cascades to tied groups.
///
/// The resolver borrows its registry and the schedule graph; it holds no
/// mutable state, so one resolver may serve any number of calls and threads.
///
/// # Examples
///
/// ```
/// use conference_standings::{
///     Cascade, CascadeRegistry, CascadeStep, Conference, Resolver, Rule, TieGroup,
/// };
///
/// let mut registry = CascadeRegistry::new();
/// registry
///     .register(Cascade::new("TST", "Test", vec![CascadeStep::new(Rule::HeadToHeadTwo, Rule::HeadToHeadMulti)]).unwrap())
///     .unwrap();
///
/// let mut conf = Conference::new("Test", "TST");
/// let a = conf.add_team("A").unwrap();
/// let b = conf.add_team("B").unwrap();
/// conf.add_game(a, b, Some(b)).unwrap();
///
/// let resolution = Resolver::new(&registry)
///     .resolve(&conf, &TieGroup::new(vec![a, b]).unwrap())
///     .unwrap();
/// assert_eq!(resolution.teams(), vec![b, a]);
/// assert!(resolution.is_fully_ordered());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r CascadeRegistry,
}

impl<'r> Resolver<'r> {
    /// Creates a resolver over `registry`.
    #[must_use]
    pub const fn new(registry: &'r CascadeRegistry) -> Self {
        Self { registry }
    }

    /// The registry cascades are looked up in.
    #[must_use]
    pub const fn registry(&self) -> &'r CascadeRegistry {
        self.registry
    }

    /// Resolves `group` with no standings context; in-order common-opponent
    /// rules will decline.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the conference has no cascade and a
    /// validation error if a member of `group` is not in the conference.
    pub fn resolve(&self, conference: &Conference, group: &TieGroup) -> TiebreakResult<Resolution> {
        self.resolve_in_context(conference, group, &Placements::new())
    }

    /// Resolves `group` given already-known standings positions.
    ///
    /// # Errors
    ///
    /// Same as [`Resolver::resolve`].
    pub fn resolve_in_context(
        &self,
        conference: &Conference,
        group: &TieGroup,
        placements: &Placements,
    ) -> TiebreakResult<Resolution> {
        let cascade = self.registry.get(conference.code())?;
        resolve_with_cascade(cascade, conference, group, placements)
    }
}

/// Resolves `group` with an explicit cascade, bypassing the registry.
///
/// # Errors
///
/// Returns `ValidationError::NotAMember` if a member of `group` is not in
/// the conference.
pub fn resolve_with_cascade(
    cascade: &Cascade,
    conference: &Conference,
    group: &TieGroup,
    placements: &Placements,
) -> TiebreakResult<Resolution> {
    if let Some(team) = group.iter().find(|t| !conference.contains(*t)) {
        return Err(ValidationError::NotAMember {
            team,
            code: conference.code().to_string(),
        }
        .into());
    }

    let mut run = Run {
        cascade,
        ctx: RuleContext::new(conference, placements, cascade.sos_precision()),
        groups: Vec::with_capacity(group.len()),
        trace: Vec::new(),
    };
    run.descend(group.clone(), 0, 0);

    Ok(Resolution {
        groups: run.groups,
        trace: run.trace,
    })
}

struct Run<'a> {
    cascade: &'a Cascade,
    ctx: RuleContext<'a>,
    groups: Vec<ResolvedGroup>,
    trace: Vec<TraceEntry>,
}

impl Run<'_> {
    /// Resolves `group` starting at cascade step `start`, appending output
    /// groups in order. Terminates because every recursive call either has
    /// a strictly smaller group or (without restart) a later start step.
    fn descend(&mut self, group: TieGroup, start: usize, depth: usize) {
        if group.is_resolved() {
            self.groups.push(ResolvedGroup {
                group,
                status: GroupStatus::Resolved,
            });
            return;
        }

        let mut index = start;
        while let Some(step) = self.cascade.step_for(index, group.len()) {
            let rule = match step {
                Step::Apply(rule) => *rule,
                Step::NotApplicable => {
                    index += 1;
                    continue;
                }
                Step::Unimplemented { procedure } => {
                    debug!(code = self.cascade.code(), step = index, %group, procedure = procedure.as_str(), "tie reached unimplemented procedure");
                    let reason = TieReason::Unimplemented {
                        step: index,
                        procedure: procedure.clone(),
                    };
                    self.push_tie(group, reason);
                    return;
                }
            };

            match rule.evaluate(&group, &self.ctx) {
                RuleOutcome::Split(parts) => {
                    debug!(code = self.cascade.code(), step = index, %rule, %group, parts = parts.len(), "rule separated group");
                    self.trace.push(TraceEntry {
                        depth,
                        step: index,
                        rule,
                        group: group.clone(),
                        outcome: TraceOutcome::Split {
                            groups: parts.clone(),
                        },
                    });
                    for part in parts {
                        let next = if self.cascade.restart_on_reduction() { 0 } else { index + 1 };
                        self.descend(part, next, depth + 1);
                    }
                    return;
                }
                RuleOutcome::Unchanged => {
                    trace!(code = self.cascade.code(), step = index, %rule, %group, "rule did not separate group");
                    self.record(depth, index, rule, &group, TraceOutcome::Unchanged);
                }
                RuleOutcome::Declined { reason } => {
                    trace!(code = self.cascade.code(), step = index, %rule, %group, %reason, "rule declined");
                    self.record(depth, index, rule, &group, TraceOutcome::Declined { reason });
                }
            }
            index += 1;
        }

        debug!(code = self.cascade.code(), %group, "cascade exhausted with teams still tied");
        self.push_tie(group, TieReason::CascadeExhausted);
    }

    fn record(&mut self, depth: usize, step: usize, rule: Rule, group: &TieGroup, outcome: TraceOutcome) {
        self.trace.push(TraceEntry {
            depth,
            step,
            rule,
            group: group.clone(),
            outcome,
        });
    }

    fn push_tie(&mut self, group: TieGroup, reason: TieReason) {
        self.groups.push(ResolvedGroup {
            group,
            status: GroupStatus::ResidualTie { reason },
        });
    }
}

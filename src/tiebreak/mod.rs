//! Tiebreak cascades and the resolver that applies them.
//!
//! A conference publishes an ordered list of procedures ([`Cascade`]). The
//! [`Resolver`] applies them to a tied group: each [`Rule`] either splits the
//! group into ordered sub-groups, separates nobody, or declines because a
//! standings position it needs is not known yet. Sub-groups are resolved
//! recursively until every team stands alone or the cascade runs out.

mod cascade;
mod placements;
mod resolver;
mod rules;

pub use cascade::{Cascade, CascadeRegistry, CascadeStep, Step, DEFAULT_SOS_PRECISION};
pub use placements::{PlacedBlock, Placements};
pub use resolver::{
    resolve_with_cascade, GroupStatus, Resolution, ResolvedGroup, Resolver, TieReason, TraceEntry,
    TraceOutcome,
};
pub use rules::{Arity, DeclineReason, Rule, RuleContext, RuleOutcome, MAX_SOS_PRECISION};

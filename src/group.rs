//! Tie groups: ordered, duplicate-free sets of teams considered equal.
//!
//! A group is always a sequence, even when it holds a single (resolved)
//! team, so callers never special-case "one team or many".

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;
use crate::team::TeamId;

/// Teams considered equal at the current comparison level.
///
/// # Examples
///
/// ```
/// use conference_standings::{TeamId, TieGroup};
///
/// let group = TieGroup::new(vec![TeamId::from_index(0), TeamId::from_index(1)]).unwrap();
/// assert!(!group.is_resolved());
/// assert!(TieGroup::new(vec![TeamId::from_index(0), TeamId::from_index(0)]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TieGroup(Vec<TeamId>);

impl TieGroup {
    /// Creates a group, preserving order.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyGroup` for no teams and
    /// `ValidationError::DuplicateMember` if a team appears twice.
    pub fn new(teams: Vec<TeamId>) -> Result<Self, ValidationError> {
        if teams.is_empty() {
            return Err(ValidationError::EmptyGroup);
        }
        let mut seen = HashSet::with_capacity(teams.len());
        for team in &teams {
            if !seen.insert(*team) {
                return Err(ValidationError::DuplicateMember { team: *team });
            }
        }
        Ok(Self(teams))
    }

    /// A resolved group holding one team.
    #[must_use]
    pub fn singleton(team: TeamId) -> Self {
        Self(vec![team])
    }

    /// Builds a group from members already known to be distinct.
    pub(crate) fn from_distinct(teams: Vec<TeamId>) -> Self {
        debug_assert!(!teams.is_empty());
        Self(teams)
    }

    /// Number of teams in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed group; present for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A single team is fully separated.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.0.len() == 1
    }

    /// Members in order.
    #[must_use]
    pub fn teams(&self) -> &[TeamId] {
        &self.0
    }

    /// Returns true if `team` is a member.
    #[must_use]
    pub fn contains(&self, team: TeamId) -> bool {
        self.0.contains(&team)
    }

    /// Iterates members in order.
    pub fn iter(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.0.iter().copied()
    }

    /// Consumes the group, returning its members.
    #[must_use]
    pub fn into_teams(self) -> Vec<TeamId> {
        self.0
    }
}

impl fmt::Display for TieGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, team) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{team}")?;
        }
        f.write_str("]")
    }
}

/// Splits `group` into sub-groups by descending `key`, keeping teams with
/// equal keys together in their original relative order.
///
/// A result of length 1 means the key did not separate anyone.
pub(crate) fn partition_descending<K, F>(group: &TieGroup, mut key: F) -> Vec<TieGroup>
where
    K: Ord,
    F: FnMut(TeamId) -> K,
{
    let mut keyed: Vec<(K, TeamId)> = group.iter().map(|t| (key(t), t)).collect();
    // stable: equal keys keep group order
    keyed.sort_by(|a, b| b.0.cmp(&a.0));

    let mut out: Vec<TieGroup> = Vec::new();
    let mut current: Vec<TeamId> = Vec::new();
    let mut last: Option<K> = None;
    for (k, team) in keyed {
        if last.as_ref().is_some_and(|l| *l != k) {
            out.push(TieGroup::from_distinct(std::mem::take(&mut current)));
        }
        current.push(team);
        last = Some(k);
    }
    if !current.is_empty() {
        out.push(TieGroup::from_distinct(current));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<TeamId> {
        raw.iter().copied().map(TeamId::from_index).collect()
    }

    #[test]
    fn test_new_rejects_empty_and_duplicates() {
        assert_eq!(TieGroup::new(vec![]), Err(ValidationError::EmptyGroup));
        assert_eq!(
            TieGroup::new(ids(&[1, 2, 1])),
            Err(ValidationError::DuplicateMember { team: TeamId::from_index(1) })
        );
    }

    #[test]
    fn test_singleton_is_resolved() {
        let g = TieGroup::singleton(TeamId::from_index(4));
        assert!(g.is_resolved());
        assert_eq!(g.len(), 1);
        assert_eq!(g.to_string(), "[team#4]");
    }

    #[test]
    fn test_partition_descending_groups_equal_keys() {
        let group = TieGroup::new(ids(&[0, 1, 2, 3])).unwrap();
        let scores = [1, 3, 1, 2];
        let parts = partition_descending(&group, |t| scores[t.index()]);
        let raw: Vec<Vec<usize>> = parts
            .iter()
            .map(|g| g.iter().map(TeamId::index).collect())
            .collect();
        assert_eq!(raw, vec![vec![1], vec![3], vec![0, 2]]);
    }

    #[test]
    fn test_partition_descending_identity_when_all_equal() {
        let group = TieGroup::new(ids(&[2, 0, 1])).unwrap();
        let parts = partition_descending(&group, |_| 7);
        assert_eq!(parts, vec![group]);
    }
}

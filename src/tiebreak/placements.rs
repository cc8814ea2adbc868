//! Known standings positions.
//!
//! Rules that walk common opponents "in order of finish" need to know where
//! those opponents stand. [`Placements`] is the part of the standings that is
//! already known: contiguous blocks, best first. A block is *settled* once no
//! later tiebreak can reorder its members; a settled block with more than one
//! team is a residual tie.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ValidationError;
use crate::group::TieGroup;
use crate::team::TeamId;

/// One contiguous run of teams in the standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedBlock {
    /// Members in standings order (or tie order when unresolved).
    pub group: TieGroup,

    /// True once the block's internal order is final.
    pub settled: bool,
}

/// Ordered standings blocks, best first, with per-team lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placements {
    blocks: Vec<PlacedBlock>,
    index: HashMap<TeamId, usize>,
}

impl Placements {
    /// No known positions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds settled placements from a final standings order.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateMember` if a team appears in more
    /// than one group.
    pub fn from_order(groups: impl IntoIterator<Item = TieGroup>) -> Result<Self, ValidationError> {
        let mut placements = Self::new();
        for group in groups {
            placements.push(group, true)?;
        }
        Ok(placements)
    }

    /// Appends a block below every existing block.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::DuplicateMember` if a member is already placed.
    pub fn push(&mut self, group: TieGroup, settled: bool) -> Result<(), ValidationError> {
        if let Some(team) = group.iter().find(|t| self.index.contains_key(t)) {
            return Err(ValidationError::DuplicateMember { team });
        }
        let at = self.blocks.len();
        for team in group.iter() {
            self.index.insert(team, at);
        }
        self.blocks.push(PlacedBlock { group, settled });
        Ok(())
    }

    /// Replaces block `at` with the settled, ordered `groups` it resolved
    /// into. The groups must hold exactly the block's members.
    pub(crate) fn settle_block(&mut self, at: usize, groups: impl IntoIterator<Item = TieGroup>) {
        let replacement: Vec<PlacedBlock> = groups
            .into_iter()
            .map(|group| PlacedBlock { group, settled: true })
            .collect();
        debug_assert_eq!(
            replacement.iter().map(|b| b.group.len()).sum::<usize>(),
            self.blocks.get(at).map_or(0, |b| b.group.len())
        );
        self.blocks.splice(at..=at, replacement);
        self.reindex();
    }

    /// All blocks, best first.
    #[must_use]
    pub fn blocks(&self) -> &[PlacedBlock] {
        &self.blocks
    }

    /// Position of the block holding `team`.
    #[must_use]
    pub fn block_index(&self, team: TeamId) -> Option<usize> {
        self.index.get(&team).copied()
    }

    /// The block holding `team`.
    #[must_use]
    pub fn block_of(&self, team: TeamId) -> Option<&PlacedBlock> {
        self.block_index(team).and_then(|i| self.blocks.get(i))
    }

    /// Returns true if `team` holds a position of its own that cannot change.
    #[must_use]
    pub fn is_final(&self, team: TeamId) -> bool {
        self.block_of(team)
            .is_some_and(|b| b.settled && b.group.is_resolved())
    }

    /// Returns true if nothing is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (at, block) in self.blocks.iter().enumerate() {
            for team in block.group.iter() {
                self.index.insert(team, at);
            }
        }
    }
}

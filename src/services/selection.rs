//! Selection engine
//!
//! Owns the authoritative selection for one matching session: the target,
//! the fixed candidate list, the selected set and the remaining amount.
//! Every version of the state is an immutable value; `toggle` produces a
//! new version and leaves the old one intact, so a rejected call can never
//! leave a partial effect behind.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::error::{MatchError, MatchResult};
use crate::models::{ItemId, MatchItem, Money};

/// One version of the selection for a session
///
/// Invariant: `remaining == target - sum(amount of selected items)` for every
/// value of this type.
#[derive(Debug, Clone)]
pub struct SelectionState {
    target: Money,
    candidates: Arc<[MatchItem]>,
    index: Arc<HashMap<ItemId, usize>>,
    /// Catalog positions of the selected items
    selected: BTreeSet<usize>,
    remaining: Money,
    version: u64,
}

/// Items added and removed between two versions of a selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDiff {
    pub added: Vec<ItemId>,
    pub removed: Vec<ItemId>,
}

impl SelectionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl SelectionState {
    /// Create the initial state for a session
    ///
    /// Fails with `EmptyCatalog` when there is nothing to match against and
    /// with `DuplicateItem` when the catalog repeats an id. A zero or
    /// negative target is accepted; remaining simply starts at the target.
    pub fn initialize(target: Money, candidates: Vec<MatchItem>) -> MatchResult<Self> {
        if candidates.is_empty() {
            return Err(MatchError::EmptyCatalog);
        }

        let mut index = HashMap::with_capacity(candidates.len());
        for (position, item) in candidates.iter().enumerate() {
            if index.insert(item.id().clone(), position).is_some() {
                return Err(MatchError::DuplicateItem(item.id().to_string()));
            }
        }

        Ok(Self {
            target,
            candidates: candidates.into(),
            index: Arc::new(index),
            selected: BTreeSet::new(),
            remaining: target,
            version: 0,
        })
    }

    pub fn target(&self) -> Money {
        self.target
    }

    pub fn remaining(&self) -> Money {
        self.remaining
    }

    /// Number of successful changes applied since initialization
    pub fn version(&self) -> u64 {
        self.version
    }

    /// All candidates in catalog order
    pub fn candidates(&self) -> &[MatchItem] {
        &self.candidates
    }

    /// Cheap handle on the candidate list for work off the interactive path
    pub(crate) fn shared_candidates(&self) -> Arc<[MatchItem]> {
        Arc::clone(&self.candidates)
    }

    /// Candidates whose amount does not exceed the target on their own
    pub fn eligible_candidates(&self) -> impl Iterator<Item = &MatchItem> + '_ {
        self.candidates
            .iter()
            .filter(move |item| item.amount() <= self.target)
    }

    /// Look up a candidate by id
    pub fn item(&self, id: &ItemId) -> MatchResult<&MatchItem> {
        self.position(id).map(|position| &self.candidates[position])
    }

    pub fn is_selected(&self, id: &ItemId) -> MatchResult<bool> {
        self.position(id)
            .map(|position| self.selected.contains(&position))
    }

    /// Selected items in catalog order
    pub fn selected_items(&self) -> Vec<&MatchItem> {
        self.selected
            .iter()
            .map(|&position| &self.candidates[position])
            .collect()
    }

    /// Selected ids in catalog order
    pub fn selected_ids(&self) -> Vec<ItemId> {
        self.selected
            .iter()
            .map(|&position| self.candidates[position].id().clone())
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Sum of the selected amounts, recomputed from the selection
    ///
    /// Summed in `i128` so mixed-sign partial sums cannot overflow; every
    /// transition keeps the final total within `Money`.
    pub fn selected_total(&self) -> Money {
        let total: i128 = self
            .selected
            .iter()
            .map(|&position| i128::from(self.candidates[position].amount().minor_units()))
            .sum();
        Money::from_minor(total.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    /// True when the selection covers the target exactly
    pub fn is_matched(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Whether the item could be added right now without overshooting
    ///
    /// Already-selected items report `true`. Unknown ids are an error, not
    /// a `false`.
    pub fn can_select(&self, id: &ItemId) -> MatchResult<bool> {
        let position = self.position(id)?;
        if self.selected.contains(&position) {
            return Ok(true);
        }
        Ok(self.admits(position))
    }

    /// Select or deselect an item, returning the next version and whether
    /// anything changed
    ///
    /// On error `self` is untouched and no new version exists.
    pub fn toggle(&self, id: &ItemId, select: bool) -> MatchResult<(Self, bool)> {
        let position = self.position(id)?;
        let is_selected = self.selected.contains(&position);
        let amount = self.candidates[position].amount();

        match (select, is_selected) {
            (true, true) | (false, false) => Ok((self.clone(), false)),
            (true, false) => {
                if !self.admits(position) {
                    return Err(MatchError::Overselection {
                        item: id.to_string(),
                        amount,
                        remaining: self.remaining,
                    });
                }
                let mut next = self.clone();
                next.selected.insert(position);
                next.remaining = self.checked_remaining(self.remaining.checked_sub(amount))?;
                next.version += 1;
                Ok((next, true))
            }
            (false, true) => {
                let mut next = self.clone();
                next.selected.remove(&position);
                next.remaining = self.checked_remaining(self.remaining.checked_add(amount))?;
                next.version += 1;
                Ok((next, true))
            }
        }
    }

    /// Add a set of items in one transition without per-item admission
    ///
    /// Used to apply an auto-match result: the items are checked as a whole
    /// by the matcher, so checking them one at a time against each other
    /// would be wrong. Every id must be known or nothing is applied.
    pub fn with_items_selected(&self, ids: &[ItemId]) -> MatchResult<(Self, bool)> {
        let positions = ids
            .iter()
            .map(|id| self.position(id))
            .collect::<MatchResult<Vec<_>>>()?;

        let mut next = self.clone();
        let mut changed = false;
        for position in positions {
            if next.selected.insert(position) {
                let amount = self.candidates[position].amount();
                next.remaining = self.checked_remaining(next.remaining.checked_sub(amount))?;
                changed = true;
            }
        }

        if changed {
            next.version += 1;
        }
        Ok((next, changed))
    }

    /// Compare two versions of the same session
    pub fn diff(old: &Self, new: &Self) -> SelectionDiff {
        let id_at = |position: &usize| new.candidates[*position].id().clone();
        SelectionDiff {
            added: new.selected.difference(&old.selected).map(id_at).collect(),
            removed: old.selected.difference(&new.selected).map(id_at).collect(),
        }
    }

    fn position(&self, id: &ItemId) -> MatchResult<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| MatchError::unknown_item(id.as_str()))
    }

    fn admits(&self, position: usize) -> bool {
        self.remaining
            .checked_sub(self.candidates[position].amount())
            .is_some_and(|after| !after.is_negative())
    }

    /// Reject a remaining amount that overflowed or whose selected total
    /// would not fit in `Money`
    fn checked_remaining(&self, remaining: Option<Money>) -> MatchResult<Money> {
        remaining
            .filter(|&r| self.target.checked_sub(r).is_some())
            .ok_or_else(|| {
                MatchError::InvalidAmount(format!(
                    "selection total out of range for target {}",
                    self.target
                ))
            })
    }
}

/// Outcome of a toggle as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleResult {
    pub new_remaining: Money,
    pub changed: bool,
}

/// Holds the current version of a session's selection
///
/// Mutation goes through `toggle` and `apply_auto_match` only. Callers must
/// serialize calls; the engine does no locking of its own.
#[derive(Debug, Clone)]
pub struct SelectionEngine {
    state: SelectionState,
}

impl SelectionEngine {
    /// Start a selection for `target` over `candidates`
    pub fn initialize(target: Money, candidates: Vec<MatchItem>) -> MatchResult<Self> {
        Ok(Self {
            state: SelectionState::initialize(target, candidates)?,
        })
    }

    /// Current version of the state
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn remaining(&self) -> Money {
        self.state.remaining()
    }

    pub fn selected_items(&self) -> Vec<&MatchItem> {
        self.state.selected_items()
    }

    pub fn can_select(&self, id: &ItemId) -> MatchResult<bool> {
        self.state.can_select(id)
    }

    /// Select or deselect an item
    pub fn toggle(&mut self, id: &ItemId, select: bool) -> MatchResult<ToggleResult> {
        let (next, changed) = self.state.toggle(id, select)?;
        self.state = next;
        Ok(ToggleResult {
            new_remaining: self.state.remaining(),
            changed,
        })
    }

    /// Apply an auto-match result as a single atomic transition
    pub fn apply_auto_match(&mut self, ids: &[ItemId]) -> MatchResult<bool> {
        let (next, changed) = self.state.with_items_selected(ids)?;
        self.state = next;
        Ok(changed)
    }
}

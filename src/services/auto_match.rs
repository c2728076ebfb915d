//! Auto-match search
//!
//! Finds a set of candidates whose amounts sum exactly to a target so a
//! session can start with the answer already selected.
//!
//! The search runs in two passes:
//!
//! 1. A single-item scan in catalog order. The first exact amount wins.
//! 2. When enabled, a bounded subset-sum search. Combinations are tried in
//!    increasing size and, within a size, in catalog order, so the first hit
//!    is both the smallest and deterministic. Branches are cut as soon as
//!    the running sum passes the target or the items still available cannot
//!    reach it.
//!
//! Exhausting the step or time budget is reported separately from a clean
//! "nothing exists within these limits" so callers can decide whether to
//! retry with wider limits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::models::{ItemId, MatchItem, Money};

/// Limits and switches for the auto-match search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    /// Run the combination search when no single item matches
    pub multi_item_auto_match: bool,
    /// Largest number of items combined
    pub max_combo_size: usize,
    /// Maximum number of partial combinations explored
    pub search_budget: u64,
    /// Optional wall-clock limit for the combination search
    pub time_budget: Option<Duration>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            multi_item_auto_match: false,
            max_combo_size: 4,
            search_budget: 250_000,
            time_budget: None,
        }
    }
}

/// Result of one auto-match pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoMatchOutcome {
    /// These items, in catalog order, sum exactly to the target
    Matched(Vec<ItemId>),
    /// The search finished within its limits and found nothing
    NoMatchFound,
    /// The step or time budget ran out before the search finished
    SearchBudgetExceeded { explored: u64 },
    /// The caller withdrew interest before the search finished
    Cancelled,
}

impl AutoMatchOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    pub fn matched_ids(&self) -> Option<&[ItemId]> {
        match self {
            Self::Matched(ids) => Some(ids),
            _ => None,
        }
    }

    /// Only a budget cut-off can change with larger limits
    pub fn should_retry_with_wider_limits(&self) -> bool {
        matches!(self, Self::SearchBudgetExceeded { .. })
    }
}

/// Exact-sum search over a candidate list
#[derive(Debug, Clone, Default)]
pub struct AutoMatcher {
    config: MatchConfig,
}

impl AutoMatcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Search for an exact match of `target`
    pub fn find(&self, candidates: &[MatchItem], target: Money) -> AutoMatchOutcome {
        self.find_with_cancel(candidates, target, &AtomicBool::new(false))
    }

    /// Search for an exact match, stopping early once `cancel` is set
    pub fn find_with_cancel(
        &self,
        candidates: &[MatchItem],
        target: Money,
        cancel: &AtomicBool,
    ) -> AutoMatchOutcome {
        if let Some(item) = candidates.iter().find(|item| item.amount() == target) {
            return AutoMatchOutcome::Matched(vec![item.id().clone()]);
        }

        if !self.config.multi_item_auto_match
            || self.config.max_combo_size < 2
            || !target.is_positive()
        {
            return AutoMatchOutcome::NoMatchFound;
        }

        // Pruning on "sum exceeds target" needs non-negative amounts; zero
        // amounts never help a smallest-first search.
        let pool: Vec<(usize, i64)> = candidates
            .iter()
            .enumerate()
            .filter(|(_, item)| item.amount().is_positive() && item.amount() <= target)
            .map(|(position, item)| (position, item.amount().minor_units()))
            .collect();

        let max_size = self.config.max_combo_size.min(pool.len());
        let mut search =
            ComboSearch::new(&pool, target.minor_units(), &self.config, max_size, cancel);

        for size in 2..=max_size {
            match search.run(size) {
                Step::Found => {
                    let ids = search
                        .chosen
                        .iter()
                        .map(|&slot| candidates[pool[slot].0].id().clone())
                        .collect();
                    return AutoMatchOutcome::Matched(ids);
                }
                Step::Exhausted => continue,
                Step::OutOfBudget => {
                    return AutoMatchOutcome::SearchBudgetExceeded {
                        explored: search.explored,
                    }
                }
                Step::Cancelled => return AutoMatchOutcome::Cancelled,
            }
        }

        AutoMatchOutcome::NoMatchFound
    }
}

enum Step {
    Found,
    Exhausted,
    OutOfBudget,
    Cancelled,
}

/// Depth-first enumeration of fixed-size combinations over the pool
struct ComboSearch<'a> {
    pool: &'a [(usize, i64)],
    /// suffix[i] = sum of pool amounts from slot i to the end
    suffix: Vec<i128>,
    /// best[k] = sum of the k largest pool amounts
    best: Vec<i128>,
    target: i128,
    budget: u64,
    deadline: Option<Instant>,
    cancel: &'a AtomicBool,
    explored: u64,
    chosen: Vec<usize>,
}

impl<'a> ComboSearch<'a> {
    fn new(
        pool: &'a [(usize, i64)],
        target: i64,
        config: &MatchConfig,
        max_size: usize,
        cancel: &'a AtomicBool,
    ) -> Self {
        let mut suffix = vec![0_i128; pool.len() + 1];
        for slot in (0..pool.len()).rev() {
            suffix[slot] = suffix[slot + 1] + pool[slot].1 as i128;
        }

        let mut largest: Vec<i64> = pool.iter().map(|&(_, amount)| amount).collect();
        largest.sort_unstable_by(|a, b| b.cmp(a));
        let mut best = Vec::with_capacity(largest.len() + 1);
        best.push(0_i128);
        for amount in largest {
            let last = best[best.len() - 1];
            best.push(last + amount as i128);
        }

        Self {
            pool,
            suffix,
            best,
            target: target as i128,
            budget: config.search_budget,
            deadline: config.time_budget.map(|limit| Instant::now() + limit),
            cancel,
            explored: 0,
            chosen: Vec::with_capacity(max_size),
        }
    }

    fn run(&mut self, size: usize) -> Step {
        self.chosen.clear();
        if self.best[size] < self.target {
            return Step::Exhausted;
        }
        self.descend(0, size, 0)
    }

    fn descend(&mut self, start: usize, left: usize, sum: i128) -> Step {
        if sum + self.best[left] < self.target {
            return Step::Exhausted;
        }

        let last_start = self.pool.len() - left;
        for slot in start..=last_start {
            if sum + self.suffix[slot] < self.target {
                break;
            }

            if let Some(stop) = self.tick() {
                return stop;
            }

            let next = sum + self.pool[slot].1 as i128;
            if next > self.target {
                continue;
            }

            if left == 1 {
                if next == self.target {
                    self.chosen.push(slot);
                    return Step::Found;
                }
                continue;
            }

            self.chosen.push(slot);
            match self.descend(slot + 1, left - 1, next) {
                Step::Exhausted => {
                    self.chosen.pop();
                }
                other => return other,
            }
        }

        Step::Exhausted
    }

    /// Count one explored node and check the limits
    fn tick(&mut self) -> Option<Step> {
        self.explored += 1;

        if self.cancel.load(Ordering::Relaxed) {
            return Some(Step::Cancelled);
        }
        if self.explored > self.budget {
            return Some(Step::OutOfBudget);
        }
        // Clock reads are comparatively slow; sample them
        if self.explored % 256 == 1 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Some(Step::OutOfBudget);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, amount: &str) -> MatchItem {
        MatchItem::new(id, format!("Payee {}", id), "17 Sep", Money::parse(amount).unwrap(), "Invoice")
    }

    fn ids(list: &[&str]) -> Vec<ItemId> {
        list.iter().map(|s| ItemId::new(*s)).collect()
    }

    fn multi(max_combo_size: usize, search_budget: u64) -> AutoMatcher {
        AutoMatcher::new(MatchConfig {
            multi_item_auto_match: true,
            max_combo_size,
            search_budget,
            time_budget: None,
        })
    }

    fn invoices() -> Vec<MatchItem> {
        vec![
            item("1", "249.00"),
            item("2", "618.50"),
            item("3", "495.00"),
            item("4", "234.00"),
            item("5", "250.00"),
            item("6", "108.60"),
            item("7", "216.99"),
            item("8", "181.25"),
            item("9", "170.50"),
            item("10", "411.35"),
        ]
    }

    #[test]
    fn test_single_item_match() {
        let matcher = AutoMatcher::default();
        let outcome = matcher.find(&invoices(), Money::parse("249.00").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::Matched(ids(&["1"])));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let candidates = vec![item("a", "10.00"), item("b", "249.00"), item("c", "249.00")];
        let outcome = AutoMatcher::default().find(&candidates, Money::parse("249.00").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::Matched(ids(&["b"])));
    }

    #[test]
    fn test_multi_item_disabled_by_default() {
        let candidates = vec![item("1", "100"), item("2", "200")];
        let outcome = AutoMatcher::default().find(&candidates, Money::parse("300").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::NoMatchFound);
    }

    #[test]
    fn test_pair_in_catalog_order() {
        let candidates = vec![
            item("1", "100"),
            item("2", "200"),
            item("3", "300"),
            item("4", "400"),
        ];
        let outcome = multi(4, 10_000).find(&candidates, Money::parse("500").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::Matched(ids(&["1", "4"])));
    }

    #[test]
    fn test_fewest_items_preferred() {
        // 100 + 200 + 300 comes first in catalog order, but 50 + 550 is smaller
        let candidates = vec![
            item("1", "100"),
            item("2", "200"),
            item("3", "300"),
            item("4", "50"),
            item("5", "550"),
        ];
        let outcome = multi(4, 10_000).find(&candidates, Money::parse("600").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::Matched(ids(&["4", "5"])));
    }

    #[test]
    fn test_three_item_match() {
        // 249.00 + 234.00 + 216.99; no pair reaches 699.99
        let outcome = multi(4, 100_000).find(&invoices(), Money::parse("699.99").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::Matched(ids(&["1", "4", "7"])));
    }

    #[test]
    fn test_unreachable_target() {
        let outcome = multi(4, 250_000).find(&invoices(), Money::parse("10000.00").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::NoMatchFound);
        assert!(!outcome.should_retry_with_wider_limits());
    }

    #[test]
    fn test_combo_size_limit() {
        let candidates = vec![item("1", "1"), item("2", "2"), item("3", "3")];
        assert_eq!(
            multi(2, 1000).find(&candidates, Money::parse("6").unwrap()),
            AutoMatchOutcome::NoMatchFound
        );
        assert_eq!(
            multi(3, 1000).find(&candidates, Money::parse("6").unwrap()),
            AutoMatchOutcome::Matched(ids(&["1", "2", "3"]))
        );
    }

    #[test]
    fn test_unbounded_combo_size_clamped_to_pool() {
        let candidates = vec![item("1", "1.00"), item("2", "2.00")];
        assert_eq!(
            multi(usize::MAX, 100).find(&candidates, Money::parse("3.00").unwrap()),
            AutoMatchOutcome::Matched(ids(&["1", "2"]))
        );
        assert_eq!(
            multi(usize::MAX, 100).find(&candidates, Money::parse("4.00").unwrap()),
            AutoMatchOutcome::NoMatchFound
        );
    }

    #[test]
    fn test_budget_exceeded_reported_distinctly() {
        // All even amounts against an odd target: no exact sum exists
        let candidates: Vec<MatchItem> = (1..=30)
            .map(|n| item(&n.to_string(), &(n * 2).to_string()))
            .collect();
        let target = Money::parse("61").unwrap();

        let outcome = multi(4, 10).find(&candidates, target);
        assert!(matches!(outcome, AutoMatchOutcome::SearchBudgetExceeded { explored: 11 }));
        assert!(outcome.should_retry_with_wider_limits());

        let outcome = multi(4, 10_000_000).find(&candidates, target);
        assert_eq!(outcome, AutoMatchOutcome::NoMatchFound);
    }

    #[test]
    fn test_time_budget() {
        let candidates: Vec<MatchItem> = (1..=30)
            .map(|n| item(&n.to_string(), &(n * 2).to_string()))
            .collect();
        let matcher = AutoMatcher::new(MatchConfig {
            multi_item_auto_match: true,
            max_combo_size: 4,
            search_budget: u64::MAX,
            time_budget: Some(Duration::ZERO),
        });
        let outcome = matcher.find(&candidates, Money::parse("61").unwrap());
        assert!(outcome.should_retry_with_wider_limits());
    }

    #[test]
    fn test_cancelled() {
        let cancel = AtomicBool::new(true);
        let candidates = vec![item("1", "100"), item("2", "200")];
        let outcome =
            multi(4, 1000).find_with_cancel(&candidates, Money::parse("300").unwrap(), &cancel);
        assert_eq!(outcome, AutoMatchOutcome::Cancelled);
    }

    #[test]
    fn test_single_pass_ignores_cancel() {
        let cancel = AtomicBool::new(true);
        let outcome = multi(4, 1000).find_with_cancel(
            &invoices(),
            Money::parse("249.00").unwrap(),
            &cancel,
        );
        assert!(outcome.is_match());
    }

    #[test]
    fn test_non_positive_amounts_skipped() {
        let candidates = vec![item("1", "-50"), item("2", "0"), item("3", "150"), item("4", "50")];
        let outcome = multi(4, 1000).find(&candidates, Money::parse("200").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::Matched(ids(&["3", "4"])));
    }

    #[test]
    fn test_non_positive_target() {
        let candidates = vec![item("1", "-5"), item("2", "5")];
        assert_eq!(
            multi(4, 1000).find(&candidates, Money::parse("-5").unwrap()),
            AutoMatchOutcome::Matched(ids(&["1"]))
        );
        assert_eq!(
            multi(4, 1000).find(&candidates, Money::parse("-10").unwrap()),
            AutoMatchOutcome::NoMatchFound
        );
    }

    #[test]
    fn test_large_catalog_prunes_quickly() {
        let candidates: Vec<MatchItem> = (1..=1000)
            .map(|n| item(&n.to_string(), &n.to_string()))
            .collect();
        // Four items can reach at most 3994.00
        let outcome = multi(4, 1000).find(&candidates, Money::parse("500500").unwrap());
        assert_eq!(outcome, AutoMatchOutcome::NoMatchFound);
    }

    #[test]
    fn test_deterministic() {
        let matcher = multi(4, 100_000);
        let target = Money::parse("699.99").unwrap();
        let first = matcher.find(&invoices(), target);
        for _ in 0..5 {
            assert_eq!(matcher.find(&invoices(), target), first);
        }
    }
}

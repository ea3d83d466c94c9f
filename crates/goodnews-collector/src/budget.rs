//! Per-invocation query allowance.
//!
//! The daily provider ceiling is split evenly across the scheduled
//! invocations. Consumption is tracked only within one invocation; nothing
//! is carried over between runs.

use goodnews_core::KeywordEntry;

/// Queries one invocation may issue. Integer division; the remainder is lost.
///
/// Returns `0` when `invocations_per_day` is `0`.
#[must_use]
pub fn allowance(daily_limit: u32, invocations_per_day: u32) -> u32 {
    daily_limit.checked_div(invocations_per_day).unwrap_or(0)
}

/// Query counter for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryBudget {
    daily_limit: u32,
    invocations_per_day: u32,
    per_invocation_allowance: u32,
    consumed: u32,
}

impl QueryBudget {
    #[must_use]
    pub fn new(daily_limit: u32, invocations_per_day: u32) -> Self {
        Self {
            daily_limit,
            invocations_per_day,
            per_invocation_allowance: allowance(daily_limit, invocations_per_day),
            consumed: 0,
        }
    }

    /// Claim one query slot.
    ///
    /// Returns `true` and counts the slot iff consumption is below the
    /// allowance; otherwise returns `false` and changes nothing.
    pub fn try_consume(&mut self) -> bool {
        if self.consumed < self.per_invocation_allowance {
            self.consumed += 1;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    #[must_use]
    pub fn allowance(&self) -> u32 {
        self.per_invocation_allowance
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.per_invocation_allowance - self.consumed
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    #[must_use]
    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    #[must_use]
    pub fn invocations_per_day(&self) -> u32 {
        self.invocations_per_day
    }
}

/// Upper bound on how an allowance would be spread over the catalog.
///
/// Each keyword, in the given order, reserves up to `queries_per_keyword`
/// slots until the allowance runs out. Keywords that would get nothing are
/// omitted. Real runs can spend less per keyword when paging stops early.
#[must_use]
pub fn plan_queries(
    keywords: &[KeywordEntry],
    allowance: u32,
    queries_per_keyword: u32,
) -> Vec<(&KeywordEntry, u32)> {
    let mut remaining = allowance;
    let mut plan = Vec::new();
    for entry in keywords {
        if remaining == 0 {
            break;
        }
        let slots = queries_per_keyword.min(remaining);
        if slots == 0 {
            break;
        }
        remaining -= slots;
        plan.push((entry, slots));
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowance_is_floor_division() {
        assert_eq!(allowance(75, 6), 12);
        assert_eq!(allowance(10, 5), 2);
        assert_eq!(allowance(10, 4), 2);
        assert_eq!(allowance(3, 5), 0);
    }

    #[test]
    fn allowance_with_zero_invocations_is_zero() {
        assert_eq!(allowance(75, 0), 0);
    }

    #[test]
    fn try_consume_stops_exactly_at_allowance() {
        for (daily, per_day) in [(10, 5), (75, 6), (7, 7), (0, 3), (100, 1)] {
            let mut budget = QueryBudget::new(daily, per_day);
            let expected = daily / per_day;
            for _ in 0..expected {
                assert!(budget.try_consume());
            }
            assert!(!budget.try_consume(), "({daily}, {per_day}) over-consumed");
            assert_eq!(budget.consumed(), expected);
            assert!(budget.is_exhausted());
        }
    }

    #[test]
    fn failed_consume_has_no_side_effect() {
        let mut budget = QueryBudget::new(2, 1);
        assert!(budget.try_consume());
        assert!(budget.try_consume());
        let before = budget.clone();
        assert!(!budget.try_consume());
        assert!(!budget.try_consume());
        assert_eq!(budget, before);
    }

    #[test]
    fn remaining_tracks_consumption() {
        let mut budget = QueryBudget::new(75, 6);
        assert_eq!(budget.remaining(), 12);
        budget.try_consume();
        assert_eq!(budget.remaining(), 11);
        assert_eq!(budget.allowance(), 12);
    }

    #[test]
    fn plan_fills_highest_priority_first() {
        let keywords = vec![
            KeywordEntry {
                text: "pets".to_string(),
                priority: 1,
            },
            KeywordEntry {
                text: "finance".to_string(),
                priority: 2,
            },
        ];
        let plan = plan_queries(&keywords, 2, 3);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].0.text, "pets");
        assert_eq!(plan[0].1, 2);

        let plan = plan_queries(&keywords, 4, 3);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].1, 1);
    }
}

//! Context budget value object
//!
//! Token budget carried by projects and demands. Immutable: consuming
//! tokens produces a new value. Health thresholds drive the UI warnings
//! (above 70% used is a warning, above 90% is critical).

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Token budget for context management
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBudget {
    /// Maximum tokens allocated
    pub max_tokens: u64,
    /// Tokens already consumed
    pub used_tokens: u64,
}

impl ContextBudget {
    /// Create a fresh budget with nothing consumed
    #[inline]
    #[must_use]
    pub fn new(max_tokens: u64) -> Self {
        Self {
            max_tokens,
            used_tokens: 0,
        }
    }

    /// Create a budget with an existing usage level
    #[inline]
    #[must_use]
    pub fn with_usage(max_tokens: u64, used_tokens: u64) -> Self {
        Self {
            max_tokens,
            used_tokens,
        }
    }

    /// Tokens still available (never negative)
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> u64 {
        self.max_tokens.saturating_sub(self.used_tokens)
    }

    /// Fraction of the budget consumed, clamped to [0.0, 1.0]
    ///
    /// A zero-token budget reads as fully unused.
    #[inline]
    #[must_use]
    pub fn fraction_used(&self) -> f64 {
        if self.max_tokens == 0 {
            return 0.0;
        }
        (self.used_tokens as f64 / self.max_tokens as f64).min(1.0)
    }

    /// More than 90% consumed
    #[inline]
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.fraction_used() > 0.9
    }

    /// More than 70% consumed
    #[inline]
    #[must_use]
    pub fn is_warning(&self) -> bool {
        self.fraction_used() > 0.7
    }

    /// At most 70% consumed
    #[inline]
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.fraction_used() <= 0.7
    }

    /// Check whether `tokens` can be consumed without exceeding the budget
    #[inline]
    #[must_use]
    pub fn can_consume(&self, tokens: u64) -> bool {
        self.remaining() >= tokens
    }

    /// Consume tokens, returning the new budget
    ///
    /// # Errors
    /// `DomainError::BudgetExceeded` if fewer than `tokens` remain.
    pub fn consume(self, tokens: u64) -> Result<Self, DomainError> {
        if !self.can_consume(tokens) {
            return Err(DomainError::BudgetExceeded {
                requested: tokens,
                remaining: self.remaining(),
            });
        }

        Ok(Self {
            max_tokens: self.max_tokens,
            used_tokens: self.used_tokens + tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_budget_is_unused() {
        let budget = ContextBudget::new(100_000);
        assert_eq!(budget.used_tokens, 0);
        assert_eq!(budget.remaining(), 100_000);
        assert_eq!(budget.fraction_used(), 0.0);
        assert!(budget.is_healthy());
    }

    #[test]
    fn remaining_never_underflows() {
        let budget = ContextBudget::with_usage(100, 250);
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.fraction_used(), 1.0);
    }

    #[test]
    fn zero_budget_reads_as_unused() {
        let budget = ContextBudget::new(0);
        assert_eq!(budget.fraction_used(), 0.0);
        assert!(!budget.can_consume(1));
    }

    #[test]
    fn consume_returns_new_budget() {
        let budget = ContextBudget::new(1_000);
        let after = budget.consume(400).unwrap();
        assert_eq!(after.used_tokens, 400);
        assert_eq!(after.remaining(), 600);
        // consuming never mutates the source value
        assert_eq!(budget.used_tokens, 0);
    }

    #[test]
    fn consume_rejects_overdraw() {
        let budget = ContextBudget::with_usage(1_000, 900);
        let err = budget.consume(200).unwrap_err();
        assert_eq!(
            err,
            DomainError::BudgetExceeded {
                requested: 200,
                remaining: 100,
            }
        );
    }

    #[test]
    fn consume_exact_remainder_is_allowed() {
        let budget = ContextBudget::with_usage(1_000, 900);
        let after = budget.consume(100).unwrap();
        assert_eq!(after.remaining(), 0);
    }

    #[test]
    fn health_thresholds() {
        assert!(ContextBudget::with_usage(100, 70).is_healthy());
        assert!(!ContextBudget::with_usage(100, 70).is_warning());

        assert!(ContextBudget::with_usage(100, 71).is_warning());
        assert!(!ContextBudget::with_usage(100, 71).is_critical());

        assert!(ContextBudget::with_usage(100, 91).is_critical());
        assert!(ContextBudget::with_usage(100, 91).is_warning());
    }

    proptest! {
        #[test]
        fn consume_accounting_holds(max in 0u64..1_000_000, used in 0u64..1_000_000, take in 0u64..1_000_000) {
            let budget = ContextBudget::with_usage(max, used);
            match budget.consume(take) {
                Ok(after) => {
                    prop_assert!(take <= budget.remaining());
                    prop_assert_eq!(after.used_tokens, used + take);
                    prop_assert_eq!(after.max_tokens, max);
                }
                Err(_) => prop_assert!(take > budget.remaining()),
            }
        }

        #[test]
        fn remaining_plus_used_covers_max(max in 0u64..1_000_000, used in 0u64..1_000_000) {
            let budget = ContextBudget::with_usage(max, used);
            prop_assert!(budget.remaining() + budget.used_tokens >= budget.max_tokens);
        }
    }
}

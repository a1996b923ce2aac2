use crate::{
    model::{Expense, Money, PlanSummary, SettlementPlan},
    services::{BalanceCalculator, DebtSimplifier, SettlementError},
};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error("expense {index}: splits total {actual} does not match amount {expected}")]
    SplitMismatch {
        index: usize,
        expected: Money,
        actual: Money,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Reject expenses whose splits do not add up to the expense amount
    /// (within one cent). Off by default: imbalanced input flows through.
    pub validate_splits: bool,
}

/// Orchestrates balance calculation and debt simplification into a plan.
pub struct SettlementPlanner;

impl SettlementPlanner {
    pub fn plan<'a>(&self, expenses: &[Expense<'a>]) -> Result<SettlementPlan<'a>, PlanError> {
        self.plan_with_options(expenses, PlanOptions::default())
    }

    pub fn plan_with_options<'a>(
        &self,
        expenses: &[Expense<'a>],
        options: PlanOptions,
    ) -> Result<SettlementPlan<'a>, PlanError> {
        if options.validate_splits {
            for (index, expense) in expenses.iter().enumerate() {
                let actual: Money = expense.splits.iter().map(|split| split.amount).sum();
                if (actual - expense.amount).abs() >= Money::new(1, 2) {
                    return Err(PlanError::SplitMismatch {
                        index,
                        expected: expense.amount,
                        actual,
                    });
                }
            }
        }

        let balances = BalanceCalculator.calculate(expenses);
        let transfers = DebtSimplifier::default().simplify(&balances)?;

        let total_spent = expenses
            .iter()
            .map(|expense| expense.amount)
            .sum::<Money>()
            .round_to_cents();
        let direct_transfers = expenses
            .iter()
            .map(|expense| {
                expense
                    .splits
                    .iter()
                    .filter(|split| split.participant != expense.paid_by)
                    .count()
            })
            .sum();

        let summary = PlanSummary {
            total_spent,
            direct_transfers,
            simplified_transfers: transfers.len(),
        };

        Ok(SettlementPlan {
            balances,
            transfers,
            summary,
        })
    }
}

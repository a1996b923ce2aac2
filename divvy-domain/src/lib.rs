#![warn(clippy::uninlined_format_args)]

pub mod model;
pub mod services;

pub use model::{
    Balance, Expense, Money, PlanSummary, RemainderPolicy, SettlementPlan, Split, Transfer,
};
pub use services::{
    BalanceCalculator, DebtSimplifier, PlanError, PlanOptions, SettlementError, SettlementPlanner,
};

pub mod balance_calculator;
pub mod debt_simplifier;
pub mod settlement_planner;

pub use balance_calculator::BalanceCalculator;
pub use debt_simplifier::{DebtSimplifier, SettlementError};
pub use settlement_planner::{PlanError, PlanOptions, SettlementPlanner};

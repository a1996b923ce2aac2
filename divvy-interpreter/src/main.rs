#![warn(clippy::uninlined_format_args)]

use divvy_domain::{Money, PlanOptions, SettlementPlan, SettlementPlanner};
use std::{borrow::Cow, env, fs, process};

const USAGE: &str = "Usage: divvy <file.divvy> [--check]";

type CliResult<T> = Result<T, Cow<'static, str>>;

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let mut validate_splits = false;
    let mut path: Option<String> = None;

    for arg in env::args().skip(1) {
        if arg == "--check" {
            validate_splits = true;
        } else if path.is_none() {
            path = Some(arg);
        } else {
            return Err(USAGE.into());
        }
    }
    let Some(path) = path else {
        return Err(USAGE.into());
    };

    let source =
        fs::read_to_string(&path).map_err(|err| format!("Failed to read '{path}': {err}"))?;

    let expenses = divvy_parser::parse_expenses(&source).map_err(|err| err.to_string())?;

    let options = PlanOptions { validate_splits };
    let plan = SettlementPlanner
        .plan_with_options(&expenses, options)
        .map_err(|err| err.to_string())?;

    print_plan(&plan);
    Ok(())
}

fn print_plan(plan: &SettlementPlan<'_>) {
    let name_width = plan
        .balances
        .iter()
        .map(|balance| balance.participant.len())
        .max()
        .unwrap_or(0);

    println!("Balances:");
    for balance in &plan.balances {
        let sign = if balance.net >= Money::ZERO { "+" } else { "" };
        println!(
            "  {:<name_width$}  {sign}{:.2}",
            balance.participant, balance.net
        );
    }

    if plan.transfers.is_empty() {
        println!("Everything is settled.");
    } else {
        println!("Transfers:");
        for transfer in &plan.transfers {
            println!("  {} -> {}  {:.2}", transfer.from, transfer.to, transfer.amount);
        }
    }

    let summary = &plan.summary;
    println!(
        "Total spent {:.2}; {} direct repayment(s) reduced to {} transfer(s).",
        summary.total_spent, summary.direct_transfers, summary.simplified_transfers
    );
}

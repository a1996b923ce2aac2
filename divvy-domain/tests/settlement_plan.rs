use divvy_domain::{Expense, Money, RemainderPolicy, SettlementPlanner, Split};
use proptest::prelude::*;
use std::collections::HashMap;

const NAMES: [&str; 6] = ["ayla", "brook", "casey", "dev", "emre", "farah"];

/// Builds expenses whose splits always add up to the expense amount, so the
/// resulting balances are conserved by construction.
fn conserved_expenses(
    payer_indexes: &[usize],
    member_masks: &[usize],
    amounts: &[i64],
    expense_count: usize,
) -> Vec<Expense<'static>> {
    let mut expenses = Vec::with_capacity(expense_count);
    for idx in 0..expense_count {
        let payer = NAMES[payer_indexes.get(idx).copied().unwrap_or(0) % NAMES.len()];
        let mask = member_masks.get(idx).copied().unwrap_or(1) % 64;
        let mask = if mask == 0 { 1 } else { mask };
        let members: Vec<&str> = (0..NAMES.len())
            .filter(|bit| mask & (1 << bit) != 0)
            .map(|bit| NAMES[bit])
            .collect();

        let amount = Money::new(amounts.get(idx).copied().unwrap_or(0), 2);
        let shares = amount.split_even(members.len(), RemainderPolicy::FrontLoad);
        let splits = members
            .iter()
            .zip(shares)
            .map(|(&participant, amount)| Split {
                participant,
                amount,
            })
            .collect();

        expenses.push(Expense {
            paid_by: payer,
            amount,
            splits,
        });
    }
    expenses
}

proptest! {
    #[test]
    fn settlement_plans_conserve_and_settle(
        expense_count in 0usize..=12,
        payer_indexes in prop::collection::vec(0usize..=5, 0..=12),
        member_masks in prop::collection::vec(1usize..=63, 0..=12),
        amounts in prop::collection::vec(0i64..=100_000, 0..=12),
    ) {
        let expenses = conserved_expenses(&payer_indexes, &member_masks, &amounts, expense_count);
        let planner = SettlementPlanner;
        let plan = planner.plan(&expenses).expect("plan should succeed");

        let epsilon = Money::new(1, 2);

        // Every cent paid is debited from exactly the splits listed.
        let total: Money = plan.balances.iter().map(|balance| balance.net).sum();
        prop_assert!(total.abs() < epsilon);

        // At most one transfer per participant beyond the first.
        prop_assert!(plan.transfers.len() <= plan.balances.len().saturating_sub(1));

        // Applying the transfer list drives every balance to zero.
        let mut nets: HashMap<&str, Money> = plan
            .balances
            .iter()
            .map(|balance| (balance.participant, balance.net))
            .collect();
        for transfer in &plan.transfers {
            prop_assert!(transfer.amount >= epsilon);
            prop_assert_ne!(transfer.from, transfer.to);
            *nets.get_mut(transfer.from).expect("debtor has a balance") += transfer.amount;
            *nets.get_mut(transfer.to).expect("creditor has a balance") -= transfer.amount;
        }
        for (_, net) in nets {
            prop_assert!(net.abs() < epsilon);
        }

        if plan.summary.direct_transfers > 0 {
            prop_assert!(plan.summary.simplified_transfers <= plan.summary.direct_transfers);
        }

        let again = planner.plan(&expenses).expect("plan should be deterministic");
        prop_assert_eq!(plan, again);
    }
}

proptest! {
    #[test]
    fn even_shares_stay_within_one_cent(
        cents in -100_000i64..=100_000,
        count in 1usize..=12,
    ) {
        let amount = Money::new(cents, 2);
        let shares = amount.split_even(count, RemainderPolicy::FrontLoad);

        prop_assert_eq!(shares.len(), count);

        let total: Money = shares.iter().sum();
        prop_assert_eq!(total, amount);

        let largest = shares.iter().copied().max().expect("at least one share");
        let smallest = shares.iter().copied().min().expect("at least one share");
        prop_assert!(largest - smallest <= Money::new(1, 2));
    }
}

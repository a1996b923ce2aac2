use crate::model::{Balance, Expense, Money};
use indexmap::IndexMap;

/// Net balance derivation service.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Reduces a list of expenses into one net balance per participant.
    ///
    /// The payer of each expense is credited the full amount; every split
    /// participant is debited their share. A payer appearing in their own
    /// split list receives both adjustments. Output order is the order of
    /// first appearance, and every net is rounded to whole cents.
    pub fn calculate<'a>(&self, expenses: &[Expense<'a>]) -> Vec<Balance<'a>> {
        let mut accumulated: IndexMap<&'a str, Money> = IndexMap::new();

        for expense in expenses {
            *accumulated.entry(expense.paid_by).or_insert(Money::ZERO) += expense.amount;
            for split in &expense.splits {
                *accumulated.entry(split.participant).or_insert(Money::ZERO) -= split.amount;
            }
        }

        accumulated
            .into_iter()
            .map(|(participant, net)| Balance {
                participant,
                net: net.round_to_cents(),
            })
            .collect()
    }
}

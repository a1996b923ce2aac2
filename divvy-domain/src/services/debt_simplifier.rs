use crate::model::{Balance, Money, Transfer};
use thiserror::Error;

/// Iteration budget per participant. A conserved balance list settles in at
/// most one transfer per participant, so hitting the budget means the input
/// never converges within the settlement tolerance.
const MAX_ITERATION_FACTOR: usize = 10;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    #[error("settlement did not converge after {iterations} iterations ({outstanding} outstanding)")]
    DidNotConverge { iterations: usize, outstanding: Money },
}

/// Greedy debt simplification: repeatedly matches the largest debtor with
/// the largest creditor until every balance is within one cent of zero.
///
/// The pairing is a heuristic, not an optimal solver; it guarantees at most
/// `n - 1` transfers for `n` participants but not a globally minimal count.
pub struct DebtSimplifier {
    pub max_iteration_factor: usize,
}

impl Default for DebtSimplifier {
    fn default() -> Self {
        Self {
            max_iteration_factor: MAX_ITERATION_FACTOR,
        }
    }
}

impl DebtSimplifier {
    pub fn simplify<'a>(
        &self,
        balances: &[Balance<'a>],
    ) -> Result<Vec<Transfer<'a>>, SettlementError> {
        if balances.len() < 2 {
            return Ok(Vec::new());
        }

        let epsilon = settlement_epsilon();
        let mut working: Vec<Money> = balances.iter().map(|balance| balance.net).collect();
        let mut transfers = Vec::new();
        let iteration_budget = self.max_iteration_factor.saturating_mul(balances.len());
        let mut iterations = 0usize;

        loop {
            let debtor = largest_debtor(&working);
            let creditor = largest_creditor(&working);

            // No debtor/creditor pair left to match; whatever remains is
            // below tolerance or a one-sided residual.
            if working[debtor] > -epsilon || working[creditor] < epsilon {
                break;
            }

            if iterations >= iteration_budget {
                let outstanding: Money = working.iter().map(|net| net.abs()).sum();
                tracing::error!(
                    iterations,
                    participant_count = balances.len(),
                    outstanding = %outstanding,
                    "Greedy settlement exceeded its iteration budget"
                );
                return Err(SettlementError::DidNotConverge {
                    iterations,
                    outstanding,
                });
            }
            iterations += 1;

            let amount = working[debtor].abs().min(working[creditor]).round_to_cents();
            if amount < epsilon {
                break;
            }

            transfers.push(Transfer {
                from: balances[debtor].participant,
                to: balances[creditor].participant,
                amount,
            });
            working[debtor] += amount;
            working[creditor] -= amount;
        }

        let unsettled = working.iter().filter(|net| net.abs() >= epsilon).count();
        if unsettled > 0 {
            let residual: Money = working.iter().sum();
            tracing::warn!(
                unsettled,
                residual = %residual,
                "Balances remain outside the settlement tolerance; input did not sum to zero"
            );
        }

        tracing::debug!(
            participant_count = balances.len(),
            transfer_count = transfers.len(),
            iterations,
            "Greedy settlement finished"
        );

        Ok(transfers)
    }
}

/// One cent: the tolerance below which a balance counts as settled, and the
/// smallest transfer worth emitting.
fn settlement_epsilon() -> Money {
    Money::new(1, 2)
}

/// Index of the most negative balance; the first occurrence wins ties.
fn largest_debtor(working: &[Money]) -> usize {
    let mut best = 0;
    for (idx, net) in working.iter().enumerate().skip(1) {
        if *net < working[best] {
            best = idx;
        }
    }
    best
}

/// Index of the most positive balance; the first occurrence wins ties.
fn largest_creditor(working: &[Money]) -> usize {
    let mut best = 0;
    for (idx, net) in working.iter().enumerate().skip(1) {
        if *net > working[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn simplifier() -> DebtSimplifier {
        DebtSimplifier::default()
    }

    fn balances<'a>(entries: &[(&'a str, i64)]) -> Vec<Balance<'a>> {
        entries
            .iter()
            .map(|&(participant, cents)| Balance {
                participant,
                net: Money::new(cents, 2),
            })
            .collect()
    }

    fn transfers<'a>(entries: &[(&'a str, &'a str, i64)]) -> Vec<Transfer<'a>> {
        entries
            .iter()
            .map(|&(from, to, cents)| Transfer {
                from,
                to,
                amount: Money::new(cents, 2),
            })
            .collect()
    }

    #[rstest]
    #[case::empty(vec![], vec![])]
    #[case::single_participant(balances(&[("ayla", 5_000)]), vec![])]
    #[case::already_settled(balances(&[("ayla", 0), ("brook", 0)]), vec![])]
    #[case::two_party(
        balances(&[("ayla", 5_000), ("brook", -5_000)]),
        transfers(&[("brook", "ayla", 5_000)])
    )]
    #[case::one_creditor_two_debtors(
        balances(&[("ayla", 6_000), ("brook", -2_000), ("casey", -4_000)]),
        transfers(&[("casey", "ayla", 4_000), ("brook", "ayla", 2_000)])
    )]
    #[case::ties_break_on_first_occurrence(
        balances(&[("ayla", 3_000), ("brook", 3_000), ("casey", -3_000), ("dev", -3_000)]),
        transfers(&[("casey", "ayla", 3_000), ("dev", "brook", 3_000)])
    )]
    #[case::thirds_settle_exactly(
        balances(&[("ayla", 6_667), ("brook", -3_333), ("casey", -3_334)]),
        transfers(&[("casey", "ayla", 3_334), ("brook", "ayla", 3_333)])
    )]
    #[case::sub_cent_residuals_are_settled(
        vec![
            Balance { participant: "ayla", net: Money::new(5, 3) },
            Balance { participant: "brook", net: Money::new(-5, 3) },
        ],
        vec![]
    )]
    #[case::one_sided_residual_is_left_unsettled(
        balances(&[("ayla", 5_000), ("brook", -3_000)]),
        transfers(&[("brook", "ayla", 3_000)])
    )]
    fn simplify_cases(
        simplifier: DebtSimplifier,
        #[case] balances: Vec<Balance<'static>>,
        #[case] expected: Vec<Transfer<'static>>,
    ) {
        let result = simplifier
            .simplify(&balances)
            .expect("greedy settlement should converge");
        assert_eq!(result, expected);
    }

    #[rstest]
    fn transfer_count_stays_below_participant_count(simplifier: DebtSimplifier) {
        let balances = balances(&[
            ("ayla", 10_000),
            ("brook", -1_000),
            ("casey", -2_000),
            ("dev", -3_000),
            ("emre", -4_000),
        ]);

        let result = simplifier
            .simplify(&balances)
            .expect("greedy settlement should converge");
        assert!(result.len() <= balances.len() - 1);
    }

    #[test]
    fn zero_iteration_budget_reports_non_convergence() {
        let simplifier = DebtSimplifier {
            max_iteration_factor: 0,
        };
        let balances = balances(&[("ayla", 5_000), ("brook", -5_000)]);

        let result = simplifier.simplify(&balances);
        assert_eq!(
            result,
            Err(SettlementError::DidNotConverge {
                iterations: 0,
                outstanding: Money::new(10_000, 2),
            })
        );
    }
}

use rust_decimal::{Decimal, RoundingStrategy};
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

/// A currency amount with exact decimal arithmetic.
///
/// Positive values are money owed to a participant, negative values are money
/// a participant owes. Quantization to whole cents is explicit via
/// [`Money::round_to_cents`]; intermediate sums keep full precision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

/// How leftover cents are assigned when an amount does not divide evenly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// The earliest shares absorb one extra cent each.
    FrontLoad,
}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(mantissa: i64, scale: u32) -> Self {
        Self(Decimal::new(mantissa, scale))
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Quantizes to two decimal places, rounding midpoints away from zero
    /// (0.005 becomes 0.01, -0.005 becomes -0.01).
    pub fn round_to_cents(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Splits the amount into `count` cent-exact shares that sum back to the
    /// rounded original.
    pub fn split_even(self, count: usize, policy: RemainderPolicy) -> Vec<Money> {
        match policy {
            RemainderPolicy::FrontLoad => {}
        }
        if count == 0 {
            return Vec::new();
        }

        let rounded = self.round_to_cents().0;
        // Scale is at most 2 after rounding, so this is exact.
        let cents = rounded.mantissa() * 10_i128.pow(2 - rounded.scale());

        let base = cents / count as i128;
        let remainder = (cents % count as i128).unsigned_abs() as usize;
        let step = if cents < 0 { -1 } else { 1 };

        (0..count)
            .map(|idx| {
                let mut share = base;
                if idx < remainder {
                    share += step;
                }
                Money(Decimal::from_i128_with_scale(share, 2))
            })
            .collect()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// One participant's share of a single expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split<'a> {
    pub participant: &'a str,
    pub amount: Money,
}

/// A shared expense: who fronted the money and how it is divided.
///
/// `splits` may be empty (the payer is credited and nobody is debited), and
/// nothing requires the split amounts to add up to `amount`; whatever
/// imbalance the caller supplies flows through to the balances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense<'a> {
    pub paid_by: &'a str,
    pub amount: Money,
    pub splits: Vec<Split<'a>>,
}

/// Net position of one participant across every expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Balance<'a> {
    pub participant: &'a str,
    pub net: Money,
}

/// A proposed payment from a net debtor to a net creditor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub amount: Money,
}

/// Aggregate figures for a settlement plan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub total_spent: Money,
    /// Repayments required if every split were paid back individually: one
    /// per split entry whose participant is not the expense's payer.
    pub direct_transfers: usize,
    pub simplified_transfers: usize,
}

/// Full output of the planner: balances, the simplified transfer list, and
/// summary figures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementPlan<'a> {
    pub balances: Vec<Balance<'a>>,
    pub transfers: Vec<Transfer<'a>>,
    pub summary: PlanSummary,
}

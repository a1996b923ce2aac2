#![warn(clippy::uninlined_format_args)]

use divvy_domain::{Expense, Money, RemainderPolicy, Split};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, space1},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::separated_list1,
    sequence::{pair, preceded, separated_pair},
};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at line {line}: {detail}")]
    Syntax { line: usize, detail: String },
}

/// Parses a line-oriented expense listing into expense records.
///
/// One expense per line:
///
/// ```text
/// # comments and blank lines are skipped
/// ayla paid 90.00 for ayla=30 brook=30 casey=30
/// dev paid 100 split dev emre farah
/// ```
///
/// `for` assigns explicit shares; `split` divides the amount evenly with
/// leftover cents front-loaded onto the earliest names. A line without
/// either clause records the payment with no shares.
pub fn parse_expenses(source: &str) -> Result<Vec<Expense<'_>>, ParseError> {
    let mut expenses = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        match all_consuming(expense)(text) {
            Ok((_, parsed)) => expenses.push(parsed),
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                return Err(ParseError::Syntax {
                    line,
                    detail: format!("unexpected input at '{}'", err.input),
                });
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(ParseError::Syntax {
                    line,
                    detail: "incomplete statement".to_string(),
                });
            }
        }
    }

    Ok(expenses)
}

enum SplitClause<'a> {
    Explicit(Vec<Split<'a>>),
    Even(Vec<&'a str>),
}

fn expense(input: &str) -> IResult<&str, Expense<'_>> {
    let (input, paid_by) = identifier(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("paid")(input)?;
    let (input, _) = space1(input)?;
    let (input, amount) = money_literal(input)?;
    let (input, clause) = opt(preceded(space1, alt((explicit_splits, even_splits))))(input)?;

    let splits = match clause {
        Some(SplitClause::Explicit(splits)) => splits,
        Some(SplitClause::Even(members)) => {
            let shares = amount.split_even(members.len(), RemainderPolicy::FrontLoad);
            members
                .into_iter()
                .zip(shares)
                .map(|(participant, amount)| Split {
                    participant,
                    amount,
                })
                .collect()
        }
        None => Vec::new(),
    };

    Ok((
        input,
        Expense {
            paid_by,
            amount,
            splits,
        },
    ))
}

fn explicit_splits(input: &str) -> IResult<&str, SplitClause<'_>> {
    map(
        preceded(pair(tag("for"), space1), separated_list1(space1, assignment)),
        SplitClause::Explicit,
    )(input)
}

fn even_splits(input: &str) -> IResult<&str, SplitClause<'_>> {
    map(
        preceded(
            pair(tag("split"), space1),
            separated_list1(space1, identifier),
        ),
        SplitClause::Even,
    )(input)
}

fn assignment(input: &str) -> IResult<&str, Split<'_>> {
    map(
        separated_pair(identifier, char('='), money_literal),
        |(participant, amount)| Split {
            participant,
            amount,
        },
    )(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_')(input)
}

fn money_literal(input: &str) -> IResult<&str, Money> {
    map_res(
        recognize(pair(digit1, opt(pair(char('.'), digit1)))),
        |text: &str| {
            if let Some((_, fraction)) = text.split_once('.') {
                if fraction.len() > 2 {
                    return Err(format!("more than two decimal places in '{text}'"));
                }
            }
            Decimal::from_str(text)
                .map(Money::from_decimal)
                .map_err(|err| err.to_string())
        },
    )(input)
}

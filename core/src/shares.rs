//! Share-size arithmetic.
//!
//! The registry authors share sizes as free-text arithmetic (`"1/3"`,
//! `"1/3+1/6"`, occasionally `"0.5"`), so summing them means evaluating
//! expressions. Evaluation is exact: every value is a checked `Rational64`,
//! and comparisons against one are plain equality.

use std::fmt;

use drrp_types::{OwnershipRecord, RecordId};
use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, Signed, Zero};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Parenthesis nesting accepted before an expression is rejected.
const MAX_NESTING: usize = 32;

/// Decimal fraction digits accepted in one literal (10^18 still fits an `i64`).
const MAX_FRACTION_DIGITS: u32 = 18;

/// An exact, non-negative portion of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Share(Rational64);

impl Share {
    #[must_use]
    pub fn zero() -> Self {
        Self(Rational64::zero())
    }

    #[must_use]
    pub fn one() -> Self {
        Self(Rational64::from_integer(1))
    }

    /// `numer / denom`, or `None` for a zero denominator or a negative value.
    #[must_use]
    pub fn ratio(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let value = Rational64::new(numer, denom);
        if value.is_negative() {
            None
        } else {
            Some(Self(value))
        }
    }

    #[must_use]
    pub fn value(self) -> Rational64 {
        self.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Exactly the whole property.
    #[must_use]
    pub fn is_one(self) -> bool {
        self == Self::one()
    }

    #[must_use]
    pub fn is_at_least_one(self) -> bool {
        self >= Self::one()
    }

    fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(&other.0).map(Self)
    }
}

impl Default for Share {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            write!(f, "{}", self.0.numer())
        } else {
            write!(f, "{}/{}", self.0.numer(), self.0.denom())
        }
    }
}

impl Serialize for Share {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What made a share expression unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShareFault {
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar { offset: usize, found: char },
    #[error("expression ends unexpectedly")]
    UnexpectedEnd,
    #[error("unexpected input after offset {offset}")]
    TrailingInput { offset: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("parentheses nested too deeply")]
    NestingTooDeep,
    #[error("share evaluates to a negative value")]
    Negative,
}

/// A share-size string that is not valid arithmetic.
///
/// Always fatal: a share that cannot be evaluated is never counted as zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed share expression {expression:?}: {fault}")]
pub struct MalformedShareExpression {
    pub expression: String,
    pub record_id: Option<RecordId>,
    pub fault: ShareFault,
}

/// Evaluate one share expression.
pub fn evaluate_share(expression: &str) -> Result<Share, MalformedShareExpression> {
    evaluate(expression, None)
}

/// Sum the declared share sizes of `records`.
///
/// Records without a share size contribute nothing; an empty selection sums to zero.
pub fn sum_shares<'a, I>(records: I) -> Result<Share, MalformedShareExpression>
where
    I: IntoIterator<Item = &'a OwnershipRecord>,
{
    records
        .into_iter()
        .filter_map(|record| record.share_size().map(|expr| (expr, record.record_id())))
        .try_fold(Share::zero(), |acc, (expr, record_id)| {
            let share = evaluate(expr, Some(record_id))?;
            acc.checked_add(share)
                .ok_or_else(|| malformed(expr, Some(record_id), ShareFault::Overflow))
        })
}

/// Sum loose share expressions, skipping absent and blank ones.
pub fn sum_expressions<'a, I>(expressions: I) -> Result<Share, MalformedShareExpression>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    expressions
        .into_iter()
        .flatten()
        .filter(|expr| !expr.trim().is_empty())
        .try_fold(Share::zero(), |acc, expr| {
            let share = evaluate(expr, None)?;
            acc.checked_add(share)
                .ok_or_else(|| malformed(expr, None, ShareFault::Overflow))
        })
}

fn evaluate(
    expression: &str,
    record_id: Option<RecordId>,
) -> Result<Share, MalformedShareExpression> {
    let value = ShareParser::new(expression)
        .parse_program()
        .map_err(|fault| malformed(expression, record_id, fault))?;
    if value.is_negative() {
        return Err(malformed(expression, record_id, ShareFault::Negative));
    }
    Ok(Share(value))
}

fn malformed(
    expression: &str,
    record_id: Option<RecordId>,
    fault: ShareFault,
) -> MalformedShareExpression {
    MalformedShareExpression {
        expression: expression.to_string(),
        record_id,
        fault,
    }
}

/// Recursive-descent evaluator over `+ - * /`, unary signs, parentheses and
/// integer/decimal literals.
struct ShareParser<'a> {
    input: &'a [u8],
    cursor: usize,
    depth: usize,
}

impl<'a> ShareParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            cursor: 0,
            depth: 0,
        }
    }

    fn parse_program(&mut self) -> Result<Rational64, ShareFault> {
        let value = self.parse_sum()?;
        self.skip_whitespace();
        if self.cursor != self.input.len() {
            return Err(ShareFault::TrailingInput {
                offset: self.cursor,
            });
        }
        Ok(value)
    }

    fn parse_sum(&mut self) -> Result<Rational64, ShareFault> {
        let mut acc = self.parse_product()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'+') => {
                    self.cursor += 1;
                    let rhs = self.parse_product()?;
                    acc = acc.checked_add(&rhs).ok_or(ShareFault::Overflow)?;
                }
                Some(b'-') => {
                    self.cursor += 1;
                    let rhs = self.parse_product()?;
                    acc = acc.checked_sub(&rhs).ok_or(ShareFault::Overflow)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn parse_product(&mut self) -> Result<Rational64, ShareFault> {
        let mut acc = self.parse_unary()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'*') => {
                    self.cursor += 1;
                    let rhs = self.parse_unary()?;
                    acc = acc.checked_mul(&rhs).ok_or(ShareFault::Overflow)?;
                }
                Some(b'/') => {
                    self.cursor += 1;
                    let rhs = self.parse_unary()?;
                    if rhs.is_zero() {
                        return Err(ShareFault::DivisionByZero);
                    }
                    acc = acc.checked_div(&rhs).ok_or(ShareFault::Overflow)?;
                }
                _ => return Ok(acc),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Rational64, ShareFault> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'-') => {
                self.cursor += 1;
                let value = self.nested(Self::parse_unary)?;
                Rational64::zero()
                    .checked_sub(&value)
                    .ok_or(ShareFault::Overflow)
            }
            Some(b'+') => {
                self.cursor += 1;
                self.nested(Self::parse_unary)
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Rational64, ShareFault> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'(') => {
                self.cursor += 1;
                let value = self.nested(Self::parse_sum)?;
                self.skip_whitespace();
                match self.peek() {
                    Some(b')') => {
                        self.cursor += 1;
                        Ok(value)
                    }
                    Some(_) => Err(self.unexpected_char()),
                    None => Err(ShareFault::UnexpectedEnd),
                }
            }
            Some(byte) if byte.is_ascii_digit() || byte == b'.' => self.parse_number(),
            Some(_) => Err(self.unexpected_char()),
            None => Err(ShareFault::UnexpectedEnd),
        }
    }

    fn parse_number(&mut self) -> Result<Rational64, ShareFault> {
        let start = self.cursor;
        let integer = self.take_digits();
        let mut fraction: &[u8] = &[];
        if self.peek() == Some(b'.') {
            self.cursor += 1;
            fraction = self.take_digits();
        }
        if integer.is_empty() && fraction.is_empty() {
            self.cursor = start;
            return Err(self.unexpected_char());
        }

        let scale_digits = u32::try_from(fraction.len()).map_err(|_| ShareFault::Overflow)?;
        if scale_digits > MAX_FRACTION_DIGITS {
            return Err(ShareFault::Overflow);
        }
        let scale = 10_i64.checked_pow(scale_digits).ok_or(ShareFault::Overflow)?;

        let mut numer: i64 = 0;
        for digit in integer.iter().chain(fraction) {
            numer = numer
                .checked_mul(10)
                .and_then(|n| n.checked_add(i64::from(digit - b'0')))
                .ok_or(ShareFault::Overflow)?;
        }
        Ok(Rational64::new(numer, scale))
    }

    fn take_digits(&mut self) -> &'a [u8] {
        let input = self.input;
        let start = self.cursor;
        while self.peek().is_some_and(|byte| byte.is_ascii_digit()) {
            self.cursor += 1;
        }
        &input[start..self.cursor]
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Rational64, ShareFault>,
    ) -> Result<Rational64, ShareFault> {
        if self.depth >= MAX_NESTING {
            return Err(ShareFault::NestingTooDeep);
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn unexpected_char(&self) -> ShareFault {
        let found = std::str::from_utf8(&self.input[self.cursor..])
            .ok()
            .and_then(|rest| rest.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        ShareFault::UnexpectedChar {
            offset: self.cursor,
            found,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.cursor += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.cursor).copied()
    }
}

use anyhow::bail;
use serde_with::DeserializeFromStr;

use std::{
    fmt::{Debug, Display},
    iter::Sum,
    ops::{Add, AddAssign, Mul},
    str::FromStr,
};

/// Represents an amount of money in USD currency.
///
/// The amount is stored internally as an integer number of cents, so line
/// totals and grand totals are exact. The [`Display`] implementation formats
/// it for display as dollars to 2 decimal places.
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd)]
pub struct Usd(i64);

impl Usd {
    /// Returns the amount as a floating-point number of dollars, suitable
    /// for writing to a currency-formatted spreadsheet cell.
    #[must_use]
    pub fn as_dollars(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the amount as a whole number of cents.
    #[must_use]
    pub fn cents(self) -> i64 {
        self.0
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.as_dollars())
    }
}

impl FromStr for Usd {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let raw = s.trim().replace(',', "");
        let raw = raw.strip_prefix('$').unwrap_or(&raw);
        let (sign, digits) = match raw.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, raw),
        };
        let (dollars, cents) = digits.split_once('.').unwrap_or((digits, ""));
        if dollars.is_empty() && cents.is_empty() {
            bail!("empty amount {s:?}");
        }
        if cents.len() > 2 {
            bail!("too many decimal places in amount {s:?}");
        }
        let dollars: u64 = if dollars.is_empty() { 0 } else { dollars.parse()? };
        let cents: u64 = if cents.is_empty() {
            0
        } else {
            format!("{cents:0<2}").parse()?
        };
        let Some(total_cents) = dollars.checked_mul(100).and_then(|d| d.checked_add(cents)) else {
            bail!("amount out of range: {s:?}");
        };
        Ok(Self(sign * i64::try_from(total_cents)?))
    }
}

impl Add for Usd {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Usd {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Mul<i32> for Usd {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self::Output {
        Self(self.0 * i64::from(rhs))
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

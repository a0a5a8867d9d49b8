//! Currency amounts held as whole cents
//!
//! Amounts serialize as text with exactly two decimal digits (`"12.50"`), so a
//! consumer never sees binary floating point artifacts. Arithmetic saturates
//! at the `i64` bounds instead of overflowing.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Whole currency units, e.g. `Money::units(30)` is 30.00
    pub const fn units(units: i64) -> Self {
        Money(units * 100)
    }

    /// Convert a decimal amount, rounding to the nearest cent
    ///
    /// Amounts beyond the representable range saturate; NaN becomes zero.
    pub fn from_f64(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// `pct` percent of this amount, halves rounded away from zero
    pub fn percent(self, pct: i64) -> Self {
        let scaled = i128::from(self.0) * i128::from(pct);
        let mut quotient = scaled / 100;
        if (scaled % 100).abs() * 2 >= 100 {
            quotient += scaled.signum();
        }
        Money(quotient.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    pub fn times(self, factor: i64) -> Self {
        Money(self.0.saturating_mul(factor))
    }

    pub fn clamp_non_negative(self) -> Self {
        self.max(Money::ZERO)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

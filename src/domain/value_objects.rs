//! Value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Money value object: whole Colombian pesos, no minor units.
///
/// Serializes as a bare number so cart snapshots stay wire-compatible with
/// the slots the storefront pages already wrote.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(amount: i64) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn times(&self, quantity: u32) -> Money {
        Money(self.0 * i64::from(quantity))
    }

    /// IVA: 19% of this amount, rounded to the nearest whole peso.
    pub fn tax(&self) -> Money {
        Money((self.0 * 19 + 50) / 100)
    }
}

impl Add for Money {
    type Output = Money;
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    /// es-CO rendering: `$6.200.000`, `$0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-")?;
        }
        let digits = self.0.unsigned_abs().to_string();
        write!(f, "$")?;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                write!(f, ".")?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

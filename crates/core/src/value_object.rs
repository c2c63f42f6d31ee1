//! Value objects: equality by value, not identity.

use serde::{Deserialize, Serialize};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// - **Value Object**: `Money(1300)` equals any other `Money(1300)`
/// - **Entity**: a `Product` with id `1` is the same product whatever its count
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// An amount of money in the smallest currency unit (e.g. kopecks, cents).
///
/// Never negative. Arithmetic saturates instead of wrapping; cart totals are
/// expected to stay far below `u64::MAX`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(minor_units: u64) -> Self {
        Self(minor_units)
    }

    pub const fn minor_units(self) -> u64 {
        self.0
    }

    /// Price of `quantity` items at this unit price.
    pub fn times(self, quantity: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(quantity)))
    }

    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl From<u64> for Money {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Renders as major units with two decimals (`1300` → `13.00`).
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_multiplies_by_quantity() {
        assert_eq!(Money::new(500).times(2), Money::new(1000));
        assert_eq!(Money::new(500).times(0), Money::ZERO);
    }

    #[test]
    fn sum_of_line_totals() {
        let total: Money = [Money::new(1000), Money::new(300)].into_iter().sum();
        assert_eq!(total.minor_units(), 1300);
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(Money::new(u64::MAX).times(2), Money::new(u64::MAX));
        assert_eq!(Money::new(u64::MAX).saturating_add(Money::new(1)), Money::new(u64::MAX));
    }

    #[test]
    fn display_uses_major_units() {
        assert_eq!(Money::new(1300).to_string(), "13.00");
        assert_eq!(Money::new(5).to_string(), "0.05");
    }
}

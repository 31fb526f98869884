//! Monetary amounts and the price reconciliation policy.

use serde::{Deserialize, Serialize};

/// Money amount represented in cents to avoid floating point issues.
///
/// Serializes as a bare integer, which is also the wire representation
/// the gateways and the HTTP API use for prices and amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a new Money amount from a dollar value.
    pub fn from_dollars(dollars: i64) -> Self {
        Self {
            cents: dollars * 100,
        }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns the square of this amount in currency units.
    ///
    /// A price of $10.00 squares to $100.00. This is the amount the
    /// payment gateway is charged per unit price on a purchase.
    pub fn squared(&self) -> Money {
        Money {
            cents: self.cents * self.cents / 100,
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents + rhs.cents,
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents - rhs.cents,
        }
    }
}

/// Outcome of comparing the current catalog price against the price
/// recorded on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceDecision {
    /// Catalog and order agree; keep the recorded price.
    Unchanged,
    /// Catalog price dropped; the order adopts the lower price.
    Adopt(Money),
    /// Catalog price rose above the recorded price; the purchase must
    /// not proceed at the stale quote.
    Regression,
}

/// Reconciles the current catalog price with the price an order was
/// quoted at. The buyer is never charged more than last quoted, and
/// always benefits from a price drop.
pub fn reconcile_price(catalog: Money, recorded: Money) -> PriceDecision {
    if catalog > recorded {
        PriceDecision::Regression
    } else if catalog < recorded {
        PriceDecision::Adopt(catalog)
    } else {
        PriceDecision::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_dollars_is_hundred_cents() {
        assert_eq!(Money::from_dollars(10), Money::from_cents(1000));
    }

    #[test]
    fn display_formats_dollars_and_cents() {
        assert_eq!(Money::from_cents(1050).to_string(), "$10.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
    }

    #[test]
    fn squared_works_in_currency_units() {
        // $10 squared is $100, not the square of the cent count.
        assert_eq!(Money::from_dollars(10).squared(), Money::from_dollars(100));
        assert_eq!(Money::from_cents(50).squared(), Money::from_cents(25));
        assert_eq!(Money::zero().squared(), Money::zero());
    }

    #[test]
    fn ordering_follows_cents() {
        assert!(Money::from_cents(999) < Money::from_dollars(10));
    }

    #[test]
    fn arithmetic() {
        let total = Money::from_dollars(10) + Money::from_cents(50);
        assert_eq!(total, Money::from_cents(1050));
        assert!((total - total).is_zero());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(1000)).unwrap();
        assert_eq!(json, "1000");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::from_cents(1000));
    }

    #[test]
    fn reconcile_keeps_equal_price() {
        let d = reconcile_price(Money::from_dollars(10), Money::from_dollars(10));
        assert_eq!(d, PriceDecision::Unchanged);
    }

    #[test]
    fn reconcile_adopts_lower_catalog_price() {
        let d = reconcile_price(Money::from_dollars(8), Money::from_dollars(10));
        assert_eq!(d, PriceDecision::Adopt(Money::from_dollars(8)));
    }

    #[test]
    fn reconcile_refuses_raised_catalog_price() {
        let d = reconcile_price(Money::from_dollars(12), Money::from_dollars(10));
        assert_eq!(d, PriceDecision::Regression);
    }
}

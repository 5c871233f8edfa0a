//! Money amounts. Prices are stored as `NUMERIC(12, 2)` and order totals as
//! `NUMERIC(14, 2)`, so anything finer than a cent or wider than the column is
//! rejected here instead of being rounded or overflowing in Postgres.

use bigdecimal::{BigDecimal, Zero};

use super::errors::DomainError;

pub const SCALE: i64 = 2;

/// Exclusive upper bound of a unit price: 10^10.
pub fn price_limit() -> BigDecimal {
    BigDecimal::from(10_000_000_000_i64)
}

/// Exclusive upper bound of an order total: 10^12.
pub fn total_limit() -> BigDecimal {
    BigDecimal::from(1_000_000_000_000_i64)
}

/// `label` names the value in the error message, e.g. "price".
pub fn validate_price(label: &str, price: &BigDecimal) -> Result<(), DomainError> {
    if *price < BigDecimal::zero() {
        return Err(DomainError::InvalidInput(format!(
            "{} must not be negative",
            label
        )));
    }
    check_cents(label, price)?;
    if *price >= price_limit() {
        return Err(DomainError::InvalidInput(format!(
            "{} must be below {}",
            label,
            price_limit()
        )));
    }
    Ok(())
}

pub fn validate_total(total: &BigDecimal) -> Result<(), DomainError> {
    if *total >= total_limit() {
        return Err(DomainError::InvalidInput(format!(
            "order total must be below {}",
            total_limit()
        )));
    }
    Ok(())
}

fn check_cents(label: &str, amount: &BigDecimal) -> Result<(), DomainError> {
    if amount.with_scale(SCALE) != *amount {
        return Err(DomainError::InvalidInput(format!(
            "{} must have at most {} decimal places",
            label, SCALE
        )));
    }
    Ok(())
}

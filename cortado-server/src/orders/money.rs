//! Money validation for order lines
//!
//! All monetary quantities are non-negative `i64` values in the smallest
//! currency unit. Totals are integer sums; no floating point anywhere in
//! the money path, so repeated increments can never accumulate rounding
//! drift.

use super::error::OrderError;

/// Maximum allowed unit price per item (smallest currency unit)
pub const MAX_UNIT_PRICE: i64 = 100_000_000;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Validate an item before it enters an order line
pub fn validate_item(item_name: &str, unit_price: i64) -> Result<(), OrderError> {
    if item_name.trim().is_empty() {
        return Err(OrderError::Validation("item name must not be empty".into()));
    }
    if unit_price <= 0 {
        return Err(OrderError::Validation(format!(
            "unit price must be positive, got {unit_price}"
        )));
    }
    if unit_price > MAX_UNIT_PRICE {
        return Err(OrderError::Validation(format!(
            "unit price exceeds maximum allowed ({MAX_UNIT_PRICE}), got {unit_price}"
        )));
    }
    Ok(())
}

/// Validate a quantity after a change has been applied
pub fn validate_quantity(quantity: i32) -> Result<(), OrderError> {
    if quantity > MAX_QUANTITY {
        return Err(OrderError::Validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

/// Line amount = unit price × quantity
///
/// Inputs are capped by the validators above, so the product stays far
/// below `i64::MAX`.
pub fn line_amount(unit_price: i64, quantity: i32) -> i64 {
    unit_price * i64::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_name() {
        assert!(validate_item("", 20000).is_err());
        assert!(validate_item("   ", 20000).is_err());
    }

    #[test]
    fn rejects_non_positive_price() {
        assert!(validate_item("Cà phê đen", 0).is_err());
        assert!(validate_item("Cà phê đen", -500).is_err());
        assert!(validate_item("Cà phê đen", 20000).is_ok());
    }

    #[test]
    fn rejects_price_above_cap() {
        assert!(validate_item("Cà phê đen", MAX_UNIT_PRICE).is_ok());
        assert!(validate_item("Cà phê đen", MAX_UNIT_PRICE + 1).is_err());
    }

    #[test]
    fn quantity_cap() {
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }

    #[test]
    fn amount_is_exact() {
        assert_eq!(line_amount(20000, 1), 20000);
        assert_eq!(line_amount(20000, 2), 40000);
        assert_eq!(line_amount(MAX_UNIT_PRICE, MAX_QUANTITY), 999_900_000_000);
    }
}

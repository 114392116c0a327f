use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::error::ValidationError;

/// Largest integer part of a payment sum or receipt total (8 digits).
pub const MAX_SUM_INTEGER_PART: i64 = 99_999_999;
/// Largest item price or item sum, 42 949 672.95.
pub const MAX_ITEM_AMOUNT: Decimal = Decimal::from_parts(4_294_967_295, 0, 0, false, 2);
/// Largest item quantity, 99 999.999.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 3);

pub const MONEY_SCALE: u32 = 2;
pub const QUANTITY_SCALE: u32 = 3;

/// Accepts non-negative amounts whose integer part, once rounded to
/// kopecks, has at most 8 digits.
pub fn check_sum(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    let max = Decimal::from(MAX_SUM_INTEGER_PART);
    if value.is_sign_negative() || round(value, MONEY_SCALE).trunc() > max {
        return Err(out_of_range(field, value, max));
    }
    Ok(value)
}

/// Accepts non-negative amounts up to an inclusive maximum.
pub fn check_max(field: &'static str, value: Decimal, max: Decimal) -> Result<Decimal, ValidationError> {
    if value.is_sign_negative() || value > max {
        return Err(out_of_range(field, value, max));
    }
    Ok(value)
}

/// Rounds half away from zero to `scale` decimals.
pub fn round(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// JSON number for an amount rounded to `scale` decimals.
pub fn to_json(value: Decimal, scale: u32) -> Value {
    let rounded = round(value, scale).normalize();
    match rounded.to_string().parse::<f64>() {
        Ok(number) => Value::from(number),
        Err(_) => Value::Null,
    }
}

pub fn money(value: Decimal) -> Value {
    to_json(value, MONEY_SCALE)
}

fn out_of_range(field: &'static str, value: Decimal, max: Decimal) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        value: value.to_string(),
        min: "0".to_owned(),
        max: max.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round(dec("150.005"), 2), dec("150.01"));
        assert_eq!(round(dec("150.004"), 2), dec("150.00"));
        assert_eq!(round(dec("0.125"), 2), dec("0.13"));
        assert_eq!(round(dec("1.0005"), 3), dec("1.001"));
    }

    #[test]
    fn sum_bound_checks_integer_part() {
        assert!(check_sum("sum", dec("99999999")).is_ok());
        assert!(check_sum("sum", dec("99999999.99")).is_ok());
        assert!(check_sum("sum", dec("100000000")).is_err());
        assert!(check_sum("sum", dec("-0.01")).is_err());
    }

    #[test]
    fn sum_bound_applies_after_rounding() {
        assert!(check_sum("sum", dec("99999999.994")).is_ok());
        assert!(check_sum("sum", dec("99999999.995")).is_err());
    }

    #[test]
    fn item_amount_bound_is_inclusive() {
        assert!(check_max("price", dec("42949672.95"), MAX_ITEM_AMOUNT).is_ok());
        assert!(check_max("price", dec("42949672.96"), MAX_ITEM_AMOUNT).is_err());
        assert!(check_max("quantity", dec("99999.999"), MAX_QUANTITY).is_ok());
    }

    #[test]
    fn json_numbers_carry_two_decimals_at_most() {
        assert_eq!(money(dec("150.005")), serde_json::json!(150.01));
        assert_eq!(money(dec("10")), serde_json::json!(10.0));
        assert_eq!(money(dec("0.333333")), serde_json::json!(0.33));
    }
}

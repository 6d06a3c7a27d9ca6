//! Field checks shared by the product and category inputs.
//!
//! Signatures follow what `#[validate(custom = "...")]` expects.

use rust_decimal::Decimal;
use validator::ValidationError;

pub const SLUG_MAX_LENGTH: usize = 50;

/// Integral digits allowed by the `DECIMAL(9, 2)` price columns.
const PRICE_INTEGRAL_DIGITS: u32 = 7;
const PRICE_SCALE: u32 = 2;

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() || slug.len() > SLUG_MAX_LENGTH {
        let mut err = ValidationError::new("slug_length");
        err.message = Some(format!("Must be 1 to {} characters", SLUG_MAX_LENGTH).into());
        return Err(err);
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        let mut err = ValidationError::new("slug_format");
        err.message = Some("Only letters, digits, hyphens and underscores are allowed".into());
        return Err(err);
    }
    Ok(())
}

pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.normalize().scale() > PRICE_SCALE {
        let mut err = ValidationError::new("price_scale");
        err.message = Some("At most 2 decimal places".into());
        return Err(err);
    }
    if price.abs().trunc() >= Decimal::from(10_i64.pow(PRICE_INTEGRAL_DIGITS)) {
        let mut err = ValidationError::new("price_range");
        err.message = Some("At most 7 digits before the decimal point".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("notebooks")]
    #[case("apple-iphone-13")]
    #[case("dell_xps_15")]
    #[case("A1")]
    fn accepts_valid_slugs(#[case] slug: &str) {
        assert!(validate_slug(slug).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("with space")]
    #[case("slash/inside")]
    #[case("ноутбуки")]
    fn rejects_invalid_slugs(#[case] slug: &str) {
        assert!(validate_slug(slug).is_err());
    }

    #[test]
    fn rejects_overlong_slug() {
        let slug = "a".repeat(SLUG_MAX_LENGTH + 1);
        assert_eq!(validate_slug(&slug).unwrap_err().code, "slug_length");
        assert!(validate_slug(&slug[1..]).is_ok());
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(1999.99))]
    #[case(dec!(12.50))]
    #[case(dec!(12.500))]
    #[case(dec!(9999999.99))]
    fn accepts_prices_that_fit_the_column(#[case] price: Decimal) {
        assert!(validate_price(&price).is_ok());
    }

    #[rstest]
    #[case(dec!(0.001), "price_scale")]
    #[case(dec!(10000000), "price_range")]
    #[case(dec!(-10000000.00), "price_range")]
    fn rejects_prices_outside_the_column(#[case] price: Decimal, #[case] code: &str) {
        assert_eq!(validate_price(&price).unwrap_err().code, code);
    }
}

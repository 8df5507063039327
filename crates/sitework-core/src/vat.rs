//! The 5% VAT convention shared by riders and every breakdown table.

use crate::coerce::round;

/// VAT rate as a fraction.
pub const VAT_RATE: f64 = 0.05;

/// VAT rate as a percentage, for labels.
pub const VAT_PERCENT: f64 = 5.0;

/// VAT due on `amount`, rounded to whole currency units.
pub fn vat_on(amount: f64) -> f64 {
    round(amount * VAT_RATE)
}

/// `amount + round(amount × 0.05)`.
pub fn with_vat(amount: f64) -> f64 {
    amount + vat_on(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vat_is_rounded_separately() {
        assert_eq!(vat_on(10_000.0), 500.0);
        assert_eq!(vat_on(31_818.0), 1_591.0);
        assert_eq!(with_vat(31_818.0), 33_409.0);
    }

    #[test]
    fn zero_amount_has_no_vat() {
        assert_eq!(vat_on(0.0), 0.0);
        assert_eq!(with_vat(0.0), 0.0);
    }
}

//! Inclusive-fee extraction.
//!
//! A consultant fee expressed as a percentage of the *net* amount is already
//! embedded inside a known *gross* figure. Solving
//! `gross = net × (1 + pct / 100)` for `fee = gross − net` gives
//!
//! ```text
//! fee = gross × pct / (100 + pct)
//! ```
//!
//! The fee is rounded to whole currency units and the net is whatever is
//! left, so `fee + net == gross` holds exactly.

use serde::{Deserialize, Serialize};

use crate::coerce::round;

/// A gross amount split into an embedded fee and the remaining net.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeSplit {
    pub fee: f64,
    pub net: f64,
}

/// Split `gross` into `{ fee, net }` for a fee of `pct` percent of the net.
///
/// Non-positive `gross` or `pct` leaves the gross untouched as net.
///
/// ```
/// use sitework_core::fee::fee_inclusive;
///
/// let split = fee_inclusive(350_000.0, 10.0);
/// assert_eq!(split.fee, 31_818.0);
/// assert_eq!(split.net, 318_182.0);
/// ```
pub fn fee_inclusive(gross: f64, pct: f64) -> FeeSplit {
    let gross = finite(gross);
    let pct = finite(pct);
    if gross <= 0.0 || pct <= 0.0 {
        return FeeSplit { fee: 0.0, net: gross };
    }
    let fee = round(embedded_fee(gross, pct));
    FeeSplit {
        fee,
        net: gross - fee,
    }
}

/// Unrounded fee embedded in `amount` at `pct` percent.
///
/// Used where the aggregator needs the exact share before rounding.
pub(crate) fn embedded_fee(amount: f64, pct: f64) -> f64 {
    amount * pct / (100.0 + pct)
}

fn finite(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gross_is_noop() {
        assert_eq!(fee_inclusive(0.0, 10.0), FeeSplit { fee: 0.0, net: 0.0 });
    }

    #[test]
    fn zero_pct_is_noop() {
        assert_eq!(
            fee_inclusive(1000.0, 0.0),
            FeeSplit {
                fee: 0.0,
                net: 1000.0
            }
        );
    }

    #[test]
    fn negative_gross_is_noop() {
        assert_eq!(fee_inclusive(-5.0, 10.0), FeeSplit { fee: 0.0, net: -5.0 });
    }

    #[test]
    fn negative_pct_is_noop() {
        assert_eq!(
            fee_inclusive(1000.0, -3.0),
            FeeSplit {
                fee: 0.0,
                net: 1000.0
            }
        );
    }

    #[test]
    fn non_finite_inputs_are_zero() {
        assert_eq!(fee_inclusive(f64::NAN, 10.0), FeeSplit::default());
        assert_eq!(
            fee_inclusive(500.0, f64::INFINITY),
            FeeSplit {
                fee: 0.0,
                net: 500.0
            }
        );
    }

    #[test]
    fn owner_share_example() {
        let split = fee_inclusive(350_000.0, 10.0);
        assert_eq!(split.fee, 31_818.0);
        assert_eq!(split.net, 318_182.0);
    }

    #[test]
    fn fee_plus_net_is_gross() {
        let cases = [
            (1_050_000.0, 10.0),
            (700_000.0, 7.5),
            (123_457.0, 3.25),
            (99.0, 12.0),
            (1.0, 50.0),
        ];
        for (gross, pct) in cases {
            let split = fee_inclusive(gross, pct);
            assert_eq!(split.fee + split.net, gross, "gross={gross} pct={pct}");
        }
    }

    #[test]
    fn adding_pct_back_recovers_gross() {
        for (gross, pct) in [(350_000.0, 10.0), (812_345.0, 6.0), (10_001.0, 2.5)] {
            let split = fee_inclusive(gross, pct);
            let rebuilt = round(split.net * (1.0 + pct / 100.0));
            assert!(
                (rebuilt - gross).abs() <= 1.0,
                "gross={gross} pct={pct} rebuilt={rebuilt}"
            );
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let a = fee_inclusive(640_000.0, 8.0);
        let b = fee_inclusive(640_000.0, 8.0);
        assert_eq!(a.fee.to_bits(), b.fee.to_bits());
        assert_eq!(a.net.to_bits(), b.net.to_bits());
    }
}

//! Present value of a level contribution stream
//!
//! Discounts each contribution from its payment date back to time 0, using
//! the same payment-date convention as the future-value side. The typical
//! discount rate is an inflation assumption, which turns the nominal stream
//! into its real (purchasing-power) equivalent.

use super::schedule::{ContributionFrequency, ContributionTiming};

/// Present value of `initial` plus `⌊m*t⌋` contributions of `contribution`,
/// discounted at `discount_rate` per year.
///
/// A zero discount rate degenerates to the plain sum of payments.
pub fn present_value(
    initial: f64,
    contribution: f64,
    discount_rate: f64,
    frequency: ContributionFrequency,
    years: f64,
    timing: ContributionTiming,
) -> f64 {
    let m = frequency.periods_per_year() as f64;
    let count = (m * years).floor() as u32;

    let mut value = initial;
    for k in 0..count {
        let paid_at = match timing {
            ContributionTiming::StartOfPeriod => k as f64 / m,
            ContributionTiming::EndOfPeriod => (k + 1) as f64 / m,
        };
        value += contribution / (1.0 + discount_rate).powf(paid_at);
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_discount_is_plain_sum() {
        let pv = present_value(
            1_000.0,
            100.0,
            0.0,
            ContributionFrequency::Monthly,
            10.0,
            ContributionTiming::EndOfPeriod,
        );
        assert!((pv - 13_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_discounting_reduces_value() {
        let nominal = present_value(
            0.0,
            100.0,
            0.0,
            ContributionFrequency::Monthly,
            10.0,
            ContributionTiming::EndOfPeriod,
        );
        let discounted = present_value(
            0.0,
            100.0,
            0.02,
            ContributionFrequency::Monthly,
            10.0,
            ContributionTiming::EndOfPeriod,
        );
        assert!(discounted < nominal);
        // Every payment is within the horizon, so the PV is bounded below by
        // the fully-discounted sum
        assert!(discounted > nominal / 1.02_f64.powi(10));
    }

    #[test]
    fn test_start_of_period_discounts_less() {
        let end = present_value(
            0.0,
            100.0,
            0.03,
            ContributionFrequency::Quarterly,
            5.0,
            ContributionTiming::EndOfPeriod,
        );
        let start = present_value(
            0.0,
            100.0,
            0.03,
            ContributionFrequency::Quarterly,
            5.0,
            ContributionTiming::StartOfPeriod,
        );
        // Earlier payments are closer to time 0: exactly one 1/m step
        assert!((start - end * 1.03_f64.powf(0.25)).abs() < 1e-9);
    }
}

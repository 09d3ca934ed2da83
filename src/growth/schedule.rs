//! Future value of a contribution schedule
//!
//! Contribution and compounding frequencies are independent, so the value of
//! the contribution stream is obtained by compounding each payment from its
//! own payment date to the horizon rather than through the closed-form
//! annuity factor (which only covers the case where both frequencies match).

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// How many contributions are paid per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionFrequency {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
}

impl ContributionFrequency {
    /// Number of contribution periods per year
    pub fn periods_per_year(self) -> u32 {
        match self {
            ContributionFrequency::Annual => 1,
            ContributionFrequency::SemiAnnual => 2,
            ContributionFrequency::Quarterly => 4,
            ContributionFrequency::Monthly => 12,
        }
    }
}

/// How often earned interest is added back to the capital
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compounding {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
    /// Limit case: interest credited continuously (`e^(r*t)` growth)
    Continuous,
}

impl Compounding {
    /// All supported frequencies, used for side-by-side comparisons
    pub const ALL: [Compounding; 5] = [
        Compounding::Annual,
        Compounding::SemiAnnual,
        Compounding::Quarterly,
        Compounding::Monthly,
        Compounding::Continuous,
    ];

    /// Compounding periods per year; `None` for continuous compounding
    pub fn periods_per_year(self) -> Option<u32> {
        match self {
            Compounding::Annual => Some(1),
            Compounding::SemiAnnual => Some(2),
            Compounding::Quarterly => Some(4),
            Compounding::Monthly => Some(12),
            Compounding::Continuous => None,
        }
    }
}

/// Whether contributions are paid at the start or the end of their period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionTiming {
    /// Payment k (0-based) occurs at `k/m` years: one extra compounding step
    StartOfPeriod,
    /// Payment k occurs at `(k+1)/m` years
    EndOfPeriod,
}

/// Parameters of a capital growth schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthParameters {
    /// Capital available at time 0
    pub initial_capital: f64,

    /// Amount paid in at each contribution date
    pub contribution: f64,

    /// Annual nominal rate as a fraction (0.05 = 5%)
    pub annual_rate: f64,

    /// Contribution frequency (payments per year)
    pub contribution_frequency: ContributionFrequency,

    /// Interest capitalization frequency
    pub compounding: Compounding,

    /// Investment horizon in years
    pub years: f64,

    /// Start- or end-of-period payment convention
    pub timing: ContributionTiming,
}

impl GrowthParameters {
    /// Maximum supported annual rate (50%)
    pub const MAX_ANNUAL_RATE: f64 = 0.5;

    /// Validate and build a parameter set
    pub fn new(
        initial_capital: f64,
        contribution: f64,
        annual_rate: f64,
        contribution_frequency: ContributionFrequency,
        compounding: Compounding,
        years: f64,
        timing: ContributionTiming,
    ) -> Result<Self, ParameterError> {
        if initial_capital < 0.0 {
            return Err(ParameterError::Negative {
                field: "initial_capital",
                value: initial_capital,
            });
        }
        if contribution < 0.0 {
            return Err(ParameterError::Negative {
                field: "contribution",
                value: contribution,
            });
        }
        if !(0.0..=Self::MAX_ANNUAL_RATE).contains(&annual_rate) {
            return Err(ParameterError::OutOfRange {
                field: "annual_rate",
                min: 0.0,
                max: Self::MAX_ANNUAL_RATE,
                value: annual_rate,
            });
        }
        if years <= 0.0 {
            return Err(ParameterError::NotPositive {
                field: "years",
                value: years,
            });
        }

        Ok(Self {
            initial_capital,
            contribution,
            annual_rate,
            contribution_frequency,
            compounding,
            years,
            timing,
        })
    }

    /// Total amount paid in over the full horizon (capital + contributions)
    pub fn total_contributed(&self) -> f64 {
        let m = self.contribution_frequency.periods_per_year() as f64;
        self.initial_capital + self.contribution * m * self.years
    }

    /// Future value of the schedule at the full horizon
    pub fn future_value(&self) -> f64 {
        self.future_value_at(self.years)
    }

    /// Future value of the schedule after `t` years (`t <= self.years`)
    pub fn future_value_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return self.initial_capital;
        }

        let r = self.annual_rate;
        let capital = match self.compounding.periods_per_year() {
            Some(n) => {
                let n = n as f64;
                self.initial_capital * (1.0 + r / n).powf(n * t)
            }
            None => self.initial_capital * (r * t).exp(),
        };

        capital + self.contributions_value_at(t)
    }

    /// Future value of the contribution stream alone after `t` years
    fn contributions_value_at(&self, t: f64) -> f64 {
        let pmt = self.contribution;
        if pmt <= 0.0 {
            return 0.0;
        }

        let m = self.contribution_frequency.periods_per_year() as f64;
        let r = self.annual_rate;
        if r == 0.0 {
            // No growth: contributions just accumulate
            return pmt * m * t;
        }

        let count = (m * t).floor() as u32;
        let mut value = 0.0;
        for k in 0..count {
            let paid_at = match self.timing {
                ContributionTiming::StartOfPeriod => k as f64 / m,
                ContributionTiming::EndOfPeriod => (k + 1) as f64 / m,
            };
            let remaining = t - paid_at;
            if remaining < 0.0 {
                continue;
            }
            let factor = match self.compounding.periods_per_year() {
                Some(n) => {
                    let n = n as f64;
                    (1.0 + r / n).powf(n * remaining)
                }
                None => (r * remaining).exp(),
            };
            value += pmt * factor;
        }
        value
    }

    /// Year-by-year evolution of the schedule (row 0 is the initial state),
    /// ordered and complete so a renderer can chart it directly
    pub fn trajectory(&self) -> Vec<GrowthPoint> {
        let m = self.contribution_frequency.periods_per_year() as f64;
        let horizon = self.years.floor() as u32;

        (0..=horizon)
            .map(|year| {
                let t = year as f64;
                GrowthPoint {
                    year,
                    contributed: self.initial_capital + self.contribution * m * t,
                    value: self.future_value_at(t),
                }
            })
            .collect()
    }

    /// Future value under each supported compounding frequency, holding the
    /// other parameters fixed
    pub fn compare_compounding(&self) -> Vec<(Compounding, f64)> {
        Compounding::ALL
            .iter()
            .map(|&compounding| {
                let params = Self {
                    compounding,
                    ..self.clone()
                };
                (compounding, params.future_value())
            })
            .collect()
    }
}

/// One point of the growth trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Years elapsed since the start of the schedule
    pub year: u32,

    /// Cumulative amount paid in up to this point
    pub contributed: f64,

    /// Value of the capital at this point
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly_params(rate: f64, years: f64, timing: ContributionTiming) -> GrowthParameters {
        GrowthParameters::new(
            0.0,
            100.0,
            rate,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            years,
            timing,
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        assert!(GrowthParameters::new(
            -1.0,
            100.0,
            0.05,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            10.0,
            ContributionTiming::EndOfPeriod,
        )
        .is_err());

        assert!(GrowthParameters::new(
            0.0,
            100.0,
            0.8,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            10.0,
            ContributionTiming::EndOfPeriod,
        )
        .is_err());

        assert!(GrowthParameters::new(
            0.0,
            100.0,
            0.05,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            0.0,
            ContributionTiming::EndOfPeriod,
        )
        .is_err());
    }

    #[test]
    fn test_zero_rate_sums_contributions() {
        let params = monthly_params(0.0, 10.0, ContributionTiming::EndOfPeriod);
        assert!((params.future_value() - 12_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_contribution_grows_capital_only() {
        let params = GrowthParameters::new(
            1_000.0,
            0.0,
            0.05,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            10.0,
            ContributionTiming::EndOfPeriod,
        )
        .unwrap();

        // P * (1 + r)^t with annual compounding
        let expected = 1_000.0 * 1.05_f64.powi(10);
        assert!((params.future_value() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_contributions_annual_compounding() {
        // 100/month at 5% compounded annually over 10 years.
        // Each payment j (1..=120) grows by q^(120-j) with q = 1.05^(1/12),
        // so the end-of-period sum is 100 * (q^120 - 1) / (q - 1).
        let q = 1.05_f64.powf(1.0 / 12.0);
        let end_expected = 100.0 * (q.powi(120) - 1.0) / (q - 1.0);

        let end = monthly_params(0.05, 10.0, ContributionTiming::EndOfPeriod);
        assert!((end.future_value() - end_expected).abs() < 1e-6);
        assert!((end.future_value() - 15_436.32).abs() < 0.01);

        // Start-of-period payments earn exactly one extra 1/m step
        let start = monthly_params(0.05, 10.0, ContributionTiming::StartOfPeriod);
        assert!((start.future_value() - end_expected * q).abs() < 1e-6);
        assert!((start.future_value() - 15_499.21).abs() < 0.01);

        assert!((end.total_contributed() - 12_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_future_value_monotone_in_each_parameter() {
        let base = GrowthParameters::new(
            5_000.0,
            200.0,
            0.04,
            ContributionFrequency::Monthly,
            Compounding::Monthly,
            15.0,
            ContributionTiming::EndOfPeriod,
        )
        .unwrap();
        let fv = base.future_value();

        let longer = GrowthParameters {
            years: 20.0,
            ..base.clone()
        };
        assert!(longer.future_value() >= fv);

        let higher_rate = GrowthParameters {
            annual_rate: 0.06,
            ..base.clone()
        };
        assert!(higher_rate.future_value() >= fv);

        let more_capital = GrowthParameters {
            initial_capital: 10_000.0,
            ..base.clone()
        };
        assert!(more_capital.future_value() >= fv);

        let bigger_pmt = GrowthParameters {
            contribution: 300.0,
            ..base
        };
        assert!(bigger_pmt.future_value() >= fv);
    }

    #[test]
    fn test_continuous_limit() {
        // Daily compounding should be within a fraction of a percent of the
        // continuous limit for both timing conventions.
        for timing in [
            ContributionTiming::EndOfPeriod,
            ContributionTiming::StartOfPeriod,
        ] {
            let continuous = GrowthParameters::new(
                10_000.0,
                150.0,
                0.06,
                ContributionFrequency::Monthly,
                Compounding::Continuous,
                12.0,
                timing,
            )
            .unwrap();

            // n = 365 is not an enumerated frequency; emulate it through the
            // same formula the discrete branch uses.
            let n = 365.0_f64;
            let r = 0.06_f64;
            let t = 12.0_f64;
            let mut daily = 10_000.0 * (1.0 + r / n).powf(n * t);
            for k in 0..(12.0 * t) as u32 {
                let paid_at = match timing {
                    ContributionTiming::StartOfPeriod => k as f64 / 12.0,
                    ContributionTiming::EndOfPeriod => (k + 1) as f64 / 12.0,
                };
                daily += 150.0 * (1.0 + r / n).powf(n * (t - paid_at));
            }

            let cont = continuous.future_value();
            assert!(
                (cont - daily).abs() / cont < 1e-4,
                "continuous {} vs daily {} ({:?})",
                cont,
                daily,
                timing
            );
        }
    }

    #[test]
    fn test_trajectory_is_ordered_and_complete() {
        let params = monthly_params(0.05, 10.0, ContributionTiming::EndOfPeriod);
        let points = params.trajectory();

        assert_eq!(points.len(), 11);
        assert_eq!(points[0].year, 0);
        assert_eq!(points[0].value, 0.0);
        for pair in points.windows(2) {
            assert_eq!(pair[1].year, pair[0].year + 1);
            assert!(pair[1].value >= pair[0].value);
        }
        assert!((points[10].value - params.future_value()).abs() < 1e-9);
    }

    #[test]
    fn test_compounding_comparison_is_increasing() {
        let params = GrowthParameters::new(
            10_000.0,
            100.0,
            0.05,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            10.0,
            ContributionTiming::EndOfPeriod,
        )
        .unwrap();

        let comparison = params.compare_compounding();
        assert_eq!(comparison.len(), 5);
        // More frequent capitalization never loses money
        for pair in comparison.windows(2) {
            assert!(pair[1].1 >= pair[0].1 - 1e-9);
        }
        assert_eq!(comparison[4].0, Compounding::Continuous);
    }
}

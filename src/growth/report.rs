//! Full growth report: gross value, after-tax value, real value
//!
//! The optional adjustments are explicit configuration fields resolved once
//! per call. Tax applies to gains only, at the wrapper's effective rate; the
//! inflation adjustment deflates the final value and derives the real
//! annualized return against the present value of the contributions.

use serde::{Deserialize, Serialize};

use super::annuity::present_value;
use super::schedule::GrowthParameters;
use crate::tax::WrapperTax;

/// Optional adjustments applied on top of the gross future value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Tax the gains at the wrapper's effective rate
    pub after_tax: Option<WrapperTax>,

    /// Deflate the result by this annual inflation rate
    pub inflation_rate: Option<f64>,
}

/// Complete result of a growth computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthReport {
    /// Capital plus all contributions paid in
    pub total_contributed: f64,

    /// Future value before tax and inflation
    pub gross_value: f64,

    /// Gross value minus total contributed
    pub gross_interest: f64,

    /// Present when an after-tax treatment was requested
    pub tax: Option<TaxOnGains>,

    /// Present when an inflation rate was supplied
    pub real: Option<InflationAdjusted>,
}

/// Tax levied on the schedule's gains
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxOnGains {
    /// Allowance deducted from taxable gains (mature Assurance-vie)
    pub allowance: f64,

    /// Gains subject to tax after the allowance
    pub taxable_interest: f64,

    /// Effective rate applied
    pub effective_rate: f64,

    /// Tax amount
    pub tax_due: f64,

    /// Final value net of tax
    pub net_value: f64,

    /// Gains net of tax
    pub net_interest: f64,
}

/// Inflation-adjusted view of the final value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationAdjusted {
    /// Annual inflation rate used
    pub rate: f64,

    /// Final value in time-0 purchasing power
    pub real_value: f64,

    /// Nominal minus real value
    pub purchasing_power_loss: f64,

    /// Annualized real return over the horizon, measured against the
    /// discounted contribution stream; 0 when that stream has no value
    pub real_annual_return: f64,
}

impl GrowthParameters {
    /// Gross-only report
    pub fn gross_report(&self) -> GrowthReport {
        self.report(&ReportOptions::default())
    }

    /// Report with the requested adjustments applied
    pub fn report(&self, options: &ReportOptions) -> GrowthReport {
        let total_contributed = self.total_contributed();
        let gross_value = self.future_value();
        let gross_interest = gross_value - total_contributed;

        let tax = options.after_tax.as_ref().and_then(|treatment| {
            // Losses are not taxed
            if gross_interest <= 0.0 {
                return None;
            }
            let allowance = treatment.wrapper.gains_allowance(self.years);
            let taxable_interest = (gross_interest - allowance).max(0.0);
            let effective_rate = treatment.wrapper.effective_rate(
                self.years,
                treatment.income,
                treatment.marginal_rate,
            );
            let tax_due = taxable_interest * effective_rate;
            Some(TaxOnGains {
                allowance,
                taxable_interest,
                effective_rate,
                tax_due,
                net_value: total_contributed + gross_interest - tax_due,
                net_interest: gross_interest - tax_due,
            })
        });

        let real = options.inflation_rate.map(|rate| {
            let nominal = tax.as_ref().map_or(gross_value, |t| t.net_value);
            let real_value = nominal / (1.0 + rate).powf(self.years);

            let contributions_pv = present_value(
                self.initial_capital,
                self.contribution,
                rate,
                self.contribution_frequency,
                self.years,
                self.timing,
            );
            let real_annual_return = if contributions_pv > 0.0 {
                (real_value / contributions_pv).powf(1.0 / self.years) - 1.0
            } else {
                0.0
            };

            InflationAdjusted {
                rate,
                real_value,
                purchasing_power_loss: nominal - real_value,
                real_annual_return,
            }
        });

        GrowthReport {
            total_contributed,
            gross_value,
            gross_interest,
            tax,
            real,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::{Compounding, ContributionFrequency, ContributionTiming};
    use crate::tax::{InvestmentIncome, Wrapper};

    fn params(years: f64) -> GrowthParameters {
        GrowthParameters::new(
            10_000.0,
            100.0,
            0.05,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            years,
            ContributionTiming::EndOfPeriod,
        )
        .unwrap()
    }

    fn wrapper_tax(wrapper: Wrapper) -> WrapperTax {
        WrapperTax {
            wrapper,
            income: InvestmentIncome::Interest,
            marginal_rate: None,
        }
    }

    #[test]
    fn test_gross_report_consistency() {
        let report = params(10.0).gross_report();
        assert!((report.total_contributed - 22_000.0).abs() < 1e-9);
        assert!(
            (report.gross_value - report.total_contributed - report.gross_interest).abs() < 1e-9
        );
        assert!(report.tax.is_none());
        assert!(report.real.is_none());
    }

    #[test]
    fn test_flat_tax_on_gains_only() {
        let report = params(10.0).report(&ReportOptions {
            after_tax: Some(wrapper_tax(Wrapper::OrdinaryAccount)),
            inflation_rate: None,
        });

        let tax = report.tax.unwrap();
        assert_eq!(tax.allowance, 0.0);
        assert!((tax.tax_due - report.gross_interest * 0.30).abs() < 1e-9);
        assert!((tax.net_value - (report.gross_value - tax.tax_due)).abs() < 1e-9);
        assert!(tax.net_value < report.gross_value);
    }

    #[test]
    fn test_assurance_vie_allowance_reduces_taxable_gains() {
        let report = params(10.0).report(&ReportOptions {
            after_tax: Some(wrapper_tax(Wrapper::AssuranceVie)),
            inflation_rate: None,
        });

        let tax = report.tax.unwrap();
        assert_eq!(tax.allowance, 4_600.0);
        assert!((tax.taxable_interest - (report.gross_interest - 4_600.0).max(0.0)).abs() < 1e-9);
        assert!((tax.effective_rate - 0.203).abs() < 1e-12);
    }

    #[test]
    fn test_no_tax_when_no_gains() {
        let flat = GrowthParameters::new(
            1_000.0,
            0.0,
            0.0,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            5.0,
            ContributionTiming::EndOfPeriod,
        )
        .unwrap();

        let report = flat.report(&ReportOptions {
            after_tax: Some(wrapper_tax(Wrapper::OrdinaryAccount)),
            inflation_rate: None,
        });
        assert!(report.tax.is_none());
    }

    #[test]
    fn test_inflation_deflates_final_value() {
        let report = params(10.0).report(&ReportOptions {
            after_tax: None,
            inflation_rate: Some(0.02),
        });

        let real = report.real.unwrap();
        assert!((real.real_value - report.gross_value / 1.02_f64.powi(10)).abs() < 1e-9);
        assert!(real.purchasing_power_loss > 0.0);
        // 5% nominal growth vs 2% inflation: positive real return
        assert!(real.real_annual_return > 0.0);
        assert!(real.real_annual_return < 0.05);
    }

    #[test]
    fn test_real_return_guard_when_no_contributions() {
        let empty = GrowthParameters::new(
            0.0,
            0.0,
            0.05,
            ContributionFrequency::Monthly,
            Compounding::Annual,
            10.0,
            ContributionTiming::EndOfPeriod,
        )
        .unwrap();

        let report = empty.report(&ReportOptions {
            after_tax: None,
            inflation_rate: Some(0.02),
        });
        assert_eq!(report.real.unwrap().real_annual_return, 0.0);
    }
}

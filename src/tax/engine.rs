//! Progressive income-tax engine
//!
//! Implements the French barème mechanics: family quotient, marginal-rate
//! bracket walk, décote rebate and the 10% salary allowance. The engine
//! holds only immutable reference data, so marginal analysis is a matter of
//! re-invoking `compute` with a modified profile.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::bareme::BracketShare;
use super::wrapper::EmploymentStatus;
use super::TaxTables;
use crate::error::ParameterError;

/// Fraction of the threshold gap refunded by the décote
const DECOTE_FRACTION: f64 = 0.45;

/// Salary allowance rate applied before the bracket walk
const SALARY_ALLOWANCE_RATE: f64 = 0.10;

/// One taxpayer household for one fiscal year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    /// Gross annual taxable income
    pub gross_income: f64,

    /// Fiscal shares ("parts"): 1 single, 2 couple, +0.5/+1 per child
    pub shares: f64,

    /// Fiscal year selecting the bracket table
    pub year: u16,

    /// Apply the capped 10% salary allowance before the bracket walk
    pub salary_allowance: bool,

    /// When set, estimated social contributions are included in the result
    pub status: Option<EmploymentStatus>,
}

impl TaxpayerProfile {
    /// Validate and build a profile with the salary allowance enabled
    pub fn new(gross_income: f64, shares: f64, year: u16) -> Result<Self, ParameterError> {
        if gross_income < 0.0 {
            return Err(ParameterError::Negative {
                field: "gross_income",
                value: gross_income,
            });
        }
        // Half-share granularity
        if shares < 1.0 || (shares * 2.0).fract() != 0.0 {
            return Err(ParameterError::InvalidShares(shares));
        }

        Ok(Self {
            gross_income,
            shares,
            year,
            salary_allowance: true,
            status: None,
        })
    }
}

/// Result of one tax computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxAssessment {
    /// Income after the salary allowance (equal to gross when disabled)
    pub taxable_income: f64,

    /// Family quotient: taxable income / shares
    pub quotient: f64,

    /// Marginal rate (TMI) as a fraction
    pub marginal_rate: f64,

    /// Per-bracket accrual detail (per share), in bracket order
    pub per_bracket: Vec<BracketShare>,

    /// Gross tax before the décote
    pub tax_before_rebate: f64,

    /// Décote amount
    pub rebate: f64,

    /// Tax due after the décote, floored at 0
    pub net_tax: f64,

    /// Net tax / gross income; 0 when income is 0
    pub average_rate: f64,

    /// Social-contribution estimate, when a status was supplied
    pub social: Option<SocialContributions>,
}

/// Estimated social contributions on top of income tax
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialContributions {
    pub status: EmploymentStatus,

    /// Flat estimated rate applied to gross income
    pub rate: f64,

    /// Contribution amount
    pub amount: f64,

    /// Income tax + contributions
    pub total_levies: f64,

    /// Gross income minus all levies
    pub net_income: f64,

    /// Total levies / gross income; 0 when income is 0
    pub global_rate: f64,
}

/// Tax engine over a set of fiscal-year tables
#[derive(Debug, Clone)]
pub struct TaxEngine {
    tables: TaxTables,
}

impl TaxEngine {
    /// Create an engine over the given tables
    pub fn new(tables: TaxTables) -> Self {
        Self { tables }
    }

    /// Engine over the built-in tables
    pub fn builtin() -> Self {
        Self::new(TaxTables::builtin())
    }

    /// Reference to the underlying tables
    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }

    /// Compute the assessment for one profile
    pub fn compute(&self, profile: &TaxpayerProfile) -> Result<TaxAssessment, ParameterError> {
        let fiscal_year = self
            .tables
            .get(profile.year)
            .ok_or(ParameterError::UnknownFiscalYear(profile.year))?;

        let taxable_income = if profile.salary_allowance {
            let allowance = (profile.gross_income * SALARY_ALLOWANCE_RATE)
                .min(fiscal_year.params.salary_allowance_cap);
            profile.gross_income - allowance
        } else {
            profile.gross_income
        };

        let quotient = taxable_income / profile.shares;
        let (per_share_tax, per_bracket) = fiscal_year.brackets.accrue(quotient);
        let marginal_rate = fiscal_year.brackets.marginal_rate(quotient);

        let tax_before_rebate = per_share_tax * profile.shares;

        // Décote: threshold scales with household size above 2 shares
        let threshold = if profile.shares > 2.0 {
            fiscal_year.params.decote_threshold * profile.shares / 2.0
        } else {
            fiscal_year.params.decote_threshold
        };
        let rebate = if tax_before_rebate < threshold {
            ((threshold - tax_before_rebate) * DECOTE_FRACTION).min(tax_before_rebate)
        } else {
            0.0
        };

        let net_tax = (tax_before_rebate - rebate).max(0.0);
        let average_rate = if profile.gross_income > 0.0 {
            net_tax / profile.gross_income
        } else {
            0.0
        };

        let social = profile.status.map(|status| {
            let rate = status.contribution_rate();
            let amount = profile.gross_income * rate;
            let total_levies = net_tax + amount;
            SocialContributions {
                status,
                rate,
                amount,
                total_levies,
                net_income: profile.gross_income - total_levies,
                global_rate: if profile.gross_income > 0.0 {
                    total_levies / profile.gross_income
                } else {
                    0.0
                },
            }
        });

        Ok(TaxAssessment {
            taxable_income,
            quotient,
            marginal_rate,
            per_bracket,
            tax_before_rebate,
            rebate,
            net_tax,
            average_rate,
            social,
        })
    }

    /// Effective rate on `delta` of additional income: re-runs the
    /// computation on a shifted profile and differences the net tax
    pub fn marginal_rate_on(
        &self,
        profile: &TaxpayerProfile,
        delta: f64,
    ) -> Result<f64, ParameterError> {
        if delta <= 0.0 {
            return Err(ParameterError::NotPositive {
                field: "delta",
                value: delta,
            });
        }

        let base = self.compute(profile)?;
        let shifted = TaxpayerProfile {
            gross_income: profile.gross_income + delta,
            ..profile.clone()
        };
        let bumped = self.compute(&shifted)?;

        Ok((bumped.net_tax - base.net_tax) / delta)
    }

    /// Compute assessments for many profiles in parallel
    pub fn compute_batch(
        &self,
        profiles: &[TaxpayerProfile],
    ) -> Vec<Result<TaxAssessment, ParameterError>> {
        profiles.par_iter().map(|p| self.compute(p)).collect()
    }
}

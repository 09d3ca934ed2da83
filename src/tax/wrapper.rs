//! Flat-tax rates for investment wrappers and social-contribution estimates
//!
//! Category-dependent rates are closed enums with a rate method, not string
//! comparisons: each wrapper/income combination maps to one authoritative
//! rate per the current PFU rules.

use serde::{Deserialize, Serialize};

/// Flat withholding ("PFU") rate: income tax + social levies
pub const FLAT_TAX_RATE: f64 = 0.30;

/// Social-levy component used by the progressive alternative
pub const SOCIAL_LEVY_RATE: f64 = 0.128;

/// Reduced income-tax rate on mature Assurance-vie gains
pub const AV_REDUCED_RATE: f64 = 0.075;

/// Annual allowance on mature Assurance-vie gains (single filer)
pub const AV_GAINS_ALLOWANCE: f64 = 4_600.0;

/// Holding period after which a PEA leaves the full flat tax
pub const PEA_MATURITY_YEARS: f64 = 5.0;

/// Holding period after which Assurance-vie gains get the reduced rate
pub const AV_MATURITY_YEARS: f64 = 8.0;

/// Investment wrapper (French account types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wrapper {
    /// Compte-titres ordinaire (CTO)
    OrdinaryAccount,
    /// Plan d'Épargne en Actions
    Pea,
    /// Assurance-vie
    AssuranceVie,
}

/// Kind of income generated inside the wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentIncome {
    CapitalGains,
    Interest,
    Dividends,
}

impl Wrapper {
    /// Standard flat-tax rate for this wrapper at the given holding period
    pub fn flat_rate(self, holding_years: f64) -> f64 {
        match self {
            Wrapper::OrdinaryAccount => FLAT_TAX_RATE,
            Wrapper::Pea => {
                if holding_years >= PEA_MATURITY_YEARS {
                    SOCIAL_LEVY_RATE
                } else {
                    FLAT_TAX_RATE
                }
            }
            Wrapper::AssuranceVie => {
                if holding_years >= AV_MATURITY_YEARS {
                    AV_REDUCED_RATE + SOCIAL_LEVY_RATE
                } else {
                    FLAT_TAX_RATE
                }
            }
        }
    }

    /// Effective rate when the taxpayer's personal marginal rate is known.
    ///
    /// Falls back to [`Wrapper::flat_rate`] when `marginal_rate` is `None`.
    /// With a marginal rate, the progressive alternative is retained only
    /// where it beats the flat tax.
    pub fn effective_rate(
        self,
        holding_years: f64,
        income: InvestmentIncome,
        marginal_rate: Option<f64>,
    ) -> f64 {
        let tmi = match marginal_rate {
            Some(tmi) => tmi,
            None => return self.flat_rate(holding_years),
        };
        let progressive = tmi + SOCIAL_LEVY_RATE;

        match self {
            Wrapper::OrdinaryAccount => match income {
                // Capital gains keep the social levies only
                InvestmentIncome::CapitalGains => SOCIAL_LEVY_RATE,
                InvestmentIncome::Dividends | InvestmentIncome::Interest => {
                    FLAT_TAX_RATE.min(progressive)
                }
            },
            Wrapper::Pea => {
                if holding_years >= PEA_MATURITY_YEARS {
                    SOCIAL_LEVY_RATE
                } else {
                    FLAT_TAX_RATE.min(progressive)
                }
            }
            Wrapper::AssuranceVie => {
                if holding_years >= AV_MATURITY_YEARS {
                    match income {
                        InvestmentIncome::CapitalGains => AV_REDUCED_RATE + SOCIAL_LEVY_RATE,
                        InvestmentIncome::Interest | InvestmentIncome::Dividends => {
                            tmi.min(AV_REDUCED_RATE) + SOCIAL_LEVY_RATE
                        }
                    }
                } else {
                    FLAT_TAX_RATE.min(progressive)
                }
            }
        }
    }

    /// Annual allowance deducted from taxable gains, if any
    pub fn gains_allowance(self, holding_years: f64) -> f64 {
        match self {
            Wrapper::AssuranceVie if holding_years >= AV_MATURITY_YEARS => AV_GAINS_ALLOWANCE,
            _ => 0.0,
        }
    }
}

/// Tax treatment applied to the gains of a growth schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrapperTax {
    /// Account type holding the capital
    pub wrapper: Wrapper,

    /// Kind of income the capital generates
    pub income: InvestmentIncome,

    /// Taxpayer's marginal rate as a fraction, when the progressive
    /// alternative should be considered
    pub marginal_rate: Option<f64>,
}

/// Employment status, for estimated social-contribution rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    Employee,
    CivilServant,
    SelfEmployed,
}

impl EmploymentStatus {
    /// Estimated global social-contribution rate on gross income
    pub fn contribution_rate(self) -> f64 {
        match self {
            EmploymentStatus::Employee => 0.225,
            EmploymentStatus::CivilServant => 0.21,
            EmploymentStatus::SelfEmployed => 0.45,
        }
    }
}

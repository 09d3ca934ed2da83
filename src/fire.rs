//! FIRE horizon solver
//!
//! Solves the time to reach a withdrawal-funded wealth target under constant
//! annual savings and return rate. The solve is the exact logarithmic inverse
//! of the compound-annuity growth formula, not an iterative search; an
//! unreachable target is an ordinary result (`f64::INFINITY`), not an error.

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Inputs of a FIRE projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireProfile {
    /// Net annual income
    pub annual_income: f64,

    /// Annual living expenses
    pub annual_expenses: f64,

    /// Invested net worth today
    pub net_worth: f64,

    /// Expected annual return on investments (fraction)
    pub annual_return: f64,

    /// Safe withdrawal rate as a fraction (0.04 = the 4% rule)
    pub withdrawal_rate: f64,

    /// Current age in years
    pub current_age: u32,
}

impl FireProfile {
    /// Highest supported withdrawal rate (10%)
    pub const MAX_WITHDRAWAL_RATE: f64 = 0.10;

    /// Validate and build a profile
    pub fn new(
        annual_income: f64,
        annual_expenses: f64,
        net_worth: f64,
        annual_return: f64,
        withdrawal_rate: f64,
        current_age: u32,
    ) -> Result<Self, ParameterError> {
        if annual_income < 0.0 {
            return Err(ParameterError::Negative {
                field: "annual_income",
                value: annual_income,
            });
        }
        if annual_expenses < 0.0 {
            return Err(ParameterError::Negative {
                field: "annual_expenses",
                value: annual_expenses,
            });
        }
        if net_worth < 0.0 {
            return Err(ParameterError::Negative {
                field: "net_worth",
                value: net_worth,
            });
        }
        if annual_return < 0.0 {
            return Err(ParameterError::Negative {
                field: "annual_return",
                value: annual_return,
            });
        }
        if withdrawal_rate <= 0.0 || withdrawal_rate > Self::MAX_WITHDRAWAL_RATE {
            return Err(ParameterError::OutOfRange {
                field: "withdrawal_rate",
                min: 0.0,
                max: Self::MAX_WITHDRAWAL_RATE,
                value: withdrawal_rate,
            });
        }

        Ok(Self {
            annual_income,
            annual_expenses,
            net_worth,
            annual_return,
            withdrawal_rate,
            current_age,
        })
    }

    /// Annual savings; negative when expenses exceed income
    pub fn annual_savings(&self) -> f64 {
        self.annual_income - self.annual_expenses
    }

    /// Wealth required to fund the expenses at the withdrawal rate
    /// (the "25x" rule for a 4% withdrawal rate)
    pub fn target_wealth(&self) -> f64 {
        self.annual_expenses / self.withdrawal_rate
    }

    /// Years until the target wealth is reached; `INFINITY` when savings or
    /// returns make it unreachable
    pub fn years_to_target(&self) -> f64 {
        let target = self.target_wealth();
        if self.net_worth >= target {
            return 0.0;
        }

        let savings = self.annual_savings();
        let r = self.annual_return;
        if savings <= 0.0 || r <= 0.0 {
            return f64::INFINITY;
        }

        // Exact inverse of W = C*(1+r)^t + S*((1+r)^t - 1)/r
        let numerator = target * r / savings + 1.0;
        if self.net_worth > 0.0 {
            let denominator = self.net_worth * r / savings + 1.0;
            (numerator / denominator).ln() / (1.0 + r).ln()
        } else {
            numerator.ln() / (1.0 + r).ln()
        }
    }

    /// Full report with derived metrics
    pub fn report(&self) -> FireReport {
        let years_to_target = self.years_to_target();
        let fire_age = if years_to_target.is_finite() {
            Some(self.current_age as f64 + years_to_target)
        } else {
            None
        };

        let savings_rate = if self.annual_income > 0.0 {
            self.annual_savings() / self.annual_income
        } else {
            0.0
        };

        FireReport {
            target_wealth: self.target_wealth(),
            annual_savings: self.annual_savings(),
            monthly_savings: self.annual_savings() / 12.0,
            savings_rate,
            missing_wealth: (self.target_wealth() - self.net_worth).max(0.0),
            required_passive_income: self.annual_expenses,
            years_to_target,
            fire_age,
        }
    }

    /// Projected wealth year by year under the constant-savings assumption
    /// (row 0 is the current net worth)
    pub fn projection(&self, horizon_years: u32) -> Vec<WealthPoint> {
        let r = self.annual_return;
        let savings = self.annual_savings();

        (0..=horizon_years)
            .map(|year| {
                let t = year as f64;
                let growth = (1.0 + r).powf(t);
                let mut wealth = self.net_worth * growth;
                if savings > 0.0 {
                    // Future value of the savings annuity; linear when r = 0
                    wealth += if r > 0.0 {
                        savings * (growth - 1.0) / r
                    } else {
                        savings * t
                    };
                }
                WealthPoint { year, wealth }
            })
            .collect()
    }
}

/// Derived FIRE metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireReport {
    /// Capital needed to retire on the withdrawal rate
    pub target_wealth: f64,

    pub annual_savings: f64,
    pub monthly_savings: f64,

    /// Savings / income; 0 when income is 0
    pub savings_rate: f64,

    /// Gap between the target and the current net worth, floored at 0
    pub missing_wealth: f64,

    /// Passive income the target must fund each year
    pub required_passive_income: f64,

    /// Years until the target (may be `INFINITY`)
    pub years_to_target: f64,

    /// Age at the target; `None` when unreachable
    pub fire_age: Option<f64>,
}

/// One point of the projected wealth trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WealthPoint {
    pub year: u32,
    pub wealth: f64,
}

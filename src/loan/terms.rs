//! Loan terms and the fixed monthly payment

use serde::{Deserialize, Serialize};

use super::schedule::AmortizationSchedule;
use crate::error::ParameterError;

/// Terms of a fixed-rate amortizing loan
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,

    /// Annual rate as a fraction (TAEG; 0.025 = 2.5%)
    pub annual_rate: f64,

    /// Term in months
    pub term_months: u32,
}

impl LoanTerms {
    /// Validate and build loan terms
    pub fn new(principal: f64, annual_rate: f64, term_months: u32) -> Result<Self, ParameterError> {
        if principal <= 0.0 {
            return Err(ParameterError::NotPositive {
                field: "principal",
                value: principal,
            });
        }
        if annual_rate < 0.0 {
            return Err(ParameterError::Negative {
                field: "annual_rate",
                value: annual_rate,
            });
        }
        if term_months == 0 {
            return Err(ParameterError::NotPositive {
                field: "term_months",
                value: 0.0,
            });
        }

        Ok(Self {
            principal,
            annual_rate,
            term_months,
        })
    }

    /// Monthly rate (annual / 12)
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    /// Fixed monthly payment via the annuity formula; `principal / months`
    /// for a zero-rate loan
    pub fn monthly_payment(&self) -> f64 {
        let n = self.term_months as f64;
        let rate = self.monthly_rate();
        if rate == 0.0 {
            self.principal / n
        } else {
            self.principal * rate / (1.0 - (1.0 + rate).powf(-n))
        }
    }

    /// Lazy amortization schedule over the full term (restartable: the
    /// iterator is `Clone` and a fresh one starts over from month 0)
    pub fn schedule(&self) -> AmortizationSchedule {
        AmortizationSchedule::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_validation() {
        assert!(LoanTerms::new(0.0, 0.025, 240).is_err());
        assert!(LoanTerms::new(250_000.0, -0.01, 240).is_err());
        assert!(LoanTerms::new(250_000.0, 0.025, 0).is_err());
        assert!(LoanTerms::new(250_000.0, 0.0, 240).is_ok());
    }

    #[test]
    fn test_reference_payment() {
        // 250,000 at 2.5% over 240 months: standard annuity formula
        let terms = LoanTerms::new(250_000.0, 0.025, 240).unwrap();
        assert_relative_eq!(terms.monthly_payment(), 1_324.76, epsilon = 0.01);
    }

    #[test]
    fn test_zero_rate_payment_is_linear() {
        let terms = LoanTerms::new(120_000.0, 0.0, 240).unwrap();
        assert_eq!(terms.monthly_payment(), 500.0);
    }
}

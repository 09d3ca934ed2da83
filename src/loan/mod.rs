//! Fixed-rate loan amortization

mod schedule;
mod terms;

pub use schedule::{AmortizationRow, AmortizationSchedule, AnnualRow, LoanSummary};
pub use terms::LoanTerms;

/// Round a monetary amount to the cent
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Patrimoine - Personal-finance projection engine
//!
//! This library provides:
//! - Compound-interest schedules with independent contribution and
//!   compounding frequencies (including the continuous limit)
//! - Present-value discounting of contribution streams (inflation adjustment)
//! - French progressive income tax (family quotient, décote, marginal rates)
//!   plus flat-tax rates for investment wrappers
//! - FIRE horizon solving (closed form)
//! - Fixed-rate loan amortization schedules
//! - Buy-vs-rent net-worth comparison
//!
//! Every component is a pure function over immutable parameter records:
//! validation happens at the boundary, reference data (bracket tables) is
//! loaded once, and outputs are complete ordered row sequences.

pub mod error;
pub mod fire;
pub mod growth;
pub mod housing;
pub mod loan;
pub mod tax;

// Re-export commonly used types
pub use error::{ParameterError, TableError};
pub use fire::{FireProfile, FireReport};
pub use growth::{
    present_value, Compounding, ContributionFrequency, ContributionTiming, GrowthParameters,
    GrowthReport, ReportOptions,
};
pub use housing::{BuyVsRentResult, BuyVsRentScenario};
pub use loan::{AmortizationRow, AmortizationSchedule, LoanTerms};
pub use tax::{TaxAssessment, TaxEngine, TaxTables, TaxpayerProfile};

//! Error types for parameter validation and reference-data loading
//!
//! Computation itself never fails: every invariant is checked at the boundary
//! (constructors and `validate` methods), and divisions with potentially-zero
//! denominators resolve to defined fallbacks instead of faulting.

use thiserror::Error;

/// A caller-supplied parameter violates a stated invariant.
#[derive(Debug, Error)]
pub enum ParameterError {
    /// Monetary amount or rate that must not be negative
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    /// Quantity that must be strictly positive (principal, horizon, ...)
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    /// Value outside its documented range
    #[error("{field} must be within [{min}, {max}] (got {value})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    /// Fiscal shares must be >= 1, in half-share steps
    #[error("fiscal shares must be >= 1 in steps of 0.5 (got {0})")]
    InvalidShares(f64),

    /// No bracket table is registered for the requested fiscal year
    #[error("no bracket table for fiscal year {0}")]
    UnknownFiscalYear(u16),
}

/// A reference-data table failed to load or violates its invariants.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid numeric field '{field}' in record {record}")]
    Parse { field: &'static str, record: usize },

    /// Bracket table invariant violation (bounds not contiguous from 0,
    /// rates not increasing)
    #[error("bracket table for fiscal year {year}: {reason}")]
    InvalidTable { year: u16, reason: String },

    /// Brackets were loaded for a year with no décote/allowance parameters
    #[error("missing fiscal parameters for year {0}")]
    MissingParams(u16),
}

//! Progressive bracket tables and per-year fiscal parameters
//!
//! One authoritative, versioned table per fiscal year. The barème is
//! reference data: the engine only requires that a table satisfies the
//! bracket invariants checked in [`BracketTable::new`].

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// One marginal-rate bracket
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower bound of the bracket (per fiscal share)
    pub lower: f64,

    /// Exclusive upper bound; `None` for the unbounded top bracket
    pub upper: Option<f64>,

    /// Marginal rate as a fraction (0.30 = 30%)
    pub rate: f64,
}

/// Ordered sequence of contiguous brackets starting at 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validate bracket invariants and build a table.
    ///
    /// Requirements: first lower bound is 0, bounds are contiguous and
    /// increasing, rates are strictly increasing, only the last bracket is
    /// unbounded.
    pub fn new(year: u16, brackets: Vec<TaxBracket>) -> Result<Self, TableError> {
        let invalid = |reason: String| TableError::InvalidTable { year, reason };

        if brackets.is_empty() {
            return Err(invalid("no brackets".to_string()));
        }
        if brackets[0].lower != 0.0 {
            return Err(invalid(format!(
                "first bracket must start at 0 (starts at {})",
                brackets[0].lower
            )));
        }

        for (i, pair) in brackets.windows(2).enumerate() {
            let upper = pair[0].upper.ok_or_else(|| {
                invalid(format!("bracket {} is unbounded but not last", i))
            })?;
            if upper <= pair[0].lower {
                return Err(invalid(format!("bracket {} has empty range", i)));
            }
            if (upper - pair[1].lower).abs() > 1e-9 {
                return Err(invalid(format!(
                    "gap between brackets {} and {} ({} vs {})",
                    i,
                    i + 1,
                    upper,
                    pair[1].lower
                )));
            }
            if pair[1].rate <= pair[0].rate {
                return Err(invalid(format!(
                    "rates must increase (bracket {}: {} after {})",
                    i + 1,
                    pair[1].rate,
                    pair[0].rate
                )));
            }
        }

        Ok(Self { brackets })
    }

    /// The ordered brackets
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Marginal rate at the given quotient: the rate of the last bracket
    /// whose lower bound is below the quotient
    pub fn marginal_rate(&self, quotient: f64) -> f64 {
        self.brackets
            .iter()
            .filter(|b| quotient > b.lower)
            .map(|b| b.rate)
            .last()
            .unwrap_or(0.0)
    }

    /// Walk the table and accrue tax on the given quotient (per fiscal
    /// share). Returns the per-share tax and the per-bracket breakdown.
    pub fn accrue(&self, quotient: f64) -> (f64, Vec<BracketShare>) {
        let mut per_share_tax = 0.0;
        let mut detail = Vec::new();

        for bracket in &self.brackets {
            if quotient <= bracket.lower {
                break;
            }
            let top = bracket.upper.map_or(quotient, |u| quotient.min(u));
            let base = top - bracket.lower;
            let tax = base * bracket.rate;
            per_share_tax += tax;
            detail.push(BracketShare {
                lower: bracket.lower,
                upper: bracket.upper,
                rate: bracket.rate,
                base,
                tax,
            });
        }

        (per_share_tax, detail)
    }
}

/// Tax accrued in one bracket for one fiscal share
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketShare {
    pub lower: f64,
    pub upper: Option<f64>,
    pub rate: f64,

    /// Portion of the quotient falling in this bracket
    pub base: f64,

    /// Tax accrued on that portion (per share)
    pub tax: f64,
}

/// Year-dependent constants outside the bracket table itself
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FiscalYearParams {
    /// Décote threshold for a household of up to 2 shares; scaled by
    /// `shares / 2` above that
    pub decote_threshold: f64,

    /// Cap on the 10% salary allowance
    pub salary_allowance_cap: f64,
}

/// Complete reference data for one fiscal year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalYear {
    pub year: u16,
    pub brackets: BracketTable,
    pub params: FiscalYearParams,
}

/// Bracket bounds/rates for a built-in year, or `None` if not shipped
pub(crate) fn builtin_brackets(year: u16) -> Option<Vec<TaxBracket>> {
    // 2023 and 2024 share the same published thresholds
    match year {
        2023 | 2024 => Some(vec![
            TaxBracket {
                lower: 0.0,
                upper: Some(11_497.0),
                rate: 0.0,
            },
            TaxBracket {
                lower: 11_497.0,
                upper: Some(29_315.0),
                rate: 0.11,
            },
            TaxBracket {
                lower: 29_315.0,
                upper: Some(83_823.0),
                rate: 0.30,
            },
            TaxBracket {
                lower: 83_823.0,
                upper: Some(180_294.0),
                rate: 0.41,
            },
            TaxBracket {
                lower: 180_294.0,
                upper: None,
                rate: 0.45,
            },
        ]),
        _ => None,
    }
}

/// Décote/allowance constants for a built-in year
pub(crate) fn builtin_params(year: u16) -> Option<FiscalYearParams> {
    match year {
        2023 => Some(FiscalYearParams {
            decote_threshold: 1_837.0,
            salary_allowance_cap: 12_912.0,
        }),
        2024 => Some(FiscalYearParams {
            decote_threshold: 1_929.0,
            salary_allowance_cap: 13_522.0,
        }),
        _ => None,
    }
}

/// Fiscal years with built-in tables
pub(crate) const BUILTIN_YEARS: [u16; 2] = [2023, 2024];

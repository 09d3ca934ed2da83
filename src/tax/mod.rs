//! French income-tax reference data and computation engine

mod bareme;
mod engine;
pub mod loader;
mod wrapper;

pub use bareme::{BracketShare, BracketTable, FiscalYear, FiscalYearParams, TaxBracket};
pub use engine::{SocialContributions, TaxAssessment, TaxEngine, TaxpayerProfile};
pub use wrapper::{
    EmploymentStatus, InvestmentIncome, Wrapper, WrapperTax, AV_GAINS_ALLOWANCE,
    AV_MATURITY_YEARS, FLAT_TAX_RATE, SOCIAL_LEVY_RATE,
};

use std::collections::HashMap;
use std::path::Path;

use crate::error::TableError;

/// Container for all fiscal-year reference tables
#[derive(Debug, Clone)]
pub struct TaxTables {
    years: HashMap<u16, FiscalYear>,
}

impl TaxTables {
    /// Tables shipped in code (currently fiscal years 2023 and 2024)
    pub fn builtin() -> Self {
        let mut years = HashMap::new();
        for year in bareme::BUILTIN_YEARS {
            let brackets = bareme::builtin_brackets(year)
                .expect("built-in year without brackets");
            let params = bareme::builtin_params(year).expect("built-in year without params");
            let table = BracketTable::new(year, brackets)
                .expect("built-in bracket table must be valid");
            years.insert(
                year,
                FiscalYear {
                    year,
                    brackets: table,
                    params,
                },
            );
        }
        Self { years }
    }

    /// Load tables from CSV files in the default location (data/tax/)
    pub fn from_csv() -> Result<Self, TableError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_TAX_DATA_PATH))
    }

    /// Load tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, TableError> {
        let brackets = loader::load_brackets(path)?;
        let params = loader::load_params(path)?;

        let mut years = HashMap::new();
        for (year, rows) in brackets {
            let table = BracketTable::new(year, rows)?;
            let year_params = params
                .get(&year)
                .copied()
                .ok_or(TableError::MissingParams(year))?;
            years.insert(
                year,
                FiscalYear {
                    year,
                    brackets: table,
                    params: year_params,
                },
            );
        }

        Ok(Self { years })
    }

    /// Reference data for one fiscal year, if present
    pub fn get(&self, year: u16) -> Option<&FiscalYear> {
        self.years.get(&year)
    }

    /// Available fiscal years, sorted ascending
    pub fn years(&self) -> Vec<u16> {
        let mut years: Vec<u16> = self.years.keys().copied().collect();
        years.sort_unstable();
        years
    }

    /// Most recent fiscal year available
    pub fn latest_year(&self) -> u16 {
        self.years().last().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_years() {
        let tables = TaxTables::builtin();
        assert_eq!(tables.years(), vec![2023, 2024]);
        assert_eq!(tables.latest_year(), 2024);
        assert!(tables.get(2024).is_some());
        assert!(tables.get(2020).is_none());
    }

    #[test]
    fn test_csv_tables_match_builtin() {
        let from_csv = TaxTables::from_csv().expect("default reference data should load");
        let builtin = TaxTables::builtin();

        for year in builtin.years() {
            let a = builtin.get(year).unwrap();
            let b = from_csv.get(year).expect("year missing from CSV");
            assert_eq!(a.brackets.brackets().len(), b.brackets.brackets().len());
            for (x, y) in a.brackets.brackets().iter().zip(b.brackets.brackets()) {
                assert_eq!(x.lower, y.lower);
                assert_eq!(x.upper, y.upper);
                assert_eq!(x.rate, y.rate);
            }
            assert_eq!(a.params.decote_threshold, b.params.decote_threshold);
            assert_eq!(a.params.salary_allowance_cap, b.params.salary_allowance_cap);
        }
    }
}

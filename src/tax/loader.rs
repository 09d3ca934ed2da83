//! CSV-based bracket table loader
//!
//! Loads fiscal-year reference data from data/tax/, overriding the built-in
//! tables. Two files are expected:
//! - `brackets.csv`: year,lower,upper,rate (empty upper = unbounded)
//! - `params.csv`: year,decote_threshold,salary_allowance_cap

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use super::bareme::{FiscalYearParams, TaxBracket};
use crate::error::TableError;

/// Default path to the tax reference-data directory
pub const DEFAULT_TAX_DATA_PATH: &str = "data/tax";

fn open(path: &Path) -> Result<File, TableError> {
    File::open(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_f64(raw: &str, field: &'static str, record: usize) -> Result<f64, TableError> {
    raw.trim()
        .parse()
        .map_err(|_| TableError::Parse { field, record })
}

fn parse_year(raw: &str, record: usize) -> Result<u16, TableError> {
    raw.trim()
        .parse()
        .map_err(|_| TableError::Parse {
            field: "year",
            record,
        })
}

/// Load bracket rows from CSV, grouped by fiscal year in file order
pub fn load_brackets(path: &Path) -> Result<HashMap<u16, Vec<TaxBracket>>, TableError> {
    let file = open(&path.join("brackets.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut tables: HashMap<u16, Vec<TaxBracket>> = HashMap::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let year = parse_year(&record[0], i)?;
        let lower = parse_f64(&record[1], "lower", i)?;
        let upper = match record[2].trim() {
            "" => None,
            raw => Some(parse_f64(raw, "upper", i)?),
        };
        let rate = parse_f64(&record[3], "rate", i)?;

        tables
            .entry(year)
            .or_default()
            .push(TaxBracket { lower, upper, rate });
    }

    Ok(tables)
}

/// Load per-year décote/allowance parameters from CSV
pub fn load_params(path: &Path) -> Result<HashMap<u16, FiscalYearParams>, TableError> {
    let file = open(&path.join("params.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut params = HashMap::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let year = parse_year(&record[0], i)?;
        let decote_threshold = parse_f64(&record[1], "decote_threshold", i)?;
        let salary_allowance_cap = parse_f64(&record[2], "salary_allowance_cap", i)?;

        params.insert(
            year,
            FiscalYearParams {
                decote_threshold,
                salary_allowance_cap,
            },
        );
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_reference_data() {
        let path = Path::new(DEFAULT_TAX_DATA_PATH);

        let brackets = load_brackets(path).expect("brackets.csv should load");
        assert!(brackets.contains_key(&2024));
        assert!(brackets.contains_key(&2023));
        assert_eq!(brackets[&2024].len(), 5);
        // Top bracket is unbounded
        assert!(brackets[&2024].last().unwrap().upper.is_none());

        let params = load_params(path).expect("params.csv should load");
        assert!((params[&2024].decote_threshold - 1_929.0).abs() < 1e-9);
        assert!((params[&2023].salary_allowance_cap - 12_912.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let err = load_brackets(Path::new("data/nonexistent")).unwrap_err();
        match err {
            TableError::Io { path, .. } => assert!(path.contains("nonexistent")),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}

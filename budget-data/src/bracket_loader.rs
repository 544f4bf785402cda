//! Loader for income-tax bracket tables stored as CSV.
//!
//! ## CSV Format
//!
//! | Column       | Required | Type    | Notes                                   |
//! |--------------|----------|---------|-----------------------------------------|
//! | `min_income` | yes      | decimal | Lower bound of the bracket              |
//! | `max_income` | yes      | decimal | Upper bound; leave empty for unbounded  |
//! | `rate`       | yes      | decimal | Marginal rate as a fraction (`0.10`)    |
//!
//! ```csv
//! min_income,max_income,rate
//! 0,929000,0
//! 929000,1363000,0.10
//! 1363000,,0.15
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use budget_core::{DeductionConfig, DeductionError, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a tax bracket table.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read bracket file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bracket table: {0}")]
    InvalidTable(#[from] DeductionError),
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the bracket CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

impl From<&TaxBracketRecord> for TaxBracket {
    fn from(record: &TaxBracketRecord) -> Self {
        TaxBracket {
            min_income: record.min_income,
            max_income: record.max_income,
            tax_rate: record.rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables from CSV into a [`DeductionConfig`].
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse bracket records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Convert records into brackets sorted by `min_income`.
    ///
    /// Rows may appear in any order in the file; contiguity is checked later
    /// by [`DeductionConfig::validate`].
    pub fn to_brackets(records: &[TaxBracketRecord]) -> Vec<TaxBracket> {
        let mut brackets: Vec<TaxBracket> = records.iter().map(TaxBracket::from).collect();
        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        brackets
    }

    /// Parse a bracket table and pair it with `withholding_rate`.
    ///
    /// # Errors
    ///
    /// * [`TaxBracketLoaderError::CsvParse`] for malformed CSV.
    /// * [`TaxBracketLoaderError::InvalidTable`] if the brackets leave gaps,
    ///   overlap, or carry out-of-range rates.
    pub fn load<R: Read>(
        reader: R,
        withholding_rate: Decimal,
    ) -> Result<DeductionConfig, TaxBracketLoaderError> {
        let records = Self::parse(reader)?;
        let config = DeductionConfig {
            withholding_rate,
            brackets: Self::to_brackets(&records),
        };
        config.validate()?;

        debug!(
            brackets = config.brackets.len(),
            withholding_rate = %withholding_rate,
            "loaded tax bracket table"
        );
        Ok(config)
    }

    /// Convenience wrapper: open `path` and delegate to [`TaxBracketLoader::load`].
    pub fn load_from_file(
        path: &Path,
        withholding_rate: Decimal,
    ) -> Result<DeductionConfig, TaxBracketLoaderError> {
        let file = File::open(path).map_err(|source| TaxBracketLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load(file, withholding_rate)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const CANONICAL_CSV: &str = "\
min_income,max_income,rate
0,929000,0
929000,1363000,0.10
1363000,2392000,0.15
2392000,4783000,0.20
4783000,,0.25
";

    #[test]
    fn test_parse_single_record() {
        let csv = "min_income,max_income,rate\n929000,1363000,0.10";

        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![TaxBracketRecord {
                min_income: dec!(929000),
                max_income: Some(dec!(1363000)),
                rate: dec!(0.10),
            }]
        );
    }

    #[test]
    fn test_parse_unbounded_max_income() {
        let csv = "min_income,max_income,rate\n4783000,  ,0.25";

        let records = TaxBracketLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].max_income, None);
        assert_eq!(records[0].rate, dec!(0.25));
    }

    #[test]
    fn test_load_canonical_table_matches_builtin() {
        let config = TaxBracketLoader::load(CANONICAL_CSV.as_bytes(), dec!(0.1083))
            .expect("Failed to load brackets");

        assert_eq!(config, DeductionConfig::canonical());
    }

    #[test]
    fn test_load_sorts_out_of_order_rows() {
        let csv = "\
min_income,max_income,rate
929000,,0.10
0,929000,0
";

        let config = TaxBracketLoader::load(csv.as_bytes(), dec!(0.1083)).expect("should load");

        assert_eq!(config.brackets[0].min_income, dec!(0));
        assert_eq!(config.brackets[1].max_income, None);
    }

    #[test]
    fn test_load_rejects_gap() {
        let csv = "\
min_income,max_income,rate
0,929000,0
1000000,,0.10
";

        let err = TaxBracketLoader::load(csv.as_bytes(), dec!(0.1083)).unwrap_err();

        match err {
            TaxBracketLoaderError::InvalidTable(DeductionError::BracketGap {
                index,
                expected,
                min_income,
            }) => {
                assert_eq!(index, 1);
                assert_eq!(expected, dec!(929000));
                assert_eq!(min_income, dec!(1000000));
            }
            other => panic!("expected BracketGap, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_empty_table() {
        let csv = "min_income,max_income,rate\n";

        let err = TaxBracketLoader::load(csv.as_bytes(), dec!(0.1083)).unwrap_err();

        assert!(matches!(
            err,
            TaxBracketLoaderError::InvalidTable(DeductionError::NoBrackets)
        ));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "min_income,max_income\n0,929000";

        let err = TaxBracketLoader::parse(csv.as_bytes()).expect_err("Should fail");
        let TaxBracketLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_load_from_missing_file_reports_path() {
        let err = TaxBracketLoader::load_from_file(Path::new("no/such/brackets.csv"), dec!(0.1083))
            .unwrap_err();

        assert!(err.to_string().contains("no/such/brackets.csv"));
    }
}

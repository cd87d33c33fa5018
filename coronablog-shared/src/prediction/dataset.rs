/// Historical case/death dataset
///
/// The dataset is a comma-separated file with a header row. Two columns are
/// required by name, `Cases` and `Deaths`. When the file has a fourth column
/// it is used as the time axis after label encoding: its distinct values are
/// sorted and replaced by their rank (0, 1, 2, ...). Otherwise the row index
/// is the time axis.
///
/// ```text
/// Country,Cases,Deaths,Date
/// Turkey,1,0,2020-03-11
/// Turkey,5,0,2020-03-12
/// ```

use csv::{ReaderBuilder, StringRecord, Trim};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;

use super::PredictionError;

pub const CASES_COLUMN: &str = "Cases";
pub const DEATHS_COLUMN: &str = "Deaths";

/// Zero-based index of the column used as the time axis when present
const TIME_COLUMN_INDEX: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub cases: Vec<f64>,
    pub deaths: Vec<f64>,

    /// Time coordinate of each row
    pub time: Vec<f64>,
}

impl Dataset {
    /// Reads and parses a dataset file
    pub fn from_path(path: &Path) -> Result<Self, PredictionError> {
        if !path.exists() {
            return Err(PredictionError::MissingDataset(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parses dataset text
    pub fn parse(text: &str) -> Result<Self, PredictionError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let header = reader.headers()?.clone();
        if header.iter().all(str::is_empty) {
            return Err(PredictionError::Empty);
        }

        let cases_idx = column_index(&header, CASES_COLUMN)?;
        let deaths_idx = column_index(&header, DEATHS_COLUMN)?;
        let has_time_column = header.len() > TIME_COLUMN_INDEX;

        let mut cases = Vec::new();
        let mut deaths = Vec::new();
        let mut raw_time = Vec::new();

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }

            let row = index + 1;
            cases.push(number_at(&record, cases_idx, row, CASES_COLUMN)?);
            deaths.push(number_at(&record, deaths_idx, row, DEATHS_COLUMN)?);
            if has_time_column {
                let cell = record
                    .get(TIME_COLUMN_INDEX)
                    .filter(|cell| !cell.is_empty())
                    .ok_or(PredictionError::MissingTime { row })?;
                raw_time.push(cell.to_string());
            }
        }

        if cases.is_empty() {
            return Err(PredictionError::Empty);
        }

        let time = if has_time_column {
            label_encode(&raw_time)
        } else {
            (0..cases.len()).map(|i| i as f64).collect()
        };

        Ok(Self { cases, deaths, time })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Number of distinct time coordinates
    pub fn distinct_times(&self) -> usize {
        let mut times = self.time.clone();
        times.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        times.dedup();
        times.len()
    }

    /// Largest time coordinate
    pub fn last_time(&self) -> f64 {
        self.time.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

fn column_index(header: &StringRecord, name: &'static str) -> Result<usize, PredictionError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or(PredictionError::MissingColumn(name))
}

fn number_at(
    record: &StringRecord,
    idx: usize,
    row: usize,
    column: &'static str,
) -> Result<f64, PredictionError> {
    let raw = record.get(idx).unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PredictionError::InvalidNumber {
            row,
            column,
            value: raw.to_string(),
        })
}

/// Replaces each value by its rank among the sorted distinct values
///
/// Values sort numerically when every one of them is a number, and
/// lexicographically otherwise.
fn label_encode(values: &[String]) -> Vec<f64> {
    let numeric: Option<Vec<f64>> = values.iter().map(|v| v.parse::<f64>().ok()).collect();

    match numeric {
        Some(numbers) => {
            let mut distinct = numbers.clone();
            distinct.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            distinct.dedup();
            numbers
                .iter()
                .map(|n| {
                    distinct
                        .iter()
                        .position(|d| d == n)
                        .unwrap_or_default() as f64
                })
                .collect()
        }
        None => {
            let distinct: Vec<&String> = values.iter().collect::<BTreeSet<_>>().into_iter().collect();
            values
                .iter()
                .map(|v| distinct.binary_search(&v).unwrap_or_default() as f64)
                .collect()
        }
    }
}

// SPDX-License-Identifier: Apache-2.0

use bijux_inspector_model::{ColType, DatasetSource, HeaderSniff};
use bijux_inspector_query::{header_heuristic, parse_date_relaxed, parse_f64_relaxed};

use crate::backend::{BackendError, BackendErrorCode};

/// Non-empty values looked at per column when inferring its type.
pub const TYPE_INFERENCE_SAMPLE: usize = 120;
const TYPE_INFERENCE_MIN_RATE: f64 = 0.60;
const TYPE_INFERENCE_MIN_HITS: usize = 2;
const DELIMITER_SAMPLE_BYTES: usize = 200_000;
const DELIMITER_CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Column-major table. Every column has exactly `row_count` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<String>>,
    pub col_types: Vec<ColType>,
    pub row_count: usize,
}

impl Table {
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> &str {
        self.columns
            .get(col)
            .and_then(|c| c.get(row))
            .map_or("", String::as_str)
    }

    #[must_use]
    pub fn row(&self, row: usize) -> Vec<String> {
        (0..self.headers.len())
            .map(|c| self.cell(c, row).to_string())
            .collect()
    }
}

pub async fn read_source(source: &DatasetSource) -> Result<String, BackendError> {
    match source {
        DatasetSource::Text { text } => Ok(text.clone()),
        DatasetSource::Path { path } => tokio::fs::read_to_string(path).await.map_err(|e| {
            let code = if e.kind() == std::io::ErrorKind::NotFound {
                BackendErrorCode::NotFound
            } else {
                BackendErrorCode::Io
            };
            BackendError::new(code, format!("Failed to open file: {e}"))
        }),
    }
}

/// Picks the candidate delimiter seen most often outside quoted fields.
/// Ties resolve to the earlier candidate, so plain text falls back to `,`.
#[must_use]
pub fn detect_delimiter(sample: &[u8]) -> u8 {
    let s = &sample[..sample.len().min(DELIMITER_SAMPLE_BYTES)];
    let mut counts = [0usize; DELIMITER_CANDIDATES.len()];
    let mut in_quotes = false;
    let mut i = 0;
    while i < s.len() {
        let b = s[i];
        if b == b'"' {
            if in_quotes && s.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(k) = DELIMITER_CANDIDATES.iter().position(|c| *c == b) {
                counts[k] += 1;
            }
        }
        i += 1;
    }
    let mut best = 0;
    for k in 1..counts.len() {
        if counts[k] > counts[best] {
            best = k;
        }
    }
    DELIMITER_CANDIDATES[best]
}

fn reader(text: &str, delimiter: u8, has_headers: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn parse_error(e: &csv::Error) -> BackendError {
    BackendError::new(BackendErrorCode::Parse, e.to_string())
}

/// Parses CSV text into a table. Without a header row, or when a record is
/// wider than the header, missing names become `Column_N`.
pub fn parse_table(text: &str, has_headers: bool) -> Result<Table, BackendError> {
    let delimiter = detect_delimiter(text.as_bytes());
    let mut rdr = reader(text, delimiter, has_headers);
    let mut headers: Vec<String> = if has_headers {
        rdr.headers()
            .map_err(|e| parse_error(&e))?
            .iter()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    let mut row_count = 0usize;
    for record in rdr.records() {
        let record = record.map_err(|e| parse_error(&e))?;
        while headers.len() < record.len() {
            headers.push(format!("Column_{}", headers.len() + 1));
            columns.push(vec![String::new(); row_count]);
        }
        for (c, column) in columns.iter_mut().enumerate() {
            column.push(record.get(c).unwrap_or("").to_string());
        }
        row_count += 1;
    }
    let col_types = columns.iter().map(|c| infer_col_type(c)).collect();
    Ok(Table {
        headers,
        columns,
        col_types,
        row_count,
    })
}

#[must_use]
pub fn infer_col_type(values: &[String]) -> ColType {
    let mut n = 0usize;
    let mut num_ok = 0usize;
    let mut date_ok = 0usize;
    for v in values
        .iter()
        .filter(|v| !v.trim().is_empty())
        .take(TYPE_INFERENCE_SAMPLE)
    {
        n += 1;
        if parse_f64_relaxed(v).is_some() {
            num_ok += 1;
        }
        if parse_date_relaxed(v).is_some() {
            date_ok += 1;
        }
    }
    if n == 0 {
        return ColType::String;
    }
    let rate = |hits: usize| hits as f64 / n as f64;
    if rate(num_ok) >= TYPE_INFERENCE_MIN_RATE && num_ok >= TYPE_INFERENCE_MIN_HITS {
        ColType::Numeric
    } else if rate(date_ok) >= TYPE_INFERENCE_MIN_RATE && date_ok >= TYPE_INFERENCE_MIN_HITS {
        ColType::Date
    } else {
        ColType::String
    }
}

/// Reads the first two records and runs the header heuristic on them.
pub fn sniff_headers(text: &str) -> Result<HeaderSniff, BackendError> {
    let delimiter = detect_delimiter(text.as_bytes());
    let mut rdr = reader(text, delimiter, false);
    let mut records = rdr.records();
    let mut next = || -> Result<Vec<String>, BackendError> {
        match records.next() {
            Some(r) => Ok(r
                .map_err(|e| parse_error(&e))?
                .iter()
                .map(str::to_string)
                .collect()),
            None => Ok(Vec::new()),
        }
    };
    let first = next()?;
    let second = next()?;
    Ok(header_heuristic(&first, &second))
}

//! Thin adapter turning CSV text into the header/row strings the pipeline
//! consumes. Reading files and choosing sources stays with the caller.

use crate::{ImportError, ImportResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn read_csv(content: &str) -> ImportResult<CsvTable> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ImportError::EmptySource);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(trimmed.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| ImportError::MalformedCsv(0))?
        .iter()
        .map(|value| value.trim().to_string())
        .collect::<Vec<String>>();

    if headers.iter().all(|header| header.is_empty()) {
        return Err(ImportError::EmptySource);
    }

    let mut rows = Vec::new();
    for (index, result_row) in reader.records().enumerate() {
        let row_number = index + 1;
        let record = result_row.map_err(|_| ImportError::MalformedCsv(row_number))?;
        if record.len() != headers.len() {
            return Err(ImportError::RaggedRow {
                row: row_number,
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(|value| value.to_string()).collect());
    }

    Ok(CsvTable { headers, rows })
}

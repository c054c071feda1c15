//! CSV ingest.
//!
//! This module turns a CSV file with a header row into a `SampleTable`.
//!
//! Design goals:
//! - **Header hygiene**: trim names and strip a UTF-8 BOM
//! - **Line numbers preserved** so later parse errors can point at the file
//! - **Separation of concerns**: no column semantics here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::data::{Row, SampleTable};
use crate::error::CurveError;

/// Load a CSV file into a table.
pub fn load_table(path: &Path) -> Result<SampleTable, CurveError> {
    let file = File::open(path).map_err(|e| {
        CurveError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open CSV '{}': {e}", path.display()),
        ))
    })?;
    read_table(file)
}

/// Read CSV from any reader into a table.
pub fn read_table<R: Read>(reader: R) -> Result<SampleTable, CurveError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let headers = normalize_headers(&headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // records() starts at line 2 (after the header), CSV lines are 1-based.
        let line = record.position().map(|p| p.line() as usize).unwrap_or(idx + 2);
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push(Row {
            line,
            cells: record.iter().map(str::to_string).collect(),
        });
    }

    Ok(SampleTable::from_rows(headers, rows))
}

fn normalize_headers(headers: &StringRecord) -> Vec<String> {
    headers
        .iter()
        .map(|name| {
            // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
            // the first header. Without stripping it, lookups of that column fail.
            name.trim().trim_start_matches('\u{feff}').to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let csv = "\u{feff}trial, test_score\n1, 0.5\n2,0.75\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.headers(), &["trial", "test_score"]);
        assert_eq!(table.numeric_column("test_score").unwrap(), vec![0.5, 0.75]);
        assert_eq!(table.rows()[1].line, 3);
    }

    #[test]
    fn skips_blank_lines_and_pads_short_rows() {
        let csv = "a,b\n1,2\n,\n3\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.text_column("b").unwrap(), vec!["2", ""]);
    }

    #[test]
    fn header_only_file_is_empty() {
        let table = read_table("x,y\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.headers().len(), 2);
    }
}

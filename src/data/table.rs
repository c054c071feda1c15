//! In-memory sample table.
//!
//! The table keeps every cell as the raw (trimmed) CSV text. Numeric views are
//! produced on demand so that the sort axis can be any column, numeric or not,
//! and so that parse errors can name the column and the CSV line.

use std::cmp::Ordering;

use crate::domain::RowFilter;
use crate::error::CurveError;

/// One data row plus the CSV line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: usize,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleTable {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl SampleTable {
    /// Build a table; row `i` is assumed to come from CSV line `i + 2`.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Row { line: i + 2, cells })
            .collect();
        Self::from_rows(headers, rows)
    }

    /// Build a table from rows with known line numbers.
    ///
    /// Short rows are padded with empty cells so every row has one cell per
    /// header.
    pub fn from_rows(headers: Vec<String>, mut rows: Vec<Row>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.cells.resize(width, String::new());
        }
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or a lookup error listing the available columns.
    pub fn column_index(&self, name: &str) -> Result<usize, CurveError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CurveError::ColumnNotFound {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Raw cell text of a column.
    pub fn text_column(&self, name: &str) -> Result<Vec<String>, CurveError> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r.cells[idx].clone()).collect())
    }

    /// Numeric values of a column; any unparsable cell is an error.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, CurveError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .map(|r| {
                parse_cell(&r.cells[idx]).ok_or_else(|| CurveError::InvalidValue {
                    column: name.to_string(),
                    line: r.line,
                    value: r.cells[idx].clone(),
                })
            })
            .collect()
    }

    /// Numeric values of the column at `idx`; unparsable cells become `NaN`.
    pub fn numeric_column_lossy(&self, idx: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.cells.get(idx).and_then(|c| parse_cell(c)).unwrap_or(f64::NAN))
            .collect()
    }

    /// Stable sort by a column.
    ///
    /// When every cell of the column parses as a number the sort is numeric
    /// (NaN last); otherwise cells are compared as text.
    pub fn sorted_by(&self, name: &str) -> Result<SampleTable, CurveError> {
        let idx = self.column_index(name)?;
        let mut rows = self.rows.clone();

        let numeric: Option<Vec<f64>> = rows.iter().map(|r| parse_cell(&r.cells[idx])).collect();
        match numeric {
            Some(keys) => {
                let mut keyed: Vec<(f64, Row)> = keys.into_iter().zip(rows).collect();
                keyed.sort_by(|a, b| cmp_nan_last(a.0, b.0));
                rows = keyed.into_iter().map(|(_, r)| r).collect();
            }
            None => rows.sort_by(|a, b| a.cells[idx].cmp(&b.cells[idx])),
        }

        Ok(SampleTable {
            headers: self.headers.clone(),
            rows,
        })
    }

    /// Keep rows matching every filter (trimmed, case-insensitive).
    pub fn filtered(&self, filters: &[RowFilter]) -> Result<SampleTable, CurveError> {
        let resolved = filters
            .iter()
            .map(|f| Ok((self.column_index(&f.column)?, f.value.trim())))
            .collect::<Result<Vec<_>, CurveError>>()?;

        let rows = self
            .rows
            .iter()
            .filter(|r| {
                resolved
                    .iter()
                    .all(|(idx, value)| r.cells[*idx].trim().eq_ignore_ascii_case(value))
            })
            .cloned()
            .collect();

        Ok(SampleTable {
            headers: self.headers.clone(),
            rows,
        })
    }

    /// Last `n` rows (all rows when `n >= len`).
    pub fn tail(&self, n: usize) -> SampleTable {
        let start = self.rows.len().saturating_sub(n);
        SampleTable {
            headers: self.headers.clone(),
            rows: self.rows[start..].to_vec(),
        }
    }
}

impl RowFilter {
    /// Parse `column=value`.
    pub fn parse(spec: &str) -> Result<Self, CurveError> {
        let Some((column, value)) = spec.split_once('=') else {
            return Err(CurveError::InvalidFilter(spec.to_string()));
        };
        let column = column.trim();
        if column.is_empty() {
            return Err(CurveError::InvalidFilter(spec.to_string()));
        }
        Ok(RowFilter {
            column: column.to_string(),
            value: value.trim().to_string(),
        })
    }
}

fn parse_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok()
}

fn cmp_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> SampleTable {
        SampleTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn missing_column_lists_headers() {
        let t = table(&["trial", "test_score"], &[&["1", "0.5"]]);
        let err = t.numeric_column("nonexistent").unwrap_err();
        match err {
            CurveError::ColumnNotFound { column, available } => {
                assert_eq!(column, "nonexistent");
                assert_eq!(available, vec!["trial", "test_score"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn numeric_column_reports_line_of_bad_cell() {
        let t = table(&["x"], &[&["1.0"], &["oops"]]);
        let err = t.numeric_column("x").unwrap_err();
        assert!(matches!(err, CurveError::InvalidValue { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn numeric_sort_is_stable_and_not_lexicographic() {
        let t = table(
            &["nodes", "id"],
            &[&["10", "a"], &["9", "b"], &["10", "c"], &["100", "d"]],
        );
        let sorted = t.sorted_by("nodes").unwrap();
        assert_eq!(sorted.text_column("id").unwrap(), vec!["b", "a", "c", "d"]);
        // Lines travel with their rows.
        assert_eq!(sorted.rows()[0].line, 3);
    }

    #[test]
    fn text_sort_falls_back_to_string_order() {
        let t = table(&["player"], &[&["carol"], &["alice"], &["bob"]]);
        let sorted = t.sorted_by("player").unwrap();
        assert_eq!(sorted.text_column("player").unwrap(), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn filters_match_case_insensitively() {
        let t = table(
            &["changed", "test_score"],
            &[&["True", "1"], &["false", "2"], &["true", "3"]],
        );
        let filter = RowFilter::parse("changed=true").unwrap();
        let kept = t.filtered(&[filter]).unwrap();
        assert_eq!(kept.numeric_column("test_score").unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn filter_parse_rejects_missing_separator() {
        assert!(RowFilter::parse("changed").is_err());
        assert!(RowFilter::parse("=x").is_err());
    }

    #[test]
    fn tail_keeps_last_rows() {
        let t = table(&["x"], &[&["1"], &["2"], &["3"]]);
        assert_eq!(t.tail(2).numeric_column("x").unwrap(), vec![2.0, 3.0]);
        assert_eq!(t.tail(10).len(), 3);
    }

    #[test]
    fn short_rows_are_padded() {
        let t = table(&["a", "b"], &[&["1"]]);
        assert_eq!(t.text_column("b").unwrap(), vec![""]);
        assert!(t.numeric_column_lossy(1)[0].is_nan());
    }
}

use crate::error::{StatementError, StatementResult};
use crate::statement_model::{NamedTable, NormalizedTable, STATEMENT_HEADERS};

/// How the column names of a table were decided
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderStrategy {
    /// Statement header signature found; every matching row was removed
    Statement { header_rows_removed: usize },
    /// No signature; the first row was taken as the header
    FirstRow,
}

pub struct HeaderDetector {
    date_marker: String,
    narration_marker: String,
}

impl HeaderDetector {
    pub fn new() -> Self {
        Self {
            date_marker: "date".to_string(),
            narration_marker: "narration".to_string(),
        }
    }

    /// Name the columns of `table`. The statement signature wins over the
    /// first-row fallback, so repeated per-page headers are all removed.
    pub fn resolve(&self, table: NormalizedTable) -> StatementResult<(NamedTable, HeaderStrategy)> {
        let header_flags: Vec<bool> = table.rows.iter().map(|row| self.is_header_row(row)).collect();

        if header_flags.iter().any(|&m| m) {
            if table.width != STATEMENT_HEADERS.len() {
                return Err(StatementError::HeaderMismatch {
                    expected: STATEMENT_HEADERS.len(),
                    found: table.width,
                });
            }

            let header_rows_removed = header_flags.iter().filter(|&&m| m).count();
            let rows = table
                .rows
                .into_iter()
                .zip(header_flags)
                .filter_map(|(row, is_header)| (!is_header).then_some(row))
                .collect();

            let named = NamedTable {
                columns: STATEMENT_HEADERS.iter().map(|s| s.to_string()).collect(),
                rows,
            };
            return Ok((named, HeaderStrategy::Statement { header_rows_removed }));
        }

        let mut rows = table.rows.into_iter();
        let columns = rows.next().unwrap_or_default();
        Ok((
            NamedTable {
                columns,
                rows: rows.collect(),
            },
            HeaderStrategy::FirstRow,
        ))
    }

    fn is_header_row(&self, row: &[String]) -> bool {
        let contains = |cell: Option<&String>, marker: &str| {
            cell.map_or(false, |c| c.to_lowercase().contains(marker))
        };
        contains(row.first(), &self.date_marker) && contains(row.get(1), &self.narration_marker)
    }
}

impl Default for HeaderDetector {
    fn default() -> Self {
        Self::new()
    }
}

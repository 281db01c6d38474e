use crate::statement_model::{NormalizedTable, RawRow};
use tracing::debug;

/// Cell count of a statement transaction row
pub const STATEMENT_COLUMN_COUNT: usize = 7;

pub struct RowNormalizer {
    min_cells: usize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct NormalizeStats {
    pub rows_read: usize,
    pub rows_dropped: usize,
}

impl RowNormalizer {
    pub fn new() -> Self {
        Self::with_min_cells(STATEMENT_COLUMN_COUNT)
    }

    pub fn with_min_cells(min_cells: usize) -> Self {
        Self { min_cells }
    }

    /// Trim every cell and keep rows with at least `min_cells` cells.
    /// Shorter rows are layout fragments and are dropped.
    pub fn normalize<I>(&self, rows: I) -> (NormalizedTable, NormalizeStats)
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut stats = NormalizeStats::default();
        let mut kept: Vec<Vec<String>> = Vec::new();

        for row in rows {
            stats.rows_read += 1;
            if row.len() < self.min_cells {
                stats.rows_dropped += 1;
                debug!("Dropping {}-cell row", row.len());
                continue;
            }
            kept.push(clean_row(row));
        }

        (pad_rows(kept), stats)
    }
}

impl Default for RowNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn clean_row(row: RawRow) -> Vec<String> {
    row.cells
        .into_iter()
        .map(|cell| cell.map(|c| c.trim().to_string()).unwrap_or_default())
        .collect()
}

/// Pad every row with empty cells up to the widest row
fn pad_rows(mut rows: Vec<Vec<String>>) -> NormalizedTable {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    NormalizedTable { rows, width }
}

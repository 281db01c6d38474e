pub mod parser;
pub mod normalizer;
pub mod formatter;
pub mod detector;
pub mod cleaner;

pub use cleaner::TableCleaner;
pub use normalizer::{NormalizeStats, RowNormalizer, STATEMENT_COLUMN_COUNT};
pub use formatter::TableFormatter;
pub use detector::{HeaderDetector, HeaderStrategy};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CleaningReport {
    pub rows_read: usize,
    pub short_rows_dropped: usize,
    pub header_rows_removed: usize,
    pub amounts_defaulted: usize,
    pub dates_unparsed: usize,
    pub narrations_joined: usize,
}

impl CleaningReport {
    pub fn record_normalize(&mut self, stats: &NormalizeStats) {
        self.rows_read += stats.rows_read;
        self.short_rows_dropped += stats.rows_dropped;
    }

    pub fn record_header(&mut self, strategy: &HeaderStrategy) {
        self.header_rows_removed += match strategy {
            HeaderStrategy::Statement { header_rows_removed } => *header_rows_removed,
            HeaderStrategy::FirstRow => 1,
        };
    }

    pub fn summary(&self) -> String {
        format!(
            "Read {} rows: {} short rows dropped, {} header rows removed. Defaulted {} amounts to zero, left {} dates empty, joined {} wrapped narrations.",
            self.rows_read, self.short_rows_dropped, self.header_rows_removed,
            self.amounts_defaulted, self.dates_unparsed, self.narrations_joined
        )
    }
}

use super::parser::{clean_narration, parse_amount, parse_statement_date};
use super::CleaningReport;
use crate::statement_model::{Cell, NamedTable, ResultTable, AMOUNT_COLUMNS, DATE_COLUMNS, NARRATION};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Amount,
    Date,
    Narration,
    Text,
}

fn column_kind(name: &str) -> ColumnKind {
    if AMOUNT_COLUMNS.contains(&name) {
        ColumnKind::Amount
    } else if DATE_COLUMNS.contains(&name) {
        ColumnKind::Date
    } else if name == NARRATION {
        ColumnKind::Narration
    } else {
        ColumnKind::Text
    }
}

/// Converts named text columns into typed cells
pub struct TableCleaner {
    date_parser: fn(&str) -> Option<NaiveDate>,
}

impl TableCleaner {
    pub fn new() -> Self {
        Self {
            date_parser: parse_statement_date,
        }
    }

    /// Use a different date parser, e.g. one pinned to a reference year
    pub fn with_date_parser(date_parser: fn(&str) -> Option<NaiveDate>) -> Self {
        Self { date_parser }
    }

    /// Type-convert amount, date and narration columns. Columns that are not
    /// present are skipped; malformed cells degrade to 0.0 or an empty date.
    pub fn clean(&self, table: NamedTable, report: &mut CleaningReport) -> ResultTable {
        let kinds: Vec<ColumnKind> = table.columns.iter().map(|c| column_kind(c)).collect();

        let rows = table
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .map(|(i, value)| {
                        let kind = kinds.get(i).copied().unwrap_or(ColumnKind::Text);
                        self.clean_cell(kind, value, report)
                    })
                    .collect()
            })
            .collect();

        ResultTable {
            columns: table.columns,
            rows,
        }
    }

    fn clean_cell(&self, kind: ColumnKind, value: String, report: &mut CleaningReport) -> Cell {
        match kind {
            ColumnKind::Amount => match parse_amount(&value) {
                Some(amount) => Cell::Number(amount),
                None => {
                    report.amounts_defaulted += 1;
                    Cell::Number(0.0)
                }
            },
            ColumnKind::Date => {
                let date = (self.date_parser)(&value);
                if date.is_none() {
                    report.dates_unparsed += 1;
                }
                Cell::Date(date)
            }
            ColumnKind::Narration => {
                if value.contains('\n') {
                    report.narrations_joined += 1;
                }
                Cell::Text(clean_narration(&value))
            }
            ColumnKind::Text => Cell::Text(value),
        }
    }
}

impl Default for TableCleaner {
    fn default() -> Self {
        Self::new()
    }
}

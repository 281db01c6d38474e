use crate::statement_model::{Cell, ResultTable};

/// Renders the head of a result table as an aligned text grid
pub struct TableFormatter {
    padding: usize,
    max_cell_width: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ColumnAlignment {
    Left,
    Right,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            padding: 2,
            max_cell_width: 40,
        }
    }

    /// Format the first `limit` rows with their index in the first column
    pub fn format_preview(&self, table: &ResultTable, limit: usize) -> String {
        if table.columns.is_empty() {
            return "Empty table".to_string();
        }

        let mut grid: Vec<Vec<String>> = Vec::new();
        let mut header = vec![String::new()];
        header.extend(table.columns.iter().map(|c| self.truncate(c)));
        grid.push(header);

        for (index, row) in table.head(limit) {
            let mut line = vec![index.to_string()];
            line.extend(row.iter().map(|cell| self.truncate(&cell.display())));
            line.resize(table.columns.len() + 1, String::new());
            grid.push(line);
        }

        let alignments = self.column_alignments(table);
        let widths = self.calculate_column_widths(&grid);

        let mut formatted: Vec<String> = grid
            .iter()
            .map(|line| self.format_row(line, &widths, &alignments))
            .collect();

        if table.len() > limit {
            formatted.push(format!("[{} rows x {} columns]", table.len(), table.columns.len()));
        }

        formatted.join("\n")
    }

    /// Index and numeric columns align right, everything else left
    fn column_alignments(&self, table: &ResultTable) -> Vec<ColumnAlignment> {
        let mut alignments = vec![ColumnAlignment::Right];
        for i in 0..table.columns.len() {
            let numeric = table
                .rows
                .first()
                .and_then(|row| row.get(i))
                .map_or(false, |cell| matches!(cell, Cell::Number(_)));
            alignments.push(if numeric {
                ColumnAlignment::Right
            } else {
                ColumnAlignment::Left
            });
        }
        alignments
    }

    fn calculate_column_widths(&self, grid: &[Vec<String>]) -> Vec<usize> {
        let column_count = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; column_count];

        for line in grid {
            for (i, cell) in line.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        widths
    }

    fn format_row(&self, line: &[String], widths: &[usize], alignments: &[ColumnAlignment]) -> String {
        let cells: Vec<String> = line
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (content, &width))| {
                let alignment = alignments.get(i).copied().unwrap_or(ColumnAlignment::Left);
                self.pad_content(content, width, alignment)
            })
            .collect();

        cells.join(&" ".repeat(self.padding)).trim_end().to_string()
    }

    fn pad_content(&self, content: &str, width: usize, alignment: ColumnAlignment) -> String {
        match alignment {
            ColumnAlignment::Left => format!("{:<width$}", content, width = width),
            ColumnAlignment::Right => format!("{:>width$}", content, width = width),
        }
    }

    fn truncate(&self, content: &str) -> String {
        let single_line = content.replace('\n', " ");
        if single_line.chars().count() <= self.max_cell_width {
            return single_line;
        }
        let kept: String = single_line.chars().take(self.max_cell_width - 3).collect();
        format!("{}...", kept)
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table(rows: usize) -> ResultTable {
        ResultTable {
            columns: vec!["Date".to_string(), "Narration".to_string(), "Deposit Amount".to_string()],
            rows: (0..rows)
                .map(|i| {
                    vec![
                        Cell::Date(NaiveDate::from_ymd_opt(2024, 4, 1)),
                        Cell::Text(format!("Entry {}", i)),
                        Cell::Number(5000.0),
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn test_preview_layout() {
        let preview = TableFormatter::new().format_preview(&table(2), 10);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "   Date        Narration  Deposit Amount");
        assert_eq!(lines[1], "0  01/04/2024  Entry 0            5000.0");
        assert!(!preview.contains("rows x"));
    }

    #[test]
    fn test_preview_limit() {
        let preview = TableFormatter::new().format_preview(&table(12), 10);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines[10].starts_with("9 "));
        assert_eq!(lines[11], "[12 rows x 3 columns]");
    }

    #[test]
    fn test_long_cells_truncated() {
        let formatter = TableFormatter {
            padding: 2,
            max_cell_width: 8,
        };
        assert_eq!(formatter.truncate("NEFT CR-HDFC0001-ACME"), "NEFT ...");
        assert_eq!(formatter.truncate("short"), "short");
    }
}

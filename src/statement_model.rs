use chrono::NaiveDate;

pub const DATE: &str = "Date";
pub const NARRATION: &str = "Narration";
pub const REFERENCE: &str = "Chq./Ref.No.";
pub const VALUE_DATE: &str = "Value Date";
pub const WITHDRAWAL: &str = "Withdrawal Amount";
pub const DEPOSIT: &str = "Deposit Amount";
pub const CLOSING_BALANCE: &str = "Closing Balance";

/// Column names of an HDFC statement table, in printed order
pub const STATEMENT_HEADERS: [&str; 7] = [
    DATE,
    NARRATION,
    REFERENCE,
    VALUE_DATE,
    WITHDRAWAL,
    DEPOSIT,
    CLOSING_BALANCE,
];

pub const AMOUNT_COLUMNS: [&str; 3] = [WITHDRAWAL, DEPOSIT, CLOSING_BALANCE];
pub const DATE_COLUMNS: [&str; 2] = [DATE, VALUE_DATE];

/// Display format for every cleaned date
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One table row as detected on a PDF page. `None` marks a missing cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    pub cells: Vec<Option<String>>,
}

impl RawRow {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().map(|cell| Some(cell.into())).collect(),
        }
    }
}

/// Rectangular table of trimmed cells addressed by position
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    pub rows: Vec<Vec<String>>,
    pub width: usize,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Table after header resolution: named columns, data rows still text
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// `None` when the source value was not a recognizable date
    Date(Option<NaiveDate>),
}

impl Cell {
    /// Text shown in previews and text exports; missing dates render empty
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => format_amount(*n),
            Cell::Date(Some(d)) => d.format(DATE_FORMAT).to_string(),
            Cell::Date(None) => String::new(),
        }
    }
}

fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Cleaned output table. Row position is the record index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// First `n` rows, keeping their original index
    pub fn head(&self, n: usize) -> impl Iterator<Item = (usize, &Vec<Cell>)> {
        self.rows.iter().enumerate().take(n)
    }
}

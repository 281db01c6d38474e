use crate::error::{StatementError, StatementResult};
use crate::statement_model::{Cell, ResultTable, DATE_FORMAT};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// Format implied by the file extension, if it is one we write
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Configured format wins, then the extension, then xlsx
    pub fn resolve(configured: Option<ExportFormat>, path: &Path) -> Self {
        configured
            .or_else(|| Self::from_path(path))
            .unwrap_or(ExportFormat::Xlsx)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(StatementError::InvalidFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportStats {
    pub path: PathBuf,
    pub format: ExportFormat,
    pub row_count: usize,
    pub column_count: usize,
}

/// Writes a cleaned table with its header row and without the record index
pub struct StatementExporter {
    format: ExportFormat,
}

impl StatementExporter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn export(&self, table: &ResultTable, path: &Path) -> StatementResult<ExportStats> {
        info!("Exporting {} rows as {} to {:?}", table.len(), self.format, path);

        match self.format {
            ExportFormat::Xlsx => write_xlsx(table, path)?,
            ExportFormat::Csv => write_csv(table, path)?,
            ExportFormat::Json => write_json(table, path)?,
        }

        let stats = ExportStats {
            path: path.to_path_buf(),
            format: self.format,
            row_count: table.len(),
            column_count: table.columns.len(),
        };
        info!("Export completed: {} rows, {} columns", stats.row_count, stats.column_count);
        Ok(stats)
    }
}

fn write_xlsx(table: &ResultTable, path: &Path) -> StatementResult<()> {
    let export_err = |e: XlsxError| StatementError::export(path.display().to_string(), e);

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name.as_str(), &header_format)
            .map_err(export_err)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let xl_row = (index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let xl_col = col as u16;
            match cell {
                Cell::Number(value) => {
                    worksheet.write_number(xl_row, xl_col, *value).map_err(export_err)?;
                }
                Cell::Text(text) => {
                    worksheet.write_string(xl_row, xl_col, text.as_str()).map_err(export_err)?;
                }
                Cell::Date(Some(date)) => {
                    let text = date.format(DATE_FORMAT).to_string();
                    worksheet.write_string(xl_row, xl_col, text.as_str()).map_err(export_err)?;
                }
                // missing dates stay blank
                Cell::Date(None) => {}
            }
        }
    }

    worksheet.autofit();
    workbook.save(path).map_err(export_err)?;
    Ok(())
}

fn write_csv(table: &ResultTable, path: &Path) -> StatementResult<()> {
    let export_err = |e: csv::Error| StatementError::export(path.display().to_string(), e);

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .map_err(export_err)?;

    writer.write_record(&table.columns).map_err(export_err)?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(Cell::display))
            .map_err(export_err)?;
    }

    writer
        .flush()
        .map_err(|e| StatementError::export(path.display().to_string(), e))?;
    Ok(())
}

fn write_json(table: &ResultTable, path: &Path) -> StatementResult<()> {
    let keys = json_keys(&table.columns);
    let records: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = keys
                .iter()
                .zip(row)
                .map(|(name, cell)| (name.clone(), json_value(cell)))
                .collect();
            Value::Object(object)
        })
        .collect();

    let content = serde_json::to_string_pretty(&records)
        .map_err(|e| StatementError::export(path.display().to_string(), e))?;
    std::fs::write(path, content)
        .map_err(|e| StatementError::export(path.display().to_string(), e))?;
    Ok(())
}

/// Object keys for each column. Repeated names get `.1`, `.2`, ... so no
/// column is lost from a JSON record.
fn json_keys(columns: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    columns
        .iter()
        .map(|name| {
            let mut key = name.clone();
            let mut suffix = 1;
            while seen.contains(&key) {
                key = format!("{}.{}", name, suffix);
                suffix += 1;
            }
            seen.insert(key.clone());
            key
        })
        .collect()
}

fn json_value(cell: &Cell) -> Value {
    match cell {
        Cell::Text(text) => Value::String(text.clone()),
        Cell::Number(value) => serde_json::Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Date(Some(date)) => Value::String(date.format(DATE_FORMAT).to_string()),
        Cell::Date(None) => Value::Null,
    }
}

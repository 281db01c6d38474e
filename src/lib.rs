//! HDFC bank statement extraction: reads the transaction table out of a
//! statement PDF, cleans amounts, dates and narrations, and writes a
//! spreadsheet.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod pdf;
pub mod processing;
pub mod statement_model;
pub mod table_cleaner;

pub use error::{StatementError, StatementResult};
pub use export::{ExportFormat, StatementExporter};
pub use processing::{PipelineOutcome, StatementProcessor};
pub use statement_model::{Cell, ResultTable};

use crate::error::StatementResult;
use crate::logging::PerformanceTimer;
use crate::pdf::{LayoutSettings, StatementReader};
use crate::statement_model::{RawRow, ResultTable};
use crate::table_cleaner::{CleaningReport, HeaderDetector, HeaderStrategy, RowNormalizer, TableCleaner};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

pub const NO_DATA_MESSAGE: &str =
    "Error: No data found. The PDF might be an image scan or have a different layout.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Open,
    Extract,
    Normalize,
    ResolveHeader,
    Clean,
    Export,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Open => "open",
            PipelineStage::Extract => "extract",
            PipelineStage::Normalize => "normalize",
            PipelineStage::ResolveHeader => "resolve header",
            PipelineStage::Clean => "clean",
            PipelineStage::Export => "export",
        };
        f.write_str(name)
    }
}

/// Cleaned table plus what the pipeline did to get there
#[derive(Debug, Clone)]
pub struct ProcessedStatement {
    pub table: ResultTable,
    pub report: CleaningReport,
    pub header: HeaderStrategy,
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Completed(ProcessedStatement),
    /// Nothing survived normalization. Not an error.
    NoDataFound,
}

impl PipelineOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, PipelineOutcome::NoDataFound)
    }

    pub fn into_statement(self) -> Option<ProcessedStatement> {
        match self {
            PipelineOutcome::Completed(statement) => Some(statement),
            PipelineOutcome::NoDataFound => None,
        }
    }
}

/// Runs a statement PDF through extraction, normalization, header
/// resolution and cleaning. Exporting is left to the caller.
pub struct StatementProcessor {
    layout: LayoutSettings,
    normalizer: RowNormalizer,
    detector: HeaderDetector,
    cleaner: TableCleaner,
}

impl StatementProcessor {
    pub fn new(layout: LayoutSettings) -> Self {
        Self {
            layout,
            normalizer: RowNormalizer::new(),
            detector: HeaderDetector::new(),
            cleaner: TableCleaner::new(),
        }
    }

    pub fn process_file(
        &self,
        path: impl AsRef<Path>,
        password: Option<&str>,
    ) -> StatementResult<PipelineOutcome> {
        let path = path.as_ref();
        info!("🐹 Starting statement processing: {}", path.display());

        let reader = {
            let _timer = PerformanceTimer::start(PipelineStage::Open.to_string());
            StatementReader::open(path, password, self.layout)?
        };

        println!(
            "Processing {} pages in '{}'...",
            reader.page_count(),
            reader.path().display()
        );

        self.process_rows(reader.rows())
    }

    /// Everything after opening the document. Rows are pulled in order and
    /// the first extraction error ends the run.
    pub fn process_rows<I>(&self, rows: I) -> StatementResult<PipelineOutcome>
    where
        I: IntoIterator<Item = StatementResult<RawRow>>,
    {
        let mut report = CleaningReport::default();

        let raw_rows = {
            let _timer = PerformanceTimer::start(PipelineStage::Extract.to_string());
            rows.into_iter().collect::<StatementResult<Vec<RawRow>>>()?
        };
        debug!("Extracted {} raw rows", raw_rows.len());

        let normalized = {
            let _timer = PerformanceTimer::start(PipelineStage::Normalize.to_string());
            let (table, stats) = self.normalizer.normalize(raw_rows);
            report.record_normalize(&stats);
            table
        };

        if normalized.is_empty() {
            info!("No rows survived normalization");
            return Ok(PipelineOutcome::NoDataFound);
        }

        let (named, header) = {
            let _timer = PerformanceTimer::start(PipelineStage::ResolveHeader.to_string());
            self.detector.resolve(normalized)?
        };
        report.record_header(&header);

        let table = {
            let _timer = PerformanceTimer::start(PipelineStage::Clean.to_string());
            self.cleaner.clean(named, &mut report)
        };

        info!("{}", report.summary());

        Ok(PipelineOutcome::Completed(ProcessedStatement {
            table,
            report,
            header,
        }))
    }
}

impl Default for StatementProcessor {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

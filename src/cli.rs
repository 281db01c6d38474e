use crate::config::ConverterConfig;
use crate::error::StatementResult;
use crate::export::{ExportStats, StatementExporter};
use crate::logging::PerformanceTimer;
use crate::processing::{PipelineOutcome, PipelineStage, StatementProcessor, NO_DATA_MESSAGE};
use crate::table_cleaner::TableFormatter;
use tracing::info;

/// Convert one statement PDF into a cleaned spreadsheet.
///
/// Returns `Ok(None)` when the document holds no usable table; the no-data
/// message has already been printed in that case.
pub fn convert_command(config: &ConverterConfig) -> StatementResult<Option<ExportStats>> {
    info!("🔍 Converting statement: {:?}", config.input.path);

    let processor = StatementProcessor::new(config.layout);
    let outcome = processor.process_file(&config.input.path, config.input.password.as_deref())?;

    let statement = match outcome {
        PipelineOutcome::Completed(statement) => statement,
        PipelineOutcome::NoDataFound => {
            println!("{}", NO_DATA_MESSAGE);
            return Ok(None);
        }
    };

    println!("\n--- Preview of Extracted Data ---");
    println!(
        "{}",
        TableFormatter::new().format_preview(&statement.table, config.output.preview_rows)
    );

    let stats = {
        let _timer = PerformanceTimer::start(PipelineStage::Export.to_string());
        StatementExporter::new(config.export_format()).export(&statement.table, &config.output.path)?
    };

    println!("\nSuccess! Data saved to: {}", stats.path.display());
    info!(
        "✅ Saved {} rows x {} columns as {}",
        stats.row_count, stats.column_count, stats.format
    );

    Ok(Some(stats))
}

use clap::Parser;
use hdfc_statement::config::ConverterConfig;
use hdfc_statement::error::StatementResult;
use hdfc_statement::logging::{init_logging, log_system_info, LoggingGuard};
use hdfc_statement::{cli, log_error};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hdfc_extract")]
#[command(about = "Extract the transaction table from an HDFC bank statement PDF into a spreadsheet")]
#[command(version)]
struct Cli {
    /// Statement PDF (defaults to statement.pdf)
    input: Option<PathBuf>,

    /// Output file (defaults to hdfc_cleaned_data.xlsx)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Password for an encrypted statement
    #[arg(short, long)]
    password: Option<String>,

    /// Output format: xlsx, csv or json (defaults to the output extension)
    #[arg(short, long)]
    format: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of records shown in the preview
    #[arg(long)]
    preview_rows: Option<usize>,

    /// Log level, e.g. warn, info, debug (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Defaults, then config file, then environment, then flags
    fn resolve_config(&self) -> StatementResult<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::load_from_file(path)?,
            None => ConverterConfig::default(),
        };

        config.apply_env()?;

        if let Some(input) = &self.input {
            config.input.path = input.clone();
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(password) = &self.password {
            config.input.password = Some(password.clone());
        }
        if let Some(format) = &self.format {
            config.output.format = Some(format.parse()?);
        }
        if let Some(rows) = self.preview_rows {
            config.output.preview_rows = rows;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        Ok(config)
    }
}

fn start(cli: &Cli) -> StatementResult<(ConverterConfig, LoggingGuard)> {
    let config = cli.resolve_config()?;
    let guard = init_logging(&config.logging)?;
    log_system_info();
    Ok((config, guard))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, _guard) = match start(&cli) {
        Ok(started) => started,
        Err(e) => {
            println!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    match cli::convert_command(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log_error!(e, "convert");
            println!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

use crate::error::{ErrorContext, StatementError, StatementResult};
use crate::export::ExportFormat;
use crate::logging::LoggingConfig;
use crate::pdf::LayoutSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_INPUT: &str = "HDFC_STATEMENT_INPUT";
pub const ENV_PASSWORD: &str = "HDFC_STATEMENT_PASSWORD";
pub const ENV_OUTPUT: &str = "HDFC_STATEMENT_OUTPUT";
pub const ENV_FORMAT: &str = "HDFC_STATEMENT_FORMAT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConverterConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub layout: LayoutSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Statement PDF to read
    pub path: PathBuf,

    /// Password for encrypted statements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the cleaned table is written
    pub path: PathBuf,

    /// Output format; inferred from the path extension when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ExportFormat>,

    /// Records shown in the console preview
    pub preview_rows: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("statement.pdf"),
            password: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("hdfc_cleaned_data.xlsx"),
            format: None,
            preview_rows: 10,
        }
    }
}

impl ConverterConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> StatementResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_path(&path.display().to_string())?;

        let config: ConverterConfig = toml::from_str(&content).map_err(|e| {
            StatementError::configuration(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> StatementResult<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| StatementError::configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).with_path(&path.display().to_string())?;
        Ok(())
    }

    /// Override settings from `HDFC_STATEMENT_*` environment variables
    pub fn apply_env(&mut self) -> StatementResult<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars<F>(&mut self, lookup: F) -> StatementResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(input) = lookup(ENV_INPUT) {
            self.input.path = PathBuf::from(input);
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.input.password = Some(password);
        }
        if let Some(output) = lookup(ENV_OUTPUT) {
            self.output.path = PathBuf::from(output);
        }
        if let Some(format) = lookup(ENV_FORMAT) {
            self.output.format = Some(format.parse()?);
        }
        Ok(())
    }

    /// Output format after falling back to the extension, then xlsx
    pub fn export_format(&self) -> ExportFormat {
        ExportFormat::resolve(self.output.format, &self.output.path)
    }
}

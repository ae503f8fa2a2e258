//! `primer run` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use primer_config::{CliSettings, Config};
use primer_exec::{ExecutionClient, ExecutionResult, Language};

use super::read_input;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the run command.
#[derive(Args)]
pub(crate) struct RunArgs {
    /// Source file to execute.
    file: PathBuf,

    /// Snippet language (default: from file extension, then config).
    #[arg(short, long)]
    language: Option<String>,

    /// Sandbox execute endpoint (overrides config).
    #[arg(long, env = "PRIMER_ENDPOINT")]
    endpoint: Option<String>,

    /// Remote call timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to configuration file (default: auto-discover primer.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RunArgs {
    /// Execute the run command.
    ///
    /// Returns exit code 1 when the snippet failed.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the source cannot be read.
    pub(crate) fn execute(self, output: &Output) -> Result<i32, CliError> {
        let language = self
            .language
            .or_else(|| language_from_extension(&self.file).map(str::to_owned));
        let cli_settings = CliSettings {
            endpoint: self.endpoint,
            timeout_secs: self.timeout,
            language,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source = read_input(&self.file)?;

        let language = Language::parse(&config.execution.language);
        let client = ExecutionClient::new(&config.execution.endpoint)
            .timeout(config.execution.timeout());

        tracing::info!(
            language = %language,
            endpoint = %config.execution.endpoint,
            "Running snippet"
        );
        let result = client.execute(&source, &language);

        report(&result, output)
    }
}

/// Print a result and return the process exit code.
fn report(result: &ExecutionResult, output: &Output) -> Result<i32, CliError> {
    if result.is_approximated() {
        output.warning("(offline approximation)");
    }
    output.result(&result.output)?;

    match &result.diagnostic {
        Some(diagnostic) if !result.is_success() => {
            output.error(diagnostic);
            Ok(1)
        }
        _ => Ok(0),
    }
}

/// Language tag implied by a source file extension.
fn language_from_extension(path: &Path) -> Option<&'static str> {
    let tag = match path.extension()?.to_str()? {
        "py" => "python",
        "java" => "java",
        "js" | "mjs" => "javascript",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "rs" => "rust",
        _ => return None,
    };
    Some(tag)
}

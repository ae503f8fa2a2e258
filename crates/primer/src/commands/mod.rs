//! CLI command implementations.

pub(crate) mod render;
pub(crate) mod run;

pub(crate) use render::RenderArgs;
pub(crate) use run::RunArgs;

use std::path::Path;

use crate::error::CliError;

/// Read a UTF-8 input file.
fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

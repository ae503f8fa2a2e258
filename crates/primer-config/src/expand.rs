//! `${VAR}` and `${VAR:-default}` expansion in configuration strings.
//!
//! Bare `$VAR` is left alone so URLs containing `$` survive unchanged.

use crate::ConfigError;

/// Unset variable reported by the lookup closure.
struct Unset(String);

/// Expand environment references in `value`, in place.
///
/// `field` names the config key for error messages.
pub(crate) fn expand_env(value: &mut String, field: &str) -> Result<(), ConfigError> {
    if !value.contains("${") {
        return Ok(());
    }

    let expanded = shellexpand::env_with_context(value.as_str(), |var| {
        std::env::var(var)
            .map(Some)
            .map_err(|_| Unset(var.to_owned()))
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })?;

    *value = expanded.into_owned();
    Ok(())
}

//! `${VAR}` expansion for string settings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// Values without `${` are returned as-is, so bare `$` (e.g. in a URL) is
/// never touched.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    // Unset variables stay unexpanded unless they carry a `:-default`.
    let mut unset = Vec::new();
    let expanded = shellexpand::env_with_context_no_errors(value, |name| {
        let found = std::env::var(name).ok();
        if found.is_none() {
            unset.push(name.to_owned());
        }
        found
    })
    .into_owned();

    match unset
        .iter()
        .find(|name| expanded.contains(&format!("${{{name}}}")))
    {
        Some(name) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{name}}} not set"),
        }),
        None => Ok(expanded),
    }
}

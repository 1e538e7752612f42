use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_API_BASE_URL: &str = "https://api.madkudu.com/v1/";

/// Load run configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load run configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build run configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let api_base_url = or_default("BULKSCORE_API_BASE_URL", DEFAULT_API_BASE_URL);
    let results_dir = PathBuf::from(or_default("BULKSCORE_RESULTS_DIR", "results"));
    let log_level = or_default("BULKSCORE_LOG_LEVEL", "info");
    let user_agent = or_default("BULKSCORE_USER_AGENT", "bulkscore/0.1 (customer-fit)");

    let request_timeout_secs = match lookup("BULKSCORE_REQUEST_TIMEOUT_SECS") {
        Ok(raw) if raw.trim().is_empty() => None,
        Ok(raw) => Some(
            raw.trim()
                .parse::<u64>()
                .map_err(|e| invalid("BULKSCORE_REQUEST_TIMEOUT_SECS", e.to_string()))?,
        ),
        Err(_) => None,
    };

    let progress_interval = or_default("BULKSCORE_PROGRESS_INTERVAL", "100")
        .parse::<u32>()
        .map_err(|e| invalid("BULKSCORE_PROGRESS_INTERVAL", e.to_string()))?;
    if progress_interval == 0 {
        return Err(invalid(
            "BULKSCORE_PROGRESS_INTERVAL",
            "must be greater than zero".to_string(),
        ));
    }

    let reference_column = or_default("BULKSCORE_REFERENCE_COLUMN", "A");
    if reference_column.is_empty() || !reference_column.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid(
            "BULKSCORE_REFERENCE_COLUMN",
            format!("'{reference_column}' is not a column letter"),
        ));
    }

    Ok(AppConfig {
        api_base_url,
        results_dir,
        log_level,
        request_timeout_secs,
        user_agent,
        progress_interval,
        reference_column,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

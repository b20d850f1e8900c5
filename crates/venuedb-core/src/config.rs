use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds a value that fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if any env var holds a value that fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => Ok(true),
                "0" | "false" | "no" => Ok(false),
                other => Err(ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: format!("expected a boolean, got \"{other}\""),
                }),
            },
        }
    };

    let env = parse_environment(&or_default("VENUEDB_ENV", "development"));
    let log_level = or_default("VENUEDB_LOG_LEVEL", "info");

    let webdriver_url = or_default("VENUEDB_WEBDRIVER_URL", "http://localhost:9515");
    let browser_headless = parse_bool("VENUEDB_BROWSER_HEADLESS", true)?;
    let page_settle_secs = parse_u64("VENUEDB_PAGE_SETTLE_SECS", "5")?;
    let field_lookup_timeout_ms = parse_u64("VENUEDB_FIELD_LOOKUP_TIMEOUT_MS", "2000")?;
    let request_timeout_secs = parse_u64("VENUEDB_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "VENUEDB_USER_AGENT",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/91.0.4472.124 Safari/537.36",
    );
    let output_path = PathBuf::from(or_default(
        "VENUEDB_OUTPUT_PATH",
        "./scraped_venues_data.json",
    ));
    let debug_html_dir = lookup("VENUEDB_DEBUG_HTML_DIR").ok().map(PathBuf::from);
    let targets_path = PathBuf::from(or_default("VENUEDB_TARGETS_PATH", "./config/targets.yaml"));

    Ok(AppConfig {
        env,
        log_level,
        webdriver_url,
        browser_headless,
        page_settle_secs,
        field_lookup_timeout_ms,
        request_timeout_secs,
        user_agent,
        output_path,
        debug_html_dir,
        targets_path,
    })
}

fn parse_environment(raw: &str) -> Environment {
    match raw.to_ascii_lowercase().as_str() {
        "production" | "prod" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

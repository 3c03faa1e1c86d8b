use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
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

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings count as unset so `FOO=` in a .env file disables the value.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("DEALREEL_LOG_LEVEL", "info");
    let partner_tag = optional("DEALREEL_PARTNER_TAG");
    let default_currency = parse_currency(&or_default("DEALREEL_DEFAULT_CURRENCY", "USD"))?;

    let max_deals = parse_usize("DEALREEL_MAX_DEALS", "20")?;
    if max_deals == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "DEALREEL_MAX_DEALS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let snapshot_path = PathBuf::from(or_default("DEALREEL_SNAPSHOT_PATH", "products.json"));
    let categories_path = PathBuf::from(or_default(
        "DEALREEL_CATEGORIES_PATH",
        "./config/categories.yaml",
    ));
    let catalog_api_url = optional("DEALREEL_CATALOG_API_URL");
    let catalog_api_key = optional("DEALREEL_CATALOG_API_KEY");
    let search_keywords = or_default("DEALREEL_SEARCH_KEYWORDS", "deals");

    let request_timeout_secs = parse_u64("DEALREEL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DEALREEL_USER_AGENT", DEFAULT_USER_AGENT);
    let inter_request_delay_ms = parse_u64("DEALREEL_INTER_REQUEST_DELAY_MS", "1000")?;

    Ok(AppConfig {
        log_level,
        partner_tag,
        default_currency,
        max_deals,
        snapshot_path,
        categories_path,
        catalog_api_url,
        catalog_api_key,
        search_keywords,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
    })
}

/// Validate a currency code: exactly three ASCII letters, normalized to uppercase.
fn parse_currency(raw: &str) -> Result<String, ConfigError> {
    let code = raw.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "DEALREEL_DEFAULT_CURRENCY".to_string(),
            reason: format!("\"{code}\" is not a 3-letter currency code"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

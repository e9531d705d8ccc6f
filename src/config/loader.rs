//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "seatgallery.toml";

/// Load configuration from seatgallery.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve the token signing secret.
///
/// The secret lives only in the environment, never in the config file, and a
/// missing secret is a startup-fatal condition rather than a silent fallback.
pub fn session_secret() -> Result<String> {
    match env::var("SESSION_SECRET") {
        Ok(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(Error::MissingSecret),
    }
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Seatgallery Configuration

[server]
host = "0.0.0.0"
port = 3470

[session]
# Authoritative session cookie for this deployment
cookie_name = "sc_session"
ttl_days = 7
# Enable once the site is served over TLS
secure_cookies = false

# The token signing secret is intentionally NOT configured here.
# Export SESSION_SECRET in the service environment; startup fails without it.

[database]
host = "${DB_HOST:-localhost}"
port = 5432
user = "${DB_USER:-postgres}"
password = "${DB_PASSWORD:-postgres}"
dbname = "seatgallery"

[uploads]
dir = "./uploads"

[bootstrap]
# Default administrator, created lazily on the first login attempt
admin_username = "admin"
admin_password = "change-me"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interpolation() {
        env::set_var("TEST_VAR", "hello");
        let content = "value = \"${TEST_VAR}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"hello\"");
        env::remove_var("TEST_VAR");
    }

    #[test]
    fn test_env_interpolation_with_default() {
        let content = "value = \"${NONEXISTENT_VAR:-default_value}\"";
        let result = interpolate_env_vars(content);
        assert_eq!(result, "value = \"default_value\"");
    }

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(default_config_content()).expect("default config");
        assert_eq!(config.session.cookie_name, "sc_session");
        assert_eq!(config.session.ttl_days, 7);
        assert!(!config.session.secure_cookies);
    }
}

//! Value parsers for CLI arguments clap cannot check on its own.

use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::Environment;

const MAX_ROLLBACK_STEPS: u32 = 100;

/// Port in 1..=65535.
pub fn validate_port(raw: &str) -> Result<u16, String> {
    let port: u16 = raw
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535, got '{}'", raw))?;

    if port == 0 {
        return Err("Port 0 is not allowed".to_string());
    }
    Ok(port)
}

/// IP literal or hostname made of labels of letters, digits and hyphens.
pub fn validate_host_address(raw: &str) -> Result<String, String> {
    let host = raw.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host.to_string());
    }
    if host.len() > 253 {
        return Err("Host address is too long (maximum 253 characters)".to_string());
    }
    // All-numeric dotted names are malformed IPv4, not hostnames.
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format!("Invalid IPv4 address '{}'", host));
    }

    let valid_label = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    };
    if !host.split('.').all(valid_label) {
        return Err(format!("Invalid host address '{}'", host));
    }

    Ok(host.to_string())
}

/// Existing, readable regular file.
pub fn validate_config_file_path(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", raw));
    }
    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", raw));
    }
    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{}': {}", raw, e))
}

/// Between 1 and 100 migrations.
pub fn validate_rollback_steps(raw: &str) -> Result<u32, String> {
    let steps: u32 = raw
        .parse()
        .map_err(|_| format!("Rollback steps must be a positive number, got '{}'", raw))?;

    match steps {
        0 => Err("Rollback steps must be greater than 0".to_string()),
        s if s > MAX_ROLLBACK_STEPS => Err(format!(
            "Rollback steps cannot exceed {}",
            MAX_ROLLBACK_STEPS
        )),
        s => Ok(s),
    }
}

pub fn parse_environment(raw: &str) -> Result<Environment, String> {
    raw.parse().map_err(|e: crate::config::error::ConfigError| e.to_string())
}

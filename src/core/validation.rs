//! Validation utilities for CLI arguments and configuration values

use std::path::Path;

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a buffer capacity taken from a TOML integer
pub fn validate_capacity(value: i64) -> Result<usize, String> {
    if value <= 0 {
        return Err(format!(
            "Capacity must be greater than 0 (got {})",
            value
        ));
    }
    usize::try_from(value).map_err(|_| format!("Capacity {} is too large", value))
}

/// Validate an endpoint name: a plain file name, never a path
pub fn validate_endpoint_name(name: &str) -> Result<String, String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Endpoint name cannot be empty".to_string());
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed == "." || trimmed == ".." {
        return Err(format!(
            "Endpoint name '{}' must not contain path separators",
            trimmed
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate that an output directory exists and is a directory
pub fn validate_output_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Output directory does not exist: {}", path.display()));
    }
    if !path.is_dir() {
        return Err(format!("Output path is not a directory: {}", path.display()));
    }
    Ok(())
}

//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{PlacerConfig, QuarryConfig};
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "quarry.toml";

/// Loads and validates `<project_dir>/quarry.toml`.
pub fn load_config(project_dir: &Path) -> Result<QuarryConfig, ConfigError> {
    let content = std::fs::read_to_string(project_dir.join(CONFIG_FILE_NAME))?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<QuarryConfig, ConfigError> {
    let config: QuarryConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_placer(&config.placer)?;
    Ok(config)
}

fn validate_placer(placer: &PlacerConfig) -> Result<(), ConfigError> {
    let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

    if !placer.overlap_weight.is_finite() || placer.overlap_weight < 0.0 {
        return invalid(format!(
            "overlap_weight must be a non-negative number, got {}",
            placer.overlap_weight
        ));
    }
    for (blk_type, penalty) in &placer.legalization_penalty {
        if !penalty.is_finite() || *penalty < 0.0 {
            return invalid(format!(
                "legalization penalty for '{blk_type}' must be a non-negative number, got {penalty}"
            ));
        }
    }
    if !(placer.t_min > 0.0 && placer.t_min.is_finite()) {
        return invalid(format!("t_min must be positive, got {}", placer.t_min));
    }
    if !(placer.t_max > placer.t_min && placer.t_max.is_finite()) {
        return invalid(format!(
            "t_max ({}) must be greater than t_min ({})",
            placer.t_max, placer.t_min
        ));
    }
    if placer.steps_per_cluster == 0 {
        return invalid("steps_per_cluster must be at least 1".to_string());
    }
    Ok(())
}

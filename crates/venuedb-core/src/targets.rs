use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One venue page to scrape, as declared in the targets file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub url: String,
    /// Optional human label; the scraped name wins in the output.
    pub name: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TargetsFile {
    pub venues: Vec<TargetConfig>,
}

/// Load and validate the venue targets from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation
/// (duplicate or non-HTTP URLs).
pub fn load_targets(path: &Path) -> Result<TargetsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TargetsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let targets: TargetsFile = serde_yaml::from_str(&content)?;

    validate_targets(&targets)?;

    Ok(targets)
}

fn validate_targets(targets: &TargetsFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for target in &targets.venues {
        let url = target.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::TargetsFileInvalid(format!(
                "target URL \"{url}\" is not an http(s) URL"
            )));
        }
        if !seen.insert(url.to_ascii_lowercase()) {
            return Err(ConfigError::TargetsFileInvalid(format!(
                "duplicate target URL \"{url}\""
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "targets_test.rs"]
mod tests;

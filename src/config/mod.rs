//! Plugin configuration
//!
//! Everything machine-specific is injected here instead of being hard-coded
//! in policy logic: the worker cache directory, the optional chapter rule,
//! and the tag allow-list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NormError, NormResult};

/// Stream tag keys the normalized form is allowed to keep
pub const DEFAULT_ALLOWED_TAGS: [&str; 3] = ["language", "DURATION", "ENCODER"];

/// Configuration for the policy engine and its hooks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Directory the worker writes intermediate output into. Resolved by the
    /// host; when unset the host-provided output path is used as-is.
    pub cache_dir: Option<PathBuf>,

    /// Whether a non-empty chapter list queues the file for processing.
    /// The chapter rule was present in only some revisions of the upstream
    /// preset, so it stays configurable.
    pub chapters_trigger: bool,

    /// Tag keys that may remain on audio/video streams without counting as
    /// unwanted metadata. Key comparison is case-sensitive, matching how
    /// containers store them.
    pub allowed_tags: Vec<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            chapters_trigger: true,
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PluginConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> NormResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PluginConfig = toml::from_str(&content).map_err(|e| NormError::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> NormResult<()> {
        if let Some(dir) = &self.cache_dir {
            if !dir.is_absolute() {
                return Err(NormError::Config {
                    message: format!("cache_dir must be absolute: {}", dir.display()),
                });
            }
        }
        if self.allowed_tags.is_empty() {
            return Err(NormError::Config {
                message: "allowed_tags must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_normalized_form() {
        let config = PluginConfig::default();
        assert!(config.cache_dir.is_none());
        assert!(config.chapters_trigger);
        assert_eq!(config.allowed_tags, ["language", "DURATION", "ENCODER"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_toml() {
        let config: PluginConfig = toml::from_str(
            r#"
            cache_dir = "/var/cache/tvnorm"
            chapters_trigger = false
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_dir.as_deref(), Some(Path::new("/var/cache/tvnorm")));
        assert!(!config.chapters_trigger);
        // Unspecified fields keep their defaults
        assert_eq!(config.allowed_tags.len(), 3);
    }

    #[test]
    fn rejects_relative_cache_dir() {
        let config = PluginConfig {
            cache_dir: Some(PathBuf::from("cache")),
            ..PluginConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(NormError::Config { .. })
        ));
    }
}

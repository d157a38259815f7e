use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {message}")]
    Parse {
        field: String,
        value: String,
        message: String,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Resolver configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deepest path chain the resolver walks before giving up
    #[validate(range(
        min = 1,
        max = 1024,
        message = "Max path depth must be between 1 and 1024"
    ))]
    pub max_path_depth: usize,

    /// Reject treat steps that do not narrow to an entity subtype
    pub validate_treat_targets: bool,

    /// `env_logger` filter used by the inspector binary
    #[validate(length(min = 1, message = "Log filter cannot be empty"))]
    pub log_filter: String,

    /// Model definition (YAML or JSON) loaded by the inspector binary
    #[validate(length(min = 1, message = "Model path cannot be empty"))]
    pub model_path: Option<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_path_depth: 64,
            validate_treat_targets: false,
            log_filter: "info".to_string(),
            model_path: None,
        }
    }
}

impl ResolverConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            max_path_depth: parse_env_var("PATHMAP_MAX_PATH_DEPTH", "64")?,
            validate_treat_targets: parse_env_var("PATHMAP_VALIDATE_TREAT", "false")?,
            log_filter: env::var("PATHMAP_LOG").unwrap_or_else(|_| "info".to_string()),
            model_path: env::var("PATHMAP_MODEL").ok(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            max_path_depth: cli.max_path_depth,
            validate_treat_targets: cli.validate_treat_targets,
            log_filter: cli.log_filter,
            model_path: cli.model_path,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            message: e.to_string(),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content.clone(),
            message: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with another configuration (CLI overrides environment). A model
    /// path is only replaced when `other` names one.
    pub fn merge(&mut self, other: Self) {
        self.max_path_depth = other.max_path_depth;
        self.validate_treat_targets = other.validate_treat_targets;
        self.log_filter = other.log_filter;
        if other.model_path.is_some() {
            self.model_path = other.model_path;
        }
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub max_path_depth: usize,
    pub validate_treat_targets: bool,
    pub log_filter: String,
    pub model_path: Option<String>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e: T::Err| ConfigError::Parse {
        field: key.to_string(),
        message: e.to_string(),
        value,
    })
}

//! Configuration settings for ddbtbl-codegen

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::defaults;
use crate::error::{CodegenError, Result};

/// Main configuration struct for code generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path to the table definition file (YAML, JSON or TOML)
    #[serde(default)]
    pub definition_file: PathBuf,

    /// Tables to include (comma-separated, or "*" for all)
    #[serde(default = "default_include_tables")]
    pub include_tables: String,

    /// Tables to exclude (comma-separated)
    #[serde(default = "default_exclude_tables")]
    pub exclude_tables: String,

    /// Whether to generate accessor API files
    #[serde(default = "default_generate_api")]
    pub generate_api: bool,

    /// Whether to generate provisioning descriptor files
    #[serde(default = "default_generate_descriptors")]
    pub generate_descriptors: bool,

    /// Output directory for accessor API files
    #[serde(default = "default_output_api_dir")]
    pub output_api_dir: PathBuf,

    /// Output directory for provisioning descriptors
    #[serde(default = "default_output_descriptor_dir")]
    pub output_descriptor_dir: PathBuf,

    /// Dry run mode - preview without writing files
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG env var
    #[serde(default)]
    pub log_level: Option<String>,
}

// Default value functions for serde
fn default_include_tables() -> String {
    defaults::INCLUDE_TABLES.to_string()
}
fn default_exclude_tables() -> String {
    defaults::EXCLUDE_TABLES.to_string()
}
fn default_generate_api() -> bool {
    defaults::GENERATE_API
}
fn default_generate_descriptors() -> bool {
    defaults::GENERATE_DESCRIPTORS
}
fn default_output_api_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_API_DIR)
}
fn default_output_descriptor_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DESCRIPTOR_DIR)
}
fn default_dry_run() -> bool {
    defaults::DRY_RUN
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            definition_file: PathBuf::new(),
            include_tables: default_include_tables(),
            exclude_tables: default_exclude_tables(),
            generate_api: default_generate_api(),
            generate_descriptors: default_generate_descriptors(),
            output_api_dir: default_output_api_dir(),
            output_descriptor_dir: default_output_descriptor_dir(),
            dry_run: default_dry_run(),
            log_level: None,
        }
    }
}

impl CodegenConfig {
    /// Create a default config with the given definition file
    pub fn default_with_definitions(definition_file: PathBuf) -> Self {
        Self {
            definition_file,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: CodegenConfig = toml::from_str(&content).map_err(|e| {
            CodegenError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from config file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            // Try default locations
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // Override with environment variables (DDBTBL_CODEGEN_*)
        builder = builder.add_source(Environment::with_prefix(defaults::ENV_PREFIX).try_parsing(true));

        let config: CodegenConfig = builder.build()?.try_deserialize()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.definition_file.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "definition_file is required".into(),
            ));
        }

        if !self.definition_file.exists() {
            return Err(CodegenError::ValidationError(format!(
                "Definition file not found: {}",
                self.definition_file.display()
            )));
        }

        if !self.generate_api && !self.generate_descriptors {
            return Err(CodegenError::ValidationError(
                "nothing to generate: both generate_api and generate_descriptors are false".into(),
            ));
        }

        if self.generate_api && self.output_api_dir.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "output_api_dir is required when generate_api is true".into(),
            ));
        }

        if self.generate_descriptors && self.output_descriptor_dir.as_os_str().is_empty() {
            return Err(CodegenError::ValidationError(
                "output_descriptor_dir is required when generate_descriptors is true".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodegenConfig::default();
        assert_eq!(config.include_tables, "*");
        assert!(config.generate_api);
        assert!(config.generate_descriptors);
        assert!(!config.dry_run);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_validation_missing_definitions() {
        let config = CodegenConfig::default();
        assert!(config.validate().is_err());

        let config = CodegenConfig::default_with_definitions(PathBuf::from("/nonexistent.json"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_nothing_to_generate() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = CodegenConfig::default_with_definitions(file.path().to_path_buf());
        assert!(config.validate().is_ok());

        config.generate_api = false;
        config.generate_descriptors = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_with_log_level() {
        let toml_content = r#"
            definition_file = "tables.json"
            generate_descriptors = false
            log_level = "debug"
        "#;
        let config: CodegenConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.definition_file, PathBuf::from("tables.json"));
        assert!(!config.generate_descriptors);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codegen.toml");
        std::fs::write(
            &path,
            "definition_file = \"defs.toml\"\noutput_api_dir = \"out/api\"\n",
        )
        .unwrap();
        let config = CodegenConfig::load(Some(&path)).unwrap();
        assert_eq!(config.definition_file, PathBuf::from("defs.toml"));
        assert_eq!(config.output_api_dir, PathBuf::from("out/api"));
        assert_eq!(config.exclude_tables, "");
    }
}

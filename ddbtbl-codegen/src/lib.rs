//! ddbtbl-codegen: Generate typed table accessor APIs and provisioning descriptors
//!
//! This crate provides both a CLI tool and a library for compiling a set of
//! key-value table definitions (YAML, JSON or TOML) into:
//!
//! - A Rust accessor API per table, bound to the declared primary and
//!   secondary index shapes and running on the `ddbtbl` runtime
//! - A provisioning descriptor per table (attribute definitions, key schema,
//!   global secondary indexes, billing mode, stream specification)
//!
//! # Usage in build.rs (Recommended)
//!
//! Configure in your `Cargo.toml`:
//!
//! ```toml
//! [package.metadata.ddbtbl-codegen]
//! definition_file = "tables.json"
//! ```
//!
//! Then use a minimal `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     ddbtbl_codegen::generate_from_cargo_metadata()
//!         .expect("Failed to generate ddbtbl code");
//! }
//! ```
//!
//! Include the generated API in your crate:
//!
//! ```rust,ignore
//! mod api {
//!     include!(concat!(env!("OUT_DIR"), "/api/mod.rs"));
//! }
//! ```
//!
//! # Alternative: Programmatic Configuration
//!
//! ```rust,ignore
//! fn main() {
//!     ddbtbl_codegen::CodegenBuilder::new("tables.json")
//!         .output_dir("src/generated")
//!         .generate()
//!         .expect("Failed to generate ddbtbl code");
//!
//!     println!("cargo:rerun-if-changed=tables.json");
//! }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! ddbtbl-codegen --def tables.json --api-out ./api --descriptor-out ./descriptors
//! ```

pub mod codegen;
pub mod config;
pub mod error;
pub mod parser;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use codegen::{GenerationReport, UnitFailure};
pub use config::CodegenConfig;
pub use error::{CodegenError, Result};

/// Load and validate the definition file named by `config`.
pub fn load_and_validate(config: &CodegenConfig) -> Result<parser::ValidationReport> {
    info!("Loading table definitions: {:?}", config.definition_file);
    let raw = parser::load_definitions(&config.definition_file)?;
    let report = parser::validate(&raw);
    info!(
        "Found {} tables ({} rejected)",
        report.tables.len(),
        report.diagnostics.len()
    );
    for diagnostic in &report.diagnostics {
        warn!("Skipping table {}", diagnostic);
    }
    Ok(report)
}

/// Main entry point for code generation
pub fn generate(config: &CodegenConfig) -> Result<GenerationReport> {
    let validated = load_and_validate(config)?;

    let tables = filter_tables(
        validated.tables,
        &config.include_tables,
        &config.exclude_tables,
    );
    debug!(
        "After filtering: {} tables (include={}, exclude={})",
        tables.len(),
        config.include_tables,
        config.exclude_tables
    );

    let mut report = GenerationReport {
        tables: tables.iter().map(|t| t.name.clone()).collect(),
        diagnostics: validated.diagnostics,
        dry_run: config.dry_run,
        ..Default::default()
    };
    codegen::CodeGenerator::new(config).generate(&tables, &mut report)?;

    if report.failures.is_empty() {
        info!("Code generation complete");
    } else {
        warn!(
            "Code generation complete, {} units skipped",
            report.failures.len()
        );
    }
    Ok(report)
}

/// Filter tables based on include/exclude patterns
fn filter_tables(
    tables: Vec<parser::TableDef>,
    include: &str,
    exclude: &str,
) -> Vec<parser::TableDef> {
    let include_all = include.trim() == "*" || include.trim().is_empty();
    let include_set: HashSet<String> = if include_all {
        HashSet::new()
    } else {
        include.split(',').map(|s| s.trim().to_string()).collect()
    };
    let exclude_set: HashSet<String> = exclude
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    tables
        .into_iter()
        .filter(|t| {
            let name = &t.name;
            let included = include_all || include_set.contains(name);
            let excluded = exclude_set.contains(name);
            included && !excluded
        })
        .collect()
}

/// Builder pattern for easy configuration in build.rs
pub struct CodegenBuilder {
    config: CodegenConfig,
}

impl CodegenBuilder {
    /// Create a new builder with the given definition file
    pub fn new(definition_file: impl AsRef<Path>) -> Self {
        Self {
            config: CodegenConfig::default_with_definitions(
                definition_file.as_ref().to_path_buf(),
            ),
        }
    }

    /// Set the output directory for both accessor APIs and descriptors
    pub fn output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.config.output_api_dir = dir.join("api");
        self.config.output_descriptor_dir = dir.join("descriptors");
        self
    }

    /// Set the output directory for accessor APIs only
    pub fn output_api_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_api_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the output directory for descriptors only
    pub fn output_descriptor_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.output_descriptor_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set tables to include (comma-separated or array)
    pub fn include_tables(mut self, tables: &[&str]) -> Self {
        self.config.include_tables = tables.join(",");
        self
    }

    /// Set tables to exclude (comma-separated or array)
    pub fn exclude_tables(mut self, tables: &[&str]) -> Self {
        self.config.exclude_tables = tables.join(",");
        self
    }

    /// Generate only accessor APIs, no descriptors
    pub fn api_only(mut self) -> Self {
        self.config.generate_descriptors = false;
        self
    }

    /// Generate only descriptors, no accessor APIs
    pub fn descriptors_only(mut self) -> Self {
        self.config.generate_api = false;
        self
    }

    /// Enable dry run mode (preview without writing files)
    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    /// Generate the code
    pub fn generate(self) -> Result<GenerationReport> {
        self.config.validate()?;
        generate(&self.config)
    }
}

/// Configuration for `[package.metadata.ddbtbl-codegen]` in Cargo.toml
#[derive(Debug, Clone, Default, serde::Deserialize)]
struct CargoMetadataConfig {
    /// Path to the table definition file (required)
    definition_file: Option<String>,

    /// Tables to include (optional, defaults to all)
    #[serde(default)]
    include_tables: Vec<String>,

    /// Tables to exclude (optional)
    #[serde(default)]
    exclude_tables: Vec<String>,

    /// Whether to generate accessor API files (default: true)
    generate_api: Option<bool>,

    /// Whether to generate descriptor files (default: true)
    generate_descriptors: Option<bool>,

    /// Output directory for generated accessor APIs
    output_api_dir: Option<String>,

    /// Output directory for generated descriptors
    output_descriptor_dir: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoToml {
    package: Option<CargoPackage>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackage {
    metadata: Option<CargoPackageMetadata>,
}

#[derive(Debug, serde::Deserialize)]
struct CargoPackageMetadata {
    #[serde(rename = "ddbtbl-codegen")]
    ddbtbl_codegen: Option<CargoMetadataConfig>,
}

/// Generate code from `[package.metadata.ddbtbl-codegen]` in Cargo.toml
///
/// This function reads configuration from the downstream project's Cargo.toml,
/// making build.rs minimal:
///
/// ```rust,ignore
/// // build.rs
/// fn main() {
///     ddbtbl_codegen::generate_from_cargo_metadata()
///         .expect("Failed to generate ddbtbl code");
/// }
/// ```
///
/// Configure in Cargo.toml:
///
/// ```toml
/// [package.metadata.ddbtbl-codegen]
/// definition_file = "tables.json"
/// include_tables = ["TUser", "TUserStageRanking"]
/// exclude_tables = ["TLegacy"]
/// ```
///
/// Output goes to `$OUT_DIR/api` and `$OUT_DIR/descriptors` unless
/// `output_api_dir` / `output_descriptor_dir` are set.
pub fn generate_from_cargo_metadata() -> Result<GenerationReport> {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").map_err(|_| {
        CodegenError::ConfigError(
            "CARGO_MANIFEST_DIR not set - are you running from build.rs?".into(),
        )
    })?;

    let cargo_toml_path = PathBuf::from(&manifest_dir).join("Cargo.toml");
    let cargo_toml_content = std::fs::read_to_string(&cargo_toml_path)?;

    let metadata_config = parse_cargo_metadata(&cargo_toml_content).map_err(|e| match e {
        CodegenError::ConfigError(msg) => {
            CodegenError::ConfigError(format!("{}: {}", cargo_toml_path.display(), msg))
        }
        other => other,
    })?;

    let definition_file = metadata_config.definition_file.ok_or_else(|| {
        CodegenError::ConfigError(
            "definition_file is required in [package.metadata.ddbtbl-codegen]".into(),
        )
    })?;

    // Resolve definition_file relative to manifest dir
    let definition_path = PathBuf::from(&manifest_dir).join(&definition_file);

    // Determine output directory (default to OUT_DIR)
    let out_dir = std::env::var("OUT_DIR").map(PathBuf::from).map_err(|_| {
        CodegenError::ConfigError("OUT_DIR not set - are you running from build.rs?".into())
    })?;

    let mut builder = CodegenBuilder::new(&definition_path);

    // Set output directories
    if let Some(api_dir) = metadata_config.output_api_dir {
        builder = builder.output_api_dir(PathBuf::from(&manifest_dir).join(api_dir));
    } else {
        builder = builder.output_api_dir(out_dir.join("api"));
    }

    if let Some(descriptor_dir) = metadata_config.output_descriptor_dir {
        builder =
            builder.output_descriptor_dir(PathBuf::from(&manifest_dir).join(descriptor_dir));
    } else {
        builder = builder.output_descriptor_dir(out_dir.join("descriptors"));
    }

    // Apply table filters
    if !metadata_config.include_tables.is_empty() {
        let tables: Vec<&str> = metadata_config
            .include_tables
            .iter()
            .map(|s| s.as_str())
            .collect();
        builder = builder.include_tables(&tables);
    }
    if !metadata_config.exclude_tables.is_empty() {
        let tables: Vec<&str> = metadata_config
            .exclude_tables
            .iter()
            .map(|s| s.as_str())
            .collect();
        builder = builder.exclude_tables(&tables);
    }

    // Apply generation options
    if let Some(false) = metadata_config.generate_api {
        builder = builder.descriptors_only();
    }
    if let Some(false) = metadata_config.generate_descriptors {
        builder = builder.api_only();
    }

    // Emit rerun-if-changed
    println!("cargo:rerun-if-changed={}", definition_path.display());
    println!("cargo:rerun-if-changed={}", cargo_toml_path.display());

    builder.generate()
}

fn parse_cargo_metadata(cargo_toml: &str) -> Result<CargoMetadataConfig> {
    let cargo_toml: CargoToml = toml::from_str(cargo_toml)
        .map_err(|e| CodegenError::ConfigError(format!("invalid Cargo.toml: {}", e)))?;

    cargo_toml
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.ddbtbl_codegen)
        .ok_or_else(|| {
            CodegenError::ConfigError(
                "Missing [package.metadata.ddbtbl-codegen] section in Cargo.toml".into(),
            )
        })
}

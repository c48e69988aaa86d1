//! Default configuration values - single source of truth

/// Default include tables pattern (all tables)
pub const INCLUDE_TABLES: &str = "*";

/// Default exclude tables pattern (none)
pub const EXCLUDE_TABLES: &str = "";

/// Whether to generate accessor API files by default
pub const GENERATE_API: bool = true;

/// Whether to generate provisioning descriptor files by default
pub const GENERATE_DESCRIPTORS: bool = true;

/// Default output directory for accessor API files
pub const OUTPUT_API_DIR: &str = "./generated/api";

/// Default output directory for provisioning descriptors
pub const OUTPUT_DESCRIPTOR_DIR: &str = "./generated/descriptors";

/// Default config file name looked up by `CodegenConfig::load`
pub const CONFIG_FILE: &str = "ddbtbl-codegen";

/// Prefix of environment variables overriding config values
pub const ENV_PREFIX: &str = "DDBTBL_CODEGEN";

/// Whether to run in dry-run mode by default
pub const DRY_RUN: bool = false;

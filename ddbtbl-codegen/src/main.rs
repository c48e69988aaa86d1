//! CLI entry point for ddbtbl-codegen

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ddbtbl_codegen::config::CodegenConfig;

#[derive(Parser)]
#[command(name = "ddbtbl-codegen")]
#[command(about = "Generate typed table accessor APIs and provisioning descriptors from table definitions")]
#[command(version)]
struct Cli {
    /// Path to configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to table definition file, YAML, JSON or TOML (overrides config)
    #[arg(short, long)]
    def: Option<PathBuf>,

    /// Accessor API output directory (overrides config, enables API output)
    #[arg(long)]
    api_out: Option<PathBuf>,

    /// Descriptor output directory (overrides config, enables descriptor output)
    #[arg(long)]
    descriptor_out: Option<PathBuf>,

    /// Dry run - show what would be generated without writing files
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate all (accessor APIs and descriptors)
    Generate,
    /// Generate only accessor APIs
    Api,
    /// Generate only provisioning descriptors
    Descriptors,
    /// Inspect definitions (show validated tables and rejected ones)
    Inspect,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we can use config.log_level)
    let mut config = if let Some(config_path) = &cli.config {
        CodegenConfig::from_file(config_path)?
    } else {
        CodegenConfig::load(None)?
    };

    // Initialize logging
    // Priority: RUST_LOG env var > config.log_level > default (debug for dev, info for release)
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };
    let log_level = config.log_level.as_deref().unwrap_or(default_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    // Apply CLI overrides. Naming only one output directory selects that output alone.
    if let Some(def) = cli.def {
        config.definition_file = def;
    }
    if cli.api_out.is_some() || cli.descriptor_out.is_some() {
        config.generate_api = cli.api_out.is_some();
        config.generate_descriptors = cli.descriptor_out.is_some();
    }
    if let Some(dir) = cli.api_out {
        config.output_api_dir = dir;
    }
    if let Some(dir) = cli.descriptor_out {
        config.output_descriptor_dir = dir;
    }
    if cli.dry_run {
        config.dry_run = true;
    }

    // Apply command-specific settings
    match &cli.command {
        Some(Commands::Api) => {
            config.generate_descriptors = false;
            config.generate_api = true;
        }
        Some(Commands::Descriptors) => {
            config.generate_api = false;
            config.generate_descriptors = true;
        }
        Some(Commands::Inspect) => {
            return inspect_definitions(&config);
        }
        _ => {}
    }

    // Validate configuration
    config.validate()?;

    // Generate code
    info!(
        "Generating code from definitions: {:?}",
        config.definition_file
    );
    let report = ddbtbl_codegen::generate(&config)?;

    if report.dry_run {
        println!("Dry run mode - would generate:");
        for path in &report.planned {
            println!("  {}", path.display());
        }
    }
    for diagnostic in &report.diagnostics {
        eprintln!("rejected {}", diagnostic);
    }
    for failure in &report.failures {
        eprintln!("skipped {}: {}", failure.unit.display(), failure.message);
    }

    info!(
        "Code generation completed: {} tables, {} files written, {} removed",
        report.tables.len(),
        report.written.len(),
        report.removed.len()
    );
    Ok(())
}

fn inspect_definitions(config: &CodegenConfig) -> Result<()> {
    let report = ddbtbl_codegen::load_and_validate(config)?;

    println!("Validated {} tables:\n", report.tables.len());
    for table in &report.tables {
        println!("Table: {}", table.name);
        println!("  Primary Index:");
        print_index(&table.primary_index);
        if !table.secondary_indexes.is_empty() {
            println!("  Secondary Indexes:");
            for secondary in &table.secondary_indexes {
                println!("    {}", secondary.name);
                print_index(&secondary.index);
            }
        }
        if table.stream_enabled {
            println!("  Stream: NEW_AND_OLD_IMAGES");
        }
        println!();
    }

    if !report.diagnostics.is_empty() {
        println!("Rejected {} tables:\n", report.diagnostics.len());
        for diagnostic in &report.diagnostics {
            println!("Table: {}", diagnostic.table);
            for problem in &diagnostic.problems {
                println!("    - {}", problem);
            }
        }
    }

    Ok(())
}

fn print_index(index: &ddbtbl_codegen::parser::IndexDef) {
    println!("      - pk: {} {}", index.pk.name, index.pk.attr_type);
    if let Some(sk) = &index.sk {
        println!("      - sk: {} {}", sk.name, sk.attr_type);
    }
}

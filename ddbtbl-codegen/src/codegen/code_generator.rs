//! Main code generator orchestrator

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::CodegenConfig;
use crate::error::Result;
use crate::parser::{Diagnostic, TableDef};

use super::api_generator::{generate_api_mod, generate_table_api};
use super::descriptor_generator::{build_descriptor, render_descriptor};
use super::gen_def::TableGenDef;
use super::render_unit;
use super::support_generator::{generate_support_source, SUPPORT_FILE};

/// File name of the module unit of the accessor API directory
pub const API_MOD_FILE: &str = "mod.rs";

/// A unit that could not be produced. The run went on without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitFailure {
    pub unit: PathBuf,
    pub message: String,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    /// Tables generated, after validation and filtering
    pub tables: Vec<String>,
    /// Rejected table definitions
    pub diagnostics: Vec<Diagnostic>,
    /// Every file the run meant to produce
    pub planned: Vec<PathBuf>,
    pub written: Vec<PathBuf>,
    /// Stale entries removed from the output directories
    pub removed: Vec<PathBuf>,
    pub failures: Vec<UnitFailure>,
    pub dry_run: bool,
}

impl GenerationReport {
    /// Check whether any definition was rejected or any unit failed
    pub fn has_problems(&self) -> bool {
        !self.diagnostics.is_empty() || !self.failures.is_empty()
    }
}

/// One output file: name within its directory and content.
struct Unit {
    file_name: String,
    content: String,
}

/// Main code generator that orchestrates accessor API and descriptor generation
pub struct CodeGenerator<'a> {
    config: &'a CodegenConfig,
}

impl<'a> CodeGenerator<'a> {
    /// Create a new code generator with the given configuration
    pub fn new(config: &'a CodegenConfig) -> Self {
        Self { config }
    }

    /// Generate every enabled output kind for the given tables
    pub fn generate(&self, tables: &[TableDef], report: &mut GenerationReport) -> Result<()> {
        if self.config.generate_api {
            self.generate_api(tables, report)?;
        }
        if self.config.generate_descriptors {
            self.generate_descriptors(tables, report)?;
        }
        Ok(())
    }

    /// Generate the accessor API directory
    pub fn generate_api(&self, tables: &[TableDef], report: &mut GenerationReport) -> Result<()> {
        let dir = &self.config.output_api_dir;
        info!("Generating accessor API in {:?}", dir);

        let mut units = Vec::new();
        let mut generated = Vec::new();
        let mut taken: HashSet<String> = [SUPPORT_FILE, API_MOD_FILE]
            .iter()
            .map(|s| s.to_string())
            .collect();

        match render_unit("support", &generate_support_source()) {
            Ok(content) => units.push(Unit {
                file_name: SUPPORT_FILE.to_string(),
                content,
            }),
            Err(e) => record_failure(report, dir.join(SUPPORT_FILE), e.to_string()),
        }

        for table in tables {
            let def = TableGenDef::new(table);
            let file_name = def.file_name();
            if !taken.insert(file_name.clone()) {
                record_failure(
                    report,
                    dir.join(&file_name),
                    format!(
                        "table {} maps to {} which another unit already uses",
                        table.name, file_name
                    ),
                );
                continue;
            }
            match render_unit(&table.name, &generate_table_api(&def)) {
                Ok(content) => {
                    units.push(Unit { file_name, content });
                    generated.push(def);
                }
                Err(e) => record_failure(report, dir.join(&file_name), e.to_string()),
            }
        }

        // mod.rs only declares units that exist
        match render_unit("mod", &generate_api_mod(&generated)) {
            Ok(content) => units.push(Unit {
                file_name: API_MOD_FILE.to_string(),
                content,
            }),
            Err(e) => record_failure(report, dir.join(API_MOD_FILE), e.to_string()),
        }

        self.reconcile(dir, units, report)
    }

    /// Generate the provisioning descriptor directory
    pub fn generate_descriptors(
        &self,
        tables: &[TableDef],
        report: &mut GenerationReport,
    ) -> Result<()> {
        let dir = &self.config.output_descriptor_dir;
        info!("Generating provisioning descriptors in {:?}", dir);

        let mut units = Vec::new();
        let mut taken: HashSet<String> = HashSet::new();
        for table in tables {
            let file_name = format!("{}.json", TableGenDef::new(table).names.snake);
            if !taken.insert(file_name.clone()) {
                record_failure(
                    report,
                    dir.join(&file_name),
                    format!(
                        "table {} maps to {} which another unit already uses",
                        table.name, file_name
                    ),
                );
                continue;
            }
            match render_descriptor(&build_descriptor(table)) {
                Ok(content) => units.push(Unit { file_name, content }),
                Err(e) => record_failure(report, dir.join(&file_name), e.to_string()),
            }
        }

        self.reconcile(dir, units, report)
    }

    /// Bring `dir` to exactly the given units: write each one, then remove
    /// every other entry. Directory-level failures abort the run; a single
    /// entry that cannot be written or removed is recorded and skipped.
    fn reconcile(&self, dir: &Path, units: Vec<Unit>, report: &mut GenerationReport) -> Result<()> {
        report
            .planned
            .extend(units.iter().map(|unit| dir.join(&unit.file_name)));

        if self.config.dry_run {
            for unit in &units {
                info!("Would write {}", dir.join(&unit.file_name).display());
            }
            return Ok(());
        }

        fs::create_dir_all(dir).map_err(|e| {
            error!("Cannot create output directory {}: {}", dir.display(), e);
            e
        })?;

        let mut desired: HashSet<OsString> = HashSet::new();
        for unit in units {
            let path = dir.join(&unit.file_name);
            match fs::write(&path, unit.content) {
                Ok(()) => {
                    debug!("Wrote {}", path.display());
                    desired.insert(OsString::from(unit.file_name));
                    report.written.push(path);
                }
                // Left out of `desired` so a stale copy does not survive
                Err(e) => record_failure(report, path, e.to_string()),
            }
        }

        let entries = fs::read_dir(dir).map_err(|e| {
            error!("Cannot list output directory {}: {}", dir.display(), e);
            e
        })?;
        for entry in entries {
            let entry = entry?;
            if desired.contains(&entry.file_name()) {
                continue;
            }
            let path = entry.path();
            let removed = match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => fs::remove_dir_all(&path),
                Ok(_) => fs::remove_file(&path),
                Err(e) => Err(e),
            };
            match removed {
                Ok(()) => {
                    debug!("Removed stale {}", path.display());
                    report.removed.push(path);
                }
                Err(e) => record_failure(report, path, e.to_string()),
            }
        }

        Ok(())
    }
}

fn record_failure(report: &mut GenerationReport, unit: PathBuf, message: String) {
    warn!("Skipping {}: {}", unit.display(), message);
    report.failures.push(UnitFailure { unit, message });
}

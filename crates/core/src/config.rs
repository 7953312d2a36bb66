//! Core runtime configuration.
//!
//! Everything here is resolved once at process startup and then passed into services, so
//! request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_FACILITY_DATA_FILE;
use crate::error::{TriageError, TriageResult};
use crate::rules::TriageRules;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    facility_data_file: PathBuf,
    triage_rules: Arc<TriageRules>,
}

impl CoreConfig {
    pub fn new(facility_data_file: PathBuf, triage_rules: Arc<TriageRules>) -> TriageResult<Self> {
        if !facility_data_file.is_file() {
            return Err(TriageError::InvalidInput(format!(
                "facility data file {} does not exist",
                facility_data_file.display()
            )));
        }

        Ok(Self {
            facility_data_file,
            triage_rules,
        })
    }

    pub fn facility_data_file(&self) -> &Path {
        &self.facility_data_file
    }

    pub fn triage_rules(&self) -> Arc<TriageRules> {
        Arc::clone(&self.triage_rules)
    }
}

/// Resolve the facility data file without reading environment variables.
///
/// If `override_file` is provided, it must be an existing file. Otherwise this looks for
/// `data/facilities.yaml` relative to the current working directory and then walks up from
/// `CARGO_MANIFEST_DIR`.
pub fn resolve_facility_data_file(override_file: Option<PathBuf>) -> TriageResult<PathBuf> {
    if let Some(file) = override_file {
        if file.is_file() {
            return Ok(file);
        }
        return Err(TriageError::InvalidInput(format!(
            "FACILITY_DATA_FILE override {} is not a file",
            file.display()
        )));
    }

    let cwd_relative = PathBuf::from(DEFAULT_FACILITY_DATA_FILE);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(DEFAULT_FACILITY_DATA_FILE);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(TriageError::InvalidInput(format!(
        "could not locate {DEFAULT_FACILITY_DATA_FILE}"
    )))
}

/// Build the rule set from an optional rules-file path.
///
/// If `value` is `None` or empty/whitespace, returns the built-in rules.
pub fn triage_rules_from_env_value(value: Option<String>) -> TriageResult<TriageRules> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(path) => TriageRules::load(Path::new(&path)),
        None => Ok(TriageRules::builtin()),
    }
}

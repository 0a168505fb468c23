//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading reconciler
//! settings and reference data from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ReconcileError, ReconcileResult};

use super::types::{ReconcilerConfig, ReferenceData};

/// Loads and provides access to reconciler configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── reconciler.yaml   # Engine settings (units per hour, claims clamp, rounding)
/// └── reference.yaml    # Staff, clients with POS hours, assignments
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_reconciler::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("{} clients loaded", loader.reference().clients.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: ReconcilerConfig,
    reference: ReferenceData,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Either file is missing
    /// - Either file contains invalid YAML
    /// - The settings or reference data fail validation
    pub fn load<P: AsRef<Path>>(path: P) -> ReconcileResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<ReconcilerConfig>(&path.join("reconciler.yaml"))?;
        settings.validate()?;

        let reference = Self::load_yaml::<ReferenceData>(&path.join("reference.yaml"))?;
        reference.validate()?;

        info!(
            path = %path.display(),
            staff = reference.staff.len(),
            clients = reference.clients.len(),
            assignments = reference.assignments.len(),
            "Loaded reconciler configuration"
        );

        Ok(Self {
            settings,
            reference,
        })
    }

    /// Builds a loader from values already in memory.
    pub fn from_parts(settings: ReconcilerConfig, reference: ReferenceData) -> ReconcileResult<Self> {
        settings.validate()?;
        reference.validate()?;
        Ok(Self {
            settings,
            reference,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> ReconcileResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ReconcileError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ReconcileError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &ReconcilerConfig {
        &self.settings
    }

    /// Returns the reference data.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }
}

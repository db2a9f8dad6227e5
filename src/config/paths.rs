//! Where billflow keeps its files
//!
//! ```text
//! <base>/config.json              settings
//! <base>/data/bills.json          bills, keyed by user
//! <base>/data/subscriptions.json  subscriptions, keyed by user
//! ```
//!
//! `<base>` is `BILLFLOW_DATA_DIR` when set, otherwise `billflow/` under the
//! platform config directory (`$XDG_CONFIG_HOME`, `~/.config`, or
//! `%APPDATA%` on Windows).

use std::path::{Path, PathBuf};

use crate::error::{BillflowError, BillflowResult};

/// Overrides the base directory
pub const DATA_DIR_ENV_VAR: &str = "BILLFLOW_DATA_DIR";

const APP_DIR: &str = "billflow";

#[derive(Debug, Clone)]
pub struct BillflowPaths {
    base_dir: PathBuf,
}

impl BillflowPaths {
    /// Resolve paths from the process environment
    pub fn new() -> BillflowResult<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// Resolve paths using `lookup` in place of environment variables
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> BillflowResult<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(custom) = non_empty(DATA_DIR_ENV_VAR) {
            return Ok(Self::with_base_dir(PathBuf::from(custom)));
        }

        let config_root = if cfg!(windows) {
            non_empty("APPDATA").map(PathBuf::from).ok_or_else(|| {
                BillflowError::Config("Could not determine APPDATA directory".into())
            })?
        } else {
            match non_empty("XDG_CONFIG_HOME") {
                Some(xdg) => PathBuf::from(xdg),
                None => non_empty("HOME")
                    .map(|home| PathBuf::from(home).join(".config"))
                    .ok_or_else(|| {
                        BillflowError::Config(format!(
                            "HOME is not set; set {} to choose a data directory",
                            DATA_DIR_ENV_VAR
                        ))
                    })?,
            }
        };

        Ok(Self::with_base_dir(config_root.join(APP_DIR)))
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn bills_file(&self) -> PathBuf {
        self.data_dir().join("bills.json")
    }

    pub fn subscriptions_file(&self) -> PathBuf {
        self.data_dir().join("subscriptions.json")
    }

    /// Create the base and data directories if missing
    pub fn ensure_directories(&self) -> BillflowResult<()> {
        std::fs::create_dir_all(self.data_dir()).map_err(|e| {
            BillflowError::Io(format!(
                "Failed to create data directory {}: {}",
                self.data_dir().display(),
                e
            ))
        })
    }

    /// `billflow init` has been run (the settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

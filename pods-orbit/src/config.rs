//! Configuration for the Orbit import pod
//!
//! Sources, highest priority first:
//! 1. Command-line flags
//! 2. Environment variables (`ORBIT_WORKSPACE`, `ORBIT_TOKEN`, ...)
//! 3. TOML file (`--config`, default `<config_dir>/pods/orbit.toml`)
//! 4. Built-in defaults
//!
//! Flags and environment are merged by clap; [`PodConfig::resolve`] layers
//! the result over the TOML file.

use crate::error::{ImportError, ImportResult};
use crate::import::{ImportOptions, DEFAULT_UPDATE_CONCURRENCY};
use crate::services::{OrbitClientConfig, DEFAULT_API_BASE};
use clap::Parser;
use pods_common::config::{default_database_path, first_of, load_toml_config, LoggingConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pod name, used for the default config file name
pub const POD_NAME: &str = "orbit";
pub const DEFAULT_VAULT: &str = "main";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "pods-orbit", about = "Import Orbit workspace members as people notes")]
pub struct CliArgs {
    /// Configuration file (TOML)
    #[arg(long, env = "PODS_ORBIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Orbit workspace slug
    #[arg(long, env = "ORBIT_WORKSPACE")]
    pub workspace: Option<String>,

    /// Orbit API token
    #[arg(long, env = "ORBIT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Vault to import into
    #[arg(long, env = "PODS_VAULT")]
    pub vault: Option<String>,

    /// Import a single member by id
    #[arg(long = "member")]
    pub member_id: Option<String>,

    /// Write every record to this node name instead of people.<name>
    #[arg(long)]
    pub dest_name: Option<String>,

    /// Overwrite every conflicting node without asking
    #[arg(long)]
    pub overwrite_all: bool,

    /// Pre-supplied conflict decisions, in queue order (overwrite, skip, skip-all or 1-3)
    #[arg(long, value_delimiter = ',')]
    pub decisions: Option<Vec<String>>,

    /// Note database path
    #[arg(long = "database", env = "PODS_DATABASE")]
    pub database_path: Option<PathBuf>,

    /// Orbit API base URL
    #[arg(long, env = "ORBIT_API_BASE")]
    pub api_base: Option<String>,
}

impl CliArgs {
    /// Config file to load: `--config` or the platform default
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| pods_common::config::default_config_path(POD_NAME))
    }
}

/// `[orbit]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrbitSection {
    pub workspace: Option<String>,
    pub token: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// `[import]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportSection {
    pub vault: Option<String>,
    pub dest_name: Option<String>,
    #[serde(default)]
    pub overwrite_all: bool,
    pub member_id: Option<String>,
    pub update_concurrency: Option<usize>,
    /// Scripted conflict decisions
    #[serde(default)]
    pub decisions: Vec<String>,
}

/// Bootstrap TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PodConfig {
    #[serde(default)]
    pub orbit: OrbitSection,
    #[serde(default)]
    pub import: ImportSection,
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: OrbitClientConfig,
    pub options: ImportOptions,
    pub database_path: PathBuf,
    /// Scripted decisions; `None` means ask on the terminal
    pub decisions: Option<Vec<String>>,
    pub logging: LoggingConfig,
}

impl PodConfig {
    /// Load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> ImportResult<Self> {
        load_toml_config(path).map_err(|e| ImportError::Config(e.to_string()))
    }

    /// Layer command-line/environment values over this file
    pub fn resolve(self, cli: &CliArgs) -> ImportResult<Settings> {
        let workspace = non_empty(first_of([cli.workspace.clone(), self.orbit.workspace]))
            .ok_or_else(|| {
                ImportError::Config(
                    "Orbit workspace not set (--workspace, ORBIT_WORKSPACE or [orbit] workspace)"
                        .to_string(),
                )
            })?;
        let token = non_empty(first_of([cli.token.clone(), self.orbit.token])).ok_or_else(|| {
            ImportError::Config(
                "Orbit token not set (--token, ORBIT_TOKEN or [orbit] token)".to_string(),
            )
        })?;

        let client = OrbitClientConfig {
            api_base: first_of([cli.api_base.clone(), self.orbit.api_base])
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            workspace,
            token,
            timeout: Duration::from_secs(self.orbit.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        };

        let update_concurrency = self
            .import
            .update_concurrency
            .unwrap_or(DEFAULT_UPDATE_CONCURRENCY);
        if update_concurrency == 0 {
            return Err(ImportError::Config(
                "[import] update_concurrency must be at least 1".to_string(),
            ));
        }

        let options = ImportOptions {
            vault: first_of([cli.vault.clone(), self.import.vault])
                .unwrap_or_else(|| DEFAULT_VAULT.to_string()),
            dest_name: first_of([cli.dest_name.clone(), self.import.dest_name]),
            overwrite_all: cli.overwrite_all || self.import.overwrite_all,
            member_id: first_of([cli.member_id.clone(), self.import.member_id]),
            update_concurrency,
        };

        let file_decisions = if self.import.decisions.is_empty() {
            None
        } else {
            Some(self.import.decisions)
        };

        Ok(Settings {
            client,
            options,
            database_path: first_of([cli.database_path.clone(), self.database_path])
                .unwrap_or_else(default_database_path),
            decisions: first_of([cli.decisions.clone(), file_decisions]),
            logging: self.logging,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

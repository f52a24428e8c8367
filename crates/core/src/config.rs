//! TOML-based configuration for mergedrs.
//!
//! Every component receives what it needs from an immutable [`AuditConfig`]
//! built once at startup. Secrets are never stored in the file: the SVN
//! password is referenced by environment variable name and resolved via
//! [`AuditConfig::resolve_env_vars`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::ConfigError;
use crate::models::CommitOrder;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration for one audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// SVN repository and binary settings.
    pub svn: SvnConfig,

    /// Report output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

// ---------------------------------------------------------------------------
// SVN
// ---------------------------------------------------------------------------

/// How to reach the repository being audited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvnConfig {
    /// Path to the `svn` binary. Default `svn`, resolved via `$PATH`.
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Repository root URL (e.g. `https://svn.example.com/repo`).
    pub url: String,

    /// Optional SVN username.
    #[serde(default)]
    pub username: Option<String>,

    /// Environment variable holding the SVN password.
    #[serde(default)]
    pub password_env: Option<String>,

    /// Seconds before a single `svn` invocation is abandoned (default 300).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Resolved password (populated by `resolve_env_vars`).
    #[serde(skip)]
    pub password: Option<String>,
}

fn default_executable() -> PathBuf {
    PathBuf::from("svn")
}
fn default_timeout() -> u64 {
    300
}

impl SvnConfig {
    /// Minimal config for `url` with every other field at its default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            executable: default_executable(),
            url: url.into(),
            username: None,
            password_env: None,
            timeout_secs: default_timeout(),
            password: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Where and how the report is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Directory receiving `merges<since>-<to>.txt` (default `mergedrs.out`).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Order of the `commits=` list.
    #[serde(default)]
    pub commit_order: CommitOrder,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("mergedrs.out")
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            commit_order: CommitOrder::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading & resolving
// ---------------------------------------------------------------------------

impl AuditConfig {
    /// Config for `url` with defaults everywhere else.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            svn: SvnConfig::new(url),
            report: ReportConfig::default(),
        }
    }

    /// Load an [`AuditConfig`] from a TOML file at the given path.
    ///
    /// This does **not** resolve environment variables -- call
    /// [`resolve_env_vars`](Self::resolve_env_vars) afterwards.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AuditConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Resolve `*_env` fields from the environment.
    ///
    /// A missing variable logs a warning and leaves the resolved field empty;
    /// svn then runs without a password.
    pub fn resolve_env_vars(&mut self) {
        if let Some(ref env_name) = self.svn.password_env {
            self.svn.password = resolve_optional_env(env_name, "svn.password_env");
        }
    }

    /// Validate that required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.svn.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "svn.url".into(),
                detail: "repository URL must not be empty".into(),
            });
        }
        if self.svn.executable.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "svn.executable".into(),
                detail: "executable must not be empty".into(),
            });
        }
        if self.svn.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "svn.timeout_secs".into(),
                detail: "timeout must be > 0".into(),
            });
        }
        if self.report.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "report.output_dir".into(),
                detail: "output directory must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Try to read an environment variable by name. Returns `Some(value)` on
/// success; logs a warning and returns `None` if the variable is unset.
fn resolve_optional_env(env_name: &str, field: &str) -> Option<String> {
    match std::env::var(env_name) {
        Ok(val) if !val.is_empty() => {
            debug!(field, env_name, "resolved env var");
            Some(val)
        }
        Ok(_) => {
            warn!(field, env_name, "env var is set but empty");
            None
        }
        Err(_) => {
            warn!(field, env_name, "env var not set");
            None
        }
    }
}

//! Asynchronous SVN CLI client.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use super::parser::parse_head_revision;
use crate::config::SvnConfig;
use crate::errors::SvnError;
use crate::models::Revision;

/// The three read-only queries the audit needs from a repository.
///
/// [`SvnClient`] shells out to `svn`; tests substitute in-memory fakes.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Latest revision number of the repository root.
    async fn head_revision(&self) -> Result<Revision, SvnError>;

    /// Raw change description (diff including property changes) of `revision`.
    async fn change_description(&self, revision: Revision) -> Result<String, SvnError>;

    /// Raw commit log of `path`, relative to the repository root.
    async fn path_log(&self, path: &str) -> Result<String, SvnError>;
}

/// Client for interacting with an SVN repository via the CLI.
#[derive(Debug, Clone)]
pub struct SvnClient {
    executable: PathBuf,
    url: String,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
}

impl SvnClient {
    /// Create a client from resolved SVN settings.
    pub fn new(config: &SvnConfig) -> Self {
        let client = Self {
            executable: config.executable.clone(),
            url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        };
        info!(
            url = %client.url,
            executable = %client.executable.display(),
            "created SvnClient"
        );
        client
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn run_svn(&self, args: &[&str]) -> Result<String, SvnError> {
        let mut cmd = Command::new(&self.executable);
        cmd.args(args)
            .arg("--non-interactive")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref username) = self.username {
            cmd.arg("--username").arg(username);
        }
        if let Some(ref password) = self.password {
            cmd.arg("--password").arg(password).arg("--no-auth-cache");
        }

        debug!(cmd = ?format!("{} {}", self.executable.display(), args.join(" ")), "running svn command");
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SvnError::BinaryNotFound(self.executable.display().to_string())
                } else {
                    SvnError::IoError(e)
                }
            })?,
            Err(_) => {
                let secs = self.timeout.as_secs();
                warn!(secs, "svn command timed out");
                return Err(SvnError::Timeout { secs });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(exit_code, %stderr, "svn command failed");
            return Err(SvnError::CommandFailed { exit_code, stderr });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl VersionControl for SvnClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn head_revision(&self) -> Result<Revision, SvnError> {
        let output = self
            .run_svn(&["info", "--show-item", "revision", &self.url])
            .await?;
        parse_head_revision(&output)
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn change_description(&self, revision: Revision) -> Result<String, SvnError> {
        let rev = revision.to_string();
        self.run_svn(&["diff", &self.url, "-c", &rev]).await
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn path_log(&self, path: &str) -> Result<String, SvnError> {
        let target = join_url(&self.url, path);
        self.run_svn(&["log", &target]).await
    }
}

/// Append a repository-relative `path` to the root `url`.
fn join_url(url: &str, path: &str) -> String {
    let root = url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{root}{path}")
    } else {
        format!("{root}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://svn.example.com/repo", "/branches/x"),
            "https://svn.example.com/repo/branches/x"
        );
        assert_eq!(
            join_url("https://svn.example.com/repo/", "branches/x"),
            "https://svn.example.com/repo/branches/x"
        );
    }

    #[test]
    fn test_client_construction() {
        let client = SvnClient::new(&SvnConfig::new("https://svn.example.com/repo/"));
        assert_eq!(client.url(), "https://svn.example.com/repo");
    }

    #[tokio::test]
    async fn test_missing_binary_is_query_failure() {
        let mut config = SvnConfig::new("file:///nonexistent/repo");
        config.executable = PathBuf::from("/nonexistent/bin/svn-mergedrs-test");
        let client = SvnClient::new(&config);

        let result = client.head_revision().await;
        assert!(matches!(result, Err(SvnError::BinaryNotFound(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_command_failed() {
        let mut config = SvnConfig::new("file:///nonexistent/repo");
        config.executable = PathBuf::from("false");
        let client = SvnClient::new(&config);

        let result = client.change_description(3).await;
        assert!(matches!(result, Err(SvnError::CommandFailed { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_command_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("slow-svn");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = SvnConfig::new("file:///srv/repo");
        config.executable = script;
        config.timeout_secs = 1;
        let client = SvnClient::new(&config);

        let started = std::time::Instant::now();
        let result = client.change_description(42).await;
        assert!(matches!(result, Err(SvnError::Timeout { secs: 1 })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned() {
        // `echo` prints its arguments, which stands in for svn output here.
        let mut config = SvnConfig::new("file:///srv/repo");
        config.executable = PathBuf::from("echo");
        let client = SvnClient::new(&config);

        let output = client.path_log("/branches/x").await.unwrap();
        assert!(output.contains("log file:///srv/repo/branches/x --non-interactive"));
    }
}

//! mergedrs command-line tool.
//!
//! Scans a Subversion revision range, finds revisions that merged another
//! branch, and writes `<output-dir>/merges<since>-<to>.txt` listing which
//! source-branch commits each merge actually absorbed.

mod style;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use mergedrs_core::config::AuditConfig;
use mergedrs_core::models::{CommitOrder, Revision, ScanRange};
use mergedrs_core::scanner::ScanProgress;
use mergedrs_core::svn::SvnClient;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Reconstruct merge provenance from a Subversion history.
#[derive(Parser, Debug)]
#[command(name = "mergedrs", version, about)]
struct Cli {
    /// Path to the svn executable (default: `svn` on $PATH).
    #[arg(short, long)]
    executable: Option<PathBuf>,

    /// Repository root URL.
    #[arg(short, long, required_unless_present = "config")]
    url: Option<String>,

    /// Inclusive revision range `<begin>-<end>` (default: 1 to HEAD).
    #[arg(short, long)]
    range: Option<ScanRange>,

    /// Directory receiving the report (default: mergedrs.out).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Optional TOML configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SVN username.
    #[arg(long)]
    username: Option<String>,

    /// Environment variable holding the SVN password.
    #[arg(long)]
    password_env: Option<String>,

    /// Seconds before a single svn invocation is abandoned.
    #[arg(long)]
    timeout: Option<u64>,

    /// List matched commits in reversed log order.
    #[arg(long)]
    reverse_commits: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", style::error(&format!("Error: {:#}", e)));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let range = cli.range;
    let config = build_config(cli)?;
    let client = SvnClient::new(&config.svn);

    let progress = SpinnerProgress::new();
    let result = mergedrs_core::run_audit(&client, &config, range, &progress).await;
    progress.finish();

    let outcome = result.context("merge audit failed")?;

    println!(
        "{}",
        style::success(&format!(
            "Report written to {}",
            outcome.report_path.display()
        ))
    );
    println!(
        "  {}",
        style::dim(&format!(
            "revisions {}: {} scanned, {} merges",
            outcome.range, outcome.stats.scanned, outcome.stats.merges
        ))
    );
    if outcome.stats.query_failures > 0 {
        println!(
            "  {}",
            style::warn(&format!(
                "{} svn queries failed; affected revisions were skipped or list no commits",
                outcome.stats.query_failures
            ))
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config helpers
// ---------------------------------------------------------------------------

/// Merge the optional config file with command-line overrides.
fn build_config(cli: Cli) -> Result<AuditConfig> {
    let mut config = match cli.config {
        Some(ref path) => {
            AuditConfig::load_from_file(path).context("failed to load configuration file")?
        }
        None => AuditConfig::for_url(cli.url.clone().unwrap_or_default()),
    };

    if let Some(url) = cli.url {
        config.svn.url = url;
    }
    if let Some(executable) = cli.executable {
        config.svn.executable = executable;
    }
    if let Some(username) = cli.username {
        config.svn.username = Some(username);
    }
    if let Some(password_env) = cli.password_env {
        config.svn.password_env = Some(password_env);
    }
    if let Some(timeout) = cli.timeout {
        config.svn.timeout_secs = timeout;
    }
    if let Some(output_dir) = cli.output_dir {
        config.report.output_dir = output_dir;
    }
    if cli.reverse_commits {
        config.report.commit_order = CommitOrder::Reversed;
    }

    config.resolve_env_vars();
    config.validate().context("invalid configuration")?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Shows "trying N..." on a spinner while the scan runs.
struct SpinnerProgress {
    spinner: ProgressBar,
}

impl SpinnerProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.set_message("resolving revision range...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ScanProgress for SpinnerProgress {
    fn on_revision(&self, revision: Revision) {
        self.spinner.set_message(format!("trying {}...", revision));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_full_flag_set() {
        let cli = Cli::try_parse_from([
            "mergedrs",
            "-e",
            "/usr/local/bin/svn",
            "-u",
            "https://svn.example.com/repo",
            "-r",
            "100-200",
            "--reverse-commits",
        ])
        .unwrap();
        assert_eq!(cli.range, Some(ScanRange::new(100, 200).unwrap()));
        assert_eq!(cli.executable, Some(PathBuf::from("/usr/local/bin/svn")));

        let config = build_config(cli).unwrap();
        assert_eq!(config.svn.url, "https://svn.example.com/repo");
        assert_eq!(config.report.commit_order, CommitOrder::Reversed);
        assert_eq!(config.report.output_dir, PathBuf::from("mergedrs.out"));
    }

    #[test]
    fn test_cli_requires_url() {
        assert!(Cli::try_parse_from(["mergedrs"]).is_err());
    }

    #[test]
    fn test_cli_rejects_bad_range() {
        assert!(Cli::try_parse_from(["mergedrs", "-u", "file:///r", "-r", "20-10"]).is_err());
        assert!(Cli::try_parse_from(["mergedrs", "-u", "file:///r", "-r", "abc"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mergedrs.toml");
        std::fs::write(
            &path,
            "[svn]\nurl = \"file:///from/file\"\ntimeout_secs = 10\n\n[report]\noutput_dir = \"reports\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "mergedrs",
            "-c",
            path.to_str().unwrap(),
            "--timeout",
            "99",
        ])
        .unwrap();
        let config = build_config(cli).unwrap();
        assert_eq!(config.svn.url, "file:///from/file");
        assert_eq!(config.svn.timeout_secs, 99);
        assert_eq!(config.report.output_dir, PathBuf::from("reports"));
    }
}

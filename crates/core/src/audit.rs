//! One complete audit run: resolve the range, scan, write the report.

use std::path::PathBuf;

use tracing::info;

use crate::config::AuditConfig;
use crate::errors::CoreError;
use crate::models::ScanRange;
use crate::report::{report_path, ReportWriter};
use crate::scanner::{RevisionScanner, ScanProgress, ScanStats};
use crate::svn::VersionControl;

/// Summary of a finished audit.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub range: ScanRange,
    pub report_path: PathBuf,
    pub stats: ScanStats,
}

/// Use `explicit` when given, otherwise scan `1..=head`.
///
/// A failed head query is fatal: without it no range can be formed. A head of
/// 0 yields the empty range `1-0`.
pub async fn resolve_range<V: VersionControl + ?Sized>(
    vcs: &V,
    explicit: Option<ScanRange>,
) -> Result<ScanRange, CoreError> {
    if let Some(range) = explicit {
        return Ok(range);
    }
    let head = vcs.head_revision().await?;
    info!(head, "resolved head revision");
    Ok(ScanRange::up_to_head(head))
}

/// Run the audit described by `config`.
///
/// The range is resolved before anything touches the filesystem, so a failed
/// head query leaves no output directory behind.
pub async fn run_audit<V: VersionControl + ?Sized>(
    vcs: &V,
    config: &AuditConfig,
    explicit: Option<ScanRange>,
    progress: &dyn ScanProgress,
) -> Result<AuditOutcome, CoreError> {
    let range = resolve_range(vcs, explicit).await?;
    let path = report_path(&config.report.output_dir, range);

    let mut writer = ReportWriter::create(&path)?;
    let scanner = RevisionScanner::new(vcs, config.report.commit_order);
    let mut scan = scanner.scan(range, progress);
    writer.write_scan(&mut scan).await?;
    writer.finish()?;

    let stats = scan.stats();
    info!(
        %range,
        scanned = stats.scanned,
        merges = stats.merges,
        query_failures = stats.query_failures,
        path = %path.display(),
        "audit complete"
    );
    Ok(AuditOutcome {
        range,
        report_path: path,
        stats,
    })
}

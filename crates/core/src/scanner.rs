//! Drives the scan over a revision range.
//!
//! [`RevisionScanner::scan`] returns a lazy [`Scan`] cursor: each call to
//! [`Scan::next_record`] queries the repository only as far as the next
//! merge-bearing revision. Revisions are visited strictly in ascending order
//! and each one exactly once.

use tracing::{debug, info, warn};

use crate::models::{CommitOrder, ReportRecord, Revision, ScanRange};
use crate::resolver::BranchHistoryResolver;
use crate::svn::{parse_merge_declaration, VersionControl};

/// Receives a notice before each revision is examined.
pub trait ScanProgress: Send + Sync {
    fn on_revision(&self, revision: Revision);
}

/// Progress sink that discards notices.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn on_revision(&self, _revision: Revision) {}
}

/// Counters collected while scanning.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// Revisions examined so far.
    pub scanned: u64,
    /// Records emitted.
    pub merges: u64,
    /// Per-revision queries that failed and were skipped or left empty.
    pub query_failures: u64,
}

/// Builds [`Scan`] cursors against one repository.
pub struct RevisionScanner<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    order: CommitOrder,
}

impl<'a, V: VersionControl + ?Sized> RevisionScanner<'a, V> {
    pub fn new(vcs: &'a V, order: CommitOrder) -> Self {
        Self { vcs, order }
    }

    /// Start a single pass over `range`.
    pub fn scan(&self, range: ScanRange, progress: &'a dyn ScanProgress) -> Scan<'a, V> {
        info!(%range, "starting revision scan");
        Scan {
            vcs: self.vcs,
            resolver: BranchHistoryResolver::new(self.vcs, self.order),
            progress,
            cursor: (range.since <= range.to).then_some(range.since),
            to: range.to,
            stats: ScanStats::default(),
        }
    }
}

/// A single, non-restartable pass over a [`ScanRange`].
pub struct Scan<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    resolver: BranchHistoryResolver<'a, V>,
    progress: &'a dyn ScanProgress,
    /// Next revision to examine; `None` once the range is exhausted.
    cursor: Option<Revision>,
    to: Revision,
    stats: ScanStats,
}

impl<'a, V: VersionControl + ?Sized> Scan<'a, V> {
    /// Advance to the next revision carrying a merge declaration.
    ///
    /// Returns `None` after the last revision of the range, and on every call
    /// thereafter.
    pub async fn next_record(&mut self) -> Option<ReportRecord> {
        while let Some(revision) = self.cursor {
            self.cursor = (revision < self.to).then(|| revision + 1);
            self.stats.scanned += 1;
            self.progress.on_revision(revision);

            if let Some(record) = self.examine(revision).await {
                self.stats.merges += 1;
                return Some(record);
            }
        }
        None
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    async fn examine(&mut self, revision: Revision) -> Option<ReportRecord> {
        let description = match self.vcs.change_description(revision).await {
            Ok(text) => text,
            Err(e) => {
                warn!(revision, error = %e, "could not fetch change description, skipping");
                self.stats.query_failures += 1;
                return None;
            }
        };

        let merge_info = parse_merge_declaration(&description)?;
        let matched_commits = match self.resolver.resolve(&merge_info).await {
            Some(commits) => commits,
            None => {
                self.stats.query_failures += 1;
                Vec::new()
            }
        };

        debug!(revision, path = %merge_info.source_path, "merge detected");
        Some(ReportRecord {
            revision,
            merge_info,
            matched_commits,
        })
    }
}

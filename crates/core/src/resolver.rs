//! Cross-references a merge declaration against the source path's history.
//!
//! A declared range such as `r10-15` is only a claim: revisions 11, 13 and
//! 14 may have touched unrelated paths. Only revisions that also appear in
//! the source path's own log count as matched commits.

use tracing::{debug, warn};

use crate::models::{CommitOrder, MatchedCommits, MergeInfo, Revision};
use crate::svn::{parse_log_revisions, VersionControl};

/// Resolves [`MergeInfo`] ranges into the commits that actually exist on the
/// source path.
pub struct BranchHistoryResolver<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    order: CommitOrder,
}

impl<'a, V: VersionControl + ?Sized> BranchHistoryResolver<'a, V> {
    pub fn new(vcs: &'a V, order: CommitOrder) -> Self {
        Self { vcs, order }
    }

    /// Return the source path's revisions inside the declared bounds, or
    /// `None` when the path log could not be fetched.
    pub async fn resolve(&self, info: &MergeInfo) -> Option<MatchedCommits> {
        let log = match self.vcs.path_log(&info.source_path).await {
            Ok(log) => log,
            Err(e) => {
                warn!(path = %info.source_path, error = %e, "could not fetch path log");
                return None;
            }
        };

        let matched = filter_commits(&parse_log_revisions(&log), info, self.order);
        debug!(
            path = %info.source_path,
            begin = info.revision_begin,
            end = info.revision_end,
            matched = matched.len(),
            "resolved merged commits"
        );
        Some(matched)
    }
}

/// Keep the revisions inside `info`'s bounds, in the requested order.
pub fn filter_commits(
    log_revisions: &[Revision],
    info: &MergeInfo,
    order: CommitOrder,
) -> MatchedCommits {
    let mut matched: MatchedCommits = log_revisions
        .iter()
        .copied()
        .filter(|&rev| info.contains(rev))
        .collect();
    if order == CommitOrder::Reversed {
        matched.reverse();
    }
    matched
}

//! Data types shared across the scan pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// A globally ordered repository revision number.
pub type Revision = u64;

/// Revisions of a source path that a merge actually absorbed, in the order
/// selected by [`CommitOrder`].
pub type MatchedCommits = Vec<Revision>;

/// A merge declaration extracted from a revision's change description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInfo {
    /// Branch path that was merged, relative to the repository root.
    pub source_path: String,
    /// First declared revision (inclusive).
    pub revision_begin: Revision,
    /// Last declared revision (inclusive).
    pub revision_end: Revision,
}

impl MergeInfo {
    /// Whether `rev` falls inside the declared bounds. An inverted range
    /// contains nothing.
    pub fn contains(&self, rev: Revision) -> bool {
        self.revision_begin <= rev && rev <= self.revision_end
    }
}

/// One report line: a merge-bearing revision and what it absorbed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    pub revision: Revision,
    pub merge_info: MergeInfo,
    pub matched_commits: MatchedCommits,
}

/// Order in which matched commits are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitOrder {
    /// Keep the order the path log returned them in.
    #[default]
    Native,
    /// Reverse the path log order.
    Reversed,
}

/// Inclusive range of revisions to scan.
///
/// Explicit ranges always satisfy `since <= to`; only
/// [`up_to_head`](Self::up_to_head) on an empty repository yields `1-0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub since: Revision,
    pub to: Revision,
}

impl ScanRange {
    /// Build a range, rejecting `since > to`.
    pub fn new(since: Revision, to: Revision) -> Result<Self, ConfigError> {
        if since > to {
            return Err(ConfigError::InvalidRange {
                input: format!("{since}-{to}"),
                detail: "begin is greater than end".into(),
            });
        }
        Ok(Self { since, to })
    }

    /// `1..=head`, which covers nothing when the repository has no
    /// revisions yet.
    pub fn up_to_head(head: Revision) -> Self {
        Self { since: 1, to: head }
    }

    /// Number of revisions covered, saturating at `u64::MAX`.
    pub fn revision_count(&self) -> u64 {
        if self.since > self.to {
            return 0;
        }
        (self.to - self.since).saturating_add(1)
    }
}

impl fmt::Display for ScanRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.since, self.to)
    }
}

impl FromStr for ScanRange {
    type Err = ConfigError;

    /// Parse `<begin>-<end>`, e.g. `1-40`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |detail: &str| ConfigError::InvalidRange {
            input: s.to_string(),
            detail: detail.to_string(),
        };

        let (begin, end) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected <begin>-<end>"))?;
        let since = begin
            .trim()
            .parse::<Revision>()
            .map_err(|_| invalid("begin is not a revision number"))?;
        let to = end
            .trim()
            .parse::<Revision>()
            .map_err(|_| invalid("end is not a revision number"))?;

        if since > to {
            return Err(invalid("begin is greater than end"));
        }
        Ok(Self { since, to })
    }
}

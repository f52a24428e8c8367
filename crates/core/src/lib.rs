//! mergedrs core library.
//!
//! Reconstructs merge provenance from a Subversion history: for each
//! revision in a range it detects a merge declaration, cross-references the
//! declared range against the source path's real log, and writes one report
//! line per merge.

pub mod audit;
pub mod config;
pub mod errors;
pub mod models;
pub mod report;
pub mod resolver;
pub mod scanner;
pub mod svn;

// Re-exports for convenience.
pub use audit::{run_audit, AuditOutcome};
pub use config::AuditConfig;
pub use errors::CoreError;
pub use models::{CommitOrder, MergeInfo, ReportRecord, Revision, ScanRange};
pub use svn::{SvnClient, VersionControl};

//! Parsers for `svn` text output.
//!
//! Pattern grammar:
//!
//! ```text
//! merge declaration  :=  "Merged " <source-path> ":r" <digits> "-" ["r"] <digits>
//! log entry header   :=  ^ "r" <digits> " |"
//! ```
//!
//! `Merged ` is case-sensitive, so `Reverse-merged` lines never match. The
//! source path extends to the last `:r` on the line.

use std::sync::OnceLock;

use regex_lite::Regex;
use tracing::debug;

use crate::errors::SvnError;
use crate::models::{MergeInfo, Revision};

fn merge_declaration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Merged (.*):r(\d+)-r?(\d+)").expect("merge declaration pattern is valid")
    })
}

fn log_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^r(\d+) \|").expect("log entry pattern is valid"))
}

/// Parse the output of `svn info --show-item revision`.
pub fn parse_head_revision(output: &str) -> Result<Revision, SvnError> {
    let trimmed = output.trim();
    trimmed
        .parse::<Revision>()
        .map_err(|_| SvnError::UnexpectedOutput(format!("not a revision number: {trimmed:?}")))
}

/// Extract the first merge declaration from a change description.
///
/// Returns `None` when the revision declares no merge, which is the common
/// case.
pub fn parse_merge_declaration(text: &str) -> Option<MergeInfo> {
    let caps = merge_declaration_re().captures(text)?;
    let source_path = caps.get(1)?.as_str().to_string();
    let revision_begin = caps.get(2)?.as_str().parse::<Revision>().ok()?;
    let revision_end = caps.get(3)?.as_str().parse::<Revision>().ok()?;

    let info = MergeInfo {
        source_path,
        revision_begin,
        revision_end,
    };
    debug!(?info, "found merge declaration");
    Some(info)
}

/// Extract every revision number from `svn log` output, in log order.
pub fn parse_log_revisions(log: &str) -> Vec<Revision> {
    let revisions: Vec<Revision> = log
        .lines()
        .filter_map(|line| log_entry_re().captures(line))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<Revision>().ok())
        .collect();
    debug!(count = revisions.len(), "parsed svn log revisions");
    revisions
}

#[cfg(test)]
mod tests {
    use super::*;

    const MERGE_DIFF: &str = "\
Index: .
===================================================================
--- .\t(revision 41)
+++ .\t(revision 42)

Property changes on: .
___________________________________________________________________
Modified: svn:mergeinfo
## -0,0 +0,1 ##
   Merged /branches/feature-x:r10-15
Index: src/lib.c
===================================================================
--- src/lib.c\t(revision 41)
+++ src/lib.c\t(revision 42)
@@ -1 +1 @@
-old
+new
";

    const SAMPLE_LOG: &str = "\
------------------------------------------------------------------------
r16 | bob | 2024-03-02 10:00:00 +0000 (Sat, 02 Mar 2024) | 1 line

late fix
------------------------------------------------------------------------
r15 | alice | 2024-03-01 09:00:00 +0000 (Fri, 01 Mar 2024) | 2 lines

see r3 | not an entry
------------------------------------------------------------------------
r12 | alice | 2024-02-28 09:00:00 +0000 (Wed, 28 Feb 2024) | 1 line

tweak
------------------------------------------------------------------------
r10 | alice | 2024-02-27 09:00:00 +0000 (Tue, 27 Feb 2024) | 1 line

Create branch
------------------------------------------------------------------------
";

    #[test]
    fn test_parse_head_revision() {
        assert_eq!(parse_head_revision("1234\n").unwrap(), 1234);
        assert_eq!(parse_head_revision("  7  ").unwrap(), 7);
    }

    #[test]
    fn test_parse_head_revision_garbage() {
        let result = parse_head_revision("svn: E170013: Unable to connect");
        assert!(matches!(result, Err(SvnError::UnexpectedOutput(_))));
        assert!(parse_head_revision("").is_err());
    }

    #[test]
    fn test_parse_merge_declaration_from_diff() {
        let info = parse_merge_declaration(MERGE_DIFF).unwrap();
        assert_eq!(info.source_path, "/branches/feature-x");
        assert_eq!(info.revision_begin, 10);
        assert_eq!(info.revision_end, 15);
    }

    #[test]
    fn test_parse_merge_declaration_prefixed_end() {
        let info = parse_merge_declaration("Merged /branches/x:r10-r15").unwrap();
        assert_eq!(
            info,
            MergeInfo {
                source_path: "/branches/x".into(),
                revision_begin: 10,
                revision_end: 15,
            }
        );
    }

    #[test]
    fn test_parse_merge_declaration_absent() {
        assert!(parse_merge_declaration("Index: foo.c\n+hello\n").is_none());
        assert!(parse_merge_declaration("").is_none());
    }

    #[test]
    fn test_parse_merge_declaration_ignores_reverse_merge() {
        assert!(parse_merge_declaration("   Reverse-merged /branches/x:r10-15").is_none());
    }

    #[test]
    fn test_parse_merge_declaration_single_revision_not_matched() {
        assert!(parse_merge_declaration("   Merged /branches/x:r12").is_none());
    }

    #[test]
    fn test_parse_merge_declaration_first_match_wins() {
        let text = "   Merged /branches/a:r1-2\n   Merged /branches/b:r3-4\n";
        let info = parse_merge_declaration(text).unwrap();
        assert_eq!(info.source_path, "/branches/a");
        assert_eq!(info.revision_end, 2);
    }

    #[test]
    fn test_parse_merge_declaration_keeps_inverted_range() {
        let info = parse_merge_declaration("Merged /branches/x:r20-5").unwrap();
        assert_eq!(info.revision_begin, 20);
        assert_eq!(info.revision_end, 5);
    }

    #[test]
    fn test_parse_merge_declaration_overflow() {
        assert!(parse_merge_declaration("Merged /x:r1-99999999999999999999999").is_none());
    }

    #[test]
    fn test_parse_log_revisions() {
        assert_eq!(parse_log_revisions(SAMPLE_LOG), vec![16, 15, 12, 10]);
    }

    #[test]
    fn test_parse_log_revisions_empty() {
        assert!(parse_log_revisions("").is_empty());
        assert!(parse_log_revisions("----------\n").is_empty());
    }

    #[test]
    fn test_parse_log_revisions_requires_line_start() {
        assert!(parse_log_revisions(" r5 | indented\nxr6 | prefixed\n").is_empty());
    }
}

//! Flat text report, one line per merge-bearing revision.
//!
//! ```text
//! 42 path="/branches/x" revbegin=10 revend=15 commits=10,12,15
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::ReportError;
use crate::models::{ReportRecord, ScanRange};
use crate::scanner::Scan;
use crate::svn::VersionControl;

/// File name of the report for `range`, e.g. `merges1-40.txt`.
pub fn report_file_name(range: ScanRange) -> String {
    format!("merges{}-{}.txt", range.since, range.to)
}

/// Render one report line, including the trailing newline.
pub fn format_record(record: &ReportRecord) -> String {
    let commits = record
        .matched_commits
        .iter()
        .map(|rev| rev.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{} path=\"{}\" revbegin={} revend={} commits={}\n",
        record.revision,
        record.merge_info.source_path,
        record.merge_info.revision_begin,
        record.merge_info.revision_end,
        commits
    )
}

/// Writes report lines in the order records are received.
///
/// The underlying file is released when the writer is dropped, including on
/// an early return after a failed write; [`finish`](Self::finish) flushes
/// explicitly and reports flush errors.
pub struct ReportWriter<W: Write> {
    out: W,
    lines: u64,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (or truncate) the report at `path`, creating its directory if
    /// needed.
    pub fn create(path: &Path) -> Result<Self, ReportError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ReportError::CreateDir {
                path: dir.display().to_string(),
                source,
            })?;
        }
        let file = File::create(path).map_err(|source| ReportError::Open {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "opened report file");
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Append one record.
    pub fn write_record(&mut self, record: &ReportRecord) -> Result<(), ReportError> {
        self.out.write_all(format_record(record).as_bytes())?;
        self.lines += 1;
        debug!(revision = record.revision, "wrote report line");
        Ok(())
    }

    /// Drain `scan`, writing each record as it is produced.
    pub async fn write_scan<V: VersionControl + ?Sized>(
        &mut self,
        scan: &mut Scan<'_, V>,
    ) -> Result<u64, ReportError> {
        let before = self.lines;
        while let Some(record) = scan.next_record().await {
            self.write_record(&record)?;
        }
        Ok(self.lines - before)
    }

    /// Lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(mut self) -> Result<W, ReportError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Where the report for `range` lands inside `output_dir`.
pub fn report_path(output_dir: &Path, range: ScanRange) -> PathBuf {
    output_dir.join(report_file_name(range))
}

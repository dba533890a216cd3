//! Writes the CSV report and renames invoice files.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::ReportError;
use crate::models::config::ReportConfig;
use crate::models::record::{FieldName, InvoiceRecord};

/// Report column order.
pub const REPORT_HEADER: [FieldName; 3] = [FieldName::ShipTo, FieldName::InvoiceNumber, FieldName::Total];

/// Result of a single rename.
#[derive(Debug)]
pub enum RenameStatus {
    /// The file now has its new name.
    Renamed,
    /// The new name equals the old one; nothing was done.
    Unchanged,
    /// The rename call failed.
    Failed(std::io::Error),
}

/// One rename attempt, with its position in the batch.
#[derive(Debug)]
pub struct RenameOutcome {
    /// 0-based index.
    pub index: usize,
    pub total: usize,
    pub from: String,
    pub to: String,
    pub status: RenameStatus,
}

/// Counts over a rename batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Emits records as a report and applies their new file names.
pub struct ReportAssembler {
    file_name: String,
}

impl ReportAssembler {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.file_name.clone())
    }

    /// Path of the report inside `dir`.
    pub fn report_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }

    /// Write header and rows, in record order, to any writer.
    pub fn write_to<W: Write>(&self, records: &[InvoiceRecord], writer: W) -> Result<(), ReportError> {
        let mut wtr = csv::Writer::from_writer(writer);

        wtr.write_record(REPORT_HEADER.iter().map(|f| f.column()))?;
        for record in records {
            wtr.write_record(record.row())?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Rewrite the report file in `dir` from scratch.
    pub fn write(&self, dir: &Path, records: &[InvoiceRecord]) -> Result<PathBuf, ReportError> {
        let path = self.report_path(dir);
        let file = File::create(&path)?;
        self.write_to(records, file)?;
        debug!("Wrote {} rows to {}", records.len(), path.display());
        Ok(path)
    }

    /// Rename each record's file from its original to its new name.
    ///
    /// Failures are reported through `on_rename` and counted; they never
    /// stop the batch.
    pub fn rename_all<F>(&self, dir: &Path, records: &[InvoiceRecord], mut on_rename: F) -> RenameSummary
    where
        F: FnMut(&RenameOutcome),
    {
        let total = records.len();
        let mut summary = RenameSummary::default();

        for (index, record) in records.iter().enumerate() {
            let status = if !record.needs_rename() {
                summary.unchanged += 1;
                RenameStatus::Unchanged
            } else {
                match fs::rename(
                    dir.join(&record.original_file_name),
                    dir.join(&record.new_file_name),
                ) {
                    Ok(()) => {
                        summary.renamed += 1;
                        RenameStatus::Renamed
                    }
                    Err(e) => {
                        warn!(
                            "Failed to rename {} to {}: {}",
                            record.original_file_name, record.new_file_name, e
                        );
                        summary.failed += 1;
                        RenameStatus::Failed(e)
                    }
                }
            };

            on_rename(&RenameOutcome {
                index,
                total,
                from: record.original_file_name.clone(),
                to: record.new_file_name.clone(),
                status,
            });
        }

        summary
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::from_config(&ReportConfig::default())
    }
}

//! Report output and in-place renaming.

mod assembler;

pub use assembler::{RenameOutcome, RenameStatus, RenameSummary, ReportAssembler, REPORT_HEADER};

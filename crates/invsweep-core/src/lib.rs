//! Core library for sweeping invoice PDFs out of emailed link lists.
//!
//! This crate provides:
//! - Source loading (saved web pages and email containers) with UTF-8 normalization
//! - Link discovery over the parsed markup tree
//! - Sequential retrieval of each link to disk
//! - Anchor-based field extraction from PDF text (ship-to, total, invoice number)
//! - CSV reporting and in-place renaming of the parsed invoices

pub mod error;
pub mod fetch;
pub mod invoice;
pub mod links;
pub mod models;
pub mod pdf;
pub mod report;
pub mod source;

pub use error::{DecodeError, DownloadError, ExtractionError, PdfError, ReportError, Result, SweepError};
pub use fetch::{RetrievalEvent, RetrievalSummary, Retriever};
pub use invoice::{AnchorInvoiceParser, BatchOutcome, InvoiceParser};
pub use links::LinkExtractor;
pub use models::config::{PdfFailurePolicy, SweepConfig};
pub use models::record::{FieldName, InvoiceRecord, Link};
pub use pdf::{PdfContent, PdfExtractor, PdfProcessor};
pub use report::{RenameOutcome, RenameStatus, RenameSummary, ReportAssembler};
pub use source::{ContentLoader, LoadOutcome, LoadedContent, SourceKind};

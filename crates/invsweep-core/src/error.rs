//! Error types for the invsweep-core library.

use thiserror::Error;

use crate::models::config::PdfFailurePolicy;
use crate::models::record::FieldName;

/// Main error type for the invsweep library.
#[derive(Error, Debug)]
pub enum SweepError {
    /// Source decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Field or link extraction error.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Download error.
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Report writing error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SweepError {
    /// Whether this error should end the run.
    ///
    /// A failed download and an extraction outcome (a missed field, or no
    /// links at all) are never fatal. An unreadable PDF is fatal only under
    /// [`PdfFailurePolicy::Abort`]. Everything else is.
    pub fn is_fatal(&self, on_pdf_error: PdfFailurePolicy) -> bool {
        match self {
            SweepError::Download(_) | SweepError::Extraction(_) => false,
            SweepError::Pdf(_) => on_pdf_error == PdfFailurePolicy::Abort,
            _ => true,
        }
    }
}

/// Errors raised while turning a source file into UTF-8 markup.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The email container could not be parsed.
    #[error("not a readable email container: {0}")]
    Container(String),

    /// The text could not be normalized to UTF-8.
    #[error("failed to convert to UTF-8: {0}")]
    Encoding(String),
}

/// Errors related to link discovery and heuristic field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The anchor literal for a field was not found in the text.
    #[error("{field}: anchor {anchor:?} not found")]
    MissingAnchor { field: FieldName, anchor: String },

    /// The anchor was found but the fixed window falls before the text start.
    #[error("{field}: anchor {anchor:?} occurs within the first {offset} characters")]
    WindowOutOfRange {
        field: FieldName,
        anchor: String,
        offset: usize,
    },

    /// The scan ran off the end of the text without finding its terminator.
    #[error("{field}: no terminating digit after anchor")]
    Unterminated { field: FieldName },

    /// The markup contained no qualifying links.
    #[error("No files found to download")]
    NoLinks,
}

/// Errors related to fetching a single link.
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Transport-level failure (DNS, connect, TLS, body stream).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The destination file could not be written.
    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to writing the tabular report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the invsweep library.
pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        use PdfFailurePolicy::{Abort, Skip};

        assert!(!SweepError::Download(DownloadError::Status(404)).is_fatal(Abort));
        assert!(!SweepError::Extraction(ExtractionError::NoLinks).is_fatal(Abort));
        assert!(
            !SweepError::Extraction(ExtractionError::Unterminated {
                field: FieldName::ShipTo
            })
            .is_fatal(Abort)
        );
        assert!(SweepError::Pdf(PdfError::NoPages).is_fatal(Abort));
        assert!(!SweepError::Pdf(PdfError::NoPages).is_fatal(Skip));
        assert!(SweepError::Config("bad".to_string()).is_fatal(Skip));
        assert!(
            SweepError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).is_fatal(Skip)
        );
    }

    #[test]
    fn test_no_links_message() {
        assert_eq!(
            SweepError::from(ExtractionError::NoLinks).to_string(),
            "No files found to download"
        );
    }

    #[test]
    fn test_missing_anchor_message() {
        let err = ExtractionError::MissingAnchor {
            field: FieldName::Total,
            anchor: "Please".to_string(),
        };
        assert_eq!(err.to_string(), "total: anchor \"Please\" not found");
    }
}

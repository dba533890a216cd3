//! Configuration structures for the sweep pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the invsweep pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Source file selection and loading.
    pub source: SourceConfig,

    /// Link filtering.
    pub links: LinkConfig,

    /// HTTP retrieval.
    pub download: DownloadConfig,

    /// Invoice field extraction.
    pub extraction: ExtractionConfig,

    /// Report output.
    pub report: ReportConfig,

    /// Operator shell behavior.
    pub cli: CliConfig,
}

/// Source file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// File name suffixes offered for selection (matched case-insensitively).
    pub suffixes: Vec<String>,

    /// Extension that marks an email container.
    pub email_extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            suffixes: vec!["htm".to_string(), "html".to_string(), "eml".to_string()],
            email_extension: "eml".to_string(),
        }
    }
}

/// Link filtering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Anchors whose `href` contains this substring are skipped.
    pub exclude_href: String,

    /// Anchors whose text contains this substring are skipped.
    pub exclude_text: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            exclude_href: "mailto".to_string(),
            exclude_text: "here".to_string(),
        }
    }
}

/// HTTP retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Request timeout in seconds (None = transport default).
    pub timeout_secs: Option<u64>,

    /// User agent sent with each request.
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("invsweep/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// What to do when a PDF cannot be opened or its text cannot be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfFailurePolicy {
    /// Stop the whole batch at the first unreadable PDF.
    #[default]
    Abort,
    /// Log the failure and leave the file out of the report.
    Skip,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Downloaded invoices are recognised by this file name prefix.
    pub file_prefix: String,

    /// ... and this suffix, which is also stripped to form the invoice number.
    pub file_suffix: String,

    /// Literal preceding the ship-to block.
    pub ship_to_anchor: String,

    /// Literal following the total.
    pub total_anchor: String,

    /// How many characters before the total anchor the window starts.
    pub total_offset: usize,

    /// Window width in characters.
    pub total_width: usize,

    /// Log the full extracted PDF text at DEBUG level.
    pub debug: bool,

    /// Unreadable PDF handling.
    pub on_pdf_error: PdfFailurePolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            file_prefix: "SI-".to_string(),
            file_suffix: ".pdf".to_string(),
            ship_to_anchor: "SHIP TO:".to_string(),
            total_anchor: "Please".to_string(),
            total_offset: 8,
            total_width: 8,
            debug: false,
            on_pdf_error: PdfFailurePolicy::Abort,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Report file name, written inside the working directory.
    pub file_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            file_name: "downloaded_invoice_data.csv".to_string(),
        }
    }
}

/// Operator shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Wait for Enter before the process exits.
    pub pause_on_exit: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            pause_on_exit: true,
        }
    }
}

impl SweepConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check values that would make the heuristics meaningless.
    pub fn validate(&self) -> Result<(), String> {
        let ex = &self.extraction;
        if ex.ship_to_anchor.is_empty() {
            return Err("extraction.ship_to_anchor must not be empty".to_string());
        }
        if ex.total_anchor.is_empty() {
            return Err("extraction.total_anchor must not be empty".to_string());
        }
        if ex.total_width == 0 {
            return Err("extraction.total_width must be at least 1".to_string());
        }
        if ex.file_suffix.is_empty() {
            return Err("extraction.file_suffix must not be empty".to_string());
        }
        if self.report.file_name.is_empty() {
            return Err("report.file_name must not be empty".to_string());
        }
        Ok(())
    }
}

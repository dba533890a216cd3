//! Anchor-based invoice parser.

use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::error::{Result, SweepError};
use crate::models::config::{ExtractionConfig, PdfFailurePolicy};
use crate::models::record::InvoiceRecord;
use crate::pdf::{PdfExtractor, PdfProcessor};

use super::rules::{
    has_suffix_ignore_case, invoice_number, new_file_name, FieldExtractor, ShipToExtractor,
    TotalExtractor,
};

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Build a record from a file name and the PDF's plain text.
    ///
    /// Heuristic misses never fail the record: the field is left empty and
    /// a warning is attached.
    fn parse(&self, file_name: &str, text: &str) -> InvoiceRecord;
}

/// Records parsed from a directory, plus the files skipped under
/// [`PdfFailurePolicy::Skip`].
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<InvoiceRecord>,
    pub skipped: Vec<(String, SweepError)>,
}

/// Invoice parser driven by anchor literals.
pub struct AnchorInvoiceParser {
    ship_to: ShipToExtractor,
    total: TotalExtractor,
    file_prefix: String,
    file_suffix: String,
    /// Dump extracted PDF text at DEBUG level.
    debug: bool,
    on_pdf_error: PdfFailurePolicy,
}

impl AnchorInvoiceParser {
    /// Create a parser for the default invoice template.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            ship_to: ShipToExtractor::new(config.ship_to_anchor.clone()),
            total: TotalExtractor::new(
                config.total_anchor.clone(),
                config.total_offset,
                config.total_width,
            ),
            file_prefix: config.file_prefix.clone(),
            file_suffix: config.file_suffix.clone(),
            debug: config.debug,
            on_pdf_error: config.on_pdf_error,
        }
    }

    /// Set text dumping.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set unreadable-PDF handling.
    pub fn with_failure_policy(mut self, policy: PdfFailurePolicy) -> Self {
        self.on_pdf_error = policy;
        self
    }

    /// Whether a file name matches the invoice naming convention.
    pub fn is_invoice_file(&self, name: &str) -> bool {
        name.starts_with(&self.file_prefix) && has_suffix_ignore_case(name, &self.file_suffix)
    }

    /// Invoice file names in `dir`, sorted by name.
    pub fn discover(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if self.is_invoice_file(&name) {
                names.push(name);
            }
        }

        names.sort();
        debug!("Discovered {} invoice files in {}", names.len(), dir.display());
        Ok(names)
    }

    /// Open a PDF and return its full plain text.
    pub fn read_text(&self, path: &Path) -> Result<String> {
        let data = fs::read(path)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;
        let content = extractor.extract_all()?;

        if self.debug {
            debug!(
                "Text of {} ({} pages):\n{}",
                path.display(),
                content.page_count,
                content.text
            );
        }

        Ok(content.text)
    }

    /// Read and parse one invoice file in `dir`.
    pub fn parse_file(&self, dir: &Path, file_name: &str) -> Result<InvoiceRecord> {
        let text = self.read_text(&dir.join(file_name))?;
        Ok(self.parse(file_name, &text))
    }

    /// Parse every invoice file in `dir` in discovery order.
    ///
    /// `on_file` is called before each file with its 0-based index, the
    /// total and its name. Under [`PdfFailurePolicy::Abort`] the first
    /// unreadable PDF ends the batch with its error; under
    /// [`PdfFailurePolicy::Skip`] it is collected and the batch goes on.
    /// Fatal errors such as a failed read end the batch either way.
    pub fn parse_directory<F>(&self, dir: &Path, mut on_file: F) -> Result<BatchOutcome>
    where
        F: FnMut(usize, usize, &str),
    {
        let start = Instant::now();
        let files = self.discover(dir)?;
        let total = files.len();
        let mut outcome = BatchOutcome::default();

        for (index, name) in files.into_iter().enumerate() {
            on_file(index, total, &name);

            match self.parse_file(dir, &name) {
                Ok(record) => outcome.records.push(record),
                Err(e) if e.is_fatal(self.on_pdf_error) => {
                    error!("Failed to parse {}: {}", name, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", name, e);
                    outcome.skipped.push((name, e));
                }
            }
        }

        info!(
            "Parsed {} invoices ({} skipped) in {:?}",
            outcome.records.len(),
            outcome.skipped.len(),
            start.elapsed()
        );
        Ok(outcome)
    }
}

impl Default for AnchorInvoiceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for AnchorInvoiceParser {
    fn parse(&self, file_name: &str, text: &str) -> InvoiceRecord {
        let mut warnings = Vec::new();

        let ship_to_location = match self.ship_to.extract(text) {
            Ok(m) => m.value,
            Err(e) => {
                warn!("{}: {}", file_name, e);
                warnings.push(e.to_string());
                String::new()
            }
        };

        let total = match self.total.extract(text) {
            Ok(m) => m.value,
            Err(e) => {
                warn!("{}: {}", file_name, e);
                warnings.push(e.to_string());
                String::new()
            }
        };

        let record = InvoiceRecord {
            original_file_name: file_name.to_string(),
            new_file_name: new_file_name(&ship_to_location, file_name),
            invoice_number: invoice_number(file_name, &self.file_suffix),
            ship_to_location,
            total,
            warnings,
        };

        debug!(
            "Parsed {}: location={:?} total={:?}",
            record.invoice_number, record.ship_to_location, record.total
        );
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "Sunrise Wholesale\n\
        INVOICE\n\
        SHIP TO:\n\
        Mama Rosa's Pizzeria (Unit 4)\n\
        1200 Harbor Blvd, Suite 3\n\
        Qty Item Amount\n\
        10 Flour 25lb 210.00\n\
        Total Due $1210.00\n\
        Please remit payment within 30 days.";

    #[test]
    fn test_parse_basic_invoice() {
        let record = AnchorInvoiceParser::new().parse("SI-50017.pdf", TEXT);

        assert_eq!(record.ship_to_location, "Mama Rosa's Pizzeria (Unit 4)");
        assert_eq!(record.invoice_number, "SI-50017");
        assert_eq!(record.total, "1210.00");
        assert_eq!(record.new_file_name, "Mama_Rosas_Pizzeria_(Unit_4)_SI-50017.pdf");
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_missing_anchors_leave_fields_empty() {
        let record = AnchorInvoiceParser::new().parse("SI-1.pdf", "Statement of account");

        assert_eq!(record.ship_to_location, "");
        assert_eq!(record.total, "");
        assert_eq!(record.invoice_number, "SI-1");
        assert_eq!(record.new_file_name, "SI-1.pdf");
        assert_eq!(record.warnings.len(), 2);
        assert!(!record.needs_rename());
    }

    #[test]
    fn test_is_invoice_file() {
        let parser = AnchorInvoiceParser::new();
        assert!(parser.is_invoice_file("SI-123.pdf"));
        assert!(parser.is_invoice_file("SI-123.PDF"));
        assert!(!parser.is_invoice_file("si-123.pdf"));
        assert!(!parser.is_invoice_file("SI-123.pdf.tmp"));
        assert!(!parser.is_invoice_file("Statement.pdf"));
    }
}

//! Records produced and consumed by the pipeline stages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A candidate download discovered in the source markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Value of the anchor's `href` attribute.
    pub url: String,
    /// Text of the anchor's first child, used verbatim as the local file name.
    pub anchor_text: String,
}

impl Link {
    pub fn new(url: impl Into<String>, anchor_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anchor_text: anchor_text.into(),
        }
    }
}

/// Field names used in extraction errors and report headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    /// Ship-to location block.
    ShipTo,
    /// Invoice total.
    Total,
    /// Invoice number (taken from the file name).
    InvoiceNumber,
}

impl FieldName {
    /// Column name used in the report.
    pub fn column(&self) -> &'static str {
        match self {
            FieldName::ShipTo => "location",
            FieldName::Total => "total",
            FieldName::InvoiceNumber => "invoice_number",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Fields extracted from one downloaded invoice PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// File name as downloaded.
    pub original_file_name: String,
    /// File name after the ship-to prefix is applied.
    pub new_file_name: String,
    /// Ship-to location (empty when the anchor was missing).
    pub ship_to_location: String,
    /// Invoice number derived from the original file name.
    pub invoice_number: String,
    /// Total as printed on the invoice (empty when the anchor was missing).
    pub total: String,
    /// Heuristic misses recorded while building this record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl InvoiceRecord {
    /// Whether applying this record requires an on-disk rename.
    pub fn needs_rename(&self) -> bool {
        self.new_file_name != self.original_file_name
    }

    /// Row values in report column order.
    pub fn row(&self) -> [&str; 3] {
        [&self.ship_to_location, &self.invoice_number, &self.total]
    }
}

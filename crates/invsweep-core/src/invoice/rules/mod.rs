//! Anchor-based field extractors for invoice text.

pub mod file_name;
pub mod patterns;
pub mod ship_to;
pub mod total;

pub use file_name::{has_suffix_ignore_case, invoice_number, new_file_name, sanitize_location};
pub use ship_to::{scan_name_end, ShipToExtractor};
pub use total::TotalExtractor;

use crate::error::ExtractionError;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Result<ExtractionMatch<Self::Output>, ExtractionError>;
}

/// An extracted value and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text the value was cut from.
    pub position: (usize, usize),
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self {
            value,
            position: (start, end),
        }
    }
}

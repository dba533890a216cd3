//! Ship-to location extraction.

use super::{ExtractionMatch, FieldExtractor};
use crate::error::ExtractionError;
use crate::models::record::FieldName;

/// Extracts the ship-to name that follows an anchor literal.
///
/// The scan starts right after the first occurrence of the anchor and ends
/// at the first decimal digit found outside parentheses. Everything inside
/// `(...)` is skipped, so a store number such as `(Store #12)` stays part
/// of the name while a bare trailing number terminates it.
pub struct ShipToExtractor {
    anchor: String,
}

impl ShipToExtractor {
    pub fn new(anchor: impl Into<String>) -> Self {
        Self {
            anchor: anchor.into(),
        }
    }
}

impl Default for ShipToExtractor {
    fn default() -> Self {
        Self::new("SHIP TO:")
    }
}

impl FieldExtractor for ShipToExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Result<ExtractionMatch<String>, ExtractionError> {
        let anchor_pos = text
            .find(&self.anchor)
            .ok_or_else(|| ExtractionError::MissingAnchor {
                field: FieldName::ShipTo,
                anchor: self.anchor.clone(),
            })?;

        let start = anchor_pos + self.anchor.len();
        let window = &text[start..];
        let end = scan_name_end(window).ok_or(ExtractionError::Unterminated {
            field: FieldName::ShipTo,
        })?;

        Ok(ExtractionMatch::new(
            window[..end].trim().to_string(),
            start,
            start + end,
        ))
    }
}

/// Byte offset of the first digit outside parentheses, if any.
///
/// The parenthesis state is a flag, not a depth counter: a `(` inside an open
/// group keeps it open and the next `)` closes it.
pub fn scan_name_end(window: &str) -> Option<usize> {
    let mut in_parens = false;

    for (i, c) in window.char_indices() {
        if c == '(' {
            in_parens = true;
        }
        if in_parens {
            if c == ')' {
                in_parens = false;
            } else {
                continue;
            }
        }
        if c.is_ascii_digit() {
            return Some(i);
        }
    }

    None
}

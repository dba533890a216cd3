//! Invoice total extraction.

use super::{ExtractionMatch, FieldExtractor};
use crate::error::ExtractionError;
use crate::models::record::FieldName;

/// Cuts the total out of a fixed window positioned relative to an anchor.
///
/// The window starts `offset` characters before the first occurrence of the
/// anchor and is `width` characters wide. `$` signs and whitespace at either
/// end of the window are trimmed. This is tied to one invoice template; a
/// template change is a matter of changing the anchor, offset and width.
pub struct TotalExtractor {
    anchor: String,
    offset: usize,
    width: usize,
}

impl TotalExtractor {
    pub fn new(anchor: impl Into<String>, offset: usize, width: usize) -> Self {
        Self {
            anchor: anchor.into(),
            offset,
            width,
        }
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new("Please", 8, 8)
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Result<ExtractionMatch<String>, ExtractionError> {
        let anchor_pos = text
            .find(&self.anchor)
            .ok_or_else(|| ExtractionError::MissingAnchor {
                field: FieldName::Total,
                anchor: self.anchor.clone(),
            })?;

        let before = &text[..anchor_pos];
        let preceding = before.chars().count();
        if preceding < self.offset {
            return Err(ExtractionError::WindowOutOfRange {
                field: FieldName::Total,
                anchor: self.anchor.clone(),
                offset: self.offset,
            });
        }

        let start = before
            .char_indices()
            .nth(preceding - self.offset)
            .map(|(i, _)| i)
            .unwrap_or(before.len());
        let end = text[start..]
            .char_indices()
            .nth(self.width)
            .map(|(i, _)| start + i)
            .unwrap_or(text.len());

        let value = text[start..end].trim_matches(|c: char| c == '$' || c.is_whitespace());
        Ok(ExtractionMatch::new(value.to_string(), start, end))
    }
}

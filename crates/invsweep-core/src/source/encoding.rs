//! Character-encoding normalization to UTF-8.

use encoding_rs::Encoding;
use tracing::debug;

use crate::error::DecodeError;

/// Convert source text in an arbitrary encoding to UTF-8.
///
/// Valid UTF-8 passes through unchanged (minus a leading BOM). Anything else
/// goes through charset detection; a charset `encoding_rs` does not know, or a
/// decode that needed replacement characters, is an error.
pub fn to_utf8(bytes: &[u8]) -> Result<String, DecodeError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.strip_prefix('\u{feff}').unwrap_or(text).to_string());
    }

    let (charset, confidence, _language) = chardet::detect(bytes);
    let label = chardet::charset2encoding(&charset);
    debug!("Detected character encoding: {} ({:.2})", label, confidence);

    let encoding = Encoding::for_label(label.as_bytes())
        .ok_or_else(|| DecodeError::Encoding(format!("unsupported charset {:?}", charset)))?;

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DecodeError::Encoding(format!(
            "input is not valid {}",
            used.name()
        )));
    }

    Ok(text.into_owned())
}

//! Turns a source file into markup bytes.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mailparse::ParsedMail;
use mailparse::body::Body;
use tracing::{debug, info, warn};

use crate::error::{DecodeError, Result};
use crate::models::config::SourceConfig;

/// How a source file is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A saved web page read as-is.
    Markup,
    /// An email container whose HTML body part is extracted.
    Email,
}

/// Markup extracted from a source file, still in its original encoding.
#[derive(Debug, Clone)]
pub struct LoadedContent {
    /// How the file was interpreted.
    pub kind: SourceKind,
    /// Markup bytes.
    pub bytes: Vec<u8>,
    /// Whether the HTML payload had to be base64-decoded.
    pub base64_decoded: bool,
}

/// Result of loading a source file.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// Markup is available.
    Loaded(LoadedContent),
    /// The email container holds no data at all; nothing to do.
    Empty,
}

/// Reads source documents from disk.
pub struct ContentLoader {
    email_extension: String,
}

impl ContentLoader {
    /// Create a loader treating files with `email_extension` as email containers.
    pub fn new(email_extension: impl Into<String>) -> Self {
        Self {
            email_extension: email_extension.into(),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(config.email_extension.clone())
    }

    /// Classify a path by its extension.
    pub fn classify(&self, path: &Path) -> SourceKind {
        let is_email = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(&self.email_extension));

        if is_email {
            SourceKind::Email
        } else {
            SourceKind::Markup
        }
    }

    /// Load the markup contained in `path`.
    pub fn load(&self, path: &Path) -> Result<LoadOutcome> {
        let data = fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());

        match self.classify(path) {
            SourceKind::Markup => Ok(LoadOutcome::Loaded(LoadedContent {
                kind: SourceKind::Markup,
                bytes: data,
                base64_decoded: false,
            })),
            SourceKind::Email => self.load_email(&data),
        }
    }

    /// Extract the HTML body from raw email container bytes.
    pub fn load_email(&self, data: &[u8]) -> Result<LoadOutcome> {
        if data.is_empty() {
            info!("Email container is empty");
            return Ok(LoadOutcome::Empty);
        }

        let mail = mailparse::parse_mail(data).map_err(|e| DecodeError::Container(e.to_string()))?;

        let Some(part) = find_html_part(&mail) else {
            warn!("Email container has no text/html part");
            return Ok(LoadOutcome::Loaded(LoadedContent {
                kind: SourceKind::Email,
                bytes: Vec::new(),
                base64_decoded: false,
            }));
        };

        let (bytes, base64_decoded) = decode_payload(part)?;
        debug!(
            "HTML body: {} bytes, base64 decoded: {}",
            bytes.len(),
            base64_decoded
        );

        Ok(LoadOutcome::Loaded(LoadedContent {
            kind: SourceKind::Email,
            bytes,
            base64_decoded,
        }))
    }
}

/// Depth-first search for the first `text/html` part.
fn find_html_part<'a, 'b>(mail: &'b ParsedMail<'a>) -> Option<&'b ParsedMail<'a>> {
    if mail.ctype.mimetype.eq_ignore_ascii_case("text/html") {
        return Some(mail);
    }
    mail.subparts.iter().find_map(find_html_part)
}

/// Decode the HTML payload, falling back to the raw text when it is not base64.
fn decode_payload(part: &ParsedMail<'_>) -> Result<(Vec<u8>, bool)> {
    if let Body::Base64(body) = part.get_body_encoded() {
        return Ok(match body.get_decoded() {
            Ok(decoded) => (decoded, true),
            Err(e) => {
                debug!("Declared base64 payload did not decode: {}", e);
                (body.get_raw().to_vec(), false)
            }
        });
    }

    let raw = part
        .get_body_raw()
        .map_err(|e| DecodeError::Container(e.to_string()))?;

    // Some senders base64 the body without declaring it.
    Ok(match try_base64(&raw) {
        Some(decoded) => (decoded, true),
        None => (raw, false),
    })
}

fn try_base64(raw: &[u8]) -> Option<Vec<u8>> {
    let compact: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if compact.is_empty() {
        return None;
    }
    STANDARD.decode(&compact).ok()
}

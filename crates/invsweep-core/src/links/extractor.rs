//! Anchor scan over a markup token stream.

use lazy_static::lazy_static;
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::config::LinkConfig;
use crate::models::record::Link;

lazy_static! {
    // Elements whose body is raw text rather than markup
    static ref RAW_TEXT_ELEMENT: Regex =
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap();
}

/// Selects download links from markup.
///
/// Every `<a>` start tag is visited in document order. An anchor yields at
/// most one [`Link`]: the first `href` attribute whose value does not contain
/// the excluded href substring, provided the anchor's first-child text does
/// not contain the excluded text substring. Both checks are case-sensitive
/// substring matches.
///
/// Attributes are read straight off the start tag, so repeated `href`
/// attributes are all candidates in the order they were written.
pub struct LinkExtractor {
    exclude_href: String,
    exclude_text: String,
}

impl LinkExtractor {
    pub fn new(exclude_href: impl Into<String>, exclude_text: impl Into<String>) -> Self {
        Self {
            exclude_href: exclude_href.into(),
            exclude_text: exclude_text.into(),
        }
    }

    pub fn from_config(config: &LinkConfig) -> Self {
        Self::new(config.exclude_href.clone(), config.exclude_text.clone())
    }

    /// Extract candidate links, or [`ExtractionError::NoLinks`] if none qualify.
    pub fn extract(&self, markup: &str) -> Result<Vec<Link>, ExtractionError> {
        // Script and style bodies are not markup.
        let markup = RAW_TEXT_ELEMENT.replace_all(markup, "");

        let mut reader = Reader::from_str(&markup);
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        let mut links = Vec::new();
        // hrefs of the last anchor, until its first child is known
        let mut pending: Option<Vec<String>> = None;

        loop {
            let position = reader.buffer_position();
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    trace!("Skipping malformed markup at {}: {}", position, e);
                    if reader.buffer_position() == position {
                        break;
                    }
                    continue;
                }
            };

            if let Some(hrefs) = pending.take() {
                let text = match &event {
                    Event::Text(text) => text_content(text),
                    // A missing or non-text first child counts as empty text.
                    _ => String::new(),
                };
                match self.select(hrefs, &text) {
                    Some(link) => {
                        trace!("Selected link {:?} -> {}", link.anchor_text, link.url);
                        links.push(link);
                    }
                    None => trace!("Skipped anchor {:?}", text),
                }
            }

            match event {
                Event::Start(tag) | Event::Empty(tag) if is_anchor(&tag) => {
                    pending = Some(hrefs(&tag));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        debug!("Found {} candidate links", links.len());

        if links.is_empty() {
            return Err(ExtractionError::NoLinks);
        }
        Ok(links)
    }

    fn select(&self, hrefs: Vec<String>, text: &str) -> Option<Link> {
        if contains(text, &self.exclude_text) {
            return None;
        }

        hrefs
            .into_iter()
            .find(|href| !contains(href, &self.exclude_href))
            .map(|href| Link::new(href, text))
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::from_config(&LinkConfig::default())
    }
}

fn is_anchor(tag: &BytesStart<'_>) -> bool {
    tag.name().as_ref().eq_ignore_ascii_case(b"a")
}

/// Every `href` value on the tag, duplicates included, in written order.
fn hrefs(tag: &BytesStart<'_>) -> Vec<String> {
    tag.html_attributes()
        .with_checks(false)
        .filter_map(Result::ok)
        .filter(|attr| attr.key.as_ref().eq_ignore_ascii_case(b"href"))
        .map(|attr| match attr.unescape_value_with(resolve_html5_entity) {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
        .collect()
}

fn text_content(text: &BytesText<'_>) -> String {
    match text.unescape_with(resolve_html5_entity) {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}

/// Substring check where an empty needle never matches.
fn contains(haystack: &str, needle: &str) -> bool {
    !needle.is_empty() && haystack.contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(markup: &str) -> Vec<Link> {
        LinkExtractor::default().extract(markup).unwrap()
    }

    #[test]
    fn test_skips_mailto() {
        let links = extract(
            r#"<p><a href="mailto:ar@example.com">SI-1.pdf</a>
               <a href="https://example.com/1">SI-2.pdf</a></p>"#,
        );
        assert_eq!(links, vec![Link::new("https://example.com/1", "SI-2.pdf")]);
    }

    #[test]
    fn test_skips_click_here_text() {
        let links = extract(
            r#"<a href="https://example.com/unsub">click here to unsubscribe</a>
               <a href="https://example.com/2">SI-2.pdf</a>
               <a href="https://example.com/3">Click Here</a>"#,
        );
        assert_eq!(
            links,
            vec![
                Link::new("https://example.com/2", "SI-2.pdf"),
                Link::new("https://example.com/3", "Click Here"),
            ]
        );
    }

    #[test]
    fn test_document_order_through_nesting() {
        let links = extract(
            r#"<table>
                 <tr><td><div><a href="u1">A</a></div></td></tr>
                 <tr><td><a href="u2">B</a><span><a href="u3">C</a></span></td></tr>
               </table>
               <footer><a href="u4">D</a></footer>"#,
        );
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["u1", "u2", "u3", "u4"]);
    }

    #[test]
    fn test_one_link_per_anchor() {
        let links = extract(r#"<a href="first" href="second" title="t">X</a>"#);
        assert_eq!(links, vec![Link::new("first", "X")]);
    }

    #[test]
    fn test_later_href_used_when_first_is_mailto() {
        let links = extract(
            r#"<a href="mailto:ar@example.com" href="https://example.com/SI-1.pdf">SI-1.pdf</a>"#,
        );
        assert_eq!(links, vec![Link::new("https://example.com/SI-1.pdf", "SI-1.pdf")]);
    }

    #[test]
    fn test_entities_and_loose_html() {
        let links = extract(
            r#"<!DOCTYPE html><P>Invoices<BR>
               <A HREF="https://example.com/get?id=1&amp;fmt=pdf">SI&#45;1.pdf</A>
               <a href="u2">Caf&eacute;&nbsp;SI-2.pdf</a>
               <a href=u3>SI-3.pdf</a>"#,
        );
        assert_eq!(
            links,
            vec![
                Link::new("https://example.com/get?id=1&fmt=pdf", "SI-1.pdf"),
                Link::new("u2", "Caf\u{e9}\u{a0}SI-2.pdf"),
                Link::new("u3", "SI-3.pdf"),
            ]
        );
    }

    #[test]
    fn test_anchors_in_scripts_and_comments_are_ignored() {
        let links = extract(
            r#"<script>if (a < b) { document.write('<a href="x">SI-0.pdf</a>'); }</script>
               <!-- <a href="old">SI-old.pdf</a> -->
               <a href="u">SI-3.pdf</a>"#,
        );
        assert_eq!(links, vec![Link::new("u", "SI-3.pdf")]);
    }

    #[test]
    fn test_missing_or_non_text_first_child_is_empty_text() {
        let links = extract(
            r#"<a href="u1"></a><a href="u2"><img src="logo.png">Logo</a>"#,
        );
        assert_eq!(links, vec![Link::new("u1", ""), Link::new("u2", "")]);
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let links = extract(r#"<a name="top">Top</a><a href="u">SI-9.pdf</a>"#);
        assert_eq!(links, vec![Link::new("u", "SI-9.pdf")]);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let links = extract(r#"<a href="u">SI-1.pdf</a><a href="u">SI-1.pdf</a>"#);
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_no_links_is_explicit() {
        let result = LinkExtractor::default()
            .extract(r#"<p>Nothing <a href="mailto:x@example.com">here</a></p>"#);
        assert_eq!(result, Err(ExtractionError::NoLinks));
    }
}

//! Candidate download link discovery.

mod extractor;

pub use extractor::LinkExtractor;

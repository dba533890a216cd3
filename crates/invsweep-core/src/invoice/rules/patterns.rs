//! Common regex patterns for invoice field cleanup.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Characters stripped from a location before it becomes part of a file name
    pub static ref FILE_NAME_STRIP: Regex = Regex::new(r"[',]").unwrap();
}

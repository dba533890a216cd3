//! Fields derived from file names rather than PDF content.

use super::patterns::FILE_NAME_STRIP;

/// Whether `name` ends with `suffix`, comparing ASCII case-insensitively.
pub fn has_suffix_ignore_case(name: &str, suffix: &str) -> bool {
    strip_suffix_ignore_case(name, suffix).is_some()
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    let split = name.len().checked_sub(suffix.len())?;
    let tail = name.get(split..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &name[..split])
}

/// Invoice number: the file name without its trailing suffix.
pub fn invoice_number(file_name: &str, suffix: &str) -> String {
    strip_suffix_ignore_case(file_name, suffix)
        .unwrap_or(file_name)
        .to_string()
}

/// Make a location safe to prefix a file name with.
///
/// Spaces become underscores, then apostrophes and commas are removed.
/// Nothing else changes, case included.
pub fn sanitize_location(location: &str) -> String {
    FILE_NAME_STRIP
        .replace_all(&location.replace(' ', "_"), "")
        .into_owned()
}

/// New file name: sanitized location and original name joined by `_`.
///
/// An empty location leaves the name unchanged.
pub fn new_file_name(location: &str, original: &str) -> String {
    if location.is_empty() {
        return original.to_string();
    }
    format!("{}_{}", sanitize_location(location), original)
}

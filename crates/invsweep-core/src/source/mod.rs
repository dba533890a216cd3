//! Source document loading: raw markup files and email containers.

mod encoding;
mod loader;

pub use encoding::to_utf8;
pub use loader::{ContentLoader, LoadOutcome, LoadedContent, SourceKind};

use std::path::{Path, PathBuf};

/// List files in `dir` whose names end in one of `suffixes`, ignoring case.
///
/// Names are returned sorted so the numbering offered to the operator is
/// stable between runs.
pub fn list_candidates(dir: &Path, suffixes: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let suffixes: Vec<String> = suffixes.iter().map(|s| s.to_lowercase()).collect();
    let mut found = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            found.push(entry.path());
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_candidates_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.HTML", "a.eml", "notes.txt", "c.htm", "SI-1.pdf"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.html")).unwrap();

        let suffixes = vec!["htm".to_string(), "html".to_string(), "eml".to_string()];
        let names: Vec<String> = list_candidates(dir.path(), &suffixes)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.eml", "b.HTML", "c.htm"]);
    }
}

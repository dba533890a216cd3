//! Interactive selection of the source document.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use invsweep_core::source::list_candidates;

/// What the operator typed at the selection prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Choice {
    /// 0-based index into the candidate list.
    Pick(usize),
    Quit,
    Invalid,
}

/// Interpret one line of input against `count` candidates numbered from 1.
pub fn parse_choice(input: &str, count: usize) -> Choice {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Choice::Pick(n - 1),
        _ => Choice::Invalid,
    }
}

/// List candidate sources in `dir` and ask the operator to pick one.
///
/// Returns `None` when there is nothing to pick, the operator quits, or
/// input ends.
pub fn select_source<R, W>(
    dir: &Path,
    suffixes: &[String],
    mut input: R,
    mut out: W,
) -> anyhow::Result<Option<PathBuf>>
where
    R: BufRead,
    W: Write,
{
    let candidates = list_candidates(dir, suffixes)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    if candidates.is_empty() {
        writeln!(
            out,
            "No .{} files found in {}. Exiting...",
            suffixes.join(", ."),
            dir.display()
        )?;
        return Ok(None);
    }

    writeln!(out, "Please select the email to open.")?;
    for (i, path) in candidates.iter().enumerate() {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        writeln!(out, "({}) {}", i + 1, name)?;
    }

    loop {
        write!(out, "\n (q to exit)-> ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            writeln!(out, "Exiting...")?;
            return Ok(None);
        }

        match parse_choice(&line, candidates.len()) {
            Choice::Pick(index) => {
                let path = candidates[index].clone();
                writeln!(out, "You selected: {}", path.display())?;
                return Ok(Some(path));
            }
            Choice::Quit => {
                writeln!(out, "Exiting...")?;
                return Ok(None);
            }
            Choice::Invalid => writeln!(out, "Invalid entry, please try again.")?,
        }
    }
}

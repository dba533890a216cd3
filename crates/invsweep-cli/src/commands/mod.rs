//! Subcommands and the state they share.

pub mod config;
pub mod links;
pub mod parse;
pub mod prompt;
pub mod run;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use console::style;
use invsweep_core::source::to_utf8;
use invsweep_core::{ContentLoader, LoadOutcome, SourceKind, SweepConfig, SweepError};

/// Effective configuration plus the directory every stage works in.
pub struct Context {
    pub config: SweepConfig,
    pub workdir: PathBuf,
}

/// Block until the operator presses Enter (or stdin closes).
pub fn wait_for_enter() {
    print!("Press 'Enter' to continue...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

/// Load a source document as UTF-8 markup, writing status lines to `status`.
///
/// Returns `None` for an empty email container, which is a clean no-op.
pub fn load_markup<W: Write>(ctx: &Context, path: &Path, status: &mut W) -> anyhow::Result<Option<String>> {
    let loader = ContentLoader::from_config(&ctx.config.source);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    writeln!(status, "Opening {}...", name)?;
    let outcome = match loader.load(path) {
        Ok(outcome) => outcome,
        Err(e @ SweepError::Decode(_)) => {
            return Err(anyhow::Error::new(e).context(format!(
                "Either {} is corrupt or it is not an '{}' file",
                name, ctx.config.source.email_extension
            )));
        }
        Err(e) => return Err(anyhow::Error::new(e).context(format!("Failed to open {}", name))),
    };

    let content = match outcome {
        LoadOutcome::Loaded(content) => content,
        LoadOutcome::Empty => {
            writeln!(status, "{} Empty file: {}", style("ℹ").blue(), name)?;
            return Ok(None);
        }
    };

    if content.kind == SourceKind::Email {
        writeln!(status, "{}", style("Success!").green())?;
        if content.base64_decoded {
            writeln!(status, "Data is base64 encoded.")?;
        } else {
            writeln!(status, "Data not base64 encoded.")?;
        }
    }

    let markup = to_utf8(&content.bytes).with_context(|| format!("Failed to convert {} to UTF-8", name))?;
    Ok(Some(markup))
}

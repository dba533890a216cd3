//! Links command - list download links without fetching them.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::style;

use invsweep_core::{ExtractionError, LinkExtractor, SweepError};

use super::{load_markup, Context};

/// Output format for discovered links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LinkFormat {
    /// One `text -> url` line per link
    Text,
    /// JSON array
    Json,
}

/// Arguments for the links command.
#[derive(Args)]
pub struct LinksArgs {
    /// Source document (.htm, .html or .eml)
    source: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: LinkFormat,
}

pub fn run(args: LinksArgs, ctx: &Context) -> anyhow::Result<()> {
    // Keep stdout parseable when it carries JSON.
    let mut status: Box<dyn Write> = match args.format {
        LinkFormat::Text => Box::new(io::stdout()),
        LinkFormat::Json => Box::new(io::stderr()),
    };

    let Some(markup) = load_markup(ctx, &args.source, &mut status)? else {
        return Ok(());
    };

    let links = match LinkExtractor::from_config(&ctx.config.links).extract(&markup) {
        Err(ExtractionError::NoLinks) if args.format == LinkFormat::Json => Vec::new(),
        result => result.map_err(SweepError::from)?,
    };

    match args.format {
        LinkFormat::Text => {
            for (i, link) in links.iter().enumerate() {
                println!("({}) {} {} {}", i + 1, link.anchor_text, style("->").dim(), link.url);
            }
        }
        LinkFormat::Json => println!("{}", serde_json::to_string_pretty(&links)?),
    }

    Ok(())
}

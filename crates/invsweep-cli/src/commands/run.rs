//! Run command - the full sweep from source document to renamed invoices.

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use invsweep_core::{LinkExtractor, RetrievalEvent, Retriever, SweepError};

use super::parse::{parse_and_report, ParseOptions};
use super::{load_markup, prompt, Context};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Source document (.htm, .html or .eml); prompts for one when omitted
    source: Option<PathBuf>,

    #[command(flatten)]
    options: ParseOptions,
}

pub async fn run(args: RunArgs, ctx: &Context) -> anyhow::Result<()> {
    let start = Instant::now();

    let source = match args.source {
        Some(path) => path,
        None => {
            let stdin = io::stdin();
            match prompt::select_source(
                &ctx.workdir,
                &ctx.config.source.suffixes,
                stdin.lock(),
                io::stdout(),
            )? {
                Some(path) => path,
                None => return Ok(()),
            }
        }
    };

    let Some(markup) = load_markup(ctx, &source, &mut io::stdout())? else {
        return Ok(());
    };

    let links = LinkExtractor::from_config(&ctx.config.links)
        .extract(&markup)
        .map_err(SweepError::from)?;

    println!("{} files to download...", links.len());

    let retriever = Retriever::new(&ctx.config.download)?;
    let bar_style = ProgressStyle::default_bar()
        .template("  {spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes}")
        .unwrap()
        .progress_chars("=>-");
    let mut pb: Option<ProgressBar> = None;

    let summary = retriever
        .retrieve_all(&links, &ctx.workdir, |event| match event {
            RetrievalEvent::Started { index, total, link } => {
                println!("Downloading {} {} of {}...", link.anchor_text, index + 1, total);
                let bar = ProgressBar::new(0);
                bar.set_style(bar_style.clone());
                pb = Some(bar);
            }
            RetrievalEvent::Progress {
                downloaded,
                content_length,
                ..
            } => {
                if let Some(bar) = &pb {
                    if let Some(length) = content_length {
                        bar.set_length(length);
                    }
                    bar.set_position(downloaded);
                }
            }
            RetrievalEvent::Finished { outcome, .. } => {
                if let Some(bar) = pb.take() {
                    bar.finish_and_clear();
                }
                match outcome {
                    Ok(_) => println!("\t{}", style("complete.").green()),
                    Err(e) => println!("\t{} ({})", style("error, incomplete!").red(), e),
                }
            }
        })
        .await;

    println!(
        "{} of {} files downloaded completely.",
        summary.succeeded, summary.attempted
    );

    parse_and_report(ctx, &args.options)?;

    debug!("Sweep finished in {:?}", start.elapsed());
    Ok(())
}

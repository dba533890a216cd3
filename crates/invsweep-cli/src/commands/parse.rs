//! Parse command - extract fields from downloaded invoices, report and rename.

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use invsweep_core::{
    AnchorInvoiceParser, PdfFailurePolicy, RenameStatus, ReportAssembler,
};

use super::Context;

/// Options shared by every command that parses invoices.
#[derive(Args, Clone, Debug, Default)]
pub struct ParseOptions {
    /// Log the extracted text of each PDF at debug level
    #[arg(long)]
    pub dump_text: bool,

    /// Skip unreadable PDFs instead of stopping the batch
    #[arg(long)]
    pub skip_bad_pdfs: bool,

    /// Write the report but leave file names as they are
    #[arg(long)]
    pub no_rename: bool,
}

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    #[command(flatten)]
    options: ParseOptions,
}

pub fn run(args: ParseArgs, ctx: &Context) -> anyhow::Result<()> {
    parse_and_report(ctx, &args.options)
}

/// Parse every invoice in the working directory, write the report, then rename.
pub fn parse_and_report(ctx: &Context, options: &ParseOptions) -> anyhow::Result<()> {
    let extraction = &ctx.config.extraction;
    let mut parser = AnchorInvoiceParser::from_config(extraction)
        .with_debug(extraction.debug || options.dump_text);
    if options.skip_bad_pdfs {
        parser = parser.with_failure_policy(PdfFailurePolicy::Skip);
    }

    println!("Parsing downloaded data... ");

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let outcome = parser.parse_directory(&ctx.workdir, |index, total, name| {
        pb.set_length(total as u64);
        pb.set_position(index as u64);
        pb.set_message(name.to_string());
    });
    pb.finish_and_clear();
    let outcome = outcome?;

    for (name, e) in &outcome.skipped {
        println!("  {} Skipped {}: {}", style("⚠").yellow(), name, e);
    }
    for record in outcome.records.iter().filter(|r| !r.warnings.is_empty()) {
        for warning in &record.warnings {
            println!(
                "  {} {}: {}",
                style("⚠").yellow(),
                record.original_file_name,
                warning
            );
        }
    }

    let assembler = ReportAssembler::from_config(&ctx.config.report);
    println!("Writing data to '{}'... ", ctx.config.report.file_name);
    let report = assembler.write(&ctx.workdir, &outcome.records)?;
    println!(
        "{} {} invoices written to {}",
        style("✓").green(),
        outcome.records.len(),
        report.display()
    );

    if options.no_rename {
        return Ok(());
    }

    println!("Renaming files...");
    let summary = assembler.rename_all(&ctx.workdir, &outcome.records, |rename| {
        let position = rename.index + 1;
        match &rename.status {
            RenameStatus::Renamed => println!(
                "Renaming {} of {}: {} to {}",
                position, rename.total, rename.from, rename.to
            ),
            RenameStatus::Unchanged => println!(
                "Renaming {} of {}: {} unchanged",
                position, rename.total, rename.from
            ),
            RenameStatus::Failed(e) => println!(
                "Renaming {} of {}: {} to {} {} {}",
                position,
                rename.total,
                rename.from,
                rename.to,
                style("failed:").red(),
                e
            ),
        }
    });

    println!(
        "{} of {} files renamed successfully.",
        summary.renamed,
        outcome.records.len()
    );

    Ok(())
}

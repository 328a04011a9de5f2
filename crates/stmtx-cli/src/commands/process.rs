//! Process command - extract a single bank statement.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use stmtx_core::pdf::{PdfExtractor, PdfProcessor};
use stmtx_core::{StatementExtractor, TransactionAnalyzer};

use super::load_config;
use super::output::{format_account_csv, format_extraction, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement (PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Flag large DD/RTGS transactions and suspicious counterparties
    #[arg(long)]
    flag: bool,

    /// Print the extracted text of every page to stderr
    #[arg(long)]
    show_text: bool,

    /// Write account details as CSV to this file
    #[arg(long)]
    account_csv: Option<PathBuf>,

    /// Validate the transaction table
    #[arg(long)]
    validate: bool,

    /// Show extraction statistics
    #[arg(long)]
    show_stats: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "pdf" {
        anyhow::bail!("Unsupported file format: {}", extension);
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading PDF...");
    pb.set_position(10);

    let data = fs::read(&args.input)?;
    let mut pdf = PdfExtractor::new().with_max_pages(config.pdf.max_pages);
    pdf.load(&data)?;
    debug!("PDF has {} pages", pdf.page_count());

    if args.show_text {
        let content = pdf.extract_all()?;
        pb.suspend(|| {
            for page in &content.pages {
                eprintln!("{}", style(format!("--- Page {} ---", page.number)).dim());
                eprintln!("{}", page.text.as_deref().unwrap_or("(no text)"));
            }
        });
    }

    pb.set_message("Extracting statement...");
    pb.set_position(40);

    let extractor = StatementExtractor::with_config(config);
    let extraction = extractor.extract_from_source(&pdf)?;

    let report = if args.flag {
        pb.set_message("Flagging transactions...");
        pb.set_position(80);
        Some(TransactionAnalyzer::new(&extractor.config().analysis).analyze(&extraction.transactions))
    } else {
        None
    };

    pb.set_position(100);
    pb.finish_and_clear();

    for warning in &extraction.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if args.validate {
        let issues = extraction.transactions.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_extraction(&extraction, report.as_ref(), args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(account_path) = &args.account_csv {
        fs::write(account_path, format_account_csv(&extraction.account.info)?)?;
        println!(
            "{} Account details written to {}",
            style("✓").green(),
            account_path.display()
        );
    }

    if args.show_stats {
        eprintln!();
        eprintln!("{} Issuer: {}", style("ℹ").blue(), extraction.issuer);
        eprintln!(
            "{} Lines: {} candidates, {} rejected",
            style("ℹ").blue(),
            extraction.candidate_lines,
            extraction.rejected_lines
        );
        eprintln!(
            "{} Low-confidence rows: {}",
            style("ℹ").blue(),
            extraction.transactions.low_confidence_count()
        );
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            extraction.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

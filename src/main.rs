//! Main entry point for the zipingest CLI application.
//!
//! Loads each input (local file or HTTP URL), extracts the archive and
//! either lists it, dumps its entries, or parses its CSV files into JSON
//! lines on stdout.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use zipingest::archive::{EntryContent, Extraction, extract_bytes};
use zipingest::pipeline::{IngestOptions, Ingestion, ingest_bytes};
use zipingest::{Cli, io};

/// What one input produced, depending on the mode.
enum Report {
    Extraction(Extraction),
    Ingestion(Ingestion),
}

/// Application entry point.
///
/// Inputs are processed concurrently, at most `-j` at a time, since every
/// extraction holds its whole archive and output in memory. Results are
/// printed in input order.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    let cli = Arc::new(cli);
    let ingest_options = Arc::new(cli.ingest_options().context("invalid -r field list")?);
    let permits = Arc::new(Semaphore::new(cli.jobs as usize));

    let mut tasks = JoinSet::new();
    for (index, input) in cli.inputs.iter().cloned().enumerate() {
        let cli = cli.clone();
        let options = ingest_options.clone();
        let permits = permits.clone();
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let report = process_input(&input, cli, options).await;
            Ok::<_, anyhow::Error>((index, report))
        });
    }

    let mut reports: Vec<Option<Result<Report>>> = (0..cli.inputs.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, report) = joined??;
        reports[index] = Some(report);
    }

    let mut failed = 0usize;
    for (input, report) in cli.inputs.iter().zip(reports) {
        match report {
            Some(Ok(report)) => print_report(input, &report, &cli)?,
            Some(Err(e)) => {
                failed += 1;
                eprintln!("{}: {:#}", input, e);
            }
            None => {}
        }
    }

    if failed > 0 {
        bail!("{} of {} inputs failed", failed, cli.inputs.len());
    }
    Ok(())
}

/// Load one input and run the CPU-bound transform off the async workers.
async fn process_input(input: &str, cli: Arc<Cli>, options: Arc<IngestOptions>) -> Result<Report> {
    let source = io::open(input);
    let data = source.read_all().await?;
    log::debug!("{}: loaded {} bytes", source.describe(), data.len());

    tokio::task::spawn_blocking(move || -> Result<Report> {
        let archive = cli.decode_input(data)?;
        if cli.list || cli.verbose || cli.pipe {
            let mut extraction = extract_bytes(&archive)?;
            extraction.entries.retain(|e| cli.entry_selected(&e.name));
            return Ok(Report::Extraction(extraction));
        }

        let mut ingestion = ingest_bytes(&archive, &options)?;
        ingestion.files.retain(|f| cli.entry_selected(&f.name));
        Ok(Report::Ingestion(ingestion))
    })
    .await?
}

fn print_report(input: &str, report: &Report, cli: &Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match report {
        Report::Extraction(extraction) if cli.pipe => {
            let multiple_files = extraction.entries.len() > 1;
            for entry in &extraction.entries {
                if multiple_files {
                    writeln!(out, "--- {} ---", entry.name)?;
                }
                out.write_all(entry.bytes())?;
            }
        }
        Report::Extraction(extraction) => list_entries(&mut out, extraction, cli.verbose)?,
        Report::Ingestion(ingestion) => {
            for file in &ingestion.files {
                for row in &file.outcome.rows {
                    let line = serde_json::json!({
                        "archive": input,
                        "file": file.name,
                        "row": row,
                    });
                    writeln!(out, "{}", line)?;
                }

                if !cli.is_quiet() {
                    eprintln!(
                        "{}: {}: {} rows, {} skipped, {} invalid{}",
                        input,
                        file.name,
                        file.outcome.rows.len(),
                        file.outcome.skipped.len(),
                        file.invalid_rows.len(),
                        if file.complete { "" } else { " (best-effort content)" }
                    );
                }
                if !cli.is_very_quiet() {
                    for invalid in &file.invalid_rows {
                        eprintln!(
                            "{}: {}: row {} missing {}",
                            input,
                            file.name,
                            invalid.row,
                            invalid.result.missing_fields.join(", ")
                        );
                    }
                }
            }
        }
    }

    Ok(())
}

/// List archive entries.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just file names, one per line
/// - Verbose format (`-v`): Detailed table with sizes, compression ratio and method
fn list_entries(out: &mut impl Write, extraction: &Extraction, verbose: bool) -> Result<()> {
    if !verbose {
        for entry in &extraction.entries {
            writeln!(out, "{}", entry.name)?;
        }
        return Ok(());
    }

    writeln!(
        out,
        "{:>10}  {:>10}  {:>5}  {:<8}  Name",
        "Length", "Size", "Cmpr", "Method"
    )?;
    writeln!(out, "{}", "-".repeat(60))?;

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;

    for entry in &extraction.entries {
        let uncompressed = entry.declared_uncompressed_size as u64;
        let compressed = entry.declared_compressed_size as u64;
        let marker = match &entry.content {
            EntryContent::Complete(_) => "",
            EntryContent::PartiallyRecovered { .. } => "  [raw]",
        };
        writeln!(
            out,
            "{:>10}  {:>10}  {}  {:<8}  {}{}",
            uncompressed,
            compressed,
            ratio(compressed, uncompressed),
            entry.compression_method,
            entry.name,
            marker
        )?;
        total_uncompressed += uncompressed;
        total_compressed += compressed;
    }

    writeln!(out, "{}", "-".repeat(60))?;
    writeln!(
        out,
        "{:>10}  {:>10}  {}  {:<8}  {} files",
        total_uncompressed,
        total_compressed,
        ratio(total_compressed, total_uncompressed),
        "",
        extraction.entries.len()
    )?;

    for issue in &extraction.issues {
        writeln!(out, "warning: {}", issue)?;
    }
    Ok(())
}

/// Compression ratio as percentage saved
fn ratio(compressed: u64, uncompressed: u64) -> String {
    if uncompressed > 0 && compressed <= uncompressed {
        format!("{:>4}%", 100 - (compressed * 100 / uncompressed))
    } else {
        "  0%".to_string()
    }
}

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use flate2::read::GzDecoder;
use tracing_subscriber::EnvFilter;

use flatgene::cli;
use flatgene::config::Config;
use flatgene::diagnostics::Severity;
use flatgene::generef::{ConsolidationOutcome, consolidate};
use flatgene::record::RecordSet;

#[derive(Parser)]
#[command(
    name = "consolidate_genes",
    about = "Consolidate the gene annotation of a flat-file record"
)]
struct Cli {
    /// Record set in JSON (optionally gzip-compressed, detected by .gz)
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Output JSON file for the consolidation outcome
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Path to the JSON configuration file with default options
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Log every consolidation stage
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    let filter = if cli_args.verbose {
        EnvFilter::new("flatgene=debug,info")
    } else {
        EnvFilter::new("flatgene=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    cli::banner("Consolidate Genes");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = match &cli_args.config {
        Some(path) => {
            cli::kv("Config", &path.display().to_string());
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    cli::kv("Input", &cli_args.input.display().to_string());
    cli::kv("Output", &cli_args.output.display().to_string());

    eprintln!();

    // ── Consolidation ────────────────────────────────────
    cli::section("Consolidation");

    let set = read_record_set(&cli_args.input)?;
    cli::kv("Segments", &set.segments.len().to_string());
    let num_features: usize = set.segments.iter().map(|s| s.features.len()).sum();
    cli::kv("Features", &num_features.to_string());

    let outcome = consolidate(&set, &config.options)
        .with_context(|| format!("invalid record set: {}", cli_args.input.display()))?;
    print_stats(&outcome);

    write_outcome(&cli_args.output, &outcome)?;

    eprintln!();
    if outcome.dropped {
        cli::warning("record dropped: a REJECT diagnostic was raised");
    } else {
        cli::success(&format!("wrote {} genes", outcome.genes.len()));
    }

    cli::print_summary(start);
    Ok(())
}

fn read_record_set(path: &Path) -> Result<RecordSet> {
    let file =
        File::open(path).with_context(|| format!("failed to open input: {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    RecordSet::from_reader(BufReader::new(reader))
        .with_context(|| format!("failed to read record set: {}", path.display()))
}

fn write_outcome(path: &Path, outcome: &ConsolidationOutcome) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, outcome)
        .with_context(|| format!("failed to write output: {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn print_stats(outcome: &ConsolidationOutcome) {
    let stats = &outcome.stats;
    cli::kv("Candidates", &stats.num_candidates.to_string());
    cli::kv("Pairwise merges", &stats.num_pairwise_merges.to_string());
    cli::kv("Blocked merges", &stats.num_blocked_merges.to_string());
    cli::kv("Segment merges", &stats.num_segment_merges.to_string());
    cli::kv("Contained", &stats.num_contained.to_string());
    cli::kv("Without location", &stats.num_without_location.to_string());
    cli::kv("Genes", &stats.num_genes.to_string());
    cli::kv("Xrefs added", &stats.num_xrefs_added.to_string());
    cli::kv("Redundant qualifiers", &stats.num_redundant_qualifiers.to_string());
    cli::kv("Unlinked features", &stats.num_unlinked_features.to_string());

    let count = |severity: Severity| {
        outcome
            .diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    };
    cli::kv(
        "Diagnostics",
        &format!(
            "{} info, {} warning, {} error, {} reject",
            count(Severity::Info),
            count(Severity::Warning),
            count(Severity::Error),
            count(Severity::Reject),
        ),
    );
}

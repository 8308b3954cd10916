//! # CLI Module
//!
//! Command-line interface for image comparison.
//!
//! ## Usage
//! ```bash
//! # Compare two images with the default tolerance (45)
//! img-compare compare a.png b.png
//!
//! # Stricter tolerance, custom overlay location
//! img-compare compare a.png b.png --threshold 10 --diff-output out/diff.png
//!
//! # JSON output
//! img-compare compare a.png b.png --output json
//!
//! # Print a dHash
//! img-compare hash a.png
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use image_similarity::core::codec::{self, DecodeLimits, DEFAULT_MAX_PIXELS};
use image_similarity::core::hasher::compute_difference_hash;
use image_similarity::core::overlay::HighlightColor;
use image_similarity::core::pipeline::Comparison;
use image_similarity::core::reporter::{self, ComparisonReport, DiffImageStatus};
use image_similarity::error::Result;
use std::path::{Path, PathBuf};

/// Image Similarity - compare two images by hash and by pixel
#[derive(Parser, Debug)]
#[command(name = "img-compare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare two images of the same size
    Compare {
        /// First image (the overlay is drawn on this one)
        first: PathBuf,

        /// Second image
        second: PathBuf,

        /// Per-channel tolerance, 1-100 (default 45)
        #[arg(short, long, allow_negative_numbers = true)]
        threshold: Option<i64>,

        /// Where to write the diff overlay (.png, .jpg or .jpeg)
        #[arg(short, long, default_value = "result.png")]
        diff_output: PathBuf,

        /// Do not write the diff overlay
        #[arg(long)]
        no_diff: bool,

        /// Highlight colour as hex, e.g. ff0000
        #[arg(long, default_value_t = HighlightColor::RED)]
        highlight: HighlightColor,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Refuse inputs with more pixels than this
        #[arg(long, default_value_t = DEFAULT_MAX_PIXELS)]
        max_pixels: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the 64-bit difference hash of an image
    Hash {
        /// Image to hash
        path: PathBuf,

        /// Refuse inputs with more pixels than this
        #[arg(long, default_value_t = DEFAULT_MAX_PIXELS)]
        max_pixels: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            first,
            second,
            threshold,
            diff_output,
            no_diff,
            highlight,
            output,
            max_pixels,
            verbose,
        } => {
            image_similarity::init_tracing(if verbose { "debug" } else { "warn" })?;
            let overlay_path = (!no_diff).then_some(diff_output);
            run_compare(
                first,
                second,
                threshold,
                overlay_path,
                highlight,
                output,
                DecodeLimits::new(max_pixels),
            )
        }
        Commands::Hash { path, max_pixels } => {
            image_similarity::init_tracing("warn")?;
            let image = codec::decode_file(&path, &DecodeLimits::new(max_pixels))?;
            let hash = compute_difference_hash(&image)?;
            println!("{}", hash);
            Ok(())
        }
    }
}

fn run_compare(
    first: PathBuf,
    second: PathBuf,
    threshold: Option<i64>,
    overlay_path: Option<PathBuf>,
    highlight: HighlightColor,
    output: OutputFormat,
    limits: DecodeLimits,
) -> Result<()> {
    // Reject a bad threshold before touching any file
    let mut builder = Comparison::builder().highlight(highlight);
    if let Some(threshold) = threshold {
        builder = builder.threshold(threshold);
    }
    let comparison = builder.build()?;

    // Likewise an overlay path we could never write to
    if let Some(path) = &overlay_path {
        codec::ensure_encodable(path)?;
    }

    let image_a = codec::decode_file(&first, &limits)?;
    let image_b = codec::decode_file(&second, &limits)?;

    let result = comparison.compare(&image_a, &image_b)?;

    // The report goes out even when the overlay could not be saved
    let (report, save_error) = reporter::save_and_report(&result, overlay_path);

    match output {
        OutputFormat::Pretty => print_pretty_report(&Term::stderr(), &first, &second, &report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    match save_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn print_pretty_report(term: &Term, first: &Path, second: &Path, report: &ComparisonReport) {
    term.write_line(&format!(
        "{} {}",
        style("Image Similarity").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line(&format!(
        "  {} vs {}",
        style(first.display()).dim(),
        style(second.display()).dim()
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!("{}", style("Difference hash:").bold().underlined()))
        .ok();
    term.write_line(&format!(
        "  {}  {}",
        style(&report.hash.first).dim(),
        style(&report.hash.second).dim()
    ))
    .ok();
    term.write_line(&format!(
        "  {} of {} bits differ, {} similar ({})",
        style(report.hash.hamming_distance).cyan(),
        report.hash.total_bits,
        style(format!("{:.2}%", report.hash.similarity_percent)).cyan(),
        style(report.hash.match_type).yellow()
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!("{}", style("Pixels:").bold().underlined()))
        .ok();
    term.write_line(&format!(
        "  {} similar at tolerance {}",
        style(format!("{}%", report.pixels.similarity_display)).cyan(),
        style(report.pixels.threshold_used).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} of {} pixels differ",
        style(report.pixels.differing_pixels).cyan(),
        report.pixels.total_pixels
    ))
    .ok();
    term.write_line("").ok();

    match &report.diff_image {
        DiffImageStatus::Identical => {
            term.write_line(&format!("{} Images are identical", style("✓").green().bold()))
                .ok();
        }
        DiffImageStatus::Written { path } => {
            term.write_line(&format!(
                "{} Diff overlay written to {}",
                style("●").red().bold(),
                style(path.display()).yellow()
            ))
            .ok();
        }
        DiffImageStatus::Discarded => {
            term.write_line(&format!(
                "{} Images differ (overlay not saved)",
                style("●").red().bold()
            ))
            .ok();
        }
        DiffImageStatus::Failed { path, reason } => {
            term.write_line(&format!(
                "{} Could not write diff overlay to {}: {}",
                style("✗").red().bold(),
                style(path.display()).yellow(),
                reason
            ))
            .ok();
        }
    }
}

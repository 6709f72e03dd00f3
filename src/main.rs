//! block-slack - recover slack space from a block container.
//!
//! Walks the block pointer graph from the root and prints the bytes that
//! no live block owns.

use anyhow::{Context, Result};
use block_slack::analyzer::SurveyOutcome;
use block_slack::slack::{hex_dump, RegionKind};
use block_slack::{survey, AnalysisConfig, SlackAnalyzer, TextDecoding};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "block-slack")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Recover slack space from a block container",
    long_about = "Discovers every block reachable from the root block and extracts the bytes lying outside all of them."
)]
struct Cli {
    /// Log discovery details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct AnalysisArgs {
    /// Container file
    file: PathBuf,

    /// Offset of the root block
    #[arg(long, default_value = "0")]
    root_offset: u64,

    /// How slack bytes are decoded for output
    #[arg(long, value_enum, default_value = "raw")]
    decoding: TextDecoding,
}

impl AnalysisArgs {
    fn open(&self) -> Result<SlackAnalyzer> {
        let config = AnalysisConfig::new(self.root_offset, self.decoding);
        SlackAnalyzer::open(&self.file, config)
            .with_context(|| format!("Failed to analyze {}", self.file.display()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write all recovered slack, concatenated, to stdout or a file
    Extract {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the live blocks
    Blocks {
        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// List the slack regions
    Regions {
        #[command(flatten)]
        analysis: AnalysisArgs,

        /// Include a hex dump of each region
        #[arg(long)]
        hex: bool,
    },

    /// Print a JSON report of blocks and slack
    Report {
        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Analyze every file under a directory
    Survey {
        /// Directory to walk
        dir: PathBuf,

        /// Offset of the root block
        #[arg(long, default_value = "0")]
        root_offset: u64,

        /// Print the results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "block_slack=debug"
    } else {
        "block_slack=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract { analysis, output } => cmd_extract(&analysis, output),
        Commands::Blocks { analysis } => cmd_blocks(&analysis),
        Commands::Regions { analysis, hex } => cmd_regions(&analysis, hex),
        Commands::Report { analysis } => cmd_report(&analysis),
        Commands::Survey {
            dir,
            root_offset,
            json,
        } => cmd_survey(&dir, root_offset, json),
    }
}

fn cmd_extract(analysis: &AnalysisArgs, output: Option<PathBuf>) -> Result<()> {
    let mut analyzer = analysis.open()?;

    let data = match analysis.decoding {
        TextDecoding::Raw => analyzer.unused_bytes()?,
        TextDecoding::Lossy | TextDecoding::Strict => analyzer.unused_text()?.into_bytes(),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {} bytes to {}", data.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn cmd_blocks(analysis: &AnalysisArgs) -> Result<()> {
    let analyzer = analysis.open()?;

    println!("{:>12} {:>10} {:>12}  pointers", "offset", "size", "end");
    for block in analyzer.descriptors() {
        let pointers: Vec<String> = block.pointers.iter().map(u64::to_string).collect();
        println!(
            "{:>12} {:>10} {:>12}  {}",
            block.offset,
            block.size,
            block.end(),
            pointers.join(",")
        );
    }
    println!();
    println!("{} live blocks in {} bytes", analyzer.blocks().len(), analyzer.file_len());

    Ok(())
}

fn cmd_regions(analysis: &AnalysisArgs, hex: bool) -> Result<()> {
    let mut analyzer = analysis.open()?;
    let regions = analyzer.regions()?;

    println!("{:>12} {:>12} {:>10}  kind", "start", "end", "len");
    for region in &regions {
        let kind = match region.span.kind {
            RegionKind::Gap { after_block } => format!("gap after {}", after_block),
            RegionKind::Trailing => "trailing".to_string(),
        };
        println!(
            "{:>12} {:>12} {:>10}  {}",
            region.span.start,
            region.span.end,
            region.span.len(),
            kind
        );
        if hex && !region.bytes.is_empty() {
            print!("{}", hex_dump(&region.bytes, region.span.start));
        }
    }

    let total: usize = regions.iter().map(|r| r.bytes.len()).sum();
    println!();
    println!("{} regions, {} slack bytes", regions.len(), total);

    Ok(())
}

fn cmd_report(analysis: &AnalysisArgs) -> Result<()> {
    let mut analyzer = analysis.open()?;
    let report = analyzer.report()?;
    println!("{}", report.to_json()?);
    Ok(())
}

fn cmd_survey(dir: &Path, root_offset: u64, json: bool) -> Result<()> {
    let config = AnalysisConfig::new(root_offset, TextDecoding::Raw);
    let entries =
        survey(dir, &config).with_context(|| format!("Failed to survey {}", dir.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut failed = 0;
    for entry in &entries {
        match &entry.outcome {
            SurveyOutcome::Analyzed {
                blocks,
                slack_bytes,
                sha256,
            } => {
                println!(
                    "ok    {:>6} blocks {:>10} bytes  {}  {}",
                    blocks,
                    slack_bytes,
                    &sha256[..16],
                    entry.path.display()
                );
            }
            SurveyOutcome::Failed { error } => {
                failed += 1;
                println!("fail  {}: {}", entry.path.display(), error);
            }
        }
    }
    println!();
    println!("{} files, {} failed", entries.len(), failed);

    Ok(())
}

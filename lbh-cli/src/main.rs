//! lbh - leaderboard history tool
//!
//! Folds legacy leaderboard history files into the canonical per-level
//! records and turns a level's history into rank-1 step series, tables and
//! SVG charts.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use lbh_core::{Category, Zone};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod chart;
mod commands;
mod config;
mod output;

use commands::completions::Shell;
use commands::*;
use config::LbhConfig;
use output::OutputFormat;

/// Leaderboard history migration and charts.
#[derive(Parser)]
#[command(name = "lbh")]
#[command(author, version)]
#[command(about = "Leaderboard history migration and charts")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  lbh migrate --dry-run       Show what would be merged
  lbh migrate --level mAp2V   Migrate a single level
  lbh series mAp2V            Rank-1 holders and axis ticks
  lbh plot mAp2V -o best.svg  Render the chart")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding canonical records and legacy files
    #[arg(long, global = true, env = "LBH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Path of the level index JSON
    #[arg(long, global = true, env = "LBH_LEVEL_INDEX")]
    index: Option<PathBuf>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge legacy history files into the canonical records
    Migrate {
        /// Only migrate these level ids (repeatable)
        #[arg(short, long = "level", value_name = "ID")]
        levels: Vec<String>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Read legacy times as UTC instead of the configured zone
        #[arg(long)]
        utc: bool,
    },

    /// Show the rank-1 step series of a level
    Series {
        /// Level id
        level: String,

        #[arg(short, long, default_value_t = Category::Any)]
        category: Category,
    },

    /// Render the rank-1 step series of a level as SVG
    Plot {
        /// Level id
        level: String,

        #[arg(short, long, default_value_t = Category::Any)]
        category: Category,

        /// Output path (default: <ID>-<CATEGORY>.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show when the best score of a level improved
    Timeline {
        /// Level id
        level: String,

        #[arg(short, long, default_value_t = Category::Any)]
        category: Category,

        /// Also list groups that tied the record
        #[arg(long)]
        ties: bool,
    },

    /// Show the record and legacy file paths of a level
    Locate {
        /// Level id
        level: String,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,

        /// Print installation instructions instead of the script
        #[arg(long)]
        instructions: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .lbhrc.toml
    let config = LbhConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let ctx = StoreContext {
        data_dir: cli
            .data_dir
            .unwrap_or_else(|| PathBuf::from(config.data_dir())),
        level_index: cli
            .index
            .unwrap_or_else(|| PathBuf::from(config.level_index())),
    };

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Migrate {
            levels,
            dry_run,
            utc,
        } => {
            let zone = if utc { Zone::Utc } else { config.timezone() };
            migrate::run(&ctx, levels, dry_run, zone, format)
        }
        Commands::Series { level, category } => series::run(&ctx, &level, category, format),
        Commands::Plot {
            level,
            category,
            output,
        } => plot::run(
            &ctx,
            &level,
            category,
            output.as_deref(),
            config.plot_size(),
            format,
        ),
        Commands::Timeline {
            level,
            category,
            ties,
        } => timeline::run(&ctx, &level, category, ties, format),
        Commands::Locate { level } => locate::run(&ctx, &level, format),
        Commands::Completions {
            shell,
            instructions,
        } => completions::run(shell, &mut Cli::command(), instructions, format),
    }
}

mod app;
mod commands;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "litlearn-cli", about = "Review completed papers on a spaced repetition schedule", version)]
struct Cli {
    /// Folder holding data/papers.json (default: platform data dir)
    #[arg(long, global = true, env = "LITLEARN_DIR")]
    data_dir: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<String>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// List papers due for review today
    Due,

    /// Run an interactive review session
    Review,

    /// Record one recall judgment without the interactive prompt
    Judge {
        /// Paper id prefix, DOI, or title prefix
        paper: String,
        /// The main claims were recalled
        #[arg(long, conflicts_with = "forgot", required_unless_present = "forgot")]
        recalled: bool,
        /// The main claims were not recalled
        #[arg(long)]
        forgot: bool,
    },

    /// Show the review schedule and history of a paper
    Show {
        /// Paper id prefix, DOI, or title prefix
        paper: String,
    },

    /// Show review counters and upcoming papers
    Stats,

    /// Complete a paper's excerpt and start its review schedule
    Complete {
        /// Paper id prefix, DOI, or title prefix
        paper: String,
        /// Excerpt JSON file (use "-" to read from stdin)
        #[arg(long)]
        excerpt: String,
    },
}

fn parse_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid --today '{}' (expected YYYY-MM-DD)", s)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let today = parse_today(cli.today.as_deref())?;
    let app = app::App::new(cli.data_dir, today)?;

    match cli.command {
        Command::Due => commands::due::run(&app, &cli.format, use_color)?,
        Command::Review => commands::review::run_interactive(&app, use_color)?,
        Command::Judge { paper, recalled, forgot } => {
            let recalled = recalled && !forgot;
            commands::review::run_judge(&app, &paper, recalled, &cli.format, use_color)?;
        }
        Command::Show { paper } => commands::show::run(&app, &paper, &cli.format, use_color)?,
        Command::Stats => commands::stats::run(&app, &cli.format, use_color)?,
        Command::Complete { paper, excerpt } => {
            commands::complete::run(&app, &paper, &excerpt, &cli.format, use_color)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}

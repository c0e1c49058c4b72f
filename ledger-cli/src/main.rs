//! ledger: categorize a bank export and report spend against budget goals
//!
//! Usage:
//!   ledger --csv FILE --rule Housing=cheque summary
//!   ledger --csv FILE periods --freq M
//!   ledger --csv FILE compare --freq 2W --period 1 --goal housing=500000
//!   ledger --csv FILE export --out annotated.csv

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ledger_core::Frequency;
use ledger_finance::BudgetTracker;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod report;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "ledger",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LEDGER_BUILD_SHA"), ")"),
    about = "Categorize a bank export and compare spend with budget goals"
)]
struct Cli {
    /// Bank export CSV (falls back to `input.csv` from the config)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Config file (default: ~/.ledger/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keyword rule, repeatable. Applied after rules from the config
    #[arg(long = "rule", value_name = "CATEGORY=KEYWORD", value_parser = config::split_pair, global = true)]
    rules: Vec<(String, String)>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Total withdrawals per category
    Summary,

    /// Withdrawals per category for every period
    Periods {
        /// D, W, 2W, M, Q or Y (default from config, else 2W)
        #[arg(long)]
        freq: Option<Frequency>,
    },

    /// Average withdrawals per period for each category
    Averages {
        #[arg(long)]
        freq: Option<Frequency>,
    },

    /// Baseline budget derived from average spend
    Baseline {
        #[arg(long)]
        freq: Option<Frequency>,
    },

    /// Compare one period's spend with budget goals
    Compare {
        #[arg(long)]
        freq: Option<Frequency>,

        /// 1 = most recent period, 2 = the one before, ...
        #[arg(long)]
        period: Option<usize>,

        /// Goal, repeatable. Overrides the config's goal for that category
        #[arg(long = "goal", value_name = "CATEGORY=AMOUNT", value_parser = config::parse_goal)]
        goals: Vec<(String, f64)>,
    },

    /// List rows sharing date, amounts and description with another row
    Duplicates,

    /// Write the categorized ledger to CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config(cli.config.as_deref())?;
    let mut tracker = open_tracker(&cli, &cfg)?;
    let freq = |f: Option<Frequency>| f.unwrap_or(cfg.report.frequency);

    match cli.command {
        Command::Summary => {
            let totals = tracker.totals_by_category()?;
            emit(cli.json, &totals, || report::category_amounts(&totals))?;
        }

        Command::Periods { freq: f } => {
            let table = tracker.totals_by_category_and_period(freq(f))?;
            emit(cli.json, &table, || report::period_table(&table))?;
        }

        Command::Averages { freq: f } => {
            let avgs = tracker.averages_by_period(freq(f))?;
            emit(cli.json, &avgs, || report::category_amounts(&avgs))?;
        }

        Command::Baseline { freq: f } => {
            let budget = tracker.generate_baseline_budget(freq(f))?;
            emit(cli.json, &budget, || report::baseline(&budget))?;
        }

        Command::Compare {
            freq: f,
            period,
            goals,
        } => {
            for (category, amount) in &goals {
                tracker.add_goal(category, *amount);
            }
            let period = period.unwrap_or(cfg.report.period_index);
            let result = tracker.compare_to_goals(freq(f), period)?;
            emit(cli.json, &result, || report::goal_report(&result))?;
        }

        Command::Duplicates => {
            let dups = tracker.detect_duplicates();
            emit(cli.json, &dups, || {
                format!(
                    "Found {} duplicate transactions.\n{}",
                    dups.len(),
                    report::transactions(&dups)
                )
            })?;
        }

        Command::Export { out } => {
            tracker
                .export_csv(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            println!(
                "Exported {} transactions to {}",
                tracker.ledger().len(),
                out.display()
            );
        }
    }

    Ok(())
}

/// Priority: RUST_LOG env var > --verbose flag > default (info)
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();
}

/// Load the export and apply config and command-line rules and goals.
fn open_tracker(cli: &Cli, cfg: &Config) -> Result<BudgetTracker> {
    let Some(csv_path) = cli.csv.clone().or_else(|| cfg.input.csv.clone()) else {
        bail!("no input file (pass --csv <path> or set input.csv in the config)");
    };
    if !csv_path.exists() {
        bail!("CSV not found: {}", csv_path.display());
    }

    let mut tracker = BudgetTracker::load(&csv_path)
        .with_context(|| format!("loading {}", csv_path.display()))?;

    for rule in &cfg.rules {
        for keyword in &rule.keywords {
            tracker.apply_rule(&rule.category, keyword);
        }
    }
    for (category, keyword) in &cli.rules {
        tracker.apply_rule(category, keyword);
    }
    for (category, amount) in &cfg.goals {
        tracker.add_goal(category, *amount);
    }

    settle_categories(&mut tracker)?;
    Ok(tracker)
}

/// Categories read back from an annotated export are kept unless there are
/// rules to apply.
fn settle_categories(tracker: &mut BudgetTracker) -> Result<()> {
    if tracker.rules().is_empty() {
        let filled = tracker.fill_missing_categories();
        debug!(filled, "Keeping categories from input file");
    } else {
        tracker.categorize()?;
    }
    Ok(())
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

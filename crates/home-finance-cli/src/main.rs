mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::budget::{BudgetReviewArgs, BudgetStatusArgs};
use commands::debt::AmortizeArgs;

/// Personal finance planning calculations
#[derive(Parser)]
#[command(
    name = "hfa",
    version,
    about = "Personal finance planning calculations",
    long_about = "A CLI for personal finance planning calculations with decimal \
                  precision. Builds fixed-rate loan amortization schedules and \
                  classifies budget utilization per spending category."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a fixed-rate loan amortization schedule
    Amortize(AmortizeArgs),
    /// Classify spending against a single budget limit
    BudgetStatus(BudgetStatusArgs),
    /// Review a month of category budgets
    BudgetReview(BudgetReviewArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::debt::run_amortize(args),
        Commands::BudgetStatus(args) => commands::budget::run_budget_status(args),
        Commands::BudgetReview(args) => commands::budget::run_budget_review(args),
        Commands::Version => {
            println!("hfa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

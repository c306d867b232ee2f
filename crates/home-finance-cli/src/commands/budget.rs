use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use home_finance_core::budget::utilization::{self, BudgetCategory, BudgetReviewInput};

use crate::input;

/// Arguments for classifying a single category
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BudgetStatusArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Category name
    #[arg(long, default_value = "uncategorized")]
    pub category: String,

    /// Amount spent so far this month
    #[arg(long)]
    pub spent: Option<Decimal>,

    /// Monthly limit for the category
    #[arg(long)]
    pub limit: Option<Decimal>,
}

/// Arguments for reviewing a month of category budgets
#[derive(Args)]
pub struct BudgetReviewArgs {
    /// Path to JSON or YAML input file holding the category list
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_budget_status(args: BudgetStatusArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let category: BudgetCategory = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        BudgetCategory {
            category: args.category,
            spent: args
                .spent
                .ok_or("--spent is required (or provide --input)")?,
            limit: args
                .limit
                .ok_or("--limit is required (or provide --input)")?,
        }
    };

    let result = utilization::classify(&category)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_budget_review(args: BudgetReviewArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let review_input: BudgetReviewInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input file (or piped JSON) is required for a budget review".into());
    };

    let result = utilization::review(&review_input)?;
    Ok(serde_json::to_value(result)?)
}

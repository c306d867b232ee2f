use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::{types::*, HomeFinanceError, HomeFinanceResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// One spending category measured against its monthly limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub category: String,
    pub spent: Money,
    pub limit: Money,
}

/// Utilization severity, ordered from relaxed to over budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetLevel {
    Ok,
    Neutral,
    Warning,
    Danger,
}

impl std::fmt::Display for BudgetLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Neutral => write!(f, "NEUTRAL"),
            Self::Warning => write!(f, "WARNING"),
            Self::Danger => write!(f, "DANGER"),
        }
    }
}

/// Classification for a single category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetStatus {
    /// Unclamped spent / limit. Above 1 when over budget; callers that need
    /// the overshoot magnitude read this, not `percentage`.
    pub ratio: Rate,
    /// ratio * 100 capped at 100, so a progress bar never overflows.
    pub percentage: Decimal,
    pub level: BudgetLevel,
}

/// Input for `review`: the month's category list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReviewInput {
    pub categories: Vec<BudgetCategory>,
}

/// Per-category line in a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStatus {
    pub category: String,
    pub spent: Money,
    pub limit: Money,
    pub ratio: Rate,
    pub percentage: Decimal,
    pub level: BudgetLevel,
}

/// Output from `review`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetReviewOutput {
    pub statuses: Vec<CategoryStatus>,
    pub total_spent: Money,
    pub total_limit: Money,
    /// Classification of the summed spent against the summed limit.
    pub overall: BudgetStatus,
    pub over_limit_count: usize,
    /// Category with the highest unclamped ratio (first wins ties).
    pub worst_category: String,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

// Left-inclusive floors: a ratio equal to a floor belongs to that level.
const NEUTRAL_FLOOR: Rate = dec!(0.60);
const WARNING_FLOOR: Rate = dec!(0.85);
const DANGER_FLOOR: Rate = dec!(1.00);

const FULL_BAR: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify one category's spending against its limit.
pub fn classify(category: &BudgetCategory) -> HomeFinanceResult<ComputationOutput<BudgetStatus>> {
    let start = Instant::now();

    validate_category(category, None)?;
    let status = status_for(category.spent, category.limit);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Budget Utilization Classification",
        &serde_json::json!({
            "category": category.category,
            "spent": category.spent.to_string(),
            "limit": category.limit.to_string(),
            "floors": {
                "neutral": NEUTRAL_FLOOR.to_string(),
                "warning": WARNING_FLOOR.to_string(),
                "danger": DANGER_FLOOR.to_string(),
            },
            "percentage_cap": FULL_BAR.to_string(),
        }),
        Vec::new(),
        elapsed,
        status,
    ))
}

/// Review a whole month of category budgets: per-category statuses plus
/// totals, an overall classification, and the worst offender.
pub fn review(
    input: &BudgetReviewInput,
) -> HomeFinanceResult<ComputationOutput<BudgetReviewOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.categories.is_empty() {
        return Err(HomeFinanceError::InvalidBudgetCategory {
            field: "categories".into(),
            reason: "At least one category is required".into(),
        });
    }

    let mut statuses: Vec<CategoryStatus> = Vec::with_capacity(input.categories.len());
    let mut total_spent = Decimal::ZERO;
    let mut total_limit = Decimal::ZERO;
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, cat) in input.categories.iter().enumerate() {
        validate_category(cat, Some(i))?;
        if !seen.insert(cat.category.as_str()) {
            warnings.push(format!(
                "Category '{}' appears more than once; entries are classified separately.",
                cat.category
            ));
        }

        let status = status_for(cat.spent, cat.limit);
        total_spent += cat.spent;
        total_limit += cat.limit;

        statuses.push(CategoryStatus {
            category: cat.category.clone(),
            spent: cat.spent,
            limit: cat.limit,
            ratio: status.ratio,
            percentage: status.percentage,
            level: status.level,
        });
    }

    // Every limit is positive, so total_limit can never be zero here
    let overall = status_for(total_spent, total_limit);
    let over_limit_count = statuses
        .iter()
        .filter(|s| s.level == BudgetLevel::Danger)
        .count();

    let mut worst = &statuses[0];
    for s in &statuses[1..] {
        if s.ratio > worst.ratio {
            worst = s;
        }
    }
    let worst_category = worst.category.clone();

    let output = BudgetReviewOutput {
        statuses,
        total_spent,
        total_limit,
        overall,
        over_limit_count,
        worst_category,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Budget Utilization Review",
        &serde_json::json!({
            "category_count": input.categories.len(),
            "floors": {
                "neutral": NEUTRAL_FLOOR.to_string(),
                "warning": WARNING_FLOOR.to_string(),
                "danger": DANGER_FLOOR.to_string(),
            },
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_category(
    category: &BudgetCategory,
    index: Option<usize>,
) -> HomeFinanceResult<()> {
    if category.limit <= Decimal::ZERO {
        return Err(HomeFinanceError::InvalidBudgetCategory {
            field: indexed_field("limit", index),
            reason: "Limit must be positive".into(),
        });
    }
    if category.spent < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidBudgetCategory {
            field: indexed_field("spent", index),
            reason: "Spent cannot be negative".into(),
        });
    }
    Ok(())
}

fn indexed_field(field: &str, index: Option<usize>) -> String {
    match index {
        Some(i) => format!("categories[{i}].{field}"),
        None => field.to_string(),
    }
}

fn status_for(spent: Money, limit: Money) -> BudgetStatus {
    let ratio = spent / limit;
    let percentage = (ratio * FULL_BAR).min(FULL_BAR).round_dp(DISPLAY_PRECISION);
    BudgetStatus {
        ratio,
        percentage,
        level: level_for(ratio),
    }
}

fn level_for(ratio: Rate) -> BudgetLevel {
    if ratio >= DANGER_FLOOR {
        BudgetLevel::Danger
    } else if ratio >= WARNING_FLOOR {
        BudgetLevel::Warning
    } else if ratio >= NEUTRAL_FLOOR {
        BudgetLevel::Neutral
    } else {
        BudgetLevel::Ok
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn category(name: &str, spent: Decimal, limit: Decimal) -> BudgetCategory {
        BudgetCategory {
            category: name.into(),
            spent,
            limit,
        }
    }

    #[test]
    fn test_ok_level() {
        let result = classify(&category("groceries", dec!(100), dec!(500))).unwrap();
        let status = &result.result;

        assert_eq!(status.level, BudgetLevel::Ok);
        assert_eq!(status.ratio, dec!(0.2));
        assert_eq!(status.percentage, dec!(20));
    }

    #[test]
    fn test_neutral_level() {
        let result = classify(&category("food", dec!(120), dec!(150))).unwrap();
        let status = &result.result;

        assert_eq!(status.level, BudgetLevel::Neutral);
        assert_eq!(status.ratio, dec!(0.8));
        assert_eq!(status.percentage, dec!(80));
    }

    #[test]
    fn test_warning_level() {
        let result = classify(&category("rent", dec!(90), dec!(100))).unwrap();
        let status = &result.result;

        assert_eq!(status.level, BudgetLevel::Warning);
        assert_eq!(status.percentage, dec!(90));
    }

    #[test]
    fn test_danger_clamps_percentage() {
        let result = classify(&category("transport", dec!(80), dec!(60))).unwrap();
        let status = &result.result;

        assert_eq!(status.level, BudgetLevel::Danger);
        assert_eq!(status.percentage, dec!(100));
        // Ratio stays unclamped for callers that need the overshoot
        assert!(status.ratio > Decimal::ONE);
        assert_eq!(status.ratio.round_dp(4), dec!(1.3333));
    }

    #[test]
    fn test_floor_boundaries_are_left_inclusive() {
        let cases = [
            (dec!(59.99), BudgetLevel::Ok),
            (dec!(60), BudgetLevel::Neutral),
            (dec!(84.99), BudgetLevel::Neutral),
            (dec!(85), BudgetLevel::Warning),
            (dec!(99.99), BudgetLevel::Warning),
            (dec!(100), BudgetLevel::Danger),
        ];
        for (spent, expected) in cases {
            let result = classify(&category("x", spent, dec!(100))).unwrap();
            assert_eq!(
                result.result.level, expected,
                "spent {spent} of 100 should be {expected}"
            );
        }
    }

    #[test]
    fn test_zero_spent() {
        let result = classify(&category("savings", Decimal::ZERO, dec!(300))).unwrap();
        let status = &result.result;

        assert_eq!(status.level, BudgetLevel::Ok);
        assert_eq!(status.ratio, Decimal::ZERO);
        assert_eq!(status.percentage, Decimal::ZERO);
    }

    #[test]
    fn test_zero_limit_error() {
        let err = classify(&category("misc", dec!(20), Decimal::ZERO)).unwrap_err();
        match err {
            HomeFinanceError::InvalidBudgetCategory { field, reason } => {
                assert_eq!(field, "limit");
                assert!(reason.contains("positive"));
            }
            other => panic!("Expected InvalidBudgetCategory for limit, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_spent_error() {
        let err = classify(&category("misc", dec!(-5), dec!(100))).unwrap_err();
        match err {
            HomeFinanceError::InvalidBudgetCategory { field, .. } => {
                assert_eq!(field, "spent");
            }
            other => panic!("Expected InvalidBudgetCategory for spent, got {other:?}"),
        }
    }

    #[test]
    fn test_level_order_matches_severity() {
        assert!(BudgetLevel::Ok < BudgetLevel::Neutral);
        assert!(BudgetLevel::Neutral < BudgetLevel::Warning);
        assert!(BudgetLevel::Warning < BudgetLevel::Danger);
    }

    #[test]
    fn test_level_monotonic_in_spending() {
        let spends = [
            dec!(0),
            dec!(30),
            dec!(59.99),
            dec!(60),
            dec!(75),
            dec!(85),
            dec!(99),
            dec!(100),
            dec!(180),
        ];
        let mut previous = BudgetLevel::Ok;
        for spent in spends {
            let level = classify(&category("x", spent, dec!(100)))
                .unwrap()
                .result
                .level;
            assert!(
                level >= previous,
                "level dropped from {previous} to {level} at spent {spent}"
            );
            previous = level;
        }
    }

    #[test]
    fn test_percentage_stays_in_bar_range() {
        for spent in [dec!(0), dec!(42.5), dec!(100), dec!(250), dec!(10_000)] {
            let status = classify(&category("x", spent, dec!(100))).unwrap().result;
            assert!(status.percentage >= Decimal::ZERO);
            assert!(status.percentage <= dec!(100));
        }
    }

    #[test]
    fn test_level_wire_format() {
        assert_eq!(
            serde_json::to_value(BudgetLevel::Ok).unwrap(),
            serde_json::json!("OK")
        );
        assert_eq!(
            serde_json::to_value(BudgetLevel::Danger).unwrap(),
            serde_json::json!("DANGER")
        );
        assert_eq!(BudgetLevel::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_review_aggregates() {
        let input = BudgetReviewInput {
            categories: vec![
                category("food", dec!(120), dec!(150)),
                category("transport", dec!(80), dec!(60)),
                category("leisure", dec!(20), dec!(100)),
            ],
        };
        let result = review(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.statuses.len(), 3);
        assert_eq!(out.total_spent, dec!(220));
        assert_eq!(out.total_limit, dec!(310));
        assert_eq!(out.over_limit_count, 1);
        assert_eq!(out.worst_category, "transport");
        // 220 / 310 ~ 0.71, inside the neutral band
        assert_eq!(out.overall.level, BudgetLevel::Neutral);
        assert_eq!(out.statuses[0].level, BudgetLevel::Neutral);
        assert_eq!(out.statuses[1].level, BudgetLevel::Danger);
        assert_eq!(out.statuses[2].level, BudgetLevel::Ok);
    }

    #[test]
    fn test_review_empty_error() {
        let input = BudgetReviewInput { categories: vec![] };
        let err = review(&input).unwrap_err();
        match err {
            HomeFinanceError::InvalidBudgetCategory { field, .. } => {
                assert_eq!(field, "categories");
            }
            other => panic!("Expected InvalidBudgetCategory for categories, got {other:?}"),
        }
    }

    #[test]
    fn test_review_reports_indexed_field() {
        let input = BudgetReviewInput {
            categories: vec![
                category("food", dec!(10), dec!(100)),
                category("misc", dec!(10), Decimal::ZERO),
            ],
        };
        let err = review(&input).unwrap_err();
        match err {
            HomeFinanceError::InvalidBudgetCategory { field, .. } => {
                assert_eq!(field, "categories[1].limit");
            }
            other => panic!("Expected indexed InvalidBudgetCategory, got {other:?}"),
        }
    }

    #[test]
    fn test_review_warns_on_duplicate_names() {
        let input = BudgetReviewInput {
            categories: vec![
                category("food", dec!(10), dec!(100)),
                category("food", dec!(20), dec!(100)),
            ],
        };
        let result = review(&input).unwrap();
        assert!(
            result.warnings.iter().any(|w| w.contains("more than once")),
            "expected a duplicate-category warning"
        );
        assert_eq!(result.result.statuses.len(), 2);
    }

    #[test]
    fn test_review_worst_takes_first_on_tie() {
        let input = BudgetReviewInput {
            categories: vec![
                category("first", dec!(50), dec!(100)),
                category("second", dec!(25), dec!(50)),
            ],
        };
        let result = review(&input).unwrap();
        assert_eq!(result.result.worst_category, "first");
    }
}

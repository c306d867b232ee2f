//! Fixed-rate loan amortization.
//!
//! Produces the level monthly payment and the full month-by-month schedule
//! (interest/principal split, running balance). All arithmetic uses
//! `rust_decimal::Decimal`; reported balances are rounded to display
//! precision at emission, the running balance never is.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeFinanceError;
use crate::types::*;
use crate::HomeFinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Input for a fixed-rate, fully amortizing loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: Money,
    /// Nominal annual rate in percentage points: 12 means 12% per year.
    /// A value like 0.12 is read as 0.12% per year, not as a fraction.
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
}

/// Headline figures for the whole loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// One month of the schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based month index.
    pub month: u32,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Balance after this payment, rounded to display precision. The
    /// unrounded balance drives the next month's interest, so the final
    /// row may report a sub-cent residue instead of exactly zero.
    pub remaining_balance: Money,
}

/// Output from `compute_schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub summary: LoanSummary,
    pub rows: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Reported balances within a cent of zero count as paid off.
const BALANCE_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the full amortization schedule for a fixed-rate loan.
///
/// The unrounded payment is computed once and reused for every row, so
/// `principal_portion + interest_portion` reconstructs it exactly; only
/// each row's reported `remaining_balance` is rounded.
pub fn compute_schedule(
    params: &LoanParameters,
) -> HomeFinanceResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(params)?;

    if params.annual_rate_percent > Decimal::ZERO && params.annual_rate_percent < Decimal::ONE {
        warnings.push(format!(
            "annual_rate_percent = {} is read as percentage points ({}% per year), \
             not as a rate fraction",
            params.annual_rate_percent, params.annual_rate_percent
        ));
    }

    let monthly_rate: Rate = params.annual_rate_percent / PERCENT / MONTHS_PER_YEAR;
    let payment = monthly_payment(params.principal, monthly_rate, params.term_months);

    let total_paid = payment * Decimal::from(params.term_months);
    let total_interest = total_paid - params.principal;

    let mut rows = Vec::with_capacity(params.term_months as usize);
    let mut balance = params.principal;

    for month in 1..=params.term_months {
        let interest_portion = balance * monthly_rate;
        let principal_portion = payment - interest_portion;
        balance -= principal_portion;

        rows.push(AmortizationRow {
            month,
            payment,
            principal_portion,
            interest_portion,
            remaining_balance: balance.round_dp(DISPLAY_PRECISION),
        });
    }

    let output = AmortizationOutput {
        summary: LoanSummary {
            monthly_payment: payment,
            total_paid,
            total_interest,
        },
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Annuity Amortization",
        &serde_json::json!({
            "principal": params.principal.to_string(),
            "annual_rate_percent": params.annual_rate_percent.to_string(),
            "monthly_rate": monthly_rate.to_string(),
            "term_months": params.term_months,
            "rounding": "reported balances at 2 dp; running balance full precision",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// True when a reported balance is close enough to zero to count as paid off.
pub fn is_paid_off(balance: Money) -> bool {
    balance.abs() < BALANCE_EPSILON
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate(params: &LoanParameters) -> HomeFinanceResult<()> {
    if params.principal <= Decimal::ZERO {
        return Err(HomeFinanceError::InvalidLoanParameters {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if params.term_months == 0 {
        return Err(HomeFinanceError::InvalidLoanParameters {
            field: "term_months".into(),
            reason: "Term must be at least 1 month".into(),
        });
    }
    if params.annual_rate_percent < Decimal::ZERO {
        return Err(HomeFinanceError::InvalidLoanParameters {
            field: "annual_rate_percent".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    Ok(())
}

/// Level monthly payment. Zero-rate loans split the principal evenly; the
/// annuity formula is not defined there (denominator collapses to zero).
fn monthly_payment(principal: Money, monthly_rate: Rate, term_months: u32) -> Money {
    if monthly_rate.is_zero() {
        return principal / Decimal::from(term_months);
    }
    let factor = compound(monthly_rate, term_months);
    principal * (monthly_rate * factor) / (factor - Decimal::ONE)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
fn compound(rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

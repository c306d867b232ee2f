use home_finance_core::debt::amortization::{self, LoanParameters};
use home_finance_core::HomeFinanceError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Amortization schedule tests
// ===========================================================================

fn one_year_loan() -> LoanParameters {
    // 1000 borrowed for a year at 12% nominal annual
    LoanParameters {
        principal: dec!(1000),
        annual_rate_percent: dec!(12),
        term_months: 12,
    }
}

fn car_loan() -> LoanParameters {
    LoanParameters {
        principal: dec!(18_500),
        annual_rate_percent: dec!(5.5),
        term_months: 36,
    }
}

#[test]
fn test_one_year_loan_headline_numbers() {
    let result = amortization::compute_schedule(&one_year_loan()).unwrap();
    let out = &result.result;

    assert_eq!(out.summary.monthly_payment.round_dp(2), dec!(88.85));
    assert_eq!(out.summary.total_paid.round_dp(2), dec!(1066.19));
    assert_eq!(out.summary.total_interest.round_dp(2), dec!(66.19));

    // Month 1 interest is one month of 1% on the full principal
    assert_eq!(out.rows[0].interest_portion.round_dp(2), dec!(10.00));

    // Month 12 closes the loan
    let last = out.rows.last().unwrap();
    assert_eq!(last.month, 12);
    assert!(amortization::is_paid_off(last.remaining_balance));
}

#[test]
fn test_schedule_has_one_row_per_month() {
    let result = amortization::compute_schedule(&car_loan()).unwrap();
    let rows = &result.result.rows;

    assert_eq!(rows.len(), 36);
    assert_eq!(rows.first().unwrap().month, 1);
    assert_eq!(rows.last().unwrap().month, 36);
}

#[test]
fn test_interest_free_loan_divides_evenly() {
    let params = LoanParameters {
        principal: dec!(1200),
        annual_rate_percent: Decimal::ZERO,
        term_months: 12,
    };
    let result = amortization::compute_schedule(&params).unwrap();
    let out = &result.result;

    assert_eq!(out.summary.monthly_payment, dec!(100));
    assert_eq!(out.summary.total_paid, dec!(1200));
    assert_eq!(out.summary.total_interest, Decimal::ZERO);
    for row in &out.rows {
        assert_eq!(row.interest_portion, Decimal::ZERO);
    }
}

#[test]
fn test_rejects_negative_principal() {
    let params = LoanParameters {
        principal: dec!(-100),
        annual_rate_percent: dec!(5),
        term_months: 12,
    };
    let err = amortization::compute_schedule(&params).unwrap_err();

    match &err {
        HomeFinanceError::InvalidLoanParameters { field, reason } => {
            assert_eq!(field, "principal");
            assert!(reason.contains("positive"));
        }
        other => panic!("Expected InvalidLoanParameters, got {other:?}"),
    }
    assert!(err.to_string().contains("Invalid loan parameters"));
}

#[test]
fn test_rows_decompose_into_unrounded_payment() {
    let result = amortization::compute_schedule(&car_loan()).unwrap();
    let payment = result.result.summary.monthly_payment;

    for row in &result.result.rows {
        assert_eq!(row.principal_portion + row.interest_portion, payment);
    }
}

#[test]
fn test_reported_balance_never_increases() {
    let result = amortization::compute_schedule(&car_loan()).unwrap();
    let rows = &result.result.rows;

    for pair in rows.windows(2) {
        assert!(
            pair[1].remaining_balance <= pair[0].remaining_balance,
            "balance rose at month {}",
            pair[1].month
        );
    }
    assert!(amortization::is_paid_off(rows.last().unwrap().remaining_balance));
}

#[test]
fn test_summary_identities_hold_unrounded() {
    for params in [one_year_loan(), car_loan()] {
        let result = amortization::compute_schedule(&params).unwrap();
        let summary = &result.result.summary;

        assert_eq!(
            summary.total_paid,
            summary.monthly_payment * Decimal::from(params.term_months)
        );
        assert_eq!(summary.total_interest, summary.total_paid - params.principal);
    }
}

#[test]
fn test_same_input_same_schedule() {
    let first = amortization::compute_schedule(&car_loan()).unwrap();
    let second = amortization::compute_schedule(&car_loan()).unwrap();

    assert_eq!(
        serde_json::to_value(&first.result).unwrap(),
        serde_json::to_value(&second.result).unwrap()
    );
}

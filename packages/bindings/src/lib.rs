use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Debt
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let params: home_finance_core::debt::amortization::LoanParameters =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = home_finance_core::debt::amortization::compute_schedule(&params)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// Single-category input as the dashboard sends it; the name is optional
/// on that side.
#[derive(serde::Deserialize)]
struct BudgetStatusBindingInput {
    #[serde(default = "uncategorized")]
    category: String,
    spent: rust_decimal::Decimal,
    limit: rust_decimal::Decimal,
}

fn uncategorized() -> String {
    "uncategorized".to_string()
}

#[napi]
pub fn budget_status(input_json: String) -> NapiResult<String> {
    let binding_input: BudgetStatusBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let category = home_finance_core::budget::utilization::BudgetCategory {
        category: binding_input.category,
        spent: binding_input.spent,
        limit: binding_input.limit,
    };
    let output =
        home_finance_core::budget::utilization::classify(&category).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn budget_review(input_json: String) -> NapiResult<String> {
    let input: home_finance_core::budget::utilization::BudgetReviewInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = home_finance_core::budget::utilization::review(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

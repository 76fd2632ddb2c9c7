use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use mortgage_sim_core::simulation::financing::{self, FinancingInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Validate and simulate one financing; returns the JSON computation envelope.
#[napi]
pub fn simulate_financing(input_json: String) -> NapiResult<String> {
    let input: FinancingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = financing::simulate_financing(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Minimum monthly income for a monthly payment given as a decimal string.
#[napi]
pub fn minimum_qualifying_income(monthly_payment: String) -> NapiResult<i64> {
    let payment = Decimal::from_str(monthly_payment.trim()).map_err(to_napi_error)?;
    financing::minimum_qualifying_income(payment).map_err(to_napi_error)
}

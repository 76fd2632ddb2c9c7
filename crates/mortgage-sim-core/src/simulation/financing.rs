//! Mortgage financing simulation.
//!
//! Turns loan terms (price, down payment, rates, fees, term and start month)
//! into the financing summary kept for a client: financed capital, monthly
//! payment including insurance, total interest and insurance, minimum
//! qualifying income, and the acquisition / end-of-financing dates.
//!
//! All math in `rust_decimal::Decimal`; the three headline amounts are
//! rounded to cents half away from zero, every other field keeps full
//! precision.

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::SimulationError;
use crate::time_value::{level_payment, monthly_rate, MONTHS_PER_YEAR};
use crate::types::{round_money, with_metadata, ComputationOutput, Money, Percent};
use crate::SimulationResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Bank guarantee reserved on the capital left after the down payment (1.5%).
const BANK_GUARANTEE_RATE: Decimal = dec!(0.015);

/// Debt-to-income ceiling, in percent, used to derive the qualifying income.
const DEBT_TO_INCOME_CEILING_PCT: Decimal = dec!(35);

const METHODOLOGY: &str =
    "Level-payment mortgage simulation with fees, bank guarantee and insurance";

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Loan terms for one simulation.
///
/// Field names on the wire follow the simulation record columns
/// (`prix_bien`, `taux_interet`, ...). Fee fields are percentages of the
/// property price, not amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingInput {
    /// Client the simulation belongs to, if any. Passed through unchanged.
    #[serde(default)]
    pub client_id: Option<u64>,
    /// Loan term in years.
    #[serde(rename = "duree_annees")]
    pub term_years: u32,
    #[serde(rename = "prix_bien")]
    pub property_price: Money,
    /// Annual nominal interest rate (3.5 = 3.5%).
    #[serde(rename = "taux_interet")]
    pub interest_rate_pct: Percent,
    /// Annual insurance rate on the financed capital (0.3 = 0.3%).
    #[serde(rename = "taux_assurance")]
    pub insurance_rate_pct: Percent,
    #[serde(rename = "apport")]
    pub down_payment: Money,
    /// Month of acquisition, 1-12.
    #[serde(rename = "mois_debut")]
    pub start_month: u32,
    #[serde(rename = "annee_debut")]
    pub start_year: i32,
    #[serde(rename = "frais_agence")]
    pub agency_fee_pct: Percent,
    #[serde(rename = "frais_notaire")]
    pub notary_fee_pct: Percent,
    #[serde(rename = "travaux", default)]
    pub renovation_cost: Money,
    /// Expected yearly appreciation of the property. Informational only.
    #[serde(rename = "revalorisation_bien", default)]
    pub appreciation_pct: Percent,
}

/// Fully computed financing figures, in the shape they are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingSummary {
    pub client_id: Option<u64>,
    #[serde(rename = "prix_bien")]
    pub property_price: Money,
    #[serde(rename = "frais_notaire")]
    pub notary_fee: Money,
    #[serde(rename = "garantie_bancaire")]
    pub bank_guarantee: Money,
    #[serde(rename = "frais_agence")]
    pub agency_fee: Money,
    #[serde(rename = "apport")]
    pub down_payment: Money,
    /// Price less down payment, plus notary fee, guarantee, agency fee and works.
    #[serde(rename = "total_financer")]
    pub financed_capital: Money,
    #[serde(rename = "taux_interet")]
    pub interest_rate_pct: Percent,
    #[serde(rename = "taux_assurance")]
    pub insurance_rate_pct: Percent,
    /// Monthly loan payment plus the monthly insurance share, rounded to cents.
    #[serde(rename = "mensualite")]
    pub monthly_payment: Money,
    /// Everything paid above the financed capital over the term, rounded to cents.
    #[serde(rename = "interets_total")]
    pub total_interest: Money,
    #[serde(rename = "assurance_total")]
    pub total_insurance: Money,
    /// Minimum monthly income keeping the payment within 35% of income.
    #[serde(rename = "salaire_minimum")]
    pub minimum_income: i64,
    #[serde(rename = "duree_annees")]
    pub term_years: u32,
    #[serde(rename = "mois_debut")]
    pub start_month: u32,
    #[serde(rename = "annee_debut")]
    pub start_year: i32,
    #[serde(rename = "date_acquisition")]
    pub acquisition_date: NaiveDate,
    #[serde(rename = "date_financement")]
    pub financing_end_date: NaiveDate,
    #[serde(rename = "revalorisation_bien")]
    pub appreciation_pct: Percent,
    #[serde(rename = "travaux")]
    pub renovation_cost: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate the loan terms, run the simulation and wrap it with metadata.
pub fn simulate_financing(
    input: &FinancingInput,
) -> SimulationResult<ComputationOutput<FinancingSummary>> {
    let start = Instant::now();
    validate_financing_input(input)?;

    let summary = compute_financing(input)?;

    let mut warnings: Vec<String> = Vec::new();
    if input.down_payment > input.property_price {
        warnings.push(format!(
            "Down payment {} exceeds the property price {}; no bank guarantee applies",
            input.down_payment, input.property_price
        ));
    }
    if summary.financed_capital <= Decimal::ZERO {
        warnings.push(format!(
            "Financed capital {} is not positive; payment and qualifying income are not meaningful",
            summary.financed_capital
        ));
    }
    if input.interest_rate_pct.is_zero() {
        warnings.push("Zero interest rate: payment uses linear amortisation".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(METHODOLOGY, input, warnings, elapsed, summary))
}

/// Compute the financing summary for already-validated loan terms.
///
/// Pure and deterministic. Fails only when a figure is not representable
/// (overflow, zero annuity factor) or the start month is not a calendar
/// month.
pub fn compute_financing(input: &FinancingInput) -> SimulationResult<FinancingSummary> {
    let price = input.property_price;

    let agency_fee = percent_of(input.agency_fee_pct, price, "agency fee")?;
    let notary_fee = percent_of(input.notary_fee_pct, price, "notary fee")?;

    // Negative when the down payment exceeds the price; carried through as is.
    let capital_after_down_payment = price
        .checked_sub(input.down_payment)
        .ok_or_else(|| SimulationError::degenerate("capital after down payment"))?;
    let bank_guarantee = capital_after_down_payment
        .checked_mul(BANK_GUARANTEE_RATE)
        .ok_or_else(|| SimulationError::degenerate("bank guarantee"))?
        .max(Decimal::ZERO);

    let financed_capital = [notary_fee, bank_guarantee, agency_fee, input.renovation_cost]
        .iter()
        .try_fold(capital_after_down_payment, |acc, amount| acc.checked_add(*amount))
        .ok_or_else(|| SimulationError::degenerate("financed capital"))?;

    let term_months = input
        .term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| SimulationError::degenerate("term in months"))?;
    let term_months_dec = Decimal::from(term_months);

    let mut payment = level_payment(
        financed_capital,
        monthly_rate(input.interest_rate_pct),
        term_months,
    )?;
    let monthly_insurance = financed_capital
        .checked_mul(input.insurance_rate_pct)
        .ok_or_else(|| SimulationError::degenerate("monthly insurance"))?
        / dec!(100)
        / Decimal::from(MONTHS_PER_YEAR);
    payment = payment
        .checked_add(monthly_insurance)
        .ok_or_else(|| SimulationError::degenerate("monthly payment"))?;

    let total_insurance = financed_capital
        .checked_mul(input.insurance_rate_pct / dec!(100))
        .and_then(|yearly| yearly.checked_mul(Decimal::from(input.term_years)))
        .ok_or_else(|| SimulationError::degenerate("total insurance"))?;

    let total_interest = payment
        .checked_mul(term_months_dec)
        .and_then(|paid| paid.checked_sub(financed_capital))
        .ok_or_else(|| SimulationError::degenerate("total interest"))?;

    let minimum_income = minimum_qualifying_income(payment)?;
    let (acquisition_date, financing_end_date) =
        financing_dates(input.start_year, input.start_month, input.term_years)?;

    Ok(FinancingSummary {
        client_id: input.client_id,
        property_price: price,
        notary_fee,
        bank_guarantee,
        agency_fee,
        down_payment: input.down_payment,
        financed_capital,
        interest_rate_pct: input.interest_rate_pct,
        insurance_rate_pct: input.insurance_rate_pct,
        monthly_payment: round_money(payment),
        total_interest: round_money(total_interest),
        total_insurance: round_money(total_insurance),
        minimum_income,
        term_years: input.term_years,
        start_month: input.start_month,
        start_year: input.start_year,
        acquisition_date,
        financing_end_date,
        appreciation_pct: input.appreciation_pct,
        renovation_cost: input.renovation_cost,
    })
}

/// Minimum monthly income for which `monthly_payment` stays within the
/// 35% debt-to-income ceiling. Truncated toward zero, never rounded.
///
/// `compute_financing` passes the unrounded payment, so `salaire_minimum`
/// can sit one unit below `trunc(mensualite * 100 / 35)` when rounding the
/// payment to cents crosses an integer boundary (34.996 gives 99, while
/// the displayed 35.00 would give 100).
pub fn minimum_qualifying_income(monthly_payment: Money) -> SimulationResult<i64> {
    monthly_payment
        .checked_mul(dec!(100))
        .and_then(|scaled| scaled.checked_div(DEBT_TO_INCOME_CEILING_PCT))
        .and_then(|income| income.trunc().to_i64())
        .ok_or_else(|| SimulationError::degenerate("minimum qualifying income"))
}

/// Acquisition date (first day of the start month) and the date the loan
/// term ends, exactly `term_years` calendar years later.
pub fn financing_dates(
    start_year: i32,
    start_month: u32,
    term_years: u32,
) -> SimulationResult<(NaiveDate, NaiveDate)> {
    let acquisition = NaiveDate::from_ymd_opt(start_year, start_month, 1).ok_or_else(|| {
        SimulationError::DateError(format!(
            "{start_year}-{start_month:02} is not a valid acquisition month"
        ))
    })?;

    let end = term_years
        .checked_mul(MONTHS_PER_YEAR)
        .and_then(|months| acquisition.checked_add_months(Months::new(months)))
        .ok_or_else(|| {
            SimulationError::DateError(format!(
                "{acquisition} plus {term_years} years is out of the supported date range"
            ))
        })?;

    Ok((acquisition, end))
}

/// Check loan terms before simulating.
pub fn validate_financing_input(input: &FinancingInput) -> SimulationResult<()> {
    if input.term_years < 1 {
        return Err(invalid("duree_annees", "Loan term must be at least one year"));
    }
    if !(1..=12).contains(&input.start_month) {
        return Err(invalid("mois_debut", "Start month must be between 1 and 12"));
    }
    if input.property_price <= Decimal::ZERO {
        return Err(invalid("prix_bien", "Property price must be positive"));
    }
    if input.down_payment < Decimal::ZERO {
        return Err(invalid("apport", "Down payment cannot be negative"));
    }
    if input.interest_rate_pct < Decimal::ZERO {
        return Err(invalid("taux_interet", "Interest rate cannot be negative"));
    }
    if input.insurance_rate_pct < Decimal::ZERO {
        return Err(invalid("taux_assurance", "Insurance rate cannot be negative"));
    }
    if input.agency_fee_pct < Decimal::ZERO {
        return Err(invalid("frais_agence", "Agency fee cannot be negative"));
    }
    if input.notary_fee_pct < Decimal::ZERO {
        return Err(invalid("frais_notaire", "Notary fee cannot be negative"));
    }
    if input.renovation_cost < Decimal::ZERO {
        return Err(invalid("travaux", "Renovation cost cannot be negative"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn percent_of(pct: Percent, amount: Money, context: &str) -> SimulationResult<Money> {
    (pct / dec!(100))
        .checked_mul(amount)
        .ok_or_else(|| SimulationError::degenerate(context))
}

fn invalid(field: &str, reason: &str) -> SimulationError {
    SimulationError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

//! Persisted shape of a financing summary.
//!
//! A record carries the identifier and timestamps assigned on save, plus the
//! summary fields narrowed to their column types: amounts as `DECIMAL(15,2)`,
//! rates as `DECIMAL(5,2)`, counts as 32-bit integers. Values that would not
//! fit a column are rejected instead of being truncated by the database.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::simulation::financing::FinancingSummary;
use crate::types::{round_money, Money, Percent};
use crate::SimulationResult;

/// Exclusive bound of a `DECIMAL(15,2)` column (13 integer digits).
const MONEY_COLUMN_LIMIT: Decimal = dec!(10000000000000);

/// Exclusive bound of a `DECIMAL(5,2)` column (3 integer digits).
const PERCENT_COLUMN_LIMIT: Decimal = dec!(1000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: u64,
    #[serde(flatten)]
    pub summary: FinancingSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SimulationRecord {
    /// Build a record from a freshly computed summary.
    pub fn from_summary(
        id: u64,
        created_at: DateTime<Utc>,
        summary: FinancingSummary,
    ) -> SimulationResult<Self> {
        let s = summary;
        let summary = FinancingSummary {
            client_id: s.client_id,
            property_price: money_column("prix_bien", s.property_price)?,
            notary_fee: money_column("frais_notaire", s.notary_fee)?,
            bank_guarantee: money_column("garantie_bancaire", s.bank_guarantee)?,
            agency_fee: money_column("frais_agence", s.agency_fee)?,
            down_payment: money_column("apport", s.down_payment)?,
            financed_capital: money_column("total_financer", s.financed_capital)?,
            interest_rate_pct: percent_column("taux_interet", s.interest_rate_pct)?,
            insurance_rate_pct: percent_column("taux_assurance", s.insurance_rate_pct)?,
            monthly_payment: money_column("mensualite", s.monthly_payment)?,
            total_interest: money_column("interets_total", s.total_interest)?,
            total_insurance: money_column("assurance_total", s.total_insurance)?,
            minimum_income: integer_column("salaire_minimum", s.minimum_income)?,
            term_years: integer_column("duree_annees", s.term_years)?,
            start_month: integer_column("mois_debut", s.start_month)?,
            start_year: s.start_year,
            acquisition_date: s.acquisition_date,
            financing_end_date: s.financing_end_date,
            appreciation_pct: percent_column("revalorisation_bien", s.appreciation_pct)?,
            renovation_cost: money_column("travaux", s.renovation_cost)?,
        };

        Ok(Self {
            id,
            summary,
            created_at,
            updated_at: created_at,
        })
    }
}

fn money_column(column: &str, value: Money) -> SimulationResult<Money> {
    bounded(column, round_money(value), MONEY_COLUMN_LIMIT)
}

fn percent_column(column: &str, value: Percent) -> SimulationResult<Percent> {
    bounded(column, round_money(value), PERCENT_COLUMN_LIMIT)
}

fn bounded(column: &str, value: Decimal, limit: Decimal) -> SimulationResult<Decimal> {
    if value.abs() >= limit {
        return Err(SimulationError::ColumnOverflow {
            column: column.into(),
            value,
        });
    }
    Ok(value)
}

fn integer_column<T>(column: &str, value: T) -> SimulationResult<T>
where
    T: Copy + TryInto<i32> + Into<i64>,
{
    if <T as TryInto<i32>>::try_into(value).is_ok() {
        return Ok(value);
    }
    let wide: i64 = value.into();
    Err(SimulationError::ColumnOverflow {
        column: column.into(),
        value: Decimal::from(wide),
    })
}

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::SimulationError;
use crate::types::{Money, Percent, Rate};
use crate::SimulationResult;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Periodic monthly rate from an annual percentage (3.5 -> 0.0029166..).
pub fn monthly_rate(annual_pct: Percent) -> Rate {
    annual_pct / Decimal::from(MONTHS_PER_YEAR) / dec!(100)
}

/// Level (annuity) payment repaying `principal` over `n_months`.
///
/// Uses `principal * r / (1 - (1 + r)^-n)`. A zero rate has no annuity
/// factor, so the payment falls back to linear amortisation `principal / n`.
/// Terms long enough for `(1 + r)^-n` to vanish pay `principal * r`.
pub fn level_payment(
    principal: Money,
    monthly_rate: Rate,
    n_months: u32,
) -> SimulationResult<Money> {
    if n_months == 0 {
        return Err(SimulationError::InvalidInput {
            field: "n_months".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(n_months));
    }

    // (1 + r)^n past Decimal::MAX means (1 + r)^-n is below the smallest
    // representable step, so the payment converges to interest only.
    let discount = match (Decimal::ONE + monthly_rate).checked_powi(i64::from(n_months)) {
        Some(growth) => Decimal::ONE
            .checked_div(growth)
            .ok_or_else(|| SimulationError::degenerate("discount factor (1 + r)^-n"))?,
        None => Decimal::ZERO,
    };

    let denominator = Decimal::ONE - discount;
    if denominator.is_zero() {
        return Err(SimulationError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|interest| interest.checked_div(denominator))
        .ok_or_else(|| SimulationError::degenerate("level payment"))
}

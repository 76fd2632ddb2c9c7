use chrono::NaiveDate;
use mortgage_sim_core::simulation::financing::{
    compute_financing, minimum_qualifying_income, simulate_financing, FinancingInput,
};
use mortgage_sim_core::SimulationError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Reference scenario: 200k property, 20k down, 20 years at 3.5% + 0.3% cover
// ===========================================================================

fn reference_loan() -> FinancingInput {
    FinancingInput {
        client_id: None,
        term_years: 20,
        property_price: dec!(200_000),
        interest_rate_pct: dec!(3.5),
        insurance_rate_pct: dec!(0.3),
        down_payment: dec!(20_000),
        start_month: 1,
        start_year: 2025,
        agency_fee_pct: dec!(5),
        notary_fee_pct: dec!(7),
        renovation_cost: Decimal::ZERO,
        appreciation_pct: Decimal::ZERO,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_reference_scenario_known_answer() {
    let s = compute_financing(&reference_loan()).unwrap();

    // 180000 + 14000 notary + 2700 guarantee + 10000 agency
    assert_eq!(s.financed_capital, dec!(206_700));
    assert_eq!(s.monthly_payment, dec!(1250.45));
    assert_eq!(s.total_interest, dec!(93408.42));
    assert_eq!(s.total_insurance, dec!(12402.00));
    assert_eq!(s.minimum_income, 3572);
    assert_eq!(s.acquisition_date, date(2025, 1, 1));
    assert_eq!(s.financing_end_date, date(2045, 1, 1));
}

#[test]
fn test_reference_scenario_serialised_keys() {
    let s = compute_financing(&reference_loan()).unwrap();
    let json = serde_json::to_value(&s).unwrap();

    assert_eq!(json["mensualite"], "1250.45");
    assert_eq!(json["interets_total"], "93408.42");
    assert_eq!(json["assurance_total"], "12402.00");
    assert_eq!(json["salaire_minimum"], 3572);
    assert_eq!(json["date_financement"], "2045-01-01");
    assert!(json["client_id"].is_null());
}

#[test]
fn test_input_deserialises_from_record_keys() {
    let input: FinancingInput = serde_json::from_str(
        r#"{
            "client_id": 12,
            "prix_bien": "200000",
            "taux_interet": "3.5",
            "taux_assurance": "0.3",
            "apport": "20000",
            "mois_debut": 1,
            "annee_debut": 2025,
            "frais_agence": "5",
            "frais_notaire": "7",
            "duree_annees": 20
        }"#,
    )
    .unwrap();

    assert_eq!(input.client_id, Some(12));
    assert_eq!(input.renovation_cost, Decimal::ZERO);
    assert_eq!(input.appreciation_pct, Decimal::ZERO);
    let s = compute_financing(&input).unwrap();
    assert_eq!(s.monthly_payment, dec!(1250.45));
    assert_eq!(s.client_id, Some(12));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_compute_is_idempotent() {
    let input = reference_loan();
    let first = compute_financing(&input).unwrap();
    let second = compute_financing(&input).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_longer_term_lowers_payment_and_raises_interest() {
    let mut previous = compute_financing(&FinancingInput {
        term_years: 5,
        ..reference_loan()
    })
    .unwrap();

    for years in 6..=30 {
        let current = compute_financing(&FinancingInput {
            term_years: years,
            ..reference_loan()
        })
        .unwrap();
        assert!(
            current.monthly_payment < previous.monthly_payment,
            "payment did not drop at {years} years"
        );
        assert!(
            current.total_interest > previous.total_interest,
            "interest did not grow at {years} years"
        );
        previous = current;
    }
}

#[test]
fn test_twenty_five_year_known_answer() {
    let s = compute_financing(&FinancingInput {
        term_years: 25,
        ..reference_loan()
    })
    .unwrap();
    assert_eq!(s.monthly_payment, dec!(1086.46));
    assert_eq!(s.total_interest, dec!(119239.18));
    assert_eq!(s.total_insurance, dec!(15502.50));
    assert_eq!(s.minimum_income, 3104);
}

#[test]
fn test_payment_positive_for_positive_capital_and_rate() {
    for rate in [dec!(0.01), dec!(1), dec!(3.5), dec!(9.99), dec!(25)] {
        let s = compute_financing(&FinancingInput {
            interest_rate_pct: rate,
            insurance_rate_pct: Decimal::ZERO,
            ..reference_loan()
        })
        .unwrap();
        assert!(s.financed_capital > Decimal::ZERO);
        assert!(s.monthly_payment > Decimal::ZERO, "rate {rate}");
        assert!(s.total_interest > Decimal::ZERO, "rate {rate}");
    }
}

#[test]
fn test_no_guarantee_when_down_payment_covers_price() {
    for down in [dec!(200_000), dec!(250_000)] {
        let s = compute_financing(&FinancingInput {
            down_payment: down,
            ..reference_loan()
        })
        .unwrap();
        assert_eq!(s.bank_guarantee, Decimal::ZERO);
    }
}

#[test]
fn test_end_date_is_exact_calendar_years() {
    for (year, month, term) in [(2024, 2, 4), (2023, 2, 1), (2024, 2, 1), (2025, 12, 30)] {
        let s = compute_financing(&FinancingInput {
            start_year: year,
            start_month: month,
            term_years: term,
            ..reference_loan()
        })
        .unwrap();
        assert_eq!(s.acquisition_date, date(year, month, 1));
        assert_eq!(s.financing_end_date, date(year + term as i32, month, 1));
    }
}

#[test]
fn test_very_long_terms_converge_to_interest_only() {
    for years in [1_900, 2_000, 5_000] {
        let s = compute_financing(&FinancingInput {
            term_years: years,
            ..reference_loan()
        })
        .unwrap();
        // 206700 * 3.5% / 12 = 602.875, plus 51.675 insurance share
        assert_eq!(s.monthly_payment, dec!(654.55), "term {years}");
        assert_eq!(s.financing_end_date, date(2025 + years as i32, 1, 1));
    }

    let s = compute_financing(&FinancingInput {
        term_years: 5_000,
        ..reference_loan()
    })
    .unwrap();
    assert_eq!(s.financing_end_date, date(7025, 1, 1));
    assert_eq!(s.minimum_income, 1870);
}

// ===========================================================================
// Zero interest rate: linear amortisation
// ===========================================================================

#[test]
fn test_zero_rate_uses_linear_payment() {
    let s = compute_financing(&FinancingInput {
        interest_rate_pct: Decimal::ZERO,
        ..reference_loan()
    })
    .unwrap();

    // 206700 / 240 = 861.25, plus 51.675 insurance share = 912.925
    assert_eq!(s.monthly_payment, dec!(912.93));
    // Only the insurance share remains above the capital
    assert_eq!(s.total_interest, dec!(12402.00));
    assert_eq!(s.minimum_income, 2608);
}

#[test]
fn test_zero_rate_without_insurance_repays_exact_capital() {
    let s = compute_financing(&FinancingInput {
        term_years: 1,
        property_price: dec!(100_000),
        down_payment: dec!(100_000),
        interest_rate_pct: Decimal::ZERO,
        insurance_rate_pct: Decimal::ZERO,
        agency_fee_pct: Decimal::ZERO,
        notary_fee_pct: Decimal::ZERO,
        renovation_cost: dec!(12_000),
        ..reference_loan()
    })
    .unwrap();

    assert_eq!(s.financed_capital, dec!(12_000));
    assert_eq!(s.monthly_payment, dec!(1000.00));
    assert_eq!(s.total_interest, dec!(0.00));
    assert_eq!(s.minimum_income, 2857);
}

// ===========================================================================
// Qualifying income
// ===========================================================================

#[test]
fn test_minimum_income_is_truncated_not_rounded() {
    // 1000 * 100 / 35 = 2857.14
    assert_eq!(minimum_qualifying_income(dec!(1000.00)).unwrap(), 2857);
    // 1249.99 * 100 / 35 = 3571.4
    assert_eq!(minimum_qualifying_income(dec!(1249.99)).unwrap(), 3571);
    // 999.99 * 100 / 35 = 2857.11
    assert_eq!(minimum_qualifying_income(dec!(999.99)).unwrap(), 2857);
}

#[test]
fn test_minimum_income_uses_unrounded_payment() {
    // 419.952 over 12 months = 34.996, shown as 35.00
    let s = compute_financing(&FinancingInput {
        term_years: 1,
        property_price: dec!(100_000),
        down_payment: dec!(100_000),
        interest_rate_pct: Decimal::ZERO,
        insurance_rate_pct: Decimal::ZERO,
        agency_fee_pct: Decimal::ZERO,
        notary_fee_pct: Decimal::ZERO,
        renovation_cost: dec!(419.952),
        ..reference_loan()
    })
    .unwrap();

    assert_eq!(s.monthly_payment, dec!(35.00));
    // 34.996 * 100 / 35 = 99.99; the rounded 35.00 would give exactly 100
    assert_eq!(s.minimum_income, 99);
    assert_eq!(minimum_qualifying_income(s.monthly_payment).unwrap(), 100);
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn test_simulate_rejects_out_of_range_month() {
    let err = simulate_financing(&FinancingInput {
        start_month: 13,
        ..reference_loan()
    })
    .unwrap_err();
    match err {
        SimulationError::InvalidInput { field, .. } => assert_eq!(field, "mois_debut"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_compute_overflow_is_degenerate_not_panic() {
    let err = compute_financing(&FinancingInput {
        property_price: Decimal::MAX,
        agency_fee_pct: dec!(500),
        ..reference_loan()
    })
    .unwrap_err();
    assert!(matches!(err, SimulationError::ArithmeticDegenerate { .. }));
}

#[test]
fn test_simulate_wraps_summary() {
    let out = simulate_financing(&reference_loan()).unwrap();
    assert_eq!(out.result.monthly_payment, dec!(1250.45));
    assert!(out.warnings.is_empty());
    assert_eq!(out.assumptions["duree_annees"], 20);
}

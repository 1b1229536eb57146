//! Commute cost estimation
//!
//! A month is 4 weeks and a year is 52 weeks throughout the report.

use tracing::debug;

use crate::error::{AnalysisError, ValidationError};
use crate::services::states::full_state_name;
use crate::services::tables::ReferenceTables;
use crate::types::{CostBreakdown, CostReport, EstimateInput, GasGrade, ReportInputs, Savings};

const WEEKS_PER_MONTH: f64 = 4.0;
const WEEKS_PER_YEAR: f64 = 52.0;

/// Suggested gas mileage when the user has no figure (average US car)
pub const DEFAULT_GAS_MILEAGE_MPG: f64 = 27.0;

/// Check the user's selections. Runs before any network call.
pub fn validate_selection(
    days_per_week: u8,
    ev_model: &str,
    gas_mileage: Option<f64>,
    gas_type: Option<GasGrade>,
    include_gas: bool,
) -> Result<(), ValidationError> {
    if !(1..=7).contains(&days_per_week) {
        return Err(ValidationError::DaysOutOfRange(days_per_week));
    }
    if ev_model.trim().is_empty() {
        return Err(ValidationError::MissingSelection("EV model"));
    }
    if include_gas {
        let mileage = gas_mileage.ok_or(ValidationError::MissingSelection("gas mileage"))?;
        if !mileage.is_finite() || mileage <= 0.0 {
            return Err(ValidationError::InvalidGasMileage(mileage));
        }
        if gas_type.is_none() {
            return Err(ValidationError::MissingSelection("gas type"));
        }
    }
    Ok(())
}

/// Compute the cost report for a known commute distance.
///
/// Pure: identical inputs and tables give identical reports.
pub fn estimate(input: &EstimateInput, tables: &ReferenceTables) -> Result<CostReport, AnalysisError> {
    validate_selection(
        input.days_per_week,
        &input.ev_model,
        input.gas_mileage,
        input.gas_type,
        input.include_gas,
    )?;
    let commute = input.commute_one_way_miles;
    if !commute.is_finite() || commute < 0.0 {
        return Err(ValidationError::InvalidCommuteDistance(commute).into());
    }

    let vehicle = tables.vehicle(&input.ev_model)?;
    let state = full_state_name(&input.state);
    let ev_price_per_kwh = tables.ev_price(&state)?;

    let round_trip_miles = commute * 2.0;
    let weekly_miles = round_trip_miles * f64::from(input.days_per_week);

    let ev_cost_per_mile = (vehicle.battery_capacity_kwh * ev_price_per_kwh) / vehicle.range_miles;
    let ev_costs = breakdown(weekly_miles, ev_cost_per_mile);

    let mut inputs = ReportInputs {
        home_work_distance: commute,
        days_per_week: input.days_per_week,
        state: state.clone(),
        ev_model: vehicle.model.clone(),
        ev_cost_per_kwh: ev_price_per_kwh,
        battery_capacity: vehicle.battery_capacity_kwh,
        ev_range: vehicle.range_miles,
        gas_type: None,
        gas_price: None,
        gas_mileage: None,
    };

    let (gas_costs, savings) = match (input.include_gas, input.gas_type, input.gas_mileage) {
        (true, Some(grade), Some(mileage)) => {
            let gas_price = tables.gas_price(&state, grade)?;
            let gas_cost_per_mile = gas_price / mileage;
            let gas_costs = breakdown(weekly_miles, gas_cost_per_mile);

            inputs.gas_type = Some(grade);
            inputs.gas_price = Some(gas_price);
            inputs.gas_mileage = Some(mileage);

            let savings = Savings {
                weekly: gas_costs.weekly - ev_costs.weekly,
                monthly: gas_costs.monthly - ev_costs.monthly,
                yearly: gas_costs.yearly - ev_costs.yearly,
            };
            (Some(gas_costs), Some(savings))
        }
        _ => (None, None),
    };

    debug!(
        "Estimated {} in {}: EV ${:.4}/mile, ${:.2}/year",
        vehicle.model, state, ev_costs.cost_per_mile, ev_costs.yearly
    );

    Ok(CostReport {
        inputs,
        ev_costs,
        gas_costs,
        savings,
    })
}

fn breakdown(weekly_miles: f64, cost_per_mile: f64) -> CostBreakdown {
    let weekly = weekly_miles * cost_per_mile;
    CostBreakdown {
        cost_per_mile,
        weekly,
        monthly: weekly * WEEKS_PER_MONTH,
        yearly: weekly * WEEKS_PER_YEAR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use crate::types::{EvPriceEntry, GasPriceEntry, VehicleSpec};
    use std::collections::HashMap;

    fn tables() -> ReferenceTables {
        ReferenceTables::new(
            vec![VehicleSpec {
                model: "Test EV".to_string(),
                battery_capacity_kwh: 75.0,
                range_miles: 300.0,
            }],
            vec![EvPriceEntry { state: "Texas".to_string(), cost_per_kwh: 0.15 }],
            vec![GasPriceEntry {
                state: "Texas".to_string(),
                price_per_gallon: HashMap::from([(GasGrade::Regular, 3.50), (GasGrade::Premium, 9.0)]),
            }],
        )
    }

    fn ev_only() -> EstimateInput {
        EstimateInput {
            commute_one_way_miles: 10.0,
            days_per_week: 5,
            state: "TX".to_string(),
            ev_model: "Test EV".to_string(),
            gas_mileage: None,
            gas_type: None,
            include_gas: false,
        }
    }

    fn with_gas(grade: GasGrade) -> EstimateInput {
        EstimateInput {
            gas_mileage: Some(25.0),
            gas_type: Some(grade),
            include_gas: true,
            ..ev_only()
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ev_cost_formula() {
        let report = estimate(&ev_only(), &tables()).unwrap();

        assert!(close(report.ev_costs.cost_per_mile, 0.0375));
        assert!(close(report.ev_costs.weekly, 3.75));
        assert!(close(report.ev_costs.monthly, 15.0));
        assert!(close(report.ev_costs.yearly, 195.0));
        assert!(report.gas_costs.is_none());
        assert!(report.savings.is_none());
    }

    #[test]
    fn test_inputs_echoed_with_full_state_name() {
        let report = estimate(&ev_only(), &tables()).unwrap();

        assert_eq!(report.inputs.state, "Texas");
        assert_eq!(report.inputs.ev_model, "Test EV");
        assert_eq!(report.inputs.home_work_distance, 10.0);
        assert_eq!(report.inputs.ev_cost_per_kwh, 0.15);
        assert_eq!(report.inputs.battery_capacity, 75.0);
        assert_eq!(report.inputs.ev_range, 300.0);
        assert!(report.inputs.gas_type.is_none());
    }

    #[test]
    fn test_gas_costs_and_positive_savings() {
        let report = estimate(&with_gas(GasGrade::Regular), &tables()).unwrap();

        let gas = report.gas_costs.unwrap();
        assert!(close(gas.cost_per_mile, 0.14));
        assert!(close(gas.weekly, 14.0));
        assert!(close(gas.monthly, 56.0));
        assert!(close(gas.yearly, 728.0));

        let savings = report.savings.unwrap();
        assert!(close(savings.monthly, 56.0 - 15.0));
        assert!(close(savings.yearly, 728.0 - 195.0));
        assert!(savings.ev_is_cheaper());

        assert_eq!(report.inputs.gas_type, Some(GasGrade::Regular));
        assert_eq!(report.inputs.gas_price, Some(3.50));
        assert_eq!(report.inputs.gas_mileage, Some(25.0));
    }

    #[test]
    fn test_negative_savings_when_gas_is_cheaper() {
        let mut input = with_gas(GasGrade::Regular);
        input.gas_mileage = Some(1000.0);

        let savings = estimate(&input, &tables()).unwrap().savings.unwrap();
        assert!(savings.yearly < 0.0);
        assert!(!savings.ev_is_cheaper());
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let tables = tables();
        let input = with_gas(GasGrade::Premium);

        let first = estimate(&input, &tables).unwrap();
        let second = estimate(&input, &tables).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.ev_costs.yearly.to_bits(), second.ev_costs.yearly.to_bits());
    }

    #[test]
    fn test_zero_commute_costs_nothing() {
        let mut input = with_gas(GasGrade::Regular);
        input.commute_one_way_miles = 0.0;

        let report = estimate(&input, &tables()).unwrap();
        assert_eq!(report.ev_costs.yearly, 0.0);
        assert_eq!(report.savings.unwrap().yearly, 0.0);
    }

    #[test]
    fn test_gas_fields_ignored_without_include_gas() {
        let mut input = with_gas(GasGrade::Regular);
        input.include_gas = false;

        let report = estimate(&input, &tables()).unwrap();
        assert!(report.gas_costs.is_none());
        assert!(report.inputs.gas_price.is_none());
    }

    #[test]
    fn test_unknown_model_names_model() {
        let mut input = ev_only();
        input.ev_model = "NonexistentModel".to_string();

        match estimate(&input, &tables()).unwrap_err() {
            AnalysisError::Lookup(LookupError::VehicleModel(model)) => assert_eq!(model, "NonexistentModel"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_unknown_state_code_fails_lookup_not_mapping() {
        let mut input = ev_only();
        input.state = "ZZ".to_string();

        match estimate(&input, &tables()).unwrap_err() {
            AnalysisError::Lookup(LookupError::EvPriceState(state)) => assert_eq!(state, "ZZ"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_missing_gas_grade_price() {
        let err = estimate(&with_gas(GasGrade::MidGrade), &tables()).unwrap_err();
        assert!(matches!(err, AnalysisError::Lookup(LookupError::GasGrade { .. })));
    }

    #[test]
    fn test_days_out_of_range() {
        for days in [0u8, 8] {
            let mut input = ev_only();
            input.days_per_week = days;
            let err = estimate(&input, &tables()).unwrap_err();
            assert!(matches!(err, AnalysisError::Validation(ValidationError::DaysOutOfRange(d)) if d == days));
        }
    }

    #[test]
    fn test_negative_commute_rejected() {
        let mut input = ev_only();
        input.commute_one_way_miles = -1.0;
        let err = estimate(&input, &tables()).unwrap_err();
        assert!(matches!(err, AnalysisError::Validation(ValidationError::InvalidCommuteDistance(_))));
    }

    #[test]
    fn test_validate_selection_gas_requirements() {
        assert_eq!(
            validate_selection(5, "Test EV", None, Some(GasGrade::Regular), true),
            Err(ValidationError::MissingSelection("gas mileage"))
        );
        assert_eq!(
            validate_selection(5, "Test EV", Some(27.0), None, true),
            Err(ValidationError::MissingSelection("gas type"))
        );
        assert_eq!(
            validate_selection(5, "Test EV", Some(0.0), Some(GasGrade::Regular), true),
            Err(ValidationError::InvalidGasMileage(0.0))
        );
        assert_eq!(
            validate_selection(5, " ", None, None, false),
            Err(ValidationError::MissingSelection("EV model"))
        );
        assert!(validate_selection(7, "Test EV", None, None, false).is_ok());
        assert!(validate_selection(1, "Test EV", Some(DEFAULT_GAS_MILEAGE_MPG), Some(GasGrade::Premium), true).is_ok());
    }
}

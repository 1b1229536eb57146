//! Plain-text rendering of analysis results for the terminal

use crate::types::{AnalysisOutcome, StationDistance};

/// Render a full analysis outcome
pub fn outcome_text(outcome: &AnalysisOutcome) -> String {
    let report = &outcome.report;
    let inputs = &report.inputs;
    let mut out = String::new();

    out.push_str("=== Analysis Results ===\n");
    out.push_str(&format!("Home to Work Distance: {:.2} miles\n", inputs.home_work_distance));
    out.push_str(&format!("State: {}\n", inputs.state));
    out.push_str(&format!("EV Model: {}\n", inputs.ev_model));
    out.push_str(&format!("EV Rate: ${:.3}/kWh\n", inputs.ev_cost_per_kwh));
    out.push_str(&format!("Closest Station to Home: {}\n", outcome.home_station));
    out.push_str(&format!("Closest Station to Work: {}\n", outcome.work_station));

    match (&report.gas_costs, &report.savings) {
        (Some(gas), Some(savings)) => {
            if let (Some(grade), Some(price), Some(mileage)) =
                (inputs.gas_type, inputs.gas_price, inputs.gas_mileage)
            {
                out.push_str(&format!("Gas Type: {}\n", grade));
                out.push_str(&format!("Gas Price: ${:.2}/gallon\n", price));
                out.push_str(&format!("Gas Mileage: {} MPG\n", mileage));
            }

            out.push('\n');
            if savings.ev_is_cheaper() {
                out.push_str(&format!("You save ${:.2} per year with an EV!\n", savings.yearly));
            } else {
                out.push_str(&format!("Gas vehicle saves ${:.2} per year compared to EV.\n", -savings.yearly));
            }

            out.push('\n');
            out.push_str(&format!("{:<12} {:>12} {:>12}\n", "", "Gas", "EV"));
            out.push_str(&format!("{:<12} {:>12.4} {:>12.4}\n", "Per mile", gas.cost_per_mile, report.ev_costs.cost_per_mile));
            out.push_str(&format!("{:<12} {:>12.2} {:>12.2}\n", "Weekly", gas.weekly, report.ev_costs.weekly));
            out.push_str(&format!("{:<12} {:>12.2} {:>12.2}\n", "Monthly", gas.monthly, report.ev_costs.monthly));
            out.push_str(&format!("{:<12} {:>12.2} {:>12.2}\n", "Yearly", gas.yearly, report.ev_costs.yearly));

            out.push('\n');
            out.push_str(&format!("Savings: ${:.2} monthly, ${:.2} yearly\n", savings.monthly, savings.yearly));
        }
        _ => {
            out.push('\n');
            out.push_str("=== Electric Vehicle Costs ===\n");
            out.push_str(&format!("Cost per Mile: ${:.4}\n", report.ev_costs.cost_per_mile));
            out.push_str(&format!("Monthly Cost: ${:.2}\n", report.ev_costs.monthly));
            out.push_str(&format!("Yearly Cost: ${:.2}\n", report.ev_costs.yearly));
            out.push_str(&format!("Battery Capacity: {} kWh\n", inputs.battery_capacity));
            out.push_str(&format!("Range: {} miles\n", inputs.ev_range));
        }
    }

    out
}

/// Render a straight-line shortlist, one station per line
pub fn shortlist_text(shortlist: &[StationDistance]) -> String {
    if shortlist.is_empty() {
        return "No stations found.\n".to_string();
    }

    shortlist
        .iter()
        .enumerate()
        .map(|(i, station)| format!("{}. {}\n", i + 1, station))
        .collect()
}

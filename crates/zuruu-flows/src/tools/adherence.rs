//! Doses-remaining calculator for the adherence tracker.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceInput {
    /// Units dispensed (tablets, mL, puffs).
    pub total_units: f64,
    pub units_per_dose: f64,
    pub doses_per_day: f64,
    pub start_date: Date,
    pub as_of: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceSummary {
    pub days_elapsed: i64,
    pub expected_doses_taken: f64,
    pub units_remaining: f64,
    pub doses_remaining: f64,
    /// Whole days of supply left at the prescribed rate.
    pub days_of_supply_left: i64,
    pub run_out_date: Date,
    pub is_exhausted: bool,
}

/// Expected supply on `as_of`, assuming every dose since `start_date` was
/// taken as prescribed. Doses due on `as_of` itself are not counted yet.
pub fn calculate(input: &AdherenceInput) -> Result<AdherenceSummary, FlowError> {
    for (field, value) in [
        ("totalUnits", input.total_units),
        ("unitsPerDose", input.units_per_dose),
        ("dosesPerDay", input.doses_per_day),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(FlowError::NonPositive { field });
        }
    }
    if input.as_of < input.start_date {
        return Err(FlowError::DateBeforeStart {
            start: input.start_date,
            as_of: input.as_of,
        });
    }

    let days_elapsed = i64::from(input.start_date.until(input.as_of)?.get_days());

    let total_doses = (input.total_units / input.units_per_dose).floor();
    let expected_doses_taken = (days_elapsed as f64 * input.doses_per_day).min(total_doses);
    let units_remaining =
        (input.total_units - expected_doses_taken * input.units_per_dose).max(0.0);
    let doses_remaining = (units_remaining / input.units_per_dose).floor();
    let days_of_supply_left = (doses_remaining / input.doses_per_day).floor() as i64;

    // Supplies beyond jiff's span range surface as FlowError::Date.
    let run_out_date = input
        .as_of
        .checked_add(jiff::Span::new().try_days(days_of_supply_left)?)?;

    Ok(AdherenceSummary {
        days_elapsed,
        expected_doses_taken,
        units_remaining,
        doses_remaining,
        days_of_supply_left,
        run_out_date,
        is_exhausted: doses_remaining < 1.0,
    })
}

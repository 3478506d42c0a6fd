//! Human-readable rendering of an estimate.
//!
//! Precision is fixed per figure: hours 1 decimal, unit price 4 decimals (it is
//! a small per-m² figure), totals 2 decimals. Area and height are whole numbers.

use crate::pricing::engine::{EstimateInput, EstimateResult};

pub const CURRENCY_SYMBOL: &str = "€";

pub fn fmt_area(area_m2: f64) -> String {
    format!("{area_m2:.0} m²")
}

pub fn fmt_height(height_cm: f64) -> String {
    format!("{height_cm:.0} cm")
}

pub fn fmt_hours(hours: f64) -> String {
    format!("{hours:.1} hours")
}

pub fn fmt_unit_price(price: f64) -> String {
    format!("{price:.4} {CURRENCY_SYMBOL}")
}

pub fn fmt_total(price: f64) -> String {
    format!("{price:.2} {CURRENCY_SYMBOL}")
}

/// Short narrative paragraph shown next to the numbers after a calculation.
pub fn summarize(input: &EstimateInput, result: &EstimateResult) -> String {
    format!(
        "Quote proposal for vegetation clearing of type {terrain}, over an estimated area \
         of {area} with average vegetation of {height}.\n\
         The job is planned for a crew of {crew} worker(s), with an estimated time of \
         {hours}.\n\
         The proposed price is {unit} per m² (ex. VAT), totalling {ex} ex. VAT and {inc} \
         incl. VAT.",
        terrain = input.terrain,
        area = fmt_area(input.area_m2),
        height = fmt_height(input.vegetation_height_cm),
        crew = input.crew_size,
        hours = fmt_hours(result.estimated_hours),
        unit = fmt_unit_price(result.unit_price_ex_tax),
        ex = fmt_total(result.total_price_ex_tax),
        inc = fmt_total(result.total_price_inc_tax),
    )
}

//! Fixed wording of the quote document.

use crate::pricing::engine::{EstimateInput, EstimateResult};
use crate::pricing::summary::{fmt_area, fmt_height, fmt_hours, fmt_total, fmt_unit_price};

pub const TITLE: &str = "QUOTE PROPOSAL";
pub const CLIENT_HEADING: &str = "Client:";
pub const SITE_HEADING: &str = "Site location:";
pub const NOTES_HEADING: &str = "Notes:";

pub const DISCLAIMER: &str = "Note: Values are estimated from the data provided. They may be \
    adjusted if there are conditions not visible at the time of quoting (access, slopes, debris, \
    obstacles or vegetation of unusual density).";

/// A bold heading followed by a wrapped body.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeSection {
    pub heading: &'static str,
    pub body: String,
}

/// Introduction, technical summary, methodology and commercial terms, in order.
pub fn narrative_sections(
    input: &EstimateInput,
    estimate: &EstimateResult,
) -> Vec<NarrativeSection> {
    vec![
        NarrativeSection {
            heading: "Introduction",
            body: "Following your request for a quote, we present our proposal for vegetation \
                   clearing and control, carried out by trained operators with a focus on safety, \
                   efficiency and a clean finish."
                .to_string(),
        },
        NarrativeSection {
            heading: "Technical summary",
            body: format!(
                "- Cutting type: {}\n\
                 - Estimated area: {}\n\
                 - Average vegetation height: {}\n\
                 - Planned crew: {} worker(s)\n\
                 - Estimated execution time: {}",
                input.terrain.display_name(),
                fmt_area(input.area_m2),
                fmt_height(input.vegetation_height_cm),
                input.crew_size,
                fmt_hours(estimate.estimated_hours),
            ),
        },
        NarrativeSection {
            heading: "Work methodology (steps)",
            body: "1) Site preparation and survey of access, obstacles and sensitive areas \
                   (walls, fences, trees, structures).\n\
                   2) Cutting of the vegetation with control of thrown debris and protection of \
                   critical areas.\n\
                   3) Finishing along boundaries, corners, walls and detailed areas.\n\
                   4) Final inspection and touch-up of any spots that need it."
                .to_string(),
        },
        NarrativeSection {
            heading: "Commercial terms",
            body: format!(
                "- Price per m² (ex. VAT): {}\n\
                 - Total (ex. VAT): {}\n\
                 - Total payable (incl. VAT): {}",
                fmt_unit_price(estimate.unit_price_ex_tax),
                fmt_total(estimate.total_price_ex_tax),
                fmt_total(estimate.total_price_inc_tax),
            ),
        },
    ]
}

pub fn validity_line(days: &str) -> String {
    format!("Quote valid for {days} days.")
}

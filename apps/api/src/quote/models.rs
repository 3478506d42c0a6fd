use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pricing::engine::{EstimateInput, EstimateResult};

/// Returns the trimmed value, or `None` when absent or whitespace-only.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Vendor or client contact details. Every field is optional free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyInfo {
    pub name: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PartyInfo {
    /// Display lines for the party block, blank fields skipped.
    pub fn lines(&self) -> Vec<String> {
        let labelled = |label: &str, value: &Option<String>| {
            non_blank(value).map(|v| format!("{label}: {v}"))
        };

        [
            non_blank(&self.name).map(str::to_string),
            labelled("Tax ID", &self.tax_id),
            non_blank(&self.address).map(str::to_string),
            labelled("Phone", &self.phone),
            labelled("Email", &self.email),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteMetadata {
    pub site_location: Option<String>,
    /// Free text as typed, e.g. "30".
    pub validity_days: Option<String>,
    pub notes: Option<String>,
}

/// Everything the document builder needs for one quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub input: EstimateInput,
    pub estimate: EstimateResult,
    pub vendor: PartyInfo,
    pub client: PartyInfo,
    pub metadata: QuoteMetadata,
    pub issued_on: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims_and_filters() {
        assert_eq!(non_blank(&None), None);
        assert_eq!(non_blank(&Some("   ".to_string())), None);
        assert_eq!(non_blank(&Some("  Porto ".to_string())), Some("Porto"));
    }

    #[test]
    fn test_party_lines_skip_blank_fields() {
        let party = PartyInfo {
            name: Some("ACME Clearing".to_string()),
            tax_id: Some(" ".to_string()),
            address: None,
            phone: Some("+351 900 000 000".to_string()),
            email: Some("".to_string()),
        };
        assert_eq!(
            party.lines(),
            vec!["ACME Clearing", "Phone: +351 900 000 000"]
        );
    }

    #[test]
    fn test_default_party_has_no_lines() {
        assert!(PartyInfo::default().lines().is_empty());
    }

    #[test]
    fn test_missing_json_fields_default_to_none() {
        let party: PartyInfo = serde_json::from_str(r#"{"email": "a@b.pt"}"#).unwrap();
        assert_eq!(party.lines(), vec!["Email: a@b.pt"]);
        let meta: QuoteMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta, QuoteMetadata::default());
    }
}

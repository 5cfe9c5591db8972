//! JSON Schema validation of the emitted documents.
//!
//! Each output file has a Draft 7 schema embedded at compile time from the
//! `schemas/` directory:
//! - `country-list.json` - `countries.json` built from observations
//! - `country-catalog.json` - `countries.json` built from the area code table
//! - `dashboard-summary.json` - `dashboard_summary.json`
//! - `faq.json` - `faq.json`
//!
//! The dashboard reads these files without any checks of its own, so a
//! document is validated right before it is written.

use once_cell::sync::Lazy;
use serde_json::Value;

static COUNTRY_LIST_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/country-list.json")).expect("Invalid embedded schema")
});

static CATALOG_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/country-catalog.json")).expect("Invalid embedded schema")
});

static SUMMARY_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/dashboard-summary.json")).expect("Invalid embedded schema")
});

static FAQ_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/faq.json")).expect("Invalid embedded schema")
});

/// Kind of document written by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    CountryList,
    CountryCatalog,
    DashboardSummary,
    Faq,
}

impl DocumentKind {
    pub fn schema(&self) -> &'static Value {
        match self {
            Self::CountryList => &*COUNTRY_LIST_SCHEMA,
            Self::CountryCatalog => &*CATALOG_SCHEMA,
            Self::DashboardSummary => &*SUMMARY_SCHEMA,
            Self::Faq => &*FAQ_SCHEMA,
        }
    }
}

/// Validate a JSON value against a schema.
///
/// Returns every violation message when invalid.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate a document against its embedded schema.
pub fn validate_document(kind: DocumentKind, data: &Value) -> Result<(), Vec<String>> {
    validate(kind.schema(), data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_schemas_compile() {
        for kind in [
            DocumentKind::CountryList,
            DocumentKind::CountryCatalog,
            DocumentKind::DashboardSummary,
            DocumentKind::Faq,
        ] {
            assert!(jsonschema::draft7::new(kind.schema()).is_ok(), "{:?}", kind);
        }
    }

    #[test]
    fn test_valid_country_list() {
        let doc = json!({
            "total_countries": 1,
            "last_updated": "2024-05-01T12:00:00+00:00",
            "data_source": "FAOSTAT Land Use",
            "countries": [
                { "code": "DEU", "name": "Germany", "region": "Europe", "fao_code": "79", "has_data": true }
            ]
        });
        assert!(validate_document(DocumentKind::CountryList, &doc).is_ok());
    }

    #[test]
    fn test_invalid_region_rejected() {
        let doc = json!({
            "total_countries": 1,
            "last_updated": "",
            "data_source": "",
            "countries": [
                { "code": "DEU", "name": "Germany", "region": "Europa", "fao_code": "79", "has_data": true }
            ]
        });
        let errors = validate_document(DocumentKind::CountryList, &doc).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_catalog_iso3_pattern() {
        let mut doc = json!({
            "total_countries": 1,
            "last_updated": "",
            "data_source": "",
            "countries": [
                { "fao_code": "1", "name": "Afghanistan", "region": "Asia", "iso3_code": null, "m49_code": "4" }
            ]
        });
        assert!(is_valid(DocumentKind::CountryCatalog.schema(), &doc));

        doc["countries"][0]["iso3_code"] = json!("");
        assert!(!is_valid(DocumentKind::CountryCatalog.schema(), &doc));
    }

    #[test]
    fn test_placeholder_summary_valid() {
        let doc = json!({
            "summary": { "total_records": 0, "total_countries": 0, "year_range": null, "last_updated": "" },
            "countries": {}
        });
        assert!(validate_document(DocumentKind::DashboardSummary, &doc).is_ok());
    }

    #[test]
    fn test_faq_requires_question() {
        let doc = json!([{ "id": 1, "question": "", "keywords": [], "answer": "a", "category": "General" }]);
        assert!(validate_document(DocumentKind::Faq, &doc).is_err());
    }
}

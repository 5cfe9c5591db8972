//! Domain models for the harmonization pipeline.
//!
//! - [`Region`] - Coarse geographic region of a country
//! - [`AreaCode`] - One country/territory of the reference table
//! - [`ObservationRow`] - One accepted, harmonized observation
//! - [`CountryList`] / [`CountrySummary`] - Country selector document
//! - [`CountryCatalog`] / [`CatalogEntry`] - Full reference catalog document
//! - [`DashboardSummary`] - Per-country statistics document
//! - [`FaqEntry`] - One FAQ record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag attached to every harmonized observation.
pub const OBSERVATION_SOURCE: &str = "FAOSTAT_Manual";

/// `data_source` of the country selector document.
pub const COUNTRY_LIST_SOURCE: &str = "FAOSTAT Land Use";

/// `data_source` of the reference catalog document.
pub const CATALOG_SOURCE: &str = "FAOSTAT Area Codes";

// =============================================================================
// Region
// =============================================================================

/// Coarse geographic region.
///
/// This is a display grouping for the dashboard, not a gazetteer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Africa,
    Asia,
    Europe,
    Americas,
    Oceania,
    /// Anything the enrichment table does not recognize.
    Other,
}

impl Region {
    /// Regions in the order the enrichment table checks them.
    pub const ORDERED: [Region; 5] = [
        Region::Africa,
        Region::Asia,
        Region::Europe,
        Region::Americas,
        Region::Oceania,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Africa => "Africa",
            Self::Asia => "Asia",
            Self::Europe => "Europe",
            Self::Americas => "Americas",
            Self::Oceania => "Oceania",
            Self::Other => "Other",
        }
    }

    /// Parse a region label, case-insensitively.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "africa" => Some(Self::Africa),
            "asia" => Some(Self::Asia),
            "europe" => Some(Self::Europe),
            "americas" | "america" => Some(Self::Americas),
            "oceania" => Some(Self::Oceania),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Reference data
// =============================================================================

/// One country or territory from the area code reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaCode {
    pub fao_code: String,
    pub m49_code: String,
    pub name: String,
    pub region: Region,
    pub iso3: Option<String>,
}

// =============================================================================
// Observations
// =============================================================================

/// A raw observation joined with its [`AreaCode`].
///
/// Only rows whose year and value both parsed are ever built, so neither is
/// optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRow {
    pub area_code: String,
    pub area_name: String,
    pub item_code: String,
    pub item_name: String,
    pub element_code: String,
    pub element_name: String,
    pub year: i32,
    pub unit: String,
    pub value: f64,
    pub flag: String,
    pub iso3_code: Option<String>,
    pub country_name_standard: String,
    pub region: Region,
    pub data_source: String,
}

// =============================================================================
// Country selector
// =============================================================================

/// One entry of the country selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySummary {
    /// ISO3 code when known, FAO code otherwise.
    pub code: String,
    pub name: String,
    pub region: Region,
    pub fao_code: String,
    pub has_data: bool,
}

impl CountrySummary {
    pub fn from_area(area: &AreaCode) -> Self {
        Self {
            code: area.iso3.clone().unwrap_or_else(|| area.fao_code.clone()),
            name: area.name.clone(),
            region: area.region,
            fao_code: area.fao_code.clone(),
            has_data: true,
        }
    }
}

/// `countries.json` built from harmonized observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryList {
    pub total_countries: usize,
    pub last_updated: String,
    pub data_source: String,
    pub countries: Vec<CountrySummary>,
}

// =============================================================================
// Reference catalog
// =============================================================================

/// One entry of the full reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub fao_code: String,
    pub name: String,
    pub region: Region,
    pub iso3_code: Option<String>,
    pub m49_code: String,
}

impl From<&AreaCode> for CatalogEntry {
    fn from(area: &AreaCode) -> Self {
        Self {
            fao_code: area.fao_code.clone(),
            name: area.name.clone(),
            region: area.region,
            iso3_code: area.iso3.clone(),
            m49_code: area.m49_code.clone(),
        }
    }
}

/// `countries.json` built from the reference table alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryCatalog {
    pub total_countries: usize,
    pub last_updated: String,
    pub data_source: String,
    pub countries: Vec<CatalogEntry>,
}

// =============================================================================
// Dashboard summary
// =============================================================================

/// Inclusive year span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn single(year: i32) -> Self {
        Self { min: year, max: year }
    }

    pub fn include(&mut self, year: i32) {
        self.min = self.min.min(year);
        self.max = self.max.max(year);
    }
}

/// Statistics for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStats {
    pub total_records: usize,
    /// Number of distinct item names.
    pub items_count: usize,
    pub year_range: YearRange,
}

/// Global statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTotals {
    pub total_records: usize,
    pub total_countries: usize,
    /// `None` when there are no records.
    pub year_range: Option<YearRange>,
    pub last_updated: String,
}

/// `dashboard_summary.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub summary: SummaryTotals,
    /// Keyed by standardized country name.
    pub countries: BTreeMap<String, CountryStats>,
}

// =============================================================================
// FAQ
// =============================================================================

/// One FAQ record for the site chatbot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// 1-based position in the source file.
    pub id: usize,
    pub question: String,
    pub keywords: Vec<String>,
    pub answer: String,
    pub category: String,
}

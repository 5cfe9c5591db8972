//! Join observation rows against the reference table.
//!
//! A row is kept only if its area code is known, its value field is not
//! blank, and both year and value parse. Rejected rows are counted per reason
//! but never reported as errors.

use std::collections::BTreeSet;

use crate::fetch::{FetchOutcome, Fetcher, Source};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::models::{ObservationRow, OBSERVATION_SOURCE};
use crate::parser::{parse_bytes_auto, strip_stray_quotes, Table};
use crate::reference::ReferenceTable;

pub const COL_AREA_CODE: &str = "Area Code";
pub const COL_AREA: &str = "Area";
pub const COL_ITEM_CODE: &str = "Item Code";
pub const COL_ITEM: &str = "Item";
pub const COL_ELEMENT_CODE: &str = "Element Code";
pub const COL_ELEMENT: &str = "Element";
pub const COL_YEAR: &str = "Year";
pub const COL_UNIT: &str = "Unit";
pub const COL_VALUE: &str = "Value";
pub const COL_FLAG: &str = "Flag";

/// Why rows were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub total_rows: usize,
    pub unknown_area: usize,
    pub blank_value: usize,
    pub bad_year: usize,
    pub bad_value: usize,
}

impl NormalizeStats {
    pub fn dropped(&self) -> usize {
        self.unknown_area + self.blank_value + self.bad_year + self.bad_value
    }
}

/// Accepted rows and the countries they cover
#[derive(Debug, Clone, Default)]
pub struct NormalizeResult {
    /// Accepted rows, in input order
    pub rows: Vec<ObservationRow>,
    /// Distinct standardized country names, sorted
    pub countries: BTreeSet<String>,
    pub stats: NormalizeStats,
}

/// Year as an integer, only if the trimmed field is all ASCII digits.
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Value as a float.
///
/// With `.` separators and a leading minus removed, the trimmed field must be
/// a non-empty run of ASCII digits; exponents, thousands commas and the like
/// are rejected.
pub fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);

    let mut digits = unsigned.chars().filter(|c| *c != '.').peekable();
    if digits.peek().is_none() || !digits.all(|c| c.is_ascii_digit()) {
        return None;
    }

    trimmed.parse().ok()
}

/// Harmonize every row of an observations table.
pub fn normalize(table: &Table, reference: &ReferenceTable) -> NormalizeResult {
    let mut result = NormalizeResult::default();

    for row in table.rows() {
        result.stats.total_rows += 1;

        let area_code = strip_stray_quotes(row.get(COL_AREA_CODE));
        let Some(area) = reference.get(area_code) else {
            result.stats.unknown_area += 1;
            continue;
        };

        let raw_value = row.get(COL_VALUE);
        if raw_value.is_empty() {
            result.stats.blank_value += 1;
            continue;
        }

        let Some(year) = parse_year(row.get(COL_YEAR)) else {
            result.stats.bad_year += 1;
            continue;
        };
        let Some(value) = parse_value(raw_value) else {
            result.stats.bad_value += 1;
            continue;
        };

        result.countries.insert(area.name.clone());
        result.rows.push(ObservationRow {
            area_code: area_code.to_string(),
            area_name: row.get(COL_AREA).to_string(),
            item_code: row.get(COL_ITEM_CODE).to_string(),
            item_name: row.get(COL_ITEM).to_string(),
            element_code: row.get(COL_ELEMENT_CODE).to_string(),
            element_name: row.get(COL_ELEMENT).to_string(),
            year,
            unit: row.get(COL_UNIT).to_string(),
            value,
            flag: row.get(COL_FLAG).to_string(),
            iso3_code: area.iso3.clone(),
            country_name_standard: area.name.clone(),
            region: area.region,
            data_source: OBSERVATION_SOURCE.to_string(),
        });
    }

    result
}

/// Fetch, parse and harmonize an observations CSV.
///
/// Fetch and parse failures are logged and produce an empty result.
pub async fn load_observations(source: &Source, reference: &ReferenceTable, fetcher: &Fetcher) -> NormalizeResult {
    log_info(format!("📊 Processing observations from {}", source));

    if reference.is_empty() {
        log_warning("Reference table is empty, no observation can be matched");
    }

    let bytes = match fetcher.fetch(source).await {
        FetchOutcome::Fetched(bytes) => bytes,
        FetchOutcome::NotFound(reason) => {
            log_error(format!("Observation file not found: {}", reason));
            return NormalizeResult::default();
        }
        FetchOutcome::TransientError(reason) => {
            log_error(format!("Could not fetch observations: {}", reason));
            return NormalizeResult::default();
        }
    };

    let table = match parse_bytes_auto(&bytes) {
        Ok(t) => t,
        Err(e) => {
            log_error(format!("Error processing CSV: {}", e));
            return NormalizeResult::default();
        }
    };

    let result = normalize(&table, reference);
    log_success(format!(
        "Processed {} records from {} countries",
        result.rows.len(),
        result.countries.len()
    ));

    let stats = &result.stats;
    if stats.dropped() > 0 {
        log_info_indent(
            format!(
                "{} of {} rows dropped: {} unknown area, {} blank value, {} bad year, {} bad value",
                stats.dropped(),
                stats.total_rows,
                stats.unknown_area,
                stats.blank_value,
                stats.bad_year,
                stats.bad_value
            ),
            1,
        );
    }

    result
}

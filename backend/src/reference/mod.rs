//! Area code reference table.
//!
//! Loads the FAOSTAT area code list (`Area Code`, `Area`, `M49 Code`), drops
//! continental and world aggregates, and enriches each remaining area with a
//! region and ISO3 code from the [`Gazetteer`]. The resulting
//! [`ReferenceTable`] is built once and only read afterwards.

use std::collections::HashMap;

use crate::fetch::{FetchOutcome, Fetcher, Source};
use crate::gazetteer::Gazetteer;
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::models::AreaCode;
use crate::parser::{parse_bytes_auto, strip_stray_quotes, Table};

/// Area names starting with one of these are aggregates, not countries.
pub const AGGREGATE_PREFIXES: [&str; 6] = ["Africa", "Asia", "Europe", "Americas", "Oceania", "World"];

pub const COL_AREA_CODE: &str = "Area Code";
pub const COL_AREA: &str = "Area";
pub const COL_M49_CODE: &str = "M49 Code";

/// Whether `name` denotes a continental or world aggregate.
pub fn is_aggregate(name: &str) -> bool {
    AGGREGATE_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Countries and territories keyed by FAO area code, in file order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: Vec<AreaCode>,
    by_code: HashMap<String, usize>,
}

impl ReferenceTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A repeated code replaces the earlier entry but keeps its position.
    fn insert(&mut self, area: AreaCode) {
        match self.by_code.get(&area.fao_code) {
            Some(&i) => self.entries[i] = area,
            None => {
                self.by_code.insert(area.fao_code.clone(), self.entries.len());
                self.entries.push(area);
            }
        }
    }

    pub fn get(&self, fao_code: &str) -> Option<&AreaCode> {
        self.by_code.get(fao_code).map(|&i| &self.entries[i])
    }

    pub fn contains_code(&self, fao_code: &str) -> bool {
        self.by_code.contains_key(fao_code)
    }

    /// First entry, in file order, whose name is exactly `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&AreaCode> {
        self.entries.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AreaCode> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<AreaCode> for ReferenceTable {
    fn from_iter<I: IntoIterator<Item = AreaCode>>(iter: I) -> Self {
        let mut table = ReferenceTable::empty();
        for area in iter {
            table.insert(area);
        }
        table
    }
}

/// Build the reference table from a parsed area code CSV.
pub fn build_reference(table: &Table, gazetteer: &Gazetteer) -> ReferenceTable {
    table
        .rows()
        .filter_map(|row| {
            let fao_code = strip_stray_quotes(row.get(COL_AREA_CODE));
            let name = row.get(COL_AREA);
            if fao_code.is_empty() || is_aggregate(name) {
                return None;
            }

            Some(AreaCode {
                fao_code: fao_code.to_string(),
                m49_code: strip_stray_quotes(row.get(COL_M49_CODE)).replace('\'', ""),
                name: name.to_string(),
                region: gazetteer.region_for(name),
                iso3: gazetteer.iso3_for(name).map(str::to_string),
            })
        })
        .collect()
}

/// Fetch and build the reference table.
///
/// Never fails: any fetch or parse problem is logged and yields an empty
/// table, which downstream stages treat as "no known countries".
pub async fn load_reference(source: &Source, gazetteer: &Gazetteer, fetcher: &Fetcher) -> ReferenceTable {
    log_info(format!("📥 Loading area codes from {}", source));

    let bytes = match fetcher.fetch(source).await {
        FetchOutcome::Fetched(bytes) => bytes,
        FetchOutcome::NotFound(reason) => {
            log_error(format!("Area code table not found: {}", reason));
            return ReferenceTable::empty();
        }
        FetchOutcome::TransientError(reason) => {
            log_error(format!("Could not fetch area code table: {}", reason));
            return ReferenceTable::empty();
        }
    };

    let table = match parse_bytes_auto(&bytes) {
        Ok(t) => t,
        Err(e) => {
            log_error(format!("Error parsing area code table: {}", e));
            return ReferenceTable::empty();
        }
    };

    if !table.has_column(COL_AREA_CODE) || !table.has_column(COL_AREA) {
        log_warning(format!(
            "Area code table is missing '{}' or '{}' (found: {})",
            COL_AREA_CODE,
            COL_AREA,
            table.headers.join(", ")
        ));
    }

    let reference = build_reference(&table, gazetteer);
    log_success(format!(
        "Loaded {} countries/territories ({} aggregate or blank rows skipped)",
        reference.len(),
        table.len().saturating_sub(reference.len())
    ));
    reference
}

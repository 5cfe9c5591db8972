//! Fold harmonized observations into the dashboard documents.
//!
//! ```text
//! ObservationRow*  ──┬──▶  CountryList       (countries.json)
//!                    └──▶  DashboardSummary  (dashboard_summary.json)
//! ReferenceTable   ─────▶  CountryCatalog    (countries.json, catalog mode)
//! ```
//!
//! All builders are pure; the timestamp is passed in.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{
    CatalogEntry, CountryCatalog, CountryList, CountryStats, CountrySummary, DashboardSummary,
    ObservationRow, SummaryTotals, YearRange, CATALOG_SOURCE, COUNTRY_LIST_SOURCE,
};
use crate::reference::ReferenceTable;

/// Country selector entries for the countries that have data.
///
/// Names are resolved back to their first reference entry; a name with no
/// entry is left out.
pub fn build_country_list(
    countries: &BTreeSet<String>,
    reference: &ReferenceTable,
    last_updated: &str,
) -> CountryList {
    let countries: Vec<CountrySummary> = countries
        .iter()
        .filter_map(|name| reference.find_by_name(name))
        .map(CountrySummary::from_area)
        .collect();

    CountryList {
        total_countries: countries.len(),
        last_updated: last_updated.to_string(),
        data_source: COUNTRY_LIST_SOURCE.to_string(),
        countries,
    }
}

/// Accumulator for one country
#[derive(Default)]
struct CountryAccumulator {
    records: usize,
    items: BTreeSet<String>,
    years: Option<YearRange>,
}

/// Global and per-country statistics.
///
/// `items_count` is the number of distinct non-empty item names. With no rows
/// the summary is a placeholder: zero counts, no year range, no countries.
pub fn build_dashboard_summary(rows: &[ObservationRow], last_updated: &str) -> DashboardSummary {
    let mut per_country: BTreeMap<&str, CountryAccumulator> = BTreeMap::new();
    let mut global_years: Option<YearRange> = None;

    for row in rows {
        let acc = per_country.entry(row.country_name_standard.as_str()).or_default();
        acc.records += 1;
        if !row.item_name.is_empty() {
            acc.items.insert(row.item_name.clone());
        }
        include_year(&mut acc.years, row.year);
        include_year(&mut global_years, row.year);
    }

    let countries: BTreeMap<String, CountryStats> = per_country
        .into_iter()
        .filter_map(|(name, acc)| {
            // every accumulator saw at least one row, so `years` is set
            acc.years.map(|year_range| {
                (
                    name.to_string(),
                    CountryStats {
                        total_records: acc.records,
                        items_count: acc.items.len(),
                        year_range,
                    },
                )
            })
        })
        .collect();

    DashboardSummary {
        summary: SummaryTotals {
            total_records: rows.len(),
            total_countries: countries.len(),
            year_range: global_years,
            last_updated: last_updated.to_string(),
        },
        countries,
    }
}

fn include_year(range: &mut Option<YearRange>, year: i32) {
    match range {
        Some(r) => r.include(year),
        None => *range = Some(YearRange::single(year)),
    }
}

/// Every reference entry, sorted by name.
pub fn build_catalog(reference: &ReferenceTable, last_updated: &str) -> CountryCatalog {
    let mut countries: Vec<CatalogEntry> = reference.iter().map(CatalogEntry::from).collect();
    countries.sort_by(|a, b| a.name.cmp(&b.name));

    CountryCatalog {
        total_countries: countries.len(),
        last_updated: last_updated.to_string(),
        data_source: CATALOG_SOURCE.to_string(),
        countries,
    }
}

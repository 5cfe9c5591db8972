//! Country name enrichment: region and ISO3 lookups.
//!
//! A [`Gazetteer`] is an explicit value handed to the reference loader. The
//! built-in table only knows a hand-picked set of names; a CSV table with
//! `Name`, `ISO3` and `Region` columns can be layered on top so that any
//! country missing from the built-in lists gets classified properly.
//!
//! ```rust,ignore
//! use harmonizer::gazetteer::Gazetteer;
//!
//! let gazetteer = Gazetteer::builtin().with_csv_file("data/iso3166.csv")?;
//! assert_eq!(gazetteer.iso3_for("Kenya"), Some("KEN"));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

use crate::error::GazetteerError;
use crate::logs::log_warning;
use crate::models::Region;
use crate::parser::{parse_bytes_auto, Table};

static ISO3_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));

const AFRICA: &[&str] = &[
    "Algeria", "Angola", "Benin", "Botswana", "Burkina Faso", "Burundi", "Cameroon", "Chad",
    "Congo", "Egypt", "Ethiopia", "Ghana", "Kenya", "Libya", "Mali", "Morocco", "Niger",
    "Nigeria", "Rwanda", "Senegal", "Sierra Leone", "Somalia", "South Africa", "Sudan",
    "Tanzania", "Tunisia", "Uganda", "Zambia", "Zimbabwe",
];

const ASIA: &[&str] = &["Afghanistan", "China", "Japan", "Korea", "India"];

const EUROPE: &[&str] = &["France", "Germany", "Italy", "Spain", "United Kingdom"];

const AMERICAS: &[&str] = &["United States", "Canada", "Brazil", "Mexico"];

const OCEANIA: &[&str] = &["Australia", "New Zealand", "Fiji"];

const ISO3_CODES: &[(&str, &str)] = &[
    ("Albania", "ALB"),
    ("Algeria", "DZA"),
    ("American Samoa", "ASM"),
    ("Andorra", "AND"),
    ("Angola", "AGO"),
    ("Argentina", "ARG"),
    ("Australia", "AUS"),
    ("Austria", "AUT"),
    ("Bangladesh", "BGD"),
    ("Brazil", "BRA"),
    ("Canada", "CAN"),
    ("China; mainland", "CHN"),
    ("China; Hong Kong SAR", "HKG"),
    ("China; Taiwan Province of", "TWN"),
    ("Cook Islands", "COK"),
    ("Denmark", "DNK"),
    ("France", "FRA"),
    ("Germany", "DEU"),
    ("Holy See", "VAT"),
    ("India", "IND"),
    ("Italy", "ITA"),
    ("Japan", "JPN"),
    ("Kiribati", "KIR"),
    ("Monaco", "MCO"),
    ("Montenegro", "MNE"),
    ("Nauru", "NRU"),
    ("Niue", "NIU"),
    ("Palau", "PLW"),
    ("San Marino", "SMR"),
    ("South Sudan", "SSD"),
    ("Tuvalu", "TUV"),
    ("United Kingdom of Great Britain and Northern Ireland", "GBR"),
    ("United States of America", "USA"),
];

/// Region and ISO3 lookup table.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    /// Substring patterns, checked in [`Region::ORDERED`] order.
    patterns: Vec<(Region, Vec<String>)>,
    /// Exact name matches, checked before patterns.
    regions: HashMap<String, Region>,
    iso3: HashMap<String, String>,
}

impl Gazetteer {
    /// Table with no entries at all; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The hand-curated table shipped with the tool.
    pub fn builtin() -> Self {
        let lists: [&[&str]; 5] = [AFRICA, ASIA, EUROPE, AMERICAS, OCEANIA];
        let patterns = Region::ORDERED
            .iter()
            .zip(lists)
            .map(|(region, names)| (*region, names.iter().map(|n| n.to_string()).collect()))
            .collect();

        let iso3 = ISO3_CODES
            .iter()
            .map(|(name, code)| (name.to_string(), code.to_string()))
            .collect();

        Self {
            patterns,
            regions: HashMap::new(),
            iso3,
        }
    }

    /// Region for a country name; [`Region::Other`] when nothing matches.
    pub fn region_for(&self, name: &str) -> Region {
        if let Some(region) = self.regions.get(name) {
            return *region;
        }

        self.patterns
            .iter()
            .find(|(_, names)| names.iter().any(|n| name.contains(n.as_str())))
            .map(|(region, _)| *region)
            .unwrap_or(Region::Other)
    }

    /// ISO3 code for an exact country name.
    pub fn iso3_for(&self, name: &str) -> Option<&str> {
        self.iso3.get(name).map(String::as_str)
    }

    /// Register an exact region for `name`.
    pub fn insert_region(&mut self, name: impl Into<String>, region: Region) {
        self.regions.insert(name.into(), region);
    }

    /// Register an ISO3 code for `name`.
    ///
    /// The code is uppercased; returns `false` (and stores nothing) unless it
    /// is exactly three ASCII letters.
    pub fn insert_iso3(&mut self, name: impl Into<String>, code: &str) -> bool {
        let code = code.trim().to_uppercase();
        if !ISO3_PATTERN.is_match(&code) {
            return false;
        }
        self.iso3.insert(name.into(), code);
        true
    }

    /// Layer the entries of a parsed `Name,ISO3,Region` table on top.
    pub fn with_table(mut self, table: &Table) -> Result<Self, GazetteerError> {
        let name_col = table
            .find_column("Name")
            .ok_or(GazetteerError::MissingNameColumn)?
            .to_string();
        let iso3_col = table.find_column("ISO3").map(str::to_string);
        let region_col = table.find_column("Region").map(str::to_string);

        for row in table.rows() {
            let name = row.get(&name_col);
            if name.is_empty() {
                continue;
            }

            if let Some(col) = &iso3_col {
                let code = row.get(col);
                if !code.is_empty() && !self.insert_iso3(name, code) {
                    log_warning(format!(
                        "Gazetteer line {}: ignoring invalid ISO3 code '{}' for {}",
                        row.line(),
                        code,
                        name
                    ));
                }
            }

            if let Some(col) = &region_col {
                let label = row.get(col);
                if label.is_empty() {
                    continue;
                }
                match Region::from_label(label) {
                    Some(region) => self.insert_region(name, region),
                    None => log_warning(format!(
                        "Gazetteer line {}: unknown region '{}' for {}",
                        row.line(),
                        label,
                        name
                    )),
                }
            }
        }

        Ok(self)
    }

    /// Layer a `Name,ISO3,Region` CSV file on top.
    pub fn with_csv_file(self, path: impl AsRef<Path>) -> Result<Self, GazetteerError> {
        let bytes = std::fs::read(path.as_ref())?;
        let table = parse_bytes_auto(&bytes)?;
        self.with_table(&table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;

    #[test]
    fn test_builtin_regions() {
        let g = Gazetteer::builtin();
        assert_eq!(g.region_for("Kenya"), Region::Africa);
        assert_eq!(g.region_for("Afghanistan"), Region::Asia);
        assert_eq!(g.region_for("China; mainland"), Region::Asia);
        assert_eq!(g.region_for("Republic of Korea"), Region::Asia);
        assert_eq!(g.region_for("Germany"), Region::Europe);
        assert_eq!(g.region_for("United States of America"), Region::Americas);
        assert_eq!(g.region_for("Fiji"), Region::Oceania);
    }

    #[test]
    fn test_unmatched_region_is_other() {
        let g = Gazetteer::builtin();
        assert_eq!(g.region_for("Peru"), Region::Other);
        assert_eq!(g.region_for(""), Region::Other);
    }

    #[test]
    fn test_region_checks_africa_first() {
        // "South Sudan" contains "Sudan", "Democratic Republic of the Congo" contains "Congo"
        let g = Gazetteer::builtin();
        assert_eq!(g.region_for("South Sudan"), Region::Africa);
        assert_eq!(g.region_for("Democratic Republic of the Congo"), Region::Africa);
    }

    #[test]
    fn test_iso3_codes_are_three_uppercase_letters() {
        let g = Gazetteer::builtin();
        for (name, _) in ISO3_CODES {
            let code = g.iso3_for(name).unwrap();
            assert_eq!(code.len(), 3);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()), "{}", code);
        }
    }

    #[test]
    fn test_unknown_iso3_is_none() {
        let g = Gazetteer::builtin();
        assert_eq!(g.iso3_for("Afghanistan"), None);
        assert_eq!(g.iso3_for("france"), None);
        assert_eq!(g.iso3_for(""), None);
    }

    #[test]
    fn test_insert_iso3_validates() {
        let mut g = Gazetteer::empty();
        assert!(g.insert_iso3("Kenya", " ken "));
        assert_eq!(g.iso3_for("Kenya"), Some("KEN"));

        assert!(!g.insert_iso3("Peru", ""));
        assert!(!g.insert_iso3("Peru", "PE"));
        assert!(!g.insert_iso3("Peru", "P3R"));
        assert_eq!(g.iso3_for("Peru"), None);
    }

    #[test]
    fn test_table_overrides_builtin() {
        let table = parse_str(
            "Name,ISO3,Region\nAfghanistan,AFG,Asia\nPeru,PER,Americas\nAtlantis,XX,Nowhere\n",
            ',',
            "utf-8",
        )
        .unwrap();
        let g = Gazetteer::builtin().with_table(&table).unwrap();

        assert_eq!(g.iso3_for("Afghanistan"), Some("AFG"));
        assert_eq!(g.region_for("Peru"), Region::Americas);
        assert_eq!(g.iso3_for("Atlantis"), None);
        assert_eq!(g.region_for("Atlantis"), Region::Other);
        // built-in entries survive
        assert_eq!(g.iso3_for("France"), Some("FRA"));
    }

    #[test]
    fn test_table_requires_name_column() {
        let table = parse_str("Country,ISO3\nPeru,PER", ',', "utf-8").unwrap();
        let result = Gazetteer::empty().with_table(&table);
        assert!(matches!(result, Err(GazetteerError::MissingNameColumn)));
    }

    #[test]
    fn test_empty_gazetteer_misses_everything() {
        let g = Gazetteer::empty();
        assert_eq!(g.region_for("Kenya"), Region::Other);
        assert_eq!(g.iso3_for("France"), None);
    }
}

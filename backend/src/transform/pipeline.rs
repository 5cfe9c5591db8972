//! End-to-end runs: reference table → observations → dashboard documents.
//!
//! ```rust,ignore
//! use harmonizer::{run_harmonize, HarmonizeOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = run_harmonize(&HarmonizeOptions::from_env()).await?;
//!     println!("{} records harmonized", report.records);
//!     Ok(())
//! }
//! ```
//!
//! Nothing inside a run is fatal: a missing table yields empty documents and
//! a failed write is listed in the report while the other outputs still go
//! out.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::aggregate::{build_catalog, build_country_list, build_dashboard_summary};
use super::normalize::load_observations;
use crate::emit::{save_json_file, write_json};
use crate::error::PipelineResult;
use crate::fetch::{Fetcher, Source, DEFAULT_TIMEOUT_SECS};
use crate::gazetteer::Gazetteer;
use crate::logs::{log_error, log_info, log_success, log_warning};
use crate::models::ObservationRow;
use crate::reference::{load_reference, ReferenceTable};
use crate::validation::DocumentKind;

/// Raw GitHub location of the FAOSTAT data folder
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/PatMir04/patricemirindi/main/data/faostat";

pub const AREA_CODES_PATH: &str = "metadata/Inputs_LandUse_E_AreaCodes.csv";
pub const OBSERVATIONS_PATH: &str = "Inputs_LandUse_E_All_Data.csv";

pub const COUNTRIES_FILE: &str = "countries.json";
pub const SUMMARY_FILE: &str = "dashboard_summary.json";
pub const RECORDS_FILE: &str = "harmonized_records.json";

/// Options for a harmonization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonizeOptions {
    /// Area code table (URL or path)
    pub reference: String,

    /// Observations table (URL or path)
    pub observations: String,

    /// Directory the JSON documents are written to
    pub output_dir: PathBuf,

    /// Extra `Name,ISO3,Region` table layered on the built-in gazetteer
    pub gazetteer: Option<PathBuf>,

    /// Also write every harmonized row
    pub write_records: bool,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HarmonizeOptions {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl HarmonizeOptions {
    /// Default sources under another data folder
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            reference: format!("{}/{}", base, AREA_CODES_PATH),
            observations: format!("{}/{}", base, OBSERVATIONS_PATH),
            output_dir: PathBuf::from("."),
            gazetteer: None,
            write_records: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Defaults overridden by `FAOSTAT_BASE_URL`, `FAOSTAT_OUTPUT_DIR` and
    /// `FAOSTAT_FETCH_TIMEOUT_SECS` (a `.env` file is honored).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut options = match env::var("FAOSTAT_BASE_URL") {
            Ok(base) if !base.trim().is_empty() => Self::with_base_url(base.trim()),
            _ => Self::default(),
        };

        if let Ok(dir) = env::var("FAOSTAT_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                options.output_dir = PathBuf::from(dir.trim());
            }
        }

        if let Ok(secs) = env::var("FAOSTAT_FETCH_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(s) if s > 0 => options.timeout_secs = s,
                _ => log_warning(format!(
                    "Ignoring FAOSTAT_FETCH_TIMEOUT_SECS='{}', using {}s",
                    secs, options.timeout_secs
                )),
            }
        }

        options
    }

    pub fn fetcher(&self) -> PipelineResult<Fetcher> {
        Ok(Fetcher::new(Duration::from_secs(self.timeout_secs))?)
    }

    /// Built-in gazetteer, plus the configured table if any.
    pub fn load_gazetteer(&self) -> PipelineResult<Gazetteer> {
        let builtin = Gazetteer::builtin();
        match &self.gazetteer {
            Some(path) => {
                log_info(format!("Loading gazetteer from {}", path.display()));
                Ok(builtin.with_csv_file(path)?)
            }
            None => Ok(builtin),
        }
    }
}

/// What a run produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Entries in the reference table
    pub reference_entries: usize,
    /// Accepted observation rows
    pub records: usize,
    /// Countries with at least one accepted row
    pub countries: usize,
    pub written: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl RunReport {
    fn record_write(&mut self, path: PathBuf, ok: bool) {
        if ok {
            self.written.push(path);
        } else {
            self.failed.push(path);
        }
    }
}

fn timestamp() -> String {
    Local::now().to_rfc3339()
}

/// Load the reference table as configured.
pub async fn load_configured_reference(options: &HarmonizeOptions) -> PipelineResult<ReferenceTable> {
    let gazetteer = options.load_gazetteer()?;
    let fetcher = options.fetcher()?;
    Ok(load_reference(&Source::parse(&options.reference), &gazetteer, &fetcher).await)
}

/// Full harmonization: country list, dashboard summary, optionally records.
pub async fn run_harmonize(options: &HarmonizeOptions) -> PipelineResult<RunReport> {
    let gazetteer = options.load_gazetteer()?;
    let fetcher = options.fetcher()?;

    let reference = load_reference(&Source::parse(&options.reference), &gazetteer, &fetcher).await;
    let normalized = load_observations(&Source::parse(&options.observations), &reference, &fetcher).await;

    let now = timestamp();
    let country_list = build_country_list(&normalized.countries, &reference, &now);
    let summary = build_dashboard_summary(&normalized.rows, &now);

    let mut report = RunReport {
        reference_entries: reference.len(),
        records: normalized.rows.len(),
        countries: country_list.total_countries,
        ..RunReport::default()
    };

    log_info("💾 Writing dashboard files...");
    let path = options.output_dir.join(COUNTRIES_FILE);
    let ok = save_json_file(&path, DocumentKind::CountryList, &country_list);
    report.record_write(path, ok);

    let path = options.output_dir.join(SUMMARY_FILE);
    let ok = save_json_file(&path, DocumentKind::DashboardSummary, &summary);
    report.record_write(path, ok);

    if options.write_records {
        let path = options.output_dir.join(RECORDS_FILE);
        let ok = write_records(&path, &normalized.rows);
        report.record_write(path, ok);
    }

    print_report(&report);
    Ok(report)
}

/// Reference catalog only: every non-aggregate area as `countries.json`.
pub async fn run_catalog(options: &HarmonizeOptions) -> PipelineResult<RunReport> {
    let reference = load_configured_reference(options).await?;
    let catalog = build_catalog(&reference, &timestamp());

    let mut report = RunReport {
        reference_entries: reference.len(),
        countries: catalog.total_countries,
        ..RunReport::default()
    };

    let path = options.output_dir.join(COUNTRIES_FILE);
    let ok = save_json_file(&path, DocumentKind::CountryCatalog, &catalog);
    report.record_write(path, ok);

    print_report(&report);
    Ok(report)
}

fn write_records(path: &Path, rows: &[ObservationRow]) -> bool {
    match write_json(path, rows) {
        Ok(()) => {
            log_success(format!("Saved {} ({} rows)", path.display(), rows.len()));
            true
        }
        Err(e) => {
            log_error(format!("Error saving {}: {}", path.display(), e));
            false
        }
    }
}

fn print_report(report: &RunReport) {
    log_info("📊 SUMMARY");
    log_info(format!("Reference entries: {}", report.reference_entries));
    log_info(format!("Records:           {}", report.records));
    log_info(format!("Countries:         {}", report.countries));
    if report.failed.is_empty() {
        log_success(format!("{} file(s) written", report.written.len()));
    } else {
        log_warning(format!(
            "{} file(s) written, {} failed",
            report.written.len(),
            report.failed.len()
        ));
    }
}

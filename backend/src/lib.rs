//! # Harmonizer - FAOSTAT country data for the website dashboard
//!
//! Batch tooling that turns FAOSTAT CSV downloads into the JSON files the
//! static site reads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Area codes  │────▶│  Reference  │────▶│  Normalize  │────▶│  Aggregate  │──▶ JSON
//! │ (URL/path)  │     │ (+gazetteer)│     │ (join, parse│     │ (list, stats│
//! └─────────────┘     └─────────────┘     │  year/value)│     │  catalog)   │
//!                     ┌─────────────┐     └──────▲──────┘     └─────────────┘
//!                     │Observations │────────────┘
//!                     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use harmonizer::{run_harmonize, HarmonizeOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let report = run_harmonize(&HarmonizeOptions::default()).await.unwrap();
//!     println!("{} countries with data", report.countries);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Domain models (AreaCode, ObservationRow, DashboardSummary)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`fetch`] - URL/path retrieval with timeout and retry
//! - [`gazetteer`] - Region and ISO3 lookups
//! - [`reference`] - Area code reference table
//! - [`transform`] - Normalization, aggregation and pipeline runs
//! - [`validation`] - Output schema validation
//! - [`emit`] - JSON file output
//! - [`faq`] - FAQ table conversion
//! - [`publish`] - Data file publishing
//! - [`logs`] - Pipeline log stream

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Input
pub mod fetch;
pub mod parser;

// Enrichment
pub mod gazetteer;
pub mod reference;

// Transformation
pub mod transform;

// Output
pub mod emit;
pub mod validation;

// Site content
pub mod faq;
pub mod publish;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, EmitError, FetchError, GazetteerError, PipelineError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AreaCode, CatalogEntry, CountryCatalog, CountryList, CountryStats, CountrySummary,
    DashboardSummary, FaqEntry, ObservationRow, Region, SummaryTotals, YearRange,
};

// =============================================================================
// Re-exports - Input
// =============================================================================

pub use fetch::{FetchOutcome, Fetcher, Source};
pub use parser::{parse_bytes_auto, parse_csv_file_auto, parse_str, Row, Table};

// =============================================================================
// Re-exports - Enrichment
// =============================================================================

pub use gazetteer::Gazetteer;
pub use reference::{build_reference, is_aggregate, load_reference, ReferenceTable};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    build_catalog, build_country_list, build_dashboard_summary, load_observations, normalize,
    parse_value, parse_year, run_catalog, run_harmonize, HarmonizeOptions, NormalizeResult,
    RunReport,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use emit::{save_json_file, write_json};
pub use validation::{validate_document, DocumentKind};

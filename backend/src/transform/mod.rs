//! Harmonization stages.
//!
//! - Normalize: join observations with the reference table
//! - Aggregate: country list, dashboard summary, catalog
//! - Pipeline: end-to-end runs

pub mod aggregate;
pub mod normalize;
pub mod pipeline;

pub use aggregate::{build_catalog, build_country_list, build_dashboard_summary};
pub use normalize::{load_observations, normalize, parse_value, parse_year, NormalizeResult, NormalizeStats};
pub use pipeline::*;

//! Scheme catalog: record model, eligibility matching, CSV import, and the
//! read-only HTTP surface mounted by the service crate.

mod domain;
pub mod eligibility;
mod import;
pub mod router;

pub use domain::{Catalog, CatalogError, CriteriaProfile, Criterion, SchemeRecord};
pub use eligibility::{matching_schemes, record_matches, unmet_criteria, EligibilityQuery};
pub use import::{CatalogImportError, CatalogImporter};
pub use router::catalog_router;

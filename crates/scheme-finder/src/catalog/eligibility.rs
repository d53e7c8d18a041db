use serde::{Deserialize, Serialize};

use super::domain::{Criterion, SchemeRecord};

/// One concrete value per criterion dimension, built fresh from the intake
/// form for every search. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityQuery {
    pub business_type: String,
    pub sector: String,
    pub size: String,
    pub location: String,
    pub revenue: String,
    pub years: String,
}

impl EligibilityQuery {
    pub fn value(&self, criterion: Criterion) -> &str {
        match criterion {
            Criterion::BusinessType => &self.business_type,
            Criterion::Sector => &self.sector,
            Criterion::Size => &self.size,
            Criterion::Location => &self.location,
            Criterion::Revenue => &self.revenue,
            Criterion::Years => &self.years,
        }
    }
}

/// A record passes when every dimension is unconstrained or lists the
/// queried value verbatim. Comparison is case-sensitive and literal: an
/// empty query value only passes dimensions that are unconstrained or that
/// explicitly list the empty string.
pub fn record_matches(record: &SchemeRecord, query: &EligibilityQuery) -> bool {
    Criterion::ALL
        .iter()
        .all(|&criterion| record.criteria.accepts(criterion, query.value(criterion)))
}

/// Dimensions that excluded `record`, in declaration order. Empty for a
/// matching record.
pub fn unmet_criteria(record: &SchemeRecord, query: &EligibilityQuery) -> Vec<Criterion> {
    Criterion::ALL
        .iter()
        .copied()
        .filter(|&criterion| !record.criteria.accepts(criterion, query.value(criterion)))
        .collect()
}

/// Filter `records` against `query`, preserving catalog order. An empty
/// result is the normal "no schemes found" outcome, not an error.
pub fn matching_schemes(query: &EligibilityQuery, records: &[SchemeRecord]) -> Vec<SchemeRecord> {
    records
        .iter()
        .filter(|record| record_matches(record, query))
        .cloned()
        .collect()
}

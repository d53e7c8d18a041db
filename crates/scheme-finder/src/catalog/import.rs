use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::{Catalog, CatalogError, CriteriaProfile, SchemeRecord};

/// Failures while building a catalog from an external CSV export.
#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Catalog(CatalogError),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::Catalog(err) => {
                write!(f, "imported catalog violates its invariants: {}", err)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::Catalog(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<CatalogError> for CatalogImportError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Build a catalog from CSV rows. Criterion cells hold `;`-separated
    /// accepted values; a blank cell leaves the dimension unconstrained.
    pub fn from_reader<R: Read>(reader: R) -> Result<Catalog, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.deserialize::<CatalogRow>() {
            records.push(row?.into_record());
        }

        Ok(Catalog::new(records)?)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    detailed_description: Option<String>,
    eligibility: String,
    benefits: String,
    documents: String,
    guide: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    deadline: Option<String>,
    link: String,
    #[serde(default, deserialize_with = "value_set")]
    business_type: Option<BTreeSet<String>>,
    #[serde(default, deserialize_with = "value_set")]
    sector: Option<BTreeSet<String>>,
    #[serde(default, deserialize_with = "value_set")]
    size: Option<BTreeSet<String>>,
    #[serde(default, deserialize_with = "value_set")]
    location: Option<BTreeSet<String>>,
    #[serde(default, deserialize_with = "value_set")]
    revenue: Option<BTreeSet<String>>,
    #[serde(default, deserialize_with = "value_set")]
    years: Option<BTreeSet<String>>,
}

impl CatalogRow {
    fn into_record(self) -> SchemeRecord {
        SchemeRecord {
            id: self.id,
            name: self.name,
            description: self.description,
            detailed_description: self.detailed_description,
            eligibility: self.eligibility,
            benefits: self.benefits,
            documents: self.documents,
            guide: self.guide,
            deadline: self.deadline,
            link: self.link,
            criteria: CriteriaProfile {
                business_type: self.business_type,
                sector: self.sector,
                size: self.size,
                location: self.location,
                revenue: self.revenue,
                years: self.years,
            },
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn value_set<'de, D>(deserializer: D) -> Result<Option<BTreeSet<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    let set: BTreeSet<String> = match opt {
        Some(cell) => cell
            .split(';')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
        None => BTreeSet::new(),
    };
    Ok(if set.is_empty() { None } else { Some(set) })
}

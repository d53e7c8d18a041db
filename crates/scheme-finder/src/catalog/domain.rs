use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// The six axes along which a scheme may restrict who qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    BusinessType,
    Sector,
    Size,
    Location,
    Revenue,
    Years,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::BusinessType,
        Criterion::Sector,
        Criterion::Size,
        Criterion::Location,
        Criterion::Revenue,
        Criterion::Years,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Criterion::BusinessType => "business type",
            Criterion::Sector => "sector",
            Criterion::Size => "size",
            Criterion::Location => "location",
            Criterion::Revenue => "revenue",
            Criterion::Years => "years in operation",
        }
    }
}

/// Per-dimension acceptance sets. An absent set leaves that dimension
/// unconstrained; a present set must be non-empty (enforced at catalog
/// construction) and lists the accepted values verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<BTreeSet<String>>,
}

impl CriteriaProfile {
    pub fn values(&self, criterion: Criterion) -> Option<&BTreeSet<String>> {
        match criterion {
            Criterion::BusinessType => self.business_type.as_ref(),
            Criterion::Sector => self.sector.as_ref(),
            Criterion::Size => self.size.as_ref(),
            Criterion::Location => self.location.as_ref(),
            Criterion::Revenue => self.revenue.as_ref(),
            Criterion::Years => self.years.as_ref(),
        }
    }

    /// Case-sensitive, literal acceptance check for one dimension.
    pub fn accepts(&self, criterion: Criterion, value: &str) -> bool {
        match self.values(criterion) {
            None => true,
            Some(accepted) => accepted.contains(value),
        }
    }
}

/// A benefit/assistance program entry: display metadata plus the criteria
/// the eligibility matcher filters on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_description: Option<String>,
    pub eligibility: String,
    pub benefits: String,
    pub documents: String,
    pub guide: String,
    /// Absent means the scheme accepts applications on an ongoing basis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    pub link: String,
    #[serde(flatten)]
    pub criteria: CriteriaProfile,
}

impl SchemeRecord {
    pub fn deadline_label(&self) -> &str {
        self.deadline.as_deref().unwrap_or("Ongoing")
    }

    /// Substring containment over the record's display text; `needle` must
    /// already be lowercased.
    pub(crate) fn matches_term(&self, needle: &str) -> bool {
        self.display_text().contains(needle)
    }

    fn display_text(&self) -> String {
        let mut text = String::new();
        for part in [
            self.name.as_str(),
            self.description.as_str(),
            self.detailed_description.as_deref().unwrap_or(""),
            self.eligibility.as_str(),
            self.benefits.as_str(),
            self.documents.as_str(),
            self.guide.as_str(),
        ] {
            text.push_str(part);
            text.push(' ');
        }
        text.to_lowercase()
    }
}

/// Catalog invariant violations, raised at construction time only.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate scheme id: {0}")]
    DuplicateSchemeId(String),
    #[error("scheme {id} declares an empty {criterion} set")]
    EmptyCriterionSet { id: String, criterion: &'static str },
}

/// Ordered, immutable collection of scheme records. Matching, search, and
/// shortlist operations preserve this order.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<SchemeRecord>,
}

impl Catalog {
    pub fn new(records: Vec<SchemeRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id.clone()) {
                return Err(CatalogError::DuplicateSchemeId(record.id.clone()));
            }
            for criterion in Criterion::ALL {
                if let Some(accepted) = record.criteria.values(criterion) {
                    if accepted.is_empty() {
                        return Err(CatalogError::EmptyCriterionSet {
                            id: record.id.clone(),
                            criterion: criterion.label(),
                        });
                    }
                }
            }
        }
        Ok(Self { records })
    }

    /// The catalog shipped with the product, used whenever no external
    /// import is configured.
    pub fn builtin() -> Self {
        Self::new(builtin_records()).expect("builtin catalog satisfies its invariants")
    }

    pub fn records(&self) -> &[SchemeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SchemeRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Case-insensitive substring search over a record's display text.
    /// An empty term keeps every record.
    pub fn search(&self, term: &str) -> Vec<&SchemeRecord> {
        let needle = term.to_lowercase();
        self.records
            .iter()
            .filter(|record| needle.is_empty() || record.matches_term(&needle))
            .collect()
    }

    /// Sector shortlist: records whose sector dimension is unconstrained or
    /// lists `sector`. An empty selector keeps every record.
    pub fn in_sector(&self, sector: &str) -> Vec<&SchemeRecord> {
        self.records
            .iter()
            .filter(|record| sector.is_empty() || record.criteria.accepts(Criterion::Sector, sector))
            .collect()
    }
}

fn values(items: &[&str]) -> Option<BTreeSet<String>> {
    Some(items.iter().map(|item| item.to_string()).collect())
}

fn builtin_records() -> Vec<SchemeRecord> {
    vec![
        SchemeRecord {
            id: "pmegp".to_string(),
            name: "Prime Minister's Employment Generation Programme".to_string(),
            description: "Credit-linked subsidy for setting up new micro enterprises in the \
                          manufacturing and service sectors."
                .to_string(),
            detailed_description: Some(
                "Margin money subsidy of 15-35% on project cost for new units, routed through \
                 KVIC and district industries centres. Higher subsidy rates apply to rural \
                 units and special category applicants."
                    .to_string(),
            ),
            eligibility: "New micro enterprises; individuals above 18 years; no income ceiling."
                .to_string(),
            benefits: "Margin money subsidy up to 35% of project cost.".to_string(),
            documents: "Project report, identity and address proof, caste certificate if \
                        applicable, rural area certificate."
                .to_string(),
            guide: "Apply online on the KVIC portal, upload the project report, and route the \
                    application through the financing bank."
                .to_string(),
            deadline: None,
            link: "https://www.kviconline.gov.in/pmegpeportal/".to_string(),
            criteria: CriteriaProfile {
                business_type: values(&["proprietorship", "partnership"]),
                sector: values(&["manufacturing", "services"]),
                size: values(&["micro"]),
                location: None,
                revenue: values(&["under-10l", "10l-50l"]),
                years: values(&["0-1"]),
            },
        },
        SchemeRecord {
            id: "cgtmse".to_string(),
            name: "Credit Guarantee Scheme for Micro and Small Enterprises".to_string(),
            description: "Collateral-free credit guarantee cover for loans to micro and small \
                          enterprises."
                .to_string(),
            detailed_description: None,
            eligibility: "Micro and small enterprises with loans up to Rs. 5 crore from member \
                          lending institutions."
                .to_string(),
            benefits: "Guarantee cover of 75-85% on collateral-free loans.".to_string(),
            documents: "Udyam registration, loan application, financial statements.".to_string(),
            guide: "Approach a member lending institution; the lender applies for guarantee \
                    cover on your behalf."
                .to_string(),
            deadline: None,
            link: "https://www.cgtmse.in/".to_string(),
            criteria: CriteriaProfile {
                business_type: None,
                sector: values(&["manufacturing", "services", "retail"]),
                size: values(&["micro", "small"]),
                location: None,
                revenue: None,
                years: None,
            },
        },
        SchemeRecord {
            id: "pmfme".to_string(),
            name: "PM Formalisation of Micro Food Processing Enterprises".to_string(),
            description: "Support for micro food processing units to formalise and upgrade."
                .to_string(),
            detailed_description: Some(
                "Credit-linked capital subsidy of 35% of eligible project cost, capped at \
                 Rs. 10 lakh, with additional support for common infrastructure and branding."
                    .to_string(),
            ),
            eligibility: "Existing micro food processing units, FPOs, SHGs, and cooperatives."
                .to_string(),
            benefits: "35% credit-linked capital subsidy; seed capital for SHGs.".to_string(),
            documents: "Udyam registration, FSSAI licence, bank statements, project proposal."
                .to_string(),
            guide: "Register on the PMFME portal, prepare a detailed project report with the \
                    district resource person, and submit through the state nodal agency."
                .to_string(),
            deadline: Some("2026-03-31".to_string()),
            link: "https://pmfme.mofpi.gov.in/".to_string(),
            criteria: CriteriaProfile {
                business_type: values(&["proprietorship", "partnership", "cooperative"]),
                sector: values(&["food-processing", "agriculture"]),
                size: values(&["micro"]),
                location: None,
                revenue: values(&["under-10l", "10l-50l"]),
                years: values(&["1-3", "3-5", "5-plus"]),
            },
        },
        SchemeRecord {
            id: "aif".to_string(),
            name: "Agriculture Infrastructure Fund".to_string(),
            description: "Medium-long term debt financing for post-harvest management \
                          infrastructure and community farming assets."
                .to_string(),
            detailed_description: None,
            eligibility: "Farmers, FPOs, agri-entrepreneurs, and startups building post-harvest \
                          infrastructure."
                .to_string(),
            benefits: "3% interest subvention on loans up to Rs. 2 crore for seven years."
                .to_string(),
            documents: "Detailed project report, land documents, bank loan sanction.".to_string(),
            guide: "Register on the AIF portal, submit the project report, and track sanction \
                    through the lending bank."
                .to_string(),
            deadline: Some("2026-03-31".to_string()),
            link: "https://agriinfra.dac.gov.in/".to_string(),
            criteria: CriteriaProfile {
                business_type: None,
                sector: values(&["agriculture", "food-processing"]),
                size: None,
                location: values(&["rural", "semi-urban"]),
                revenue: None,
                years: None,
            },
        },
        SchemeRecord {
            id: "mudra".to_string(),
            name: "Pradhan Mantri MUDRA Yojana".to_string(),
            description: "Loans up to Rs. 10 lakh for non-corporate, non-farm micro enterprises."
                .to_string(),
            detailed_description: Some(
                "Three products by loan size: Shishu (up to Rs. 50,000), Kishore (up to \
                 Rs. 5 lakh), and Tarun (up to Rs. 10 lakh), offered through banks, NBFCs, \
                 and MFIs."
                    .to_string(),
            ),
            eligibility: "Non-corporate micro enterprises in manufacturing, trading, and \
                          services."
                .to_string(),
            benefits: "Collateral-free working capital and term loans.".to_string(),
            documents: "Identity proof, business plan, quotation of machinery if applicable."
                .to_string(),
            guide: "Apply at any bank branch or through the Udyamimitra portal with a simple \
                    business plan."
                .to_string(),
            deadline: None,
            link: "https://www.mudra.org.in/".to_string(),
            criteria: CriteriaProfile {
                business_type: values(&["proprietorship", "partnership"]),
                sector: None,
                size: values(&["micro"]),
                location: None,
                revenue: values(&["under-10l"]),
                years: None,
            },
        },
        SchemeRecord {
            id: "stand-up-india".to_string(),
            name: "Stand-Up India".to_string(),
            description: "Bank loans between Rs. 10 lakh and Rs. 1 crore for SC/ST and women \
                          entrepreneurs setting up greenfield enterprises."
                .to_string(),
            detailed_description: None,
            eligibility: "SC/ST and/or women entrepreneurs above 18 years; greenfield projects \
                          in manufacturing, services, or trading."
                .to_string(),
            benefits: "Composite loan covering 85% of project cost.".to_string(),
            documents: "Identity and caste certificates, project report, bank account details."
                .to_string(),
            guide: "Apply through the Stand-Up India portal or directly at a scheduled \
                    commercial bank branch."
                .to_string(),
            deadline: None,
            link: "https://www.standupmitra.in/".to_string(),
            criteria: CriteriaProfile {
                business_type: values(&["proprietorship", "partnership", "pvt-ltd"]),
                sector: values(&["manufacturing", "services", "retail"]),
                size: values(&["micro", "small"]),
                location: None,
                revenue: None,
                years: values(&["0-1"]),
            },
        },
        SchemeRecord {
            id: "zed".to_string(),
            name: "MSME Sustainable (ZED) Certification".to_string(),
            description: "Subsidised Zero Defect Zero Effect certification for manufacturing \
                          MSMEs."
                .to_string(),
            detailed_description: None,
            eligibility: "Udyam-registered manufacturing MSMEs at any maturity level."
                .to_string(),
            benefits: "80-50% subsidy on certification cost by enterprise size; access to \
                       ZED-linked credit benefits."
                .to_string(),
            documents: "Udyam registration, factory details, quality process records."
                .to_string(),
            guide: "Take the ZED pledge online, complete the self-assessment, and schedule the \
                    certification audit."
                .to_string(),
            deadline: None,
            link: "https://zed.msme.gov.in/".to_string(),
            criteria: CriteriaProfile {
                business_type: None,
                sector: values(&["manufacturing", "textiles"]),
                size: values(&["micro", "small", "medium"]),
                location: None,
                revenue: None,
                years: values(&["1-3", "3-5", "5-plus"]),
            },
        },
        SchemeRecord {
            id: "deds".to_string(),
            name: "Dairy Entrepreneurship Development Scheme".to_string(),
            description: "Back-ended capital subsidy for setting up small dairy farms and \
                          related infrastructure."
                .to_string(),
            detailed_description: None,
            eligibility: "Farmers, individual entrepreneurs, SHGs, and dairy cooperatives in \
                          rural areas."
                .to_string(),
            benefits: "25% back-ended capital subsidy (33% for special categories).".to_string(),
            documents: "Project report, land records, quotations for animals and equipment."
                .to_string(),
            guide: "Submit the project through a bank; subsidy is released by NABARD to the \
                    financing branch."
                .to_string(),
            deadline: None,
            link: "https://www.nabard.org/".to_string(),
            criteria: CriteriaProfile {
                business_type: values(&["proprietorship", "cooperative"]),
                sector: values(&["agriculture"]),
                size: values(&["micro", "small"]),
                location: values(&["rural"]),
                revenue: values(&["under-10l", "10l-50l"]),
                years: None,
            },
        },
    ]
}

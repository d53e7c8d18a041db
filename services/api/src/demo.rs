use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use scheme_finder::accounts::{RegistrationRequest, SessionManager};
use scheme_finder::alerts::AlertSubscriptions;
use scheme_finder::catalog::{matching_schemes, unmet_criteria, EligibilityQuery, SchemeRecord};
use scheme_finder::error::AppError;

use crate::infra::{load_catalog, InMemoryStore};

#[derive(Args, Debug, Default)]
pub(crate) struct MatchArgs {
    /// Business type token from the intake form (e.g. proprietorship)
    #[arg(long, default_value = "")]
    pub(crate) business_type: String,
    /// Sector token (e.g. agriculture)
    #[arg(long, default_value = "")]
    pub(crate) sector: String,
    /// Size token (micro, small, medium)
    #[arg(long, default_value = "")]
    pub(crate) size: String,
    /// Location token (rural, semi-urban, urban)
    #[arg(long, default_value = "")]
    pub(crate) location: String,
    /// Revenue band token (e.g. under-10l)
    #[arg(long, default_value = "")]
    pub(crate) revenue: String,
    /// Years-in-operation token (e.g. 0-1)
    #[arg(long, default_value = "")]
    pub(crate) years: String,
    /// Query a catalog CSV export instead of the builtin catalog
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Also list excluded schemes with the criteria they failed
    #[arg(long)]
    pub(crate) explain: bool,
}

impl MatchArgs {
    fn query(&self) -> EligibilityQuery {
        EligibilityQuery {
            business_type: self.business_type.clone(),
            sector: self.sector.clone(),
            size: self.size.clone(),
            location: self.location.clone(),
            revenue: self.revenue.clone(),
            years: self.years.clone(),
        }
    }
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let (catalog, imported) = load_catalog(args.catalog_csv.as_deref())?;
    let query = args.query();

    if imported {
        println!("Data source: catalog CSV import ({} schemes)", catalog.len());
    } else {
        println!("Data source: builtin catalog ({} schemes)", catalog.len());
    }

    let matches = matching_schemes(&query, catalog.records());
    render_matches(&matches);

    if args.explain {
        println!("\nExcluded schemes");
        for record in catalog.records() {
            let unmet = unmet_criteria(record, &query);
            if unmet.is_empty() {
                continue;
            }
            let labels: Vec<&str> = unmet.iter().map(|criterion| criterion.label()).collect();
            println!("- {} | failed: {}", record.name, labels.join(", "));
        }
    }

    Ok(())
}

fn render_matches(matches: &[SchemeRecord]) {
    if matches.is_empty() {
        println!("\nNo schemes found matching your criteria. Try adjusting your filters.");
        return;
    }

    println!("\nMatching schemes ({})", matches.len());
    for record in matches {
        println!("\n{}", record.name);
        println!("  {}", record.description);
        println!("  Eligibility: {}", record.eligibility);
        println!("  Benefits: {}", record.benefits);
        println!("  Documents: {}", record.documents);
        println!("  Deadline: {}", record.deadline_label());
        println!("  Apply: {}", record.link);
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Hydrate the demo from a catalog CSV export
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Skip the account/session portion of the demo
    #[arg(long)]
    pub(crate) skip_accounts: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let (catalog, imported) = load_catalog(args.catalog_csv.as_deref())?;

    println!("Scheme discovery demo");
    if imported {
        println!("Data source: catalog CSV import");
    } else {
        println!("Data source: builtin catalog");
    }

    let query = EligibilityQuery {
        business_type: "proprietorship".to_string(),
        sector: "agriculture".to_string(),
        size: "micro".to_string(),
        location: "rural".to_string(),
        revenue: "under-10l".to_string(),
        years: "0-1".to_string(),
    };
    println!(
        "\nIntake profile: proprietorship | agriculture | micro | rural | under-10l | 0-1 years"
    );
    let matches = matching_schemes(&query, catalog.records());
    render_matches(&matches);

    if args.skip_accounts {
        return Ok(());
    }

    println!("\nAccount session demo (in-memory store, credentials redacted)");
    let storage = Arc::new(InMemoryStore::default());
    let session = SessionManager::open(storage.clone())?;

    let account = match session.register(RegistrationRequest {
        name: "Asha Rao".to_string(),
        email: "asha@example.test".to_string(),
        username: "asha".to_string(),
        password: "demo-password-1".to_string(),
        confirm_password: "demo-password-1".to_string(),
        business_type: "proprietorship".to_string(),
    }) {
        Ok(account) => account,
        Err(err) => {
            println!("  Registration rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Registered {} -> logged in as {}",
        account.username, account.name
    );

    session.logout();
    println!("- Logged out; session identity cleared");

    match session.login("asha", "wrong-password", false) {
        Ok(_) => println!("  Unexpected login success"),
        Err(err) => println!("- Login with a wrong password: {}", err),
    }

    let account = match session.login("asha", "demo-password-1", true) {
        Ok(account) => account,
        Err(err) => {
            println!("  Login unavailable: {}", err);
            return Ok(());
        }
    };
    println!("- Logged back in; last login {}", account.last_login);

    match serde_json::to_string_pretty(&account.public_view()) {
        Ok(json) => println!("  Public session payload:\n{}", json),
        Err(err) => println!("  Public session payload unavailable: {}", err),
    }

    let alerts = AlertSubscriptions::new(storage);
    alerts.subscribe("asha@example.test")?;
    match alerts.current()? {
        Some(email) => println!("- Alert subscription on file: {}", email),
        None => println!("- No alert subscription on file"),
    }

    Ok(())
}

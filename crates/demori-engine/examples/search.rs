//! Run a contact search end to end against an in-memory store.
//!
//! ```sh
//! cargo run --example search -- "Ahmed Rashid" "Acme Corp"
//! ```

use anyhow::Result;
use demori_core::settings::EngineSettings;
use demori_core::ContactQuery;
use demori_engine::SearchOrchestrator;
use demori_store::Store;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "Ahmed Rashid".to_string());
    let company = args.next().unwrap_or_else(|| "Acme Corp".to_string());

    let store = Arc::new(Store::in_memory().await?);
    let settings = EngineSettings::load_with_env()?;
    let orchestrator = SearchOrchestrator::new(settings, store)?;

    let query = ContactQuery::new(name).with_company(company);
    let outcome = orchestrator.search(&query).await?;

    println!("origin: {}", outcome.origin);
    println!("confidence: {:.2}", outcome.profile.confidence);
    for email in &outcome.profile.emails {
        println!("email: {} ({:.2})", email.address, email.confidence);
    }
    for phone in &outcome.profile.phones {
        println!("phone: {} ({:.2})", phone.number, phone.confidence);
    }
    for social in &outcome.profile.social_profiles {
        println!("{}: {} ({:.2})", social.platform, social.url, social.confidence);
    }

    Ok(())
}

use anyhow::Result;
use owo_colors::OwoColorize;
use ritmo_core::config::RitmoConfig;
use ritmo_core::store::StoreClient;

/// Completion is series-level: the flag lives on the definition, so every
/// future occurrence renders as completed too.
pub async fn run(config: &RitmoConfig, id: &str) -> Result<()> {
    let store = StoreClient::new(&config.api_url)?;
    let updated = store.complete_event(id).await?;

    println!("Completed {} ({})", updated.title.bold(), updated.id.dimmed());
    Ok(())
}

use anyhow::Result;
use owo_colors::OwoColorize;
use ritmo_core::config::RitmoConfig;
use ritmo_core::store::StoreClient;

pub async fn run(config: &RitmoConfig, id: &str) -> Result<()> {
    let store = StoreClient::new(&config.api_url)?;
    store.delete_event(id).await?;

    println!("Deleted {}", id.bold());
    Ok(())
}

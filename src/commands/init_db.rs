use tracing::info;

use crate::App;

/// Create the schema and exit. Safe to run against a populated database.
pub async fn run(app: App) -> anyhow::Result<()> {
    app.database.initialize().await?;
    info!("schema ready");
    Ok(())
}

use tracing::info;

use crate::config::{self, StorageBackend};
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let database = &config::config().database;
    if database.backend == StorageBackend::Memory {
        anyhow::bail!("migrations need a PostgreSQL backend; set DATABASE_URL");
    }

    let pool = DatabaseManager::connect(database).await?;
    DatabaseManager::migrate(&pool).await?;
    pool.close().await;

    info!("Migrations complete");
    Ok(())
}

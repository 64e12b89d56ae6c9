pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use crate::config::{DatabaseConfig, StorageBackend};

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryDatabase;
pub use postgres::PgRepository;
pub use repository::{IngredientRepository, RecipeRepository, UserRepository};

/// The storage backend the server runs against
#[derive(Clone)]
pub enum Database {
    Postgres(PgPool),
    Memory(Arc<MemoryDatabase>),
}

/// Repository handles shared with the handlers
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub ingredients: Arc<dyn IngredientRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
}

impl Database {
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage; data will not survive a restart");
                Ok(Database::Memory(Arc::new(MemoryDatabase::new())))
            }
            StorageBackend::Postgres => {
                let pool = DatabaseManager::connect(config).await?;
                if config.run_migrations {
                    DatabaseManager::migrate(&pool).await?;
                }
                Ok(Database::Postgres(pool))
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        match self {
            Database::Postgres(pool) => DatabaseManager::health_check(pool).await,
            Database::Memory(_) => Ok(()),
        }
    }

    pub fn repositories(&self) -> Repositories {
        match self {
            Database::Postgres(pool) => {
                let repo = Arc::new(PgRepository::new(pool.clone()));
                Repositories {
                    users: repo.clone(),
                    ingredients: repo.clone(),
                    recipes: repo,
                }
            }
            Database::Memory(db) => Repositories {
                users: db.clone(),
                ingredients: db.clone(),
                recipes: db.clone(),
            },
        }
    }

    /// Close pooled connections on shutdown
    pub async fn close(&self) {
        if let Database::Postgres(pool) = self {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}

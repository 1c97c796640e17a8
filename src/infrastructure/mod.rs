//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod seed;
pub mod storage;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::domain::{TripRepository, UserRepository};

pub use database::{init_database, run_migrations, DatabaseConfig};
pub use database::repositories::{SeaOrmTripRepository, SeaOrmUserRepository};
pub use storage::{InMemoryTripRepository, InMemoryUserRepository};

/// Repository handles shared by the services.
///
/// ```ignore
/// let repos = Repositories::sea_orm(db);
/// let trip = repos.trips.find_by_id("...").await?;
/// ```
#[derive(Clone)]
pub struct Repositories {
    pub trips: Arc<dyn TripRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn sea_orm(db: DatabaseConnection) -> Self {
        Self {
            trips: Arc::new(SeaOrmTripRepository::new(db.clone())),
            users: Arc::new(SeaOrmUserRepository::new(db)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            trips: Arc::new(InMemoryTripRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }
}

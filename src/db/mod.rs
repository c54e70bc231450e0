//! Persistence layer.
//!
//! Handlers talk to an injected [`Store`]; the document store itself is either
//! MongoDB or an in-process memory store.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::{Config, StoreKind};
use crate::errors::AppError;
use crate::models::{DocumentId, NewProfile, NewTank, Profile, Tank, TankPatch};

/// Upper bound on the number of tanks a single listing returns.
pub const MAX_LISTED_TANKS: usize = 1000;

/// Detail reported when a second profile is created.
pub const PROFILE_EXISTS: &str = "Profile already exists";

/// Operations every persistence backend provides.
#[async_trait]
pub trait Store: Send + Sync {
    /// Prepare the backing store (connectivity check, indexes).
    async fn init(&self) -> Result<(), AppError>;

    /// Lightweight liveness check.
    async fn healthcheck(&self) -> Result<(), AppError> {
        self.init().await
    }

    // Tank operations
    async fn insert_tank(&self, tank: &NewTank) -> Result<DocumentId, AppError>;
    async fn find_tank(&self, id: &DocumentId) -> Result<Option<Tank>, AppError>;
    async fn list_tanks(&self) -> Result<Vec<Tank>, AppError>;
    /// Merge `patch` into the tank and return the result, or `None` if no tank matched.
    async fn update_tank(
        &self,
        id: &DocumentId,
        patch: &TankPatch,
    ) -> Result<Option<Tank>, AppError>;
    /// Returns whether a tank was removed.
    async fn delete_tank(&self, id: &DocumentId) -> Result<bool, AppError>;

    // Profile operations
    /// Fails with [`AppError::Conflict`] when a profile already exists.
    async fn insert_profile(
        &self,
        profile: &NewProfile,
        last_updated: DateTime<Utc>,
    ) -> Result<DocumentId, AppError>;
    async fn find_profile(&self, id: &DocumentId) -> Result<Option<Profile>, AppError>;
    /// The one meaningful profile, if created.
    async fn primary_profile(&self) -> Result<Option<Profile>, AppError>;
    /// Set the profile's `last_updated`. Returns false when there is no profile.
    async fn touch_profile(&self, at: DateTime<Utc>) -> Result<bool, AppError>;
}

pub type DynStore = Arc<dyn Store>;

/// Build the store selected by the configuration and initialize it.
pub async fn connect(config: &Config) -> Result<DynStore, AppError> {
    let store: DynStore = match config.store {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::Mongo => {
            let url = config
                .mongodb_url
                .as_deref()
                .ok_or_else(|| AppError::Internal("Missing document store URL".to_string()))?;
            Arc::new(
                MongoStore::connect(
                    url,
                    &config.tank_database,
                    &config.profile_database,
                    &config.profile_collection,
                )
                .await?,
            )
        }
    };

    store.init().await?;
    Ok(store)
}

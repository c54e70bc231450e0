//! In-process store with the same semantics as the MongoDB backend.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Store, MAX_LISTED_TANKS, PROFILE_EXISTS};
use crate::errors::AppError;
use crate::models::{DocumentId, NewProfile, NewTank, Profile, Tank, TankPatch};

/// Memory-backed store.
///
/// Intended for tests and local runs. Tanks keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tanks: RwLock<Vec<Tank>>,
    profile: RwLock<Option<Profile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("memory store lock poisoned".to_string())
}

#[async_trait]
impl Store for MemoryStore {
    async fn init(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_tank(&self, tank: &NewTank) -> Result<DocumentId, AppError> {
        let id = DocumentId::generate();
        let mut tanks = self.tanks.write().map_err(poisoned)?;
        tanks.push(tank.clone().into_tank(id));
        Ok(id)
    }

    async fn find_tank(&self, id: &DocumentId) -> Result<Option<Tank>, AppError> {
        let tanks = self.tanks.read().map_err(poisoned)?;
        Ok(tanks.iter().find(|t| t.id == *id).cloned())
    }

    async fn list_tanks(&self) -> Result<Vec<Tank>, AppError> {
        let tanks = self.tanks.read().map_err(poisoned)?;
        Ok(tanks.iter().take(MAX_LISTED_TANKS).cloned().collect())
    }

    async fn update_tank(
        &self,
        id: &DocumentId,
        patch: &TankPatch,
    ) -> Result<Option<Tank>, AppError> {
        let mut tanks = self.tanks.write().map_err(poisoned)?;
        Ok(tanks.iter_mut().find(|t| t.id == *id).map(|tank| {
            patch.apply(tank);
            tank.clone()
        }))
    }

    async fn delete_tank(&self, id: &DocumentId) -> Result<bool, AppError> {
        let mut tanks = self.tanks.write().map_err(poisoned)?;
        let before = tanks.len();
        tanks.retain(|t| t.id != *id);
        Ok(tanks.len() != before)
    }

    async fn insert_profile(
        &self,
        profile: &NewProfile,
        last_updated: DateTime<Utc>,
    ) -> Result<DocumentId, AppError> {
        let mut slot = self.profile.write().map_err(poisoned)?;
        if slot.is_some() {
            return Err(AppError::Conflict(PROFILE_EXISTS.to_string()));
        }
        let id = DocumentId::generate();
        *slot = Some(profile.clone().into_profile(id, last_updated));
        Ok(id)
    }

    async fn find_profile(&self, id: &DocumentId) -> Result<Option<Profile>, AppError> {
        let slot = self.profile.read().map_err(poisoned)?;
        Ok(slot.as_ref().filter(|p| p.id == *id).cloned())
    }

    async fn primary_profile(&self) -> Result<Option<Profile>, AppError> {
        let slot = self.profile.read().map_err(poisoned)?;
        Ok(slot.clone())
    }

    async fn touch_profile(&self, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut slot = self.profile.write().map_err(poisoned)?;
        match slot.as_mut() {
            Some(profile) => {
                profile.last_updated = at;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

//! MongoDB-backed store.
//!
//! Tanks and the profile live in separate databases on the same cluster.

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use mongodb::{
    options::{
        ClientOptions, FindOneAndUpdateOptions, FindOneOptions, FindOptions, IndexOptions,
        ReturnDocument,
    },
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};

use super::{Store, MAX_LISTED_TANKS, PROFILE_EXISTS};
use crate::errors::AppError;
use crate::models::{DocumentId, NewProfile, NewTank, Profile, Tank, TankPatch};

/// Value of `slot` on the one profile document; a unique index on it enforces the singleton.
const PROFILE_SLOT: i32 = 0;

/// Collection holding tank documents.
const TANK_COLLECTION: &str = "tanks";

#[derive(Debug, Serialize, Deserialize)]
struct TankDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    location: String,
    lat: f64,
    long: f64,
}

impl From<TankDocument> for Tank {
    fn from(doc: TankDocument) -> Self {
        Tank {
            id: doc.id.into(),
            location: doc.location,
            lat: doc.lat,
            long: doc.long,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    /// Absent on documents written before the singleton index existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    slot: Option<i32>,
    username: String,
    color: String,
    role: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    last_updated: DateTime<Utc>,
}

impl From<ProfileDocument> for Profile {
    fn from(doc: ProfileDocument) -> Self {
        Profile {
            id: doc.id.into(),
            username: doc.username,
            color: doc.color,
            role: doc.role,
            last_updated: doc.last_updated,
        }
    }
}

/// The slotted profile first, then the oldest document.
fn primary_profile_order() -> Document {
    doc! { "slot": -1, "_id": 1 }
}

/// Build the `$set` body for a tank patch.
fn patch_document(patch: &TankPatch) -> Document {
    let mut set = Document::new();
    if let Some(location) = &patch.location {
        set.insert("location", location.clone());
    }
    if let Some(lat) = patch.lat {
        set.insert("lat", lat);
    }
    if let Some(long) = patch.long {
        set.insert("long", long);
    }
    set
}

pub struct MongoStore {
    tank_db: Database,
    tanks: Collection<TankDocument>,
    profiles: Collection<ProfileDocument>,
}

impl MongoStore {
    pub async fn connect(
        uri: &str,
        tank_database: &str,
        profile_database: &str,
        profile_collection: &str,
    ) -> Result<Self, AppError> {
        let mut opts = ClientOptions::parse(uri).await?;
        if opts.app_name.is_none() {
            opts.app_name = Some("tank-backend".to_string());
        }

        let client = Client::with_options(opts)?;
        let tank_db = client.database(tank_database);
        let profile_db = client.database(profile_database);

        tracing::info!(
            "Using '{}.{}' for tanks and '{}.{}' for the profile",
            tank_database,
            TANK_COLLECTION,
            profile_database,
            profile_collection
        );

        Ok(Self {
            tanks: tank_db.collection::<TankDocument>(TANK_COLLECTION),
            profiles: profile_db.collection::<ProfileDocument>(profile_collection),
            tank_db,
        })
    }

    async fn ensure_indexes(&self) -> Result<(), AppError> {
        self.profiles
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "slot": 1 })
                    // sparse: older profile documents carry no slot
                    .options(IndexOptions::builder().unique(true).sparse(true).build())
                    .build(),
                None,
            )
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.tank_db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn init(&self) -> Result<(), AppError> {
        self.ping().await?;
        self.ensure_indexes().await
    }

    async fn healthcheck(&self) -> Result<(), AppError> {
        self.ping().await
    }

    async fn insert_tank(&self, tank: &NewTank) -> Result<DocumentId, AppError> {
        let doc = TankDocument {
            id: ObjectId::new(),
            location: tank.location.clone(),
            lat: tank.lat,
            long: tank.long,
        };
        self.tanks.insert_one(&doc, None).await?;
        Ok(doc.id.into())
    }

    async fn find_tank(&self, id: &DocumentId) -> Result<Option<Tank>, AppError> {
        let found = self
            .tanks
            .find_one(doc! { "_id": id.object_id() }, None)
            .await?;
        Ok(found.map(Tank::from))
    }

    async fn list_tanks(&self) -> Result<Vec<Tank>, AppError> {
        let options = FindOptions::builder()
            .limit(MAX_LISTED_TANKS as i64)
            .build();
        let mut cursor = self.tanks.find(None, options).await?;

        let mut tanks = Vec::new();
        while cursor.advance().await? {
            tanks.push(Tank::from(cursor.deserialize_current()?));
        }
        Ok(tanks)
    }

    async fn update_tank(
        &self,
        id: &DocumentId,
        patch: &TankPatch,
    ) -> Result<Option<Tank>, AppError> {
        // `$set` must not be empty; an empty patch is a plain lookup.
        if patch.is_empty() {
            return self.find_tank(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .tanks
            .find_one_and_update(
                doc! { "_id": id.object_id() },
                doc! { "$set": patch_document(patch) },
                options,
            )
            .await?;
        Ok(updated.map(Tank::from))
    }

    async fn delete_tank(&self, id: &DocumentId) -> Result<bool, AppError> {
        let result = self
            .tanks
            .delete_one(doc! { "_id": id.object_id() }, None)
            .await?;
        Ok(result.deleted_count == 1)
    }

    async fn insert_profile(
        &self,
        profile: &NewProfile,
        last_updated: DateTime<Utc>,
    ) -> Result<DocumentId, AppError> {
        let doc = ProfileDocument {
            id: ObjectId::new(),
            slot: Some(PROFILE_SLOT),
            username: profile.username.clone(),
            color: profile.color.clone(),
            role: profile.role.clone(),
            last_updated,
        };
        match self.profiles.insert_one(&doc, None).await {
            Ok(_) => Ok(doc.id.into()),
            Err(err) => match AppError::from(err) {
                AppError::Conflict(_) => Err(AppError::Conflict(PROFILE_EXISTS.to_string())),
                other => Err(other),
            },
        }
    }

    async fn find_profile(&self, id: &DocumentId) -> Result<Option<Profile>, AppError> {
        let found = self
            .profiles
            .find_one(doc! { "_id": id.object_id() }, None)
            .await?;
        Ok(found.map(Profile::from))
    }

    async fn primary_profile(&self) -> Result<Option<Profile>, AppError> {
        let options = FindOneOptions::builder()
            .sort(primary_profile_order())
            .build();
        let found = self.profiles.find_one(None, options).await?;
        Ok(found.map(Profile::from))
    }

    async fn touch_profile(&self, at: DateTime<Utc>) -> Result<bool, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .sort(primary_profile_order())
            .build();
        let touched = self
            .profiles
            .find_one_and_update(
                doc! {},
                doc! { "$set": { "last_updated": bson::DateTime::from_chrono(at) } },
                options,
            )
            .await?;
        Ok(touched.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::store_now;

    #[test]
    fn test_patch_document_only_sets_present_fields() {
        let patch = TankPatch {
            location: Some("Basement".to_string()),
            ..Default::default()
        };
        let set = patch_document(&patch);

        assert_eq!(set.len(), 1);
        assert_eq!(set.get_str("location").unwrap(), "Basement");
        assert!(!set.contains_key("lat"));
        assert!(!set.contains_key("long"));
    }

    #[test]
    fn test_profile_document_uses_bson_datetime() {
        let doc = ProfileDocument {
            id: ObjectId::new(),
            slot: Some(PROFILE_SLOT),
            username: "ada".to_string(),
            color: "blue".to_string(),
            role: "admin".to_string(),
            last_updated: store_now(),
        };

        let encoded = bson::to_document(&doc).expect("profile should serialize to bson document");
        assert!(encoded.get_datetime("last_updated").is_ok());
        assert_eq!(encoded.get_i32("slot").unwrap(), PROFILE_SLOT);
        assert!(encoded.get_object_id("_id").is_ok());
    }

    #[test]
    fn test_profile_document_without_slot_decodes() {
        let legacy = doc! {
            "_id": ObjectId::new(),
            "username": "ada",
            "color": "blue",
            "role": "admin",
            "last_updated": bson::DateTime::now(),
        };

        let decoded: ProfileDocument =
            bson::from_document(legacy).expect("legacy profile should decode");
        assert!(decoded.slot.is_none());
        assert_eq!(Profile::from(decoded).username, "ada");
    }

    #[test]
    fn test_tank_document_maps_id() {
        let oid = ObjectId::new();
        let tank = Tank::from(TankDocument {
            id: oid,
            location: "Roof".to_string(),
            lat: 1.0,
            long: 2.0,
        });
        assert_eq!(tank.id.to_string(), oid.to_hex());
    }
}

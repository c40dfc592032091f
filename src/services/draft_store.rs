use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mongodb::{bson::doc, Client, Collection};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    error::DraftStoreError,
    models::draft::{BookingDraft, DraftKey},
};

/// Where in-progress drafts are kept between visits. One entry per guest and
/// property.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn load(&self, key: &DraftKey) -> Result<Option<BookingDraft>, DraftStoreError>;
    async fn save(&self, key: &DraftKey, draft: &BookingDraft) -> Result<(), DraftStoreError>;
    async fn clear(&self, key: &DraftKey) -> Result<(), DraftStoreError>;
    fn backend(&self) -> &'static str;
}

#[derive(Default)]
pub struct MemoryDraftStore {
    drafts: RwLock<HashMap<DraftKey, BookingDraft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn load(&self, key: &DraftKey) -> Result<Option<BookingDraft>, DraftStoreError> {
        Ok(self.drafts.read().await.get(key).cloned())
    }

    async fn save(&self, key: &DraftKey, draft: &BookingDraft) -> Result<(), DraftStoreError> {
        self.drafts.write().await.insert(*key, draft.clone());
        Ok(())
    }

    async fn clear(&self, key: &DraftKey) -> Result<(), DraftStoreError> {
        self.drafts.write().await.remove(key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// A draft as written to the `Drafts` collection.
#[derive(Debug, Serialize, Deserialize)]
struct StoredDraft {
    owner: String,
    #[serde(flatten)]
    draft: BookingDraft,
}

pub struct MongoDraftStore {
    client: Arc<Client>,
}

impl MongoDraftStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    fn collection(&self) -> Collection<StoredDraft> {
        self.client.database("Booking").collection("Drafts")
    }
}

fn key_filter(key: &DraftKey) -> mongodb::bson::Document {
    doc! { "owner": key.owner.to_string(), "resort_id": key.resort_id }
}

#[async_trait]
impl DraftStore for MongoDraftStore {
    async fn load(&self, key: &DraftKey) -> Result<Option<BookingDraft>, DraftStoreError> {
        let stored = self.collection().find_one(key_filter(key)).await?;
        Ok(stored.map(|stored| stored.draft))
    }

    async fn save(&self, key: &DraftKey, draft: &BookingDraft) -> Result<(), DraftStoreError> {
        let stored = StoredDraft {
            owner: key.owner.to_string(),
            draft: BookingDraft {
                resort_id: key.resort_id,
                ..draft.clone()
            },
        };
        self.collection()
            .replace_one(key_filter(key), &stored)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn clear(&self, key: &DraftKey) -> Result<(), DraftStoreError> {
        self.collection().delete_one(key_filter(key)).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

//! In-memory gallery store for ephemeral bring-up and tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Case, CaseDraft, GalleryStore, MediaDraft, MediaItem};
use crate::error::{Error, Result};

#[derive(Clone, Default)]
pub struct MemoryGallery {
    cases: Arc<RwLock<HashMap<String, Case>>>,
}

impl MemoryGallery {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GalleryStore for MemoryGallery {
    async fn list(&self, include_unpublished: bool) -> Result<Vec<Case>> {
        let cases = self.cases.read().await;
        let mut all: Vec<Case> = cases
            .values()
            .filter(|c| include_unpublished || c.published)
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Option<Case>> {
        let cases = self.cases.read().await;
        Ok(cases.get(id).cloned())
    }

    async fn create(&self, draft: CaseDraft) -> Result<Case> {
        let case = Case {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            brand: draft.brand,
            model: draft.model,
            year_start: draft.year_start,
            year_end: draft.year_end,
            sku: draft.sku,
            published: draft.published,
            created_at: Utc::now(),
            media: Vec::new(),
        };
        self.cases.write().await.insert(case.id.clone(), case.clone());
        Ok(case)
    }

    async fn update(&self, id: &str, draft: CaseDraft) -> Result<Case> {
        let mut cases = self.cases.write().await;
        let case = cases
            .get_mut(id)
            .ok_or_else(|| Error::CaseNotFound(id.to_string()))?;

        case.title = draft.title;
        case.brand = draft.brand;
        case.model = draft.model;
        case.year_start = draft.year_start;
        case.year_end = draft.year_end;
        case.sku = draft.sku;
        case.published = draft.published;
        Ok(case.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut cases = self.cases.write().await;
        cases
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::CaseNotFound(id.to_string()))
    }

    async fn add_media(&self, case_id: &str, draft: MediaDraft) -> Result<MediaItem> {
        let mut cases = self.cases.write().await;
        let case = cases
            .get_mut(case_id)
            .ok_or_else(|| Error::CaseNotFound(case_id.to_string()))?;

        let item = MediaItem {
            id: Uuid::new_v4().to_string(),
            case_id: case_id.to_string(),
            kind: draft.kind,
            media_type: draft.media_type,
            url: draft.url,
            sort_order: draft.sort_order,
        };
        case.media.push(item.clone());
        case.media.sort_by_key(|m| m.sort_order);
        Ok(item)
    }

    async fn remove_media(&self, media_id: &str) -> Result<()> {
        let mut cases = self.cases.write().await;
        for case in cases.values_mut() {
            if let Some(pos) = case.media.iter().position(|m| m.id == media_id) {
                case.media.remove(pos);
                return Ok(());
            }
        }
        Err(Error::MediaNotFound(media_id.to_string()))
    }
}

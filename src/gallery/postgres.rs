//! PostgreSQL-backed gallery store

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tokio_postgres::{Client, Row};
use uuid::Uuid;

use super::{Case, CaseDraft, GalleryStore, MediaDraft, MediaItem, MediaKind, MediaType};
use crate::error::{Error, Result};

pub struct PostgresGallery {
    client: Arc<Client>,
}

impl PostgresGallery {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Create the cases and media tables if they do not exist
    pub async fn init_schema(&self) -> Result<()> {
        self.client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS cases (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    brand TEXT NOT NULL,
                    model TEXT NOT NULL,
                    year_start INT,
                    year_end INT,
                    sku TEXT,
                    published BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
                );
                CREATE TABLE IF NOT EXISTS media (
                    id TEXT PRIMARY KEY,
                    case_id TEXT NOT NULL REFERENCES cases(id) ON DELETE CASCADE,
                    kind TEXT NOT NULL,
                    media_type TEXT NOT NULL,
                    url TEXT NOT NULL,
                    sort_order INT NOT NULL DEFAULT 0
                );",
            )
            .await?;
        Ok(())
    }

    fn row_to_case(row: &Row) -> Case {
        Case {
            id: row.get("id"),
            title: row.get("title"),
            brand: row.get("brand"),
            model: row.get("model"),
            year_start: row.get("year_start"),
            year_end: row.get("year_end"),
            sku: row.get("sku"),
            published: row.get("published"),
            created_at: row.get("created_at"),
            media: Vec::new(),
        }
    }

    fn row_to_media(row: &Row) -> Result<MediaItem> {
        let kind: String = row.get("kind");
        let media_type: String = row.get("media_type");
        Ok(MediaItem {
            id: row.get("id"),
            case_id: row.get("case_id"),
            kind: MediaKind::from_str(&kind).map_err(Error::Other)?,
            media_type: MediaType::from_str(&media_type).map_err(Error::Other)?,
            url: row.get("url"),
            sort_order: row.get("sort_order"),
        })
    }

    async fn media_for(&self, case_id: &str) -> Result<Vec<MediaItem>> {
        let rows = self
            .client
            .query(
                "SELECT id, case_id, kind, media_type, url, sort_order
                 FROM media WHERE case_id = $1 ORDER BY sort_order, id",
                &[&case_id],
            )
            .await?;
        rows.iter().map(Self::row_to_media).collect()
    }
}

#[async_trait]
impl GalleryStore for PostgresGallery {
    async fn list(&self, include_unpublished: bool) -> Result<Vec<Case>> {
        let rows = self
            .client
            .query(
                "SELECT id, title, brand, model, year_start, year_end, sku, published, created_at
                 FROM cases
                 WHERE published OR $1
                 ORDER BY created_at DESC",
                &[&include_unpublished],
            )
            .await?;

        let mut cases = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut case = Self::row_to_case(row);
            case.media = self.media_for(&case.id).await?;
            cases.push(case);
        }
        Ok(cases)
    }

    async fn get(&self, id: &str) -> Result<Option<Case>> {
        let row = self
            .client
            .query_opt(
                "SELECT id, title, brand, model, year_start, year_end, sku, published, created_at
                 FROM cases WHERE id = $1",
                &[&id],
            )
            .await?;

        match row {
            Some(row) => {
                let mut case = Self::row_to_case(&row);
                case.media = self.media_for(&case.id).await?;
                Ok(Some(case))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, draft: CaseDraft) -> Result<Case> {
        let id = Uuid::new_v4().to_string();
        let row = self
            .client
            .query_one(
                "INSERT INTO cases (id, title, brand, model, year_start, year_end, sku, published)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 RETURNING id, title, brand, model, year_start, year_end, sku, published, created_at",
                &[
                    &id,
                    &draft.title,
                    &draft.brand,
                    &draft.model,
                    &draft.year_start,
                    &draft.year_end,
                    &draft.sku,
                    &draft.published,
                ],
            )
            .await?;
        Ok(Self::row_to_case(&row))
    }

    async fn update(&self, id: &str, draft: CaseDraft) -> Result<Case> {
        let row = self
            .client
            .query_opt(
                "UPDATE cases
                 SET title = $2, brand = $3, model = $4, year_start = $5,
                     year_end = $6, sku = $7, published = $8
                 WHERE id = $1
                 RETURNING id, title, brand, model, year_start, year_end, sku, published, created_at",
                &[
                    &id,
                    &draft.title,
                    &draft.brand,
                    &draft.model,
                    &draft.year_start,
                    &draft.year_end,
                    &draft.sku,
                    &draft.published,
                ],
            )
            .await?
            .ok_or_else(|| Error::CaseNotFound(id.to_string()))?;

        let mut case = Self::row_to_case(&row);
        case.media = self.media_for(&case.id).await?;
        Ok(case)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let deleted = self
            .client
            .execute("DELETE FROM cases WHERE id = $1", &[&id])
            .await?;
        if deleted == 0 {
            return Err(Error::CaseNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn add_media(&self, case_id: &str, draft: MediaDraft) -> Result<MediaItem> {
        let exists = self
            .client
            .query_opt("SELECT 1 FROM cases WHERE id = $1", &[&case_id])
            .await?;
        if exists.is_none() {
            return Err(Error::CaseNotFound(case_id.to_string()));
        }

        let id = Uuid::new_v4().to_string();
        let kind = draft.kind.to_string();
        let media_type = draft.media_type.to_string();
        let row = self
            .client
            .query_one(
                "INSERT INTO media (id, case_id, kind, media_type, url, sort_order)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING id, case_id, kind, media_type, url, sort_order",
                &[&id, &case_id, &kind, &media_type, &draft.url, &draft.sort_order],
            )
            .await?;
        Self::row_to_media(&row)
    }

    async fn remove_media(&self, media_id: &str) -> Result<()> {
        let deleted = self
            .client
            .execute("DELETE FROM media WHERE id = $1", &[&media_id])
            .await?;
        if deleted == 0 {
            return Err(Error::MediaNotFound(media_id.to_string()));
        }
        Ok(())
    }
}

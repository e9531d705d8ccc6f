//! Gallery records: before/after case studies and their media items

pub mod memory;
pub mod postgres;

pub use memory::MemoryGallery;
pub use postgres::PostgresGallery;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Result;

/// Where a media item sits in the before/after story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    Before,
    After,
    Gallery,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Before => write!(f, "BEFORE"),
            MediaKind::After => write!(f, "AFTER"),
            MediaKind::Gallery => write!(f, "GALLERY"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BEFORE" => Ok(MediaKind::Before),
            "AFTER" => Ok(MediaKind::After),
            "GALLERY" => Ok(MediaKind::Gallery),
            other => Err(format!("unknown media kind: {}", other)),
        }
    }
}

/// Image or video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Image,
    Video,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Image => write!(f, "IMAGE"),
            MediaType::Video => write!(f, "VIDEO"),
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IMAGE" => Ok(MediaType::Image),
            "VIDEO" => Ok(MediaType::Video),
            other => Err(format!("unknown media type: {}", other)),
        }
    }
}

/// A media item attached to a case
#[derive(Debug, Clone, Serialize)]
pub struct MediaItem {
    pub id: String,
    pub case_id: String,
    pub kind: MediaKind,
    pub media_type: MediaType,
    pub url: String,
    pub sort_order: i32,
}

/// A before/after case study with its media
#[derive(Debug, Clone, Serialize)]
pub struct Case {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub sku: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub media: Vec<MediaItem>,
}

/// Case create/update input
#[derive(Debug, Clone, Deserialize)]
pub struct CaseDraft {
    pub title: String,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub year_start: Option<i32>,
    #[serde(default)]
    pub year_end: Option<i32>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub published: bool,
}

/// Media attachment input
#[derive(Debug, Clone, Deserialize)]
pub struct MediaDraft {
    pub kind: MediaKind,
    pub media_type: MediaType,
    pub url: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Persisted case/media storage
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// List cases, newest first. Unpublished cases are only included when
    /// requested (admin surfaces).
    async fn list(&self, include_unpublished: bool) -> Result<Vec<Case>>;

    async fn get(&self, id: &str) -> Result<Option<Case>>;

    async fn create(&self, draft: CaseDraft) -> Result<Case>;

    async fn update(&self, id: &str, draft: CaseDraft) -> Result<Case>;

    async fn delete(&self, id: &str) -> Result<()>;

    async fn add_media(&self, case_id: &str, draft: MediaDraft) -> Result<MediaItem>;

    async fn remove_media(&self, media_id: &str) -> Result<()>;
}

//! Wire shapes for the HTTP API.
//!
//! These are the public JSON contracts. They convert to and from the
//! [`crate::model`] types at the handler boundary, so the API can evolve
//! independently of storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::{DEFAULT_PAGE_SIZE, NewSong, Song, SongFilter, SongPage, SongPatch};

/// Public representation of a song.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongResponse {
    pub id: String,
    pub title: String,
    pub text: Option<String>,
    pub link: Option<String>,
    pub group: String,
    pub release_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Song> for SongResponse {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            title: song.title,
            text: song.text,
            link: song.link,
            group: song.group,
            release_date: song.release_date,
            created_at: song.created_at,
            updated_at: song.updated_at,
        }
    }
}

/// Body of `POST /songs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSong {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub text: Option<String>,
    pub link: Option<String>,
    #[validate(length(min = 1, message = "group is required"))]
    pub group: String,
    /// Unix timestamp, seconds
    #[serde(with = "chrono::serde::ts_seconds")]
    pub release_date: DateTime<Utc>,
}

impl From<CreateSong> for NewSong {
    fn from(dto: CreateSong) -> Self {
        Self {
            title: dto.title,
            text: dto.text,
            link: dto.link,
            group: dto.group,
            release_date: dto.release_date,
        }
    }
}

/// Body of `PATCH /songs/{id}`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSong {
    /// Optional; must match the path when given
    pub id: Option<String>,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
    #[validate(length(min = 1, message = "group must not be empty"))]
    pub group: Option<String>,
    /// Unix timestamp, seconds
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub release_date: Option<DateTime<Utc>>,
}

impl UpdateSong {
    /// Build the storage patch for the song at `id`.
    pub fn into_patch(self, id: String) -> SongPatch {
        SongPatch {
            id,
            title: self.title,
            text: self.text,
            link: self.link,
            group: self.group,
            release_date: self.release_date,
        }
    }
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Query string of `GET /songs`. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Unix timestamp, seconds, inclusive
    pub release_date_from: Option<i64>,
    /// Unix timestamp, seconds, inclusive
    pub release_date_to: Option<i64>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
    pub group: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl ListParams {
    /// Convert to a storage filter. Empty substrings count as absent.
    pub fn into_filter(self) -> Result<SongFilter, String> {
        fn timestamp(name: &str, secs: Option<i64>) -> Result<Option<DateTime<Utc>>, String> {
            secs.map(|s| {
                DateTime::from_timestamp(s, 0)
                    .ok_or_else(|| format!("{name} is out of range: {s}"))
            })
            .transpose()
        }
        fn non_empty(s: Option<String>) -> Option<String> {
            s.filter(|s| !s.is_empty())
        }

        Ok(SongFilter {
            release_date_from: timestamp("release_date_from", self.release_date_from)?,
            release_date_to: timestamp("release_date_to", self.release_date_to)?,
            title: non_empty(self.title),
            text: non_empty(self.text),
            link: non_empty(self.link),
            group: non_empty(self.group),
            include_deleted: self.include_deleted,
            page: self.page,
            page_size: self.page_size,
        })
    }
}

/// Paginated envelope returned by `GET /songs`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SongList {
    pub data: Vec<SongResponse>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl SongList {
    pub fn new(page: SongPage, filter: &SongFilter) -> Self {
        let total_pages = page.total_pages(filter.page_size);
        Self {
            data: page.songs.into_iter().map(SongResponse::from).collect(),
            page: filter.page,
            page_size: filter.page_size,
            total: page.total,
            total_pages,
        }
    }
}

/// Outcome message, used for errors and for confirmations.
#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    pub error: bool,
    pub message: String,
}

impl Status {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            error: false,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

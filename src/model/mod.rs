//! Core data models for the song catalogue.
//!
//! Defines the persisted entity [`Song`] and the transient shapes passed
//! between layers: [`NewSong`] for creation, [`SongPatch`] for partial
//! updates, [`SongFilter`] for list queries and [`SongPage`] for results.
//!
//! # Database Schema
//!
//! [`Song`] maps to the `songs` table. A row whose `deleted_at` is set is
//! soft-deleted and hidden from default reads.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Default page size for list queries.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A song in the catalogue.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Song {
    /// Database ID (generated by the store, immutable)
    pub id: String,
    /// Song title
    pub title: String,
    /// Lyrics
    pub text: Option<String>,
    /// External link (video, streaming page)
    pub link: Option<String>,
    /// Performing group or artist
    pub group: String,
    /// Release date
    pub release_date: DateTime<Utc>,
    /// Set by the store on insert
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every mutation
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Song {
    /// Whether the song is soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Fields supplied by a caller when creating a song.
///
/// Timestamps are not part of this type: the store always assigns them.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSong {
    pub title: String,
    pub text: Option<String>,
    pub link: Option<String>,
    pub group: String,
    pub release_date: DateTime<Utc>,
}

/// A partial update of an existing song.
///
/// Only `Some` fields are written; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongPatch {
    pub id: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
    pub group: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
}

impl SongPatch {
    /// Create an empty patch for the given song.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.text.is_none()
            && self.link.is_none()
            && self.group.is_none()
            && self.release_date.is_none()
    }
}

/// Criteria for listing songs.
///
/// Substring fields match case-insensitively. Date bounds are inclusive.
/// `page` is zero-based. A negative `page_size` disables the limit, zero
/// returns no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct SongFilter {
    pub release_date_from: Option<DateTime<Utc>>,
    pub release_date_to: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
    pub group: Option<String>,
    /// Include soft-deleted rows
    pub include_deleted: bool,
    pub page: i64,
    pub page_size: i64,
}

impl Default for SongFilter {
    fn default() -> Self {
        Self {
            release_date_from: None,
            release_date_to: None,
            title: None,
            text: None,
            link: None,
            group: None,
            include_deleted: false,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SongFilter {
    /// A filter with no predicates and no limit.
    pub fn unbounded() -> Self {
        Self {
            page_size: -1,
            ..Default::default()
        }
    }

    /// Rows to skip, if an offset applies.
    ///
    /// An offset is only meaningful with a positive page size.
    pub fn offset(&self) -> Option<i64> {
        (self.page >= 0 && self.page_size > 0).then(|| self.page.saturating_mul(self.page_size))
    }

    /// Row cap, if a limit applies.
    pub fn limit(&self) -> Option<i64> {
        (self.page_size >= 0).then_some(self.page_size)
    }
}

/// One page of a filtered listing plus the total number of matches.
#[derive(Debug, Clone, PartialEq)]
pub struct SongPage {
    pub songs: Vec<Song>,
    pub total: i64,
}

impl SongPage {
    /// Number of pages needed to show `total` rows at `page_size` per page.
    ///
    /// A negative page size means everything fits on one page; a zero page
    /// size yields no pages.
    pub fn total_pages(&self, page_size: i64) -> i64 {
        match page_size {
            size if size > 0 => self.total / size + i64::from(self.total % size != 0),
            0 => 0,
            _ if self.total > 0 => 1,
            _ => 0,
        }
    }
}

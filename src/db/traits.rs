//! Storage trait for the song catalogue.
//!
//! The service layer depends on [`SongStorage`] rather than on a concrete
//! database, so handlers and the service can be tested against the
//! in-memory mock in [`mocks`].

use async_trait::async_trait;

use super::StoreError;
use crate::model::{NewSong, Song, SongFilter, SongPatch};

/// Persistence operations for songs.
///
/// Every operation is a single statement; no call spans a transaction.
#[async_trait]
pub trait SongStorage: Send + Sync {
    /// List songs matching `filter`, newest release first.
    async fn get_by_filters(&self, filter: &SongFilter) -> Result<Vec<Song>, StoreError>;

    /// Count all songs matching `filter`, ignoring pagination.
    async fn count_by_filters(&self, filter: &SongFilter) -> Result<i64, StoreError>;

    /// Look up one song. Soft-deleted rows are only returned when
    /// `allow_deleted` is set; otherwise they read as `None`.
    async fn get_by_id(&self, id: &str, allow_deleted: bool) -> Result<Option<Song>, StoreError>;

    /// Insert a song and return the stored row.
    async fn create(&self, song: NewSong) -> Result<Song, StoreError>;

    /// Apply the present fields of `patch` to a live song.
    async fn update(&self, patch: SongPatch) -> Result<Song, StoreError>;

    /// Soft-delete a live song.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Undo a soft delete.
    async fn restore(&self, id: &str) -> Result<(), StoreError>;

    /// Remove a song row, deleted or not.
    async fn delete_permanent(&self, id: &str) -> Result<(), StoreError>;
}

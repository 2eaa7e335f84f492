//! Song service - the layer between HTTP handlers and storage.
//!
//! Delegates to a [`SongStorage`] and adds two policies:
//! - single-song reads never see soft-deleted rows
//! - every storage call is bounded by a timeout

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::db::{SongStorage, StoreError};
use crate::model::{NewSong, Song, SongFilter, SongPage, SongPatch};

/// Catalogue operations used by the HTTP layer and the CLI.
#[derive(Clone)]
pub struct SongService {
    storage: Arc<dyn SongStorage>,
    timeout: Duration,
}

impl SongService {
    /// Create a service over `storage`, abandoning calls slower than `timeout`.
    pub fn new(storage: Arc<dyn SongStorage>, timeout: Duration) -> Self {
        Self { storage, timeout }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    /// One page of songs matching `filter`, with the total match count.
    pub async fn list(&self, filter: &SongFilter) -> Result<SongPage, StoreError> {
        let (songs, total) = self
            .bounded(async {
                tokio::try_join!(
                    self.storage.get_by_filters(filter),
                    self.storage.count_by_filters(filter)
                )
            })
            .await?;
        Ok(SongPage { songs, total })
    }

    /// A live song by ID.
    pub async fn get(&self, id: &str) -> Result<Option<Song>, StoreError> {
        self.bounded(self.storage.get_by_id(id, false)).await
    }

    /// A song by ID, including soft-deleted ones.
    pub async fn get_any(&self, id: &str) -> Result<Option<Song>, StoreError> {
        self.bounded(self.storage.get_by_id(id, true)).await
    }

    pub async fn create(&self, song: NewSong) -> Result<Song, StoreError> {
        let created = self.bounded(self.storage.create(song)).await?;
        tracing::info!(id = %created.id, "Song created");
        Ok(created)
    }

    pub async fn update(&self, patch: SongPatch) -> Result<Song, StoreError> {
        if patch.is_empty() {
            tracing::debug!(id = %patch.id, "Empty update, refreshing timestamp only");
        }
        let updated = self.bounded(self.storage.update(patch)).await?;
        tracing::info!(id = %updated.id, "Song updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.bounded(self.storage.delete(id)).await?;
        tracing::info!(id, "Song deleted");
        Ok(())
    }

    pub async fn restore(&self, id: &str) -> Result<(), StoreError> {
        self.bounded(self.storage.restore(id)).await?;
        tracing::info!(id, "Song restored");
        Ok(())
    }

    pub async fn delete_permanent(&self, id: &str) -> Result<(), StoreError> {
        self.bounded(self.storage.delete_permanent(id)).await?;
        tracing::info!(id, "Song permanently deleted");
        Ok(())
    }
}

//! PostgreSQL implementation of [`SongStorage`].
//!
//! Filtered listings and partial updates are composed with
//! [`QueryBuilder`], so every caller-supplied value travels as a bound
//! parameter and only present fields reach the statement.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::QueryBuilder;

use super::{SongStorage, StoreError};
use crate::model::{NewSong, Song, SongFilter, SongPatch};

/// Columns of a full [`Song`] row, in `FromRow` order.
const SONG_COLUMNS: &str =
    r#"id, title, text, link, "group", release_date, created_at, updated_at, deleted_at"#;

/// Song storage backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgSongStorage {
    pool: PgPool,
}

impl PgSongStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape `LIKE` wildcards so the needle matches literally, then wrap it
/// for a "contains" match.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Append one `AND` clause per populated filter field.
fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filter: &SongFilter) {
    if !filter.include_deleted {
        qb.push(" AND deleted_at IS NULL");
    }
    if let Some(from) = filter.release_date_from {
        qb.push(" AND release_date >= ").push_bind(from);
    }
    if let Some(to) = filter.release_date_to {
        qb.push(" AND release_date <= ").push_bind(to);
    }

    let substrings = [
        ("title", &filter.title),
        ("text", &filter.text),
        ("link", &filter.link),
        (r#""group""#, &filter.group),
    ];
    for (column, needle) in substrings {
        if let Some(needle) = needle.as_deref().filter(|n| !n.is_empty()) {
            qb.push(format!(" AND {column} ILIKE "))
                .push_bind(contains_pattern(needle));
        }
    }
}

/// `SELECT` for a filtered, ordered, paginated listing.
fn select_by_filters(filter: &SongFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {SONG_COLUMNS} FROM songs WHERE 1=1"));
    push_filters(&mut qb, filter);
    qb.push(" ORDER BY release_date DESC");

    if let Some(limit) = filter.limit() {
        qb.push(" LIMIT ").push_bind(limit);
    }
    if let Some(offset) = filter.offset() {
        qb.push(" OFFSET ").push_bind(offset);
    }
    qb
}

/// `SELECT COUNT(*)` over the same predicates as [`select_by_filters`].
fn count_by_filters(filter: &SongFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM songs WHERE 1=1");
    push_filters(&mut qb, filter);
    qb
}

/// `UPDATE` touching only the present fields of `patch`.
///
/// `updated_at` is always refreshed, which also keeps the `SET` list
/// non-empty when no field is present.
fn update_statement(patch: &SongPatch) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE songs SET ");

    let mut set = qb.separated(", ");
    if let Some(title) = &patch.title {
        set.push("title = ").push_bind_unseparated(title.clone());
    }
    if let Some(text) = &patch.text {
        set.push("text = ").push_bind_unseparated(text.clone());
    }
    if let Some(link) = &patch.link {
        set.push("link = ").push_bind_unseparated(link.clone());
    }
    if let Some(group) = &patch.group {
        set.push(r#""group" = "#).push_bind_unseparated(group.clone());
    }
    if let Some(release_date) = patch.release_date {
        set.push("release_date = ").push_bind_unseparated(release_date);
    }
    set.push("updated_at = NOW()");

    qb.push(" WHERE id = ")
        .push_bind(patch.id.clone())
        .push(" AND deleted_at IS NULL RETURNING ")
        .push(SONG_COLUMNS);
    qb
}

#[async_trait]
impl SongStorage for PgSongStorage {
    async fn get_by_filters(&self, filter: &SongFilter) -> Result<Vec<Song>, StoreError> {
        let songs = select_by_filters(filter)
            .build_query_as::<Song>()
            .fetch_all(&self.pool)
            .await?;
        Ok(songs)
    }

    async fn count_by_filters(&self, filter: &SongFilter) -> Result<i64, StoreError> {
        let total = count_by_filters(filter)
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn get_by_id(&self, id: &str, allow_deleted: bool) -> Result<Option<Song>, StoreError> {
        let query = if allow_deleted {
            format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = $1")
        } else {
            format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = $1 AND deleted_at IS NULL")
        };

        let song = sqlx::query_as::<_, Song>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(song)
    }

    async fn create(&self, song: NewSong) -> Result<Song, StoreError> {
        let query = format!(
            r#"
            INSERT INTO songs (title, text, link, "group", release_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SONG_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Song>(&query)
            .bind(&song.title)
            .bind(&song.text)
            .bind(&song.link)
            .bind(&song.group)
            .bind(song.release_date)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id = %created.id, "Song created");
        Ok(created)
    }

    async fn update(&self, patch: SongPatch) -> Result<Song, StoreError> {
        if patch.id.is_empty() {
            return Err(StoreError::MissingId);
        }

        update_statement(&patch)
            .build_query_as::<Song>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFoundOrDeleted)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE songs
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFoundOrDeleted);
        }
        Ok(())
    }

    async fn restore(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE songs
            SET deleted_at = NULL, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NOT NULL
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFoundOrNotDeleted);
        }
        Ok(())
    }

    async fn delete_permanent(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

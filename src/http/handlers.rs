//! Route handlers.
//!
//! Each handler decodes and validates its input, calls the service, and
//! shapes the response. Any failure returns immediately as an
//! [`ApiError`].

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use super::AppState;
use super::dto::{CreateSong, ListParams, SongList, SongResponse, Status, UpdateSong};
use super::error::ApiError;

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}

/// `GET /songs`
pub async fn list_songs(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<SongList>, ApiError> {
    let Query(params) = params
        .map_err(|e| ApiError::bad_request(format!("Failed to decode filter: {}", e.body_text())))?;
    let filter = params.into_filter().map_err(ApiError::BadRequest)?;

    let page = state.songs.list(&filter).await?;
    Ok(Json(SongList::new(page, &filter)))
}

/// `GET /songs/{id}`
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SongResponse>, ApiError> {
    let song = state.songs.get(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(song.into()))
}

/// `POST /songs`
pub async fn create_song(
    State(state): State<AppState>,
    body: Result<Json<CreateSong>, JsonRejection>,
) -> Result<(StatusCode, Json<SongResponse>), ApiError> {
    let Json(dto) = body
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON format: {}", e.body_text())))?;
    dto.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let song = state.songs.create(dto.into()).await?;
    Ok((StatusCode::CREATED, Json(song.into())))
}

/// `PATCH /songs/{id}`
pub async fn update_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSong>, JsonRejection>,
) -> Result<Json<SongResponse>, ApiError> {
    let Json(dto) = body
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON format: {}", e.body_text())))?;
    dto.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    if dto.id.as_deref().is_some_and(|body_id| body_id != id) {
        return Err(ApiError::bad_request("id in body does not match path"));
    }

    let song = state.songs.update(dto.into_patch(id)).await?;
    Ok(Json(song.into()))
}

/// `DELETE /songs/{id}` (soft delete)
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Status>, ApiError> {
    state.songs.delete(&id).await?;
    Ok(Json(Status::ok(format!("song deleted with id: {id}"))))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use axum::response::Response;
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use serde::de::DeserializeOwned;
    use tower::ServiceExt;

    use super::*;
    use crate::db::mocks::MemorySongStorage;
    use crate::http::router;
    use crate::service::SongService;

    fn app_with(storage: MemorySongStorage) -> Router {
        let service = SongService::new(Arc::new(storage), Duration::from_secs(5));
        router(AppState::new(service))
    }

    fn app() -> Router {
        app_with(MemorySongStorage::new())
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, title: &str, release_date: i64) -> SongResponse {
        let body = format!(r#"{{"title":"{title}","group":"Queen","release_date":{release_date}}}"#);
        let response = send(app, Method::POST, "/songs", Some(&body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_create_song() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/songs",
            Some(r#"{"title":"A","group":"B","release_date":1700000000}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let song: SongResponse = json(response).await;
        assert!(!song.id.is_empty());
        assert_eq!(song.title, "A");
        assert_eq!(song.group, "B");
        assert_eq!(
            song.release_date,
            Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_rejects_missing_field() {
        let response = send(
            &app(),
            Method::POST,
            "/songs",
            Some(r#"{"title":"A","release_date":1700000000}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let status: Status = json(response).await;
        assert!(status.error);
        assert!(status.message.starts_with("Invalid JSON format"));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_group() {
        let response = send(
            &app(),
            Method::POST,
            "/songs",
            Some(r#"{"title":"A","group":"","release_date":1}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let status: Status = json(response).await;
        assert!(status.message.contains("group is required"));
    }

    #[tokio::test]
    async fn test_get_song_and_not_found() {
        let app = app();
        let created = create(&app, "Bohemian Rhapsody", 183_000_000).await;

        let response = send(&app, Method::GET, &format!("/songs/{}", created.id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let song: SongResponse = json(response).await;
        assert_eq!(song, created);

        let response = send(&app, Method::GET, "/songs/missing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_reports_store_failure_opaquely() {
        let app = app_with(MemorySongStorage::broken());
        let response = send(&app, Method::GET, "/songs/any", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let status: Status = json(response).await;
        assert_eq!(status.message, "Internal Server Error");
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let app = app();
        let created = create(&app, "Radio Ga Ga", 441_763_200).await;
        let uri = format!("/songs/{}", created.id);

        let first = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(first.status(), StatusCode::OK);
        let status: Status = json(first).await;
        assert!(!status.error);
        assert_eq!(status.message, format!("song deleted with id: {}", created.id));

        let second = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let status: Status = json(second).await;
        assert!(status.error);
        assert_eq!(status.message, "song not found or already deleted");

        let gone = send(&app, Method::GET, &uri, None).await;
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_changes_supplied_fields_only() {
        let app = app();
        let created = create(&app, "Under Pressure", 371_347_200).await;
        let uri = format!("/songs/{}", created.id);

        let response = send(
            &app,
            Method::PATCH,
            &uri,
            Some(r#"{"text":"Pressure pushing down on me"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let song: SongResponse = json(response).await;
        assert_eq!(song.title, "Under Pressure");
        assert_eq!(song.text.as_deref(), Some("Pressure pushing down on me"));
        assert_eq!(song.release_date, created.release_date);
    }

    #[tokio::test]
    async fn test_update_deleted_song_fails() {
        let app = app();
        let created = create(&app, "Innuendo", 663_379_200).await;
        let uri = format!("/songs/{}", created.id);
        send(&app, Method::DELETE, &uri, None).await;

        let response = send(&app, Method::PATCH, &uri, Some(r#"{"title":"X"}"#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let status: Status = json(response).await;
        assert_eq!(status.message, "song not found or already deleted");
    }

    #[tokio::test]
    async fn test_update_rejects_mismatched_id() {
        let app = app();
        let created = create(&app, "Bicycle Race", 277_084_800).await;

        let response = send(
            &app,
            Method::PATCH,
            &format!("/songs/{}", created.id),
            Some(r#"{"id":"someone-else","title":"X"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let app = app();
        for (i, title) in ["One Vision", "Friends Will Be Friends", "One Year of Love"]
            .iter()
            .enumerate()
        {
            create(&app, title, 500_000_000 + i as i64).await;
        }

        let response = send(&app, Method::GET, "/songs?title=one&page_size=1", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let list: SongList = json(response).await;
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].title, "One Year of Love");
        assert_eq!(list.page, 0);
        assert_eq!(list.page_size, 1);
        assert_eq!(list.total, 2);
        assert_eq!(list.total_pages, 2);

        let response = send(&app, Method::GET, "/songs?title=one&page=1&page_size=1", None).await;
        let list: SongList = json(response).await;
        assert_eq!(list.data[0].title, "One Vision");
    }

    #[tokio::test]
    async fn test_list_defaults_and_unknown_keys() {
        let app = app();
        create(&app, "Somebody to Love", 217_000_000).await;

        let response = send(&app, Method::GET, "/songs?colour=blue", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let list: SongList = json(response).await;
        assert_eq!(list.page, 0);
        assert_eq!(list.page_size, 10);
        assert_eq!(list.total, 1);
    }

    #[tokio::test]
    async fn test_list_hides_deleted_unless_asked() {
        let app = app();
        let created = create(&app, "Mustapha", 280_000_000).await;
        send(&app, Method::DELETE, &format!("/songs/{}", created.id), None).await;

        let list: SongList = json(send(&app, Method::GET, "/songs", None).await).await;
        assert!(list.data.is_empty());

        let list: SongList =
            json(send(&app, Method::GET, "/songs?include_deleted=true", None).await).await;
        assert_eq!(list.data.len(), 1);
    }

    #[tokio::test]
    async fn test_list_zero_page_size_returns_nothing() {
        let app = app();
        create(&app, "Killer Queen", 120_000_000).await;

        let list: SongList = json(send(&app, Method::GET, "/songs?page_size=0", None).await).await;
        assert!(list.data.is_empty());
        assert_eq!(list.total, 1);
        assert_eq!(list.total_pages, 0);
    }

    #[tokio::test]
    async fn test_list_accepts_largest_page_size() {
        let app = app();
        create(&app, "Seven Seas of Rhye", 131_000_000).await;
        create(&app, "Now I'm Here", 158_000_000).await;

        let response = send(
            &app,
            Method::GET,
            &format!("/songs?page_size={}", i64::MAX),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let list: SongList = json(response).await;
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.total, 2);
        assert_eq!(list.total_pages, 1);
    }

    #[tokio::test]
    async fn test_list_rejects_bad_params() {
        let response = send(&app(), Method::GET, "/songs?page=first", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let status: Status = json(response).await;
        assert!(status.message.starts_with("Failed to decode filter"));
    }
}

//! HTTP transport for the song catalogue.
//!
//! # Architecture
//!
//! - **DTOs** (`dto.rs`) - JSON shapes of requests and responses
//! - **Handlers** (`handlers.rs`) - decode, validate, call the service
//! - **Errors** (`error.rs`) - mapping of failures to status codes
//! - **Middleware** (`middleware.rs`) - request logging, panic recovery
//!
//! # Routes
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/health` | liveness |
//! | GET | `/songs` | filtered, paginated list |
//! | POST | `/songs` | create |
//! | GET | `/songs/{id}` | fetch one |
//! | PATCH | `/songs/{id}` | partial update |
//! | DELETE | `/songs/{id}` | soft delete |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::Router;
use axum::routing::get;

use crate::service::SongService;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub songs: SongService,
}

impl AppState {
    pub fn new(songs: SongService) -> Self {
        Self { songs }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/songs",
            get(handlers::list_songs).post(handlers::create_song),
        )
        .route(
            "/songs/{id}",
            get(handlers::get_song)
                .patch(handlers::update_song)
                .delete(handlers::delete_song),
        );

    middleware::apply(routes).with_state(state)
}

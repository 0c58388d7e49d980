use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

mod error;
mod state;
mod video;

pub mod validation;

#[cfg(test)]
mod tests;

pub use error::*;
pub use state::*;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Routes for the `/video/{video_id}` resource.
pub fn create_router(app: App) -> Router {
    Router::new()
        .route(
            "/video/:video_id",
            get(video::read)
                .put(video::create)
                .patch(video::update)
                .delete(video::remove),
        )
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app)
}

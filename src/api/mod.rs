//! All API endpoint setup

use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;

pub use current_token::ApiToken;
pub use current_token::CurrentToken;
pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod current_token;
mod folders;
mod notes;
mod request;
mod response;

/// Get the Axum router for all API routes
pub fn router<S: Storage>() -> Router {
    let folders = Router::new()
        .route("/", get(folders::list::<S>))
        .route("/", post(folders::create::<S>))
        .route("/:folder", get(folders::single::<S>))
        .route("/:folder", patch(folders::update::<S>))
        .route("/:folder", delete(folders::delete::<S>));

    let notes = Router::new()
        .route("/", get(notes::list::<S>))
        .route("/", post(notes::create::<S>))
        .route("/:note", get(notes::single::<S>))
        .route("/:note", patch(notes::update::<S>))
        .route("/:note", delete(notes::delete::<S>));

    Router::new()
        .nest("/folders", folders)
        .nest("/notes", notes)
}

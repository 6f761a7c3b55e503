use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// The vocabulary CRUD surface plus the read-only listings. Every handler here
/// expects the `AuthUser` placed in the request extensions by `require_auth`,
/// which `create_router` layers over this router.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /
        // Lists all vocabulary entries.
        .route("/", get(handlers::list_words))
        // GET|POST /add
        // Add form / insert, then redirect to the list.
        .route("/add", get(handlers::add_word_form).post(handlers::add_word))
        // GET|POST /edit/{id}
        // Populated edit form / full-field overwrite, then redirect to the list.
        .route(
            "/edit/{id}",
            get(handlers::edit_word_form).post(handlers::edit_word),
        )
        // GET /delete/{id}
        // Destructive action on GET, linked directly from the list view.
        .route("/delete/{id}", get(handlers::delete_word))
        // --- Read-only views ---
        .route("/categories", get(handlers::list_categories))
        .route("/statistics", get(handlers::get_statistics))
        .route("/users", get(handlers::list_users))
}

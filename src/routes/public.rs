use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints accessible to anonymous clients. Everything here either serves a
/// form or changes the session state.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe; does not touch the store.
        .route("/health", get(|| async { "ok" }))
        // GET|POST /register
        // Shows the registration form / creates the account and logs it in.
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register),
        )
        // GET|POST /login
        // Shows the login form (carrying `next`) / verifies credentials.
        .route("/login", get(handlers::login_form).post(handlers::login))
        // GET /logout
        .route("/logout", get(handlers::logout))
}

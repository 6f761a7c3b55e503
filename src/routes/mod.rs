//! Router Module Index
//!
//! Splits the HTTP surface by access level. The guard is applied once, at the
//! router layer, so a protected handler cannot be mounted without it.

/// Routes reachable without a session: health, registration, login and logout.
pub mod public;

/// Routes wrapped by the `require_auth` guard.
pub mod authenticated;

//! Registration and credential checks.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use tracing::{info, warn};

use crate::{
    errors::AppError,
    models::{NewUser, RegisterForm, User},
    repository::{RepoError, Repository},
};

/// Hashes `password` with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Password(e.to_string()))
}

/// Checks `password` against a stored PHC string. A malformed hash never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("stored password hash is unreadable: {}", e);
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// Argon2 is deliberately slow; keep it off the async workers.
async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Password(e.to_string()))?
}

async fn verify_blocking(password: String, stored_hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Password(e.to_string()))
}

/// register
///
/// Creates an account unless the email is already taken. The existence check runs
/// first; the store's own uniqueness guarantee covers two registrations racing past it.
pub async fn register(repo: &dyn Repository, form: RegisterForm) -> Result<User, AppError> {
    let email = form.email.trim().to_string();

    if let Some(existing) = repo.find_user_by_email(&email).await? {
        warn!("Registration refused, email already belongs to user {}", existing.id);
        return Err(AppError::DuplicateUser);
    }

    let password_hash = hash_blocking(form.password).await?;
    let user = repo
        .insert_user(NewUser {
            name: form.name,
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate => AppError::DuplicateUser,
            other => AppError::Store(other),
        })?;

    info!("Registered user {}", user.id);
    Ok(user)
}

/// login
///
/// Resolves the account for `email` and checks the password. An unknown email and a
/// wrong password are indistinguishable to the caller.
pub async fn login(repo: &dyn Repository, email: &str, password: &str) -> Result<User, AppError> {
    let email = email.trim();
    let Some(user) = repo.find_user_by_email(email).await? else {
        warn!("Login failed, no account for the submitted email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
        warn!("Login failed, wrong password for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    info!("User {} logged in", user.id);
    Ok(user)
}

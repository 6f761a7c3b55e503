use axum::{
    extract::{FromRef, FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{
    config::AppConfig,
    errors::AppError,
    models::User,
    repository::RepositoryState,
};

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "session";

/// Claims
///
/// Payload of the session token. Signed with the configured secret key and
/// validated (signature and expiry) on every protected request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: hex form of the user's ObjectId.
    pub sub: String,
    /// Expiration time, seconds since the epoch.
    pub exp: usize,
    /// Issued at, seconds since the epoch.
    pub iat: usize,
}

/// AuthUser
///
/// The request-scoped authentication context. Produced by the `require_auth`
/// guard and handed to protected handlers through request extensions.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Signs a session token for `user_id` valid for the configured TTL.
pub fn issue_token(user_id: ObjectId, config: &AppConfig) -> Result<String, AppError> {
    let now = Utc::now();
    let expires = Duration::try_hours(config.session_ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(AppError::SessionLifetime(config.session_ttl_hours))?;
    let claims = Claims {
        sub: user_id.to_hex(),
        iat: now.timestamp() as usize,
        exp: expires.timestamp() as usize,
    };
    let key = EncodingKey::from_secret(config.secret_key.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Returns the user id carried by a valid, unexpired token.
pub fn decode_token(token: &str, config: &AppConfig) -> Option<ObjectId> {
    let key = DecodingKey::from_secret(config.secret_key.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    match decode::<Claims>(token, &key, &validation) {
        Ok(data) => ObjectId::parse_str(&data.claims.sub).ok(),
        Err(e) => {
            tracing::debug!("rejected session token: {}", e);
            None
        }
    }
}

/// Anonymous → Authenticated: attaches a fresh session cookie for `user`.
pub fn start_session(jar: CookieJar, user: &User, config: &AppConfig) -> Result<CookieJar, AppError> {
    let token = issue_token(user.id, config)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    Ok(jar.add(cookie))
}

/// Authenticated → Anonymous.
pub fn end_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Redirect target for an anonymous request to `path`.
pub fn login_redirect(path: &str) -> Redirect {
    let next: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    Redirect::to(&format!("/login?next={}", next))
}

/// Only same-site absolute paths are honoured as post-login targets. Browsers
/// read `//host` and `/\host` alike as a network path, so both are refused.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if is_local_path(path) => path,
        _ => "/",
    }
}

fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/') && !matches!(chars.next(), Some('/' | '\\'))
}

/// AuthUser Extractor Implementation
///
/// Resolves the session cookie into an `AuthUser`:
/// 1. Dependency Resolution: repository and config from the application state.
/// 2. Token Validation: signature and expiry of the `session` cookie.
/// 3. DB Lookup: the user must still exist, otherwise the session is treated as anonymous.
///
/// Rejection: a redirect to the login page, carrying the requested path as `next`.
/// A store failure during the lookup is a server fault rather than a redirect.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);
        let anonymous = || login_redirect(parts.uri.path()).into_response();

        let jar = CookieJar::from_headers(&parts.headers);
        let Some(user_id) = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| decode_token(cookie.value(), &config))
        else {
            return Err(anonymous());
        };

        match repo.get_user(user_id).await {
            Ok(Some(user)) => Ok(AuthUser::from(user)),
            Ok(None) => Err(anonymous()),
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}

/// require_auth
///
/// Route guard for the protected router. Runs the `AuthUser` extractor (which
/// redirects anonymous requests) and stores the resolved identity in the request
/// extensions so handlers receive it as `Extension<AuthUser>`.
pub async fn require_auth(user: AuthUser, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(user);
    next.run(request).await
}

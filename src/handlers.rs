use crate::{
    AppState, accounts,
    auth::{self, AuthUser},
    errors::AppError,
    models::{LoginForm, LoginQuery, RegisterForm, WordForm},
    views,
};
use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use mongodb::bson::oid::ObjectId;
use tracing::info;

/// Parses a path identifier. A malformed id is a client error, distinct from "not found".
fn parse_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}

// --- Vocabulary (Protected) ---

/// list_words
///
/// [Protected Route] Lists every vocabulary entry in natural store order.
pub async fn list_words(
    Extension(user): Extension<AuthUser>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let words = state.repo.list_words().await?;
    Ok(views::vocabulary_list(&user, &words))
}

pub async fn add_word_form() -> Html<String> {
    views::word_form(None)
}

/// add_word
///
/// [Protected Route] Inserts a new entry from the add form and returns to the list.
/// Examples and categories arrive as comma-separated text and are split here.
pub async fn add_word(
    Extension(user): Extension<AuthUser>,
    State(state): State<AppState>,
    Form(form): Form<WordForm>,
) -> Result<Redirect, AppError> {
    let id = state.repo.insert_word(form.into_fields()).await?;
    info!("User {} added word {}", user.id, id);
    Ok(Redirect::to("/"))
}

/// edit_word_form
///
/// [Protected Route] Shows the edit form populated from the stored entry.
pub async fn edit_word_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = parse_id(&id)?;
    let entry = state.repo.get_word(id).await?.ok_or(AppError::NotFound)?;
    Ok(views::word_form(Some(&entry)))
}

/// edit_word
///
/// [Protected Route] Replaces every attribute of the entry with the submitted values.
/// Nothing from the previous document is merged in, and an id that matches no
/// document is not reported.
pub async fn edit_word(
    Extension(user): Extension<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<WordForm>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    state.repo.update_word(id, form.into_fields()).await?;
    info!("User {} updated word {}", user.id, id);
    Ok(Redirect::to("/"))
}

/// delete_word
///
/// [Protected Route] Removes the entry. Exposed on GET, as linked from the list view.
pub async fn delete_word(
    Extension(user): Extension<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, AppError> {
    let id = parse_id(&id)?;
    state.repo.delete_word(id).await?;
    info!("User {} deleted word {}", user.id, id);
    Ok(Redirect::to("/"))
}

// --- Read-only views (Protected) ---

pub async fn list_categories(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let categories = state.repo.list_categories().await?;
    Ok(views::categories(&categories))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let users = state.repo.list_users().await?;
    Ok(views::users(&users))
}

/// get_statistics
///
/// [Protected Route] Document counts per collection, taken at call time.
pub async fn get_statistics(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let stats = state.repo.get_stats().await?;
    Ok(views::statistics(&stats))
}

// --- Accounts (Public) ---

pub async fn register_form() -> Html<String> {
    views::register_form()
}

/// register
///
/// [Public Route] Creates an account and logs it in. A duplicate email answers with
/// a plain-text message and no redirect.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<impl IntoResponse, AppError> {
    let user = accounts::register(state.repo.as_ref(), form).await?;
    let jar = auth::start_session(jar, &user, &state.config)?;
    Ok((jar, Redirect::to("/")))
}

pub async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    views::login_form(query.next.as_deref())
}

/// login
///
/// [Public Route] Verifies credentials and starts a session, then continues to the
/// page that triggered the login when one was recorded.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    info!("Login attempt");
    let user = accounts::login(state.repo.as_ref(), &form.email, &form.password).await?;
    let jar = auth::start_session(jar, &user, &state.config)?;
    let target = auth::safe_next(form.next.as_deref());
    Ok((jar, Redirect::to(target)))
}

/// logout
///
/// [Public Route] Drops the session cookie. Harmless when already anonymous.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    info!("Logout request");
    (auth::end_session(jar), Redirect::to("/login"))
}

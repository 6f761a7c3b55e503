use crate::models::{Category, NewUser, Statistics, User, VocabularyEntry, WordFields};
use async_trait::async_trait;
use mongodb::{bson::oid::ObjectId, error::ErrorKind};
use std::sync::Arc;

mod memory;
mod mongo;

pub use memory::InMemoryRepository;
pub use mongo::MongoRepository;

/// Collection names shared by every backend.
pub const VOCABULARY: &str = "vocabulary";
pub const CATEGORIES: &str = "categories";
pub const USERS: &str = "users";

/// RepoError
///
/// Failures surfaced by the document store. Handlers never inspect these beyond
/// `Duplicate`; everything else becomes a generic server fault.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[source] mongodb::error::Error),
    /// A unique key (the user email) already exists.
    #[error("duplicate key")]
    Duplicate,
    /// A stored document does not match the expected schema.
    #[error("undecodable document: {0}")]
    Decode(String),
    /// An insert reported an `_id` that is not an ObjectId.
    #[error("store returned a non-ObjectId identifier")]
    UnexpectedId,
}

impl From<mongodb::error::Error> for RepoError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::BsonDeserialization(e) => RepoError::Decode(e.to_string()),
            _ => RepoError::Database(err),
        }
    }
}

/// Repository Trait
///
/// Abstract contract over the three document collections. Handlers only ever
/// talk to this trait, so the MongoDB backend and the in-memory backend used by
/// the test suite are interchangeable.
///
/// Every write is a single-document operation; there are no transactions and
/// concurrent writers on the same identifier resolve by last write.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Vocabulary ---
    // Natural store order, no sorting.
    async fn list_words(&self) -> Result<Vec<VocabularyEntry>, RepoError>;
    async fn get_word(&self, id: ObjectId) -> Result<Option<VocabularyEntry>, RepoError>;
    async fn insert_word(&self, fields: WordFields) -> Result<ObjectId, RepoError>;
    /// Overwrites all word attributes. An unknown id is a silent no-op.
    async fn update_word(&self, id: ObjectId, fields: WordFields) -> Result<(), RepoError>;
    /// An unknown id is a silent no-op.
    async fn delete_word(&self, id: ObjectId) -> Result<(), RepoError>;

    // --- Read-only views ---
    async fn list_categories(&self) -> Result<Vec<Category>, RepoError>;
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
    async fn get_stats(&self) -> Result<Statistics, RepoError>;

    // --- Accounts ---
    async fn get_user(&self, id: ObjectId) -> Result<Option<User>, RepoError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
    /// Fails with `RepoError::Duplicate` if the email is already registered.
    async fn insert_user(&self, user: NewUser) -> Result<User, RepoError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

use super::{CATEGORIES, RepoError, Repository, USERS, VOCABULARY};
use crate::models::{Category, NewUser, Statistics, User, VocabularyEntry, WordFields};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// MongoRepository
///
/// The production implementation of `Repository`, backed by one MongoDB database.
/// The client inside `Database` pools its own connections and is cheap to clone,
/// so a single instance is opened at startup and shared by every request.
#[derive(Clone)]
pub struct MongoRepository {
    db: Database,
}

impl MongoRepository {
    /// Opens a client for `uri` and selects `database`. The driver connects lazily,
    /// so an unreachable server surfaces on the first operation.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, RepoError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(client.database(database)))
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Creates the unique index on `users.email`. Idempotent; safe on every start.
    pub async fn ensure_indexes(&self) -> Result<(), RepoError> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.raw(USERS).create_index(index).await?;
        Ok(())
    }

    fn raw(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    fn words(&self) -> Collection<VocabularyEntry> {
        self.db.collection(VOCABULARY)
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }
}

/// The attributes an add or edit submission writes, in stored spelling.
fn word_document(fields: &WordFields) -> Document {
    doc! {
        "word": fields.word.as_str(),
        "translation": fields.translation.as_str(),
        "partOfSpeech": fields.part_of_speech.as_str(),
        "examples": fields.examples.clone(),
        "categories": fields.categories.clone(),
    }
}

/// Account document. The hash is stored under `password`.
fn user_document(user: &NewUser) -> Document {
    doc! {
        "name": user.name.as_str(),
        "email": user.email.as_str(),
        "password": user.password_hash.as_str(),
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl Repository for MongoRepository {
    async fn list_words(&self) -> Result<Vec<VocabularyEntry>, RepoError> {
        let words = self.words().find(doc! {}).await?.try_collect().await?;
        Ok(words)
    }

    async fn get_word(&self, id: ObjectId) -> Result<Option<VocabularyEntry>, RepoError> {
        Ok(self.words().find_one(doc! { "_id": id }).await?)
    }

    async fn insert_word(&self, fields: WordFields) -> Result<ObjectId, RepoError> {
        let result = self.raw(VOCABULARY).insert_one(word_document(&fields)).await?;
        result.inserted_id.as_object_id().ok_or(RepoError::UnexpectedId)
    }

    /// update_word
    ///
    /// `$set` over the full attribute set. Legacy spellings (`definition`,
    /// `part_of_speech`) may survive on old documents, but the current spelling
    /// always takes precedence when decoded.
    async fn update_word(&self, id: ObjectId, fields: WordFields) -> Result<(), RepoError> {
        self.raw(VOCABULARY)
            .update_one(doc! { "_id": id }, doc! { "$set": word_document(&fields) })
            .await?;
        Ok(())
    }

    async fn delete_word(&self, id: ObjectId) -> Result<(), RepoError> {
        self.raw(VOCABULARY).delete_one(doc! { "_id": id }).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        let categories = self
            .db
            .collection::<Category>(CATEGORIES)
            .find(doc! {})
            .await?
            .try_collect()
            .await?;
        Ok(categories)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let users = self.users().find(doc! {}).await?.try_collect().await?;
        Ok(users)
    }

    async fn get_stats(&self) -> Result<Statistics, RepoError> {
        Ok(Statistics {
            vocabulary: self.raw(VOCABULARY).count_documents(doc! {}).await?,
            categories: self.raw(CATEGORIES).count_documents(doc! {}).await?,
            users: self.raw(USERS).count_documents(doc! {}).await?,
        })
    }

    async fn get_user(&self, id: ObjectId) -> Result<Option<User>, RepoError> {
        Ok(self.users().find_one(doc! { "_id": id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepoError> {
        let result = self
            .raw(USERS)
            .insert_one(user_document(&user))
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    RepoError::Duplicate
                } else {
                    RepoError::from(e)
                }
            })?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or(RepoError::UnexpectedId)?;

        Ok(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        })
    }
}

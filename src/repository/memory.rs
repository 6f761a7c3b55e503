use super::{RepoError, Repository};
use crate::models::{
    Category, NewCategory, NewUser, Statistics, User, VocabularyEntry, WordFields,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

#[derive(Default)]
struct Collections {
    vocabulary: Vec<VocabularyEntry>,
    categories: Vec<Category>,
    users: Vec<User>,
}

/// InMemoryRepository
///
/// A process-local document store with the same observable semantics as the
/// MongoDB backend: insertion order is the natural order, identifiers are fresh
/// `ObjectId`s, updates and deletes of unknown ids are no-ops and user emails
/// are unique. Used by the test suite in place of a database server.
#[derive(Default)]
pub struct InMemoryRepository {
    inner: RwLock<Collections>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a category. The application itself never writes categories.
    pub async fn insert_category(&self, category: NewCategory) -> ObjectId {
        let id = ObjectId::new();
        self.inner.write().await.categories.push(Category {
            id,
            name: Some(category.name),
            description: Some(category.description),
        });
        id
    }
}

fn entry_from_fields(id: ObjectId, fields: WordFields) -> VocabularyEntry {
    VocabularyEntry {
        id,
        word: fields.word,
        translation: Some(fields.translation),
        part_of_speech: Some(fields.part_of_speech),
        examples: fields.examples,
        categories: fields.categories,
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_words(&self) -> Result<Vec<VocabularyEntry>, RepoError> {
        Ok(self.inner.read().await.vocabulary.clone())
    }

    async fn get_word(&self, id: ObjectId) -> Result<Option<VocabularyEntry>, RepoError> {
        let store = self.inner.read().await;
        Ok(store.vocabulary.iter().find(|w| w.id == id).cloned())
    }

    async fn insert_word(&self, fields: WordFields) -> Result<ObjectId, RepoError> {
        let id = ObjectId::new();
        self.inner
            .write()
            .await
            .vocabulary
            .push(entry_from_fields(id, fields));
        Ok(id)
    }

    async fn update_word(&self, id: ObjectId, fields: WordFields) -> Result<(), RepoError> {
        let mut store = self.inner.write().await;
        if let Some(slot) = store.vocabulary.iter_mut().find(|w| w.id == id) {
            *slot = entry_from_fields(id, fields);
        }
        Ok(())
    }

    async fn delete_word(&self, id: ObjectId) -> Result<(), RepoError> {
        self.inner.write().await.vocabulary.retain(|w| w.id != id);
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepoError> {
        Ok(self.inner.read().await.categories.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn get_stats(&self) -> Result<Statistics, RepoError> {
        let store = self.inner.read().await;
        Ok(Statistics {
            vocabulary: store.vocabulary.len() as u64,
            categories: store.categories.len() as u64,
            users: store.users.len() as u64,
        })
    }

    async fn get_user(&self, id: ObjectId) -> Result<Option<User>, RepoError> {
        let store = self.inner.read().await;
        Ok(store.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.inner.read().await;
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, RepoError> {
        let mut store = self.inner.write().await;
        if store.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate);
        }
        let created = User {
            id: ObjectId::new(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        store.users.push(created.clone());
        Ok(created)
    }
}

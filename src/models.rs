use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

// --- Core Application Schemas (Mapped to Document Collections) ---

/// VocabularyEntry
///
/// One learnable word from the `vocabulary` collection, decoded once at the
/// repository boundary. Optional attributes keep their absence (`None`) so the
/// views can decide how to present them; list attributes default to empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "StoredEntry")]
pub struct VocabularyEntry {
    pub id: ObjectId,
    pub word: String,
    pub translation: Option<String>,
    pub part_of_speech: Option<String>,
    pub examples: Vec<String>,
    pub categories: Vec<String>,
}

/// StoredEntry
///
/// Raw document shape. Documents written by the first version of the add form
/// carry `definition` and `part_of_speech` instead of `translation` and
/// `partOfSpeech`; both spellings are accepted and the current one wins.
#[derive(Deserialize)]
struct StoredEntry {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    word: String,
    translation: Option<String>,
    definition: Option<String>,
    #[serde(rename = "partOfSpeech")]
    part_of_speech: Option<String>,
    #[serde(rename = "part_of_speech")]
    legacy_part_of_speech: Option<String>,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    categories: Vec<String>,
}

impl From<StoredEntry> for VocabularyEntry {
    fn from(raw: StoredEntry) -> Self {
        Self {
            id: raw.id,
            word: raw.word,
            translation: raw.translation.or(raw.definition),
            part_of_speech: raw.part_of_speech.or(raw.legacy_part_of_speech),
            examples: raw.examples,
            categories: raw.categories,
        }
    }
}

/// WordFields
///
/// The complete set of attributes written by an insert or an update. Updates
/// replace every one of these on the stored document; nothing is merged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordFields {
    pub word: String,
    pub translation: String,
    pub part_of_speech: String,
    pub examples: Vec<String>,
    pub categories: Vec<String>,
}

/// Category
///
/// Read-only record from the `categories` collection. Vocabulary entries refer
/// to categories by free-text label only, never by identifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Payload used to seed a category into a store. No HTTP route creates categories.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
}

/// User
///
/// Account record from the `users` collection. The `password` attribute holds
/// an Argon2 PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Statistics
///
/// Document counts for the three collections, taken independently at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    pub vocabulary: u64,
    pub categories: u64,
    pub users: u64,
}

// --- Request Payloads (Form Bodies) ---

/// WordForm
///
/// Body of the add and edit forms. Only `word` is mandatory; every other field
/// falls back to empty, which on edit means the stored value is overwritten
/// with an empty one.
#[derive(Debug, Clone, Deserialize)]
pub struct WordForm {
    pub word: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default, rename = "partOfSpeech")]
    pub part_of_speech: String,
    #[serde(default)]
    pub examples: String,
    #[serde(default)]
    pub categories: String,
}

impl WordForm {
    /// Converts the submitted text fields into stored attributes, splitting the
    /// comma-separated lists.
    pub fn into_fields(self) -> WordFields {
        WordFields {
            word: self.word,
            translation: self.translation,
            part_of_speech: self.part_of_speech,
            examples: split_list(&self.examples),
            categories: split_list(&self.categories),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Splits a comma-separated form value into trimmed, non-empty items.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

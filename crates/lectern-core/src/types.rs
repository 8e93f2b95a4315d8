use serde::{Deserialize, Serialize};

// =============================================================================
// Conversation
// =============================================================================

/// Who authored a conversation message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of a conversation, as supplied by the caller and as sent to the
/// generation service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

// =============================================================================
// Index records
// =============================================================================

/// Metadata stored alongside each professor vector.
///
/// `stars` holds the rating exactly as scraped (untyped string); `url` is the
/// source page verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorMetadata {
    pub name: String,
    pub subject: String,
    pub stars: String,
    pub url: String,
}

/// One entry in the vector index, keyed by the professor's full name.
///
/// Upserting a record whose id already exists overwrites the prior record;
/// there is no merge and no versioning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfessorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: ProfessorMetadata,
}

/// Transient result of a nearest-neighbor lookup.
///
/// `metadata` is optional on the wire; matches without it are skipped when
/// formatting retrieval context. `score` is carried but unused downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<ProfessorMetadata>,
}

// =============================================================================
// Scraping
// =============================================================================

/// Fields pulled out of a rendered review page, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedProfile {
    /// Full name, first and last joined with one space.
    pub name: String,
    pub department: String,
    pub rating: String,
}

impl ExtractedProfile {
    /// True when every required field extracted non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.department.is_empty() && !self.rating.is_empty()
    }
}

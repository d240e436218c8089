use serde::{Deserialize, Serialize};

/// Structured response of the "random cat" endpoint when asked for JSON.
///
/// The endpoint has reported both camelCase and flat lowercase keys over
/// time, so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatDescriptor {
    #[serde(alias = "_id")]
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: String,
    #[serde(default, rename = "mimeType", alias = "mimetype")]
    pub mime_type: String,
}

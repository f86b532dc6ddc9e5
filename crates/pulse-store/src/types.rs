//! Row types for stored documents and store statistics.

use chrono::{DateTime, Utc};
use pulse_core::SocialDocument;
use serde::{Deserialize, Serialize};

/// A document row from the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: i64,
    pub collection: String,
    #[serde(rename = "postId")]
    pub post_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,
    #[serde(rename = "ingestedAt")]
    pub ingested_at: i64,
}

impl StoredDocument {
    /// View the row as the pipeline's input document.
    pub fn to_social(&self) -> SocialDocument {
        SocialDocument {
            post_id: self.post_id.clone(),
            text: self.text.clone(),
            created_at: self.created_at,
            author: self.author.clone(),
        }
    }
}

/// Store-level statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    pub collections: i64,
    pub documents: i64,
    pub analyzed_documents: i64,
}

/// A collection name with its document count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(rename = "documentCount")]
    pub document_count: i64,
}

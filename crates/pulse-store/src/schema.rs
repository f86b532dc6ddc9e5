//! Database schema SQL.

/// Social documents, one row per (collection, post_id). The analysis record
/// is denormalized onto every row of its collection so the dashboard can read
/// any document and find the collection-level analysis attached.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    post_id TEXT NOT NULL,
    text TEXT NOT NULL,
    author TEXT,
    created_at TEXT,
    analysis_json TEXT,
    ingested_at INTEGER NOT NULL,
    UNIQUE(collection, post_id)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(collection, created_at);
"#;

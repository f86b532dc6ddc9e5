//! SQLite-backed document store and persistence sink.
//!
//! One row per (collection, post_id). The analysis record is written back
//! onto every row of the collection in a single transaction (full replace),
//! with a separate merge path for the `overrides` sub-field.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use crate::schema::SCHEMA_SQL;
use crate::types::{CollectionInfo, StoreStats, StoredDocument};
use pulse_core::{AnalysisRecord, Error, Result, SocialDocument};

/// SQLite store for social documents and their analysis records.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the SQLite store.
    ///
    /// `db_dir` is the directory (e.g., `data/db/`). The file will be
    /// `db_dir/socialpulse.db`.
    pub fn open(db_dir: impl AsRef<Path>) -> Result<Self> {
        let db_dir = db_dir.as_ref();
        std::fs::create_dir_all(db_dir).map_err(|e| Error::Storage(e.to_string()))?;
        let db_path = db_dir.join("socialpulse.db");

        let conn = Self::create_connection(&db_path)?;
        Self::init_schema(&conn)?;

        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };

        let stats = store.get_stats()?;
        info!(
            "SqliteStore initialized: {} collections, {} documents, path={}",
            stats.collections,
            stats.documents,
            store.db_path.display()
        );

        Ok(store)
    }

    fn create_connection(db_path: &Path) -> Result<Connection> {
        let conn = Connection::open(db_path).map_err(|e| Error::Database(e.to_string()))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA foreign_keys = ON;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| Error::Database(e.to_string()))?;
        Ok(conn)
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| Error::Database(format!("Schema init failed: {}", e)))?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Document ingestion
    // ---------------------------------------------------------------

    /// Upsert a batch of documents into a collection. Returns the number of
    /// rows written. Re-ingesting the same post id updates the row in place.
    pub fn upsert_documents(&self, collection: &str, docs: &[SocialDocument]) -> Result<usize> {
        let now = Utc::now().timestamp_millis();
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;
        let mut written = 0;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO documents (collection, post_id, text, author, created_at, ingested_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(collection, post_id) DO UPDATE SET
                       text = excluded.text,
                       author = excluded.author,
                       created_at = excluded.created_at",
                )
                .map_err(|e| Error::Database(e.to_string()))?;
            for doc in docs {
                let created = doc.created_at.map(|t| t.to_rfc3339());
                stmt.execute(params![
                    collection,
                    doc.post_id,
                    doc.text,
                    doc.author,
                    created,
                    now
                ])
                .map_err(|e| Error::Database(e.to_string()))?;
                written += 1;
            }
        }
        tx.commit().map_err(|e| Error::Database(e.to_string()))?;
        Ok(written)
    }

    /// Get all documents of a collection, oldest first.
    pub fn get_documents(&self, collection: &str) -> Result<Vec<StoredDocument>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT id, collection, post_id, text, author, created_at, analysis_json, ingested_at
                 FROM documents WHERE collection = ?1 ORDER BY created_at ASC, id ASC",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![collection], |row| Ok(Self::row_to_document(row)))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Count documents in a collection.
    pub fn count_documents(&self, collection: &str) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE collection = ?1",
                params![collection],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    /// List collections with their document counts.
    pub fn list_collections(&self) -> Result<Vec<CollectionInfo>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT collection, COUNT(*) FROM documents GROUP BY collection ORDER BY collection",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CollectionInfo {
                    name: row.get(0)?,
                    document_count: row.get(1)?,
                })
            })
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows.filter_map(|r| r.ok()).collect())
    }

    /// Delete a collection. Returns the number of rows removed.
    pub fn delete_collection(&self, collection: &str) -> Result<usize> {
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "DELETE FROM documents WHERE collection = ?1",
                params![collection],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    // ---------------------------------------------------------------
    // Persistence sink
    // ---------------------------------------------------------------

    /// Write the analysis record onto every document of the collection.
    /// Full replace of any prior value. Returns the updated row count.
    pub fn apply_analysis(&self, collection: &str, record: &AnalysisRecord) -> Result<usize> {
        let json = serde_json::to_string(record)?;
        let conn = self.conn.lock();
        let count = conn
            .execute(
                "UPDATE documents SET analysis_json = ?1 WHERE collection = ?2",
                params![json, collection],
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(count)
    }

    /// Merge an `overrides` object into the stored analysis of every document
    /// in the collection. Only the `overrides` sub-field is replaced; rows
    /// without an analysis get one containing just the overrides.
    pub fn merge_overrides(&self, collection: &str, overrides: &serde_json::Value) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction()
            .map_err(|e| Error::Database(e.to_string()))?;
        let mut updated = 0;
        {
            let mut select = tx
                .prepare_cached(
                    "SELECT id, analysis_json FROM documents WHERE collection = ?1",
                )
                .map_err(|e| Error::Database(e.to_string()))?;
            let rows: Vec<(i64, Option<String>)> = select
                .query_map(params![collection], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })
                .map_err(|e| Error::Database(e.to_string()))?
                .filter_map(|r| r.ok())
                .collect();

            let mut update = tx
                .prepare_cached("UPDATE documents SET analysis_json = ?1 WHERE id = ?2")
                .map_err(|e| Error::Database(e.to_string()))?;
            for (id, analysis_json) in rows {
                let mut analysis: serde_json::Map<String, serde_json::Value> = analysis_json
                    .as_deref()
                    .and_then(|s| serde_json::from_str(s).ok())
                    .unwrap_or_default();
                analysis.insert("overrides".to_string(), overrides.clone());
                let new_json = serde_json::to_string(&analysis)?;
                update
                    .execute(params![new_json, id])
                    .map_err(|e| Error::Database(e.to_string()))?;
                updated += 1;
            }
        }
        tx.commit().map_err(|e| Error::Database(e.to_string()))?;
        Ok(updated)
    }

    /// Get the non-null analysis values stored in a collection.
    pub fn get_analyses(&self, collection: &str) -> Result<Vec<serde_json::Value>> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare_cached(
                "SELECT analysis_json FROM documents
                 WHERE collection = ?1 AND analysis_json IS NOT NULL",
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let rows = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(rows
            .filter_map(|r| r.ok())
            .filter_map(|s| serde_json::from_str(&s).ok())
            .collect())
    }

    // ---------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------

    /// Store-wide statistics.
    pub fn get_stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();
        let collections: i64 = conn
            .query_row(
                "SELECT COUNT(DISTINCT collection) FROM documents",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        let documents: i64 = conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))
            .map_err(|e| Error::Database(e.to_string()))?;
        let analyzed: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM documents WHERE analysis_json IS NOT NULL",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(StoreStats {
            collections,
            documents,
            analyzed_documents: analyzed,
        })
    }

    /// Fetch a single document by collection and post id.
    pub fn get_document(&self, collection: &str, post_id: &str) -> Result<Option<StoredDocument>> {
        let conn = self.conn.lock();
        let row = conn
            .prepare_cached(
                "SELECT id, collection, post_id, text, author, created_at, analysis_json, ingested_at
                 FROM documents WHERE collection = ?1 AND post_id = ?2",
            )
            .map_err(|e| Error::Database(e.to_string()))?
            .query_row(params![collection, post_id], |row| {
                Ok(Self::row_to_document(row))
            })
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(row)
    }

    fn row_to_document(row: &Row) -> StoredDocument {
        let created_at: Option<String> = row.get(5).unwrap_or(None);
        let analysis_json: Option<String> = row.get(6).unwrap_or(None);
        StoredDocument {
            id: row.get(0).unwrap_or_default(),
            collection: row.get(1).unwrap_or_default(),
            post_id: row.get(2).unwrap_or_default(),
            text: row.get(3).unwrap_or_default(),
            author: row.get(4).unwrap_or(None),
            created_at: created_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc)),
            analysis: analysis_json.as_deref().and_then(|s| serde_json::from_str(s).ok()),
            ingested_at: row.get(7).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn doc(post_id: &str, text: &str) -> SocialDocument {
        SocialDocument {
            post_id: post_id.into(),
            text: text.into(),
            created_at: Some("2024-01-01T10:00:00Z".parse().unwrap()),
            author: Some("tester".into()),
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let (store, _dir) = test_store();
        let written = store
            .upsert_documents("ipl", &[doc("p1", "first"), doc("p2", "second")])
            .unwrap();
        assert_eq!(written, 2);

        let docs = store.get_documents("ipl").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].collection, "ipl");
    }

    #[test]
    fn test_upsert_same_post_id_updates_in_place() {
        let (store, _dir) = test_store();
        store.upsert_documents("ipl", &[doc("p1", "old text")]).unwrap();
        store.upsert_documents("ipl", &[doc("p1", "new text")]).unwrap();

        let docs = store.get_documents("ipl").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].text, "new text");
    }

    #[test]
    fn test_apply_analysis_full_replace() {
        let (store, _dir) = test_store();
        store
            .upsert_documents("ipl", &[doc("p1", "a"), doc("p2", "b")])
            .unwrap();

        let mut record = AnalysisRecord::default();
        record.summary.narrative = "first run".into();
        assert_eq!(store.apply_analysis("ipl", &record).unwrap(), 2);

        record.summary.narrative = "second run".into();
        assert_eq!(store.apply_analysis("ipl", &record).unwrap(), 2);

        let analyses = store.get_analyses("ipl").unwrap();
        assert_eq!(analyses.len(), 2);
        for a in analyses {
            assert_eq!(a["summary"]["narrative"], "second run");
        }
    }

    #[test]
    fn test_merge_overrides_preserves_analysis() {
        let (store, _dir) = test_store();
        store.upsert_documents("ipl", &[doc("p1", "a")]).unwrap();

        let mut record = AnalysisRecord::default();
        record.summary.narrative = "kept".into();
        store.apply_analysis("ipl", &record).unwrap();

        let overrides = serde_json::json!({ "narrative": "edited by hand" });
        assert_eq!(store.merge_overrides("ipl", &overrides).unwrap(), 1);

        let analyses = store.get_analyses("ipl").unwrap();
        assert_eq!(analyses[0]["summary"]["narrative"], "kept");
        assert_eq!(analyses[0]["overrides"]["narrative"], "edited by hand");
    }

    #[test]
    fn test_list_and_delete_collections() {
        let (store, _dir) = test_store();
        store.upsert_documents("ipl", &[doc("p1", "a")]).unwrap();
        store.upsert_documents("budget", &[doc("p1", "b"), doc("p2", "c")]).unwrap();

        let collections = store.list_collections().unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].name, "budget");
        assert_eq!(collections[0].document_count, 2);

        assert_eq!(store.delete_collection("budget").unwrap(), 2);
        assert_eq!(store.list_collections().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_timestamp_round_trips_as_none() {
        let (store, _dir) = test_store();
        let d = SocialDocument {
            post_id: "p1".into(),
            text: "no date".into(),
            created_at: None,
            author: None,
        };
        store.upsert_documents("ipl", &[d]).unwrap();
        let docs = store.get_documents("ipl").unwrap();
        assert!(docs[0].created_at.is_none());
    }
}

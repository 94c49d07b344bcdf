//! Persistent passage store over SQLite.
//!
//! Records are created during indexing and read-only afterwards; only a
//! whole-corpus reindex replaces them. Once the store holds records it is
//! the single source of truth for dimensionality and model identity, and
//! every later insert must agree.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use ragdb_core::error::{Error, Result};
use ragdb_core::types::{DocumentChunk, StoredRecord};

use crate::schema::{
    decode_embedding, encode_embedding, DDL, META_EMBEDDER_ID, META_EMBEDDING_DIM,
    META_SCHEMA_VERSION, SCHEMA_VERSION,
};

pub struct VectorStore {
    conn: Connection,
    db_path: PathBuf,
}

impl VectorStore {
    /// Open (or create) the store at `db_path`, applying the schema and
    /// verifying the schema version.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path).map_err(db_err)?;
        conn.execute_batch(DDL).map_err(db_err)?;
        let store = Self { conn, db_path: db_path.to_path_buf() };
        match store.get_meta(META_SCHEMA_VERSION)? {
            None => store.set_meta(META_SCHEMA_VERSION, SCHEMA_VERSION)?,
            Some(v) if v == SCHEMA_VERSION => {}
            Some(v) => {
                return Err(Error::Schema(format!(
                    "store at {} has schema version {v}, expected {SCHEMA_VERSION}",
                    store.db_path.display()
                )));
            }
        }
        Ok(store)
    }

    pub fn db_path(&self) -> &Path { &self.db_path }

    /// Dimensionality established by the first successful insert, if any.
    pub fn embedding_dim(&self) -> Result<Option<usize>> {
        Ok(self.get_meta(META_EMBEDDING_DIM)?.and_then(|v| v.parse().ok()))
    }

    /// Identifier of the model that produced the stored embeddings, if any.
    pub fn embedder_id(&self) -> Result<Option<String>> {
        self.get_meta(META_EMBEDDER_ID)
    }

    /// Append a batch of records, all-or-nothing. The first successful
    /// insert establishes dimensionality and model identity; any embedding
    /// whose length disagrees fails the whole batch with nothing written.
    pub fn insert(
        &mut self,
        embedder_id: &str,
        records: &[(DocumentChunk, Vec<f32>)],
    ) -> Result<()> {
        let established = self.embedding_dim()?;
        if records.is_empty() {
            return match established {
                Some(_) => Ok(()),
                None => Err(Error::Schema(
                    "cannot insert an empty batch into an uninitialized store".to_string(),
                )),
            };
        }
        self.check_embedder(embedder_id)?;
        let dim = match established {
            Some(d) => d,
            None => records[0].1.len(),
        };
        check_dimensions(records, dim)?;

        let tx = self.conn.transaction().map_err(db_err)?;
        insert_records(&tx, records)?;
        set_meta_tx(&tx, META_EMBEDDING_DIM, &dim.to_string())?;
        set_meta_tx(&tx, META_EMBEDDER_ID, embedder_id)?;
        tx.commit().map_err(db_err)?;
        Ok(())
    }

    /// Remove every record and forget the established dimensionality and
    /// model identity. Idempotent.
    pub fn clear(&mut self) -> Result<()> {
        let tx = self.conn.transaction().map_err(db_err)?;
        clear_tx(&tx)?;
        tx.commit().map_err(db_err)
    }

    /// Atomic reindex: clear plus bulk insert in one transaction, so a
    /// failed rebuild leaves the previous corpus intact and a concurrent
    /// reader never observes a half-populated store.
    pub fn replace_all(
        &mut self,
        embedder_id: &str,
        records: &[(DocumentChunk, Vec<f32>)],
    ) -> Result<()> {
        if let Some((_, first)) = records.first() {
            check_dimensions(records, first.len())?;
        }
        let tx = self.conn.transaction().map_err(db_err)?;
        clear_tx(&tx)?;
        if let Some((_, first)) = records.first() {
            insert_records(&tx, records)?;
            set_meta_tx(&tx, META_EMBEDDING_DIM, &first.len().to_string())?;
            set_meta_tx(&tx, META_EMBEDDER_ID, embedder_id)?;
        }
        tx.commit().map_err(db_err)
    }

    /// Every stored record in insertion order (rowid ascending).
    pub fn all(&self) -> Result<Vec<StoredRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, doc_id, source, chunk_index, total_chunks, \
                 start_offset, end_offset, content, embedding \
                 FROM passages ORDER BY id ASC",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    chunk: DocumentChunk {
                        doc_id: row.get(1)?,
                        source: row.get(2)?,
                        chunk_index: row.get::<_, i64>(3)? as usize,
                        total_chunks: row.get::<_, i64>(4)? as usize,
                        start_offset: row.get::<_, i64>(5)? as usize,
                        end_offset: row.get::<_, i64>(6)? as usize,
                        content: row.get(7)?,
                    },
                    embedding: decode_embedding(&row.get::<_, Vec<u8>>(8)?),
                })
            })
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM passages", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(n as usize)
    }

    fn check_embedder(&self, embedder_id: &str) -> Result<()> {
        if let Some(existing) = self.embedder_id()? {
            if existing != embedder_id {
                return Err(Error::Schema(format!(
                    "store was built with embedder '{existing}', refusing records from '{embedder_id}'"
                )));
            }
        }
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM meta WHERE key = ?1", params![key], |row| row.get(0))
            .optional()
            .map_err(db_err)
    }

    fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute("INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)", params![key, value])
            .map_err(db_err)?;
        Ok(())
    }
}

fn db_err(e: rusqlite::Error) -> Error {
    Error::Operation(format!("sqlite: {e}"))
}

fn check_dimensions(records: &[(DocumentChunk, Vec<f32>)], dim: usize) -> Result<()> {
    if dim == 0 {
        return Err(Error::Schema("embeddings must be non-empty".to_string()));
    }
    for (_, embedding) in records {
        if embedding.len() != dim {
            return Err(Error::DimensionMismatch { expected: dim, actual: embedding.len() });
        }
    }
    Ok(())
}

fn insert_records(
    tx: &rusqlite::Transaction<'_>,
    records: &[(DocumentChunk, Vec<f32>)],
) -> Result<()> {
    let mut stmt = tx
        .prepare(
            "INSERT INTO passages (doc_id, source, chunk_index, total_chunks, \
             start_offset, end_offset, content, embedding) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .map_err(db_err)?;
    for (chunk, embedding) in records {
        stmt.execute(params![
            chunk.doc_id,
            chunk.source,
            chunk.chunk_index as i64,
            chunk.total_chunks as i64,
            chunk.start_offset as i64,
            chunk.end_offset as i64,
            chunk.content,
            encode_embedding(embedding),
        ])
        .map_err(db_err)?;
    }
    Ok(())
}

fn clear_tx(tx: &rusqlite::Transaction<'_>) -> Result<()> {
    tx.execute("DELETE FROM passages", []).map_err(db_err)?;
    tx.execute(
        "DELETE FROM meta WHERE key IN (?1, ?2)",
        params![META_EMBEDDING_DIM, META_EMBEDDER_ID],
    )
    .map_err(db_err)?;
    Ok(())
}

fn set_meta_tx(tx: &rusqlite::Transaction<'_>, key: &str, value: &str) -> Result<()> {
    tx.execute("INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)", params![key, value])
        .map_err(db_err)?;
    Ok(())
}

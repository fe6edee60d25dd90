use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Metadata stored alongside each embedded chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub file_path: String,
    pub language: String,
    pub start_line: usize,
    pub end_line: usize,
}

/// A stored vector entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorEntry {
    metadata: ChunkMetadata,
    document: String,
    embedding: Vec<f32>,
}

/// Metadata filter applied at query time.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    /// Keep entries whose language is in this set
    pub languages: Option<Vec<String>>,
}

impl MetadataFilter {
    fn matches(&self, metadata: &ChunkMetadata) -> bool {
        match &self.languages {
            Some(langs) => langs.iter().any(|l| l == &metadata.language),
            None => true,
        }
    }
}

/// A query hit. `distance` uses the cosine convention: 0 = identical,
/// 2 = opposite.
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub id: String,
    pub metadata: ChunkMetadata,
    pub document: String,
    pub distance: f32,
}

/// Persistent nearest-neighbor store keyed by chunk id.
///
/// Entries live in memory behind a lock and are written back to disk as JSON
/// after every mutation. Upsert-by-id is the only write path, so re-applying
/// the same ids replaces prior content instead of duplicating it.
pub struct VectorStore {
    entries: RwLock<HashMap<String, VectorEntry>>,
    persist_path: PathBuf,
}

impl VectorStore {
    pub fn open_or_create(index_dir: &Path, collection_name: &str) -> Result<Self> {
        std::fs::create_dir_all(index_dir)
            .with_context(|| format!("Failed to create index dir {}", index_dir.display()))?;
        let persist_path = index_dir.join(format!("{collection_name}.json"));

        let entries = if persist_path.exists() {
            let data = std::fs::read_to_string(&persist_path)
                .context("Failed to read vector store")?;
            serde_json::from_str(&data).unwrap_or_default()
        } else {
            HashMap::new()
        };

        Ok(Self {
            entries: RwLock::new(entries),
            persist_path,
        })
    }

    /// Insert or overwrite entries. All slices must be position-aligned;
    /// trailing items without a matching embedding are dropped.
    pub fn upsert(
        &self,
        ids: &[String],
        embeddings: Vec<Vec<f32>>,
        metadatas: Vec<ChunkMetadata>,
        documents: Vec<String>,
    ) -> Result<()> {
        let mut entries = self.entries.write();

        for (((id, embedding), metadata), document) in ids
            .iter()
            .zip(embeddings)
            .zip(metadatas)
            .zip(documents)
        {
            entries.insert(
                id.clone(),
                VectorEntry {
                    metadata,
                    document,
                    embedding,
                },
            );
        }

        let data = serde_json::to_string(&*entries)?;
        std::fs::write(&self.persist_path, data)
            .context("Failed to persist vector store")?;

        Ok(())
    }

    /// Return the `k` entries nearest to `query_embedding` by cosine
    /// distance, optionally restricted by a metadata filter.
    pub fn query(
        &self,
        query_embedding: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Vec<VectorHit> {
        let entries = self.entries.read();

        let mut scored: Vec<(f32, &String, &VectorEntry)> = entries
            .iter()
            .filter(|(_, e)| filter.map_or(true, |f| f.matches(&e.metadata)))
            .map(|(id, e)| {
                let distance = 1.0 - cosine_similarity(query_embedding, &e.embedding);
                (distance, id, e)
            })
            .collect();

        // Ascending distance = most similar first
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(distance, id, e)| VectorHit {
                id: id.clone(),
                metadata: e.metadata.clone(),
                document: e.document.clone(),
                distance,
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries.read().len()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(file_path: &str, language: &str) -> ChunkMetadata {
        ChunkMetadata {
            file_path: file_path.to_string(),
            language: language.to_string(),
            start_line: 1,
            end_line: 3,
        }
    }

    fn store_with(entries: &[(&str, Vec<f32>, &str)]) -> (tempfile::TempDir, VectorStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::open_or_create(dir.path(), "test").unwrap();
        let ids: Vec<String> = entries.iter().map(|(id, _, _)| id.to_string()).collect();
        let embeddings: Vec<Vec<f32>> = entries.iter().map(|(_, e, _)| e.clone()).collect();
        let metadatas: Vec<ChunkMetadata> =
            entries.iter().map(|(id, _, lang)| meta(id, lang)).collect();
        let documents: Vec<String> = entries.iter().map(|(id, _, _)| id.to_string()).collect();
        store.upsert(&ids, embeddings, metadatas, documents).unwrap();
        (dir, store)
    }

    #[test]
    fn test_upsert_and_count() {
        let (_dir, store) = store_with(&[
            ("a.rs:1", vec![1.0, 0.0], "rust"),
            ("b.py:1", vec![0.0, 1.0], "python"),
        ]);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_upsert_same_id_overwrites() {
        let (_dir, store) = store_with(&[("a.rs:1", vec![1.0, 0.0], "rust")]);

        store
            .upsert(
                &["a.rs:1".to_string()],
                vec![vec![0.0, 1.0]],
                vec![meta("a.rs", "rust")],
                vec!["updated".to_string()],
            )
            .unwrap();

        assert_eq!(store.count(), 1);
        let hits = store.query(&[0.0, 1.0], 1, None);
        assert_eq!(hits[0].document, "updated");
        assert!(hits[0].distance < 1e-6);
    }

    #[test]
    fn test_query_orders_by_distance() {
        let (_dir, store) = store_with(&[
            ("far", vec![0.0, 1.0], "rust"),
            ("near", vec![1.0, 0.1], "rust"),
            ("exact", vec![1.0, 0.0], "rust"),
        ]);

        let hits = store.query(&[1.0, 0.0], 3, None);
        assert_eq!(hits[0].id, "exact");
        assert_eq!(hits[1].id, "near");
        assert_eq!(hits[2].id, "far");
        assert!(hits[0].distance <= hits[1].distance);
        assert!(hits[1].distance <= hits[2].distance);
    }

    #[test]
    fn test_query_respects_k() {
        let (_dir, store) = store_with(&[
            ("a", vec![1.0, 0.0], "rust"),
            ("b", vec![0.9, 0.1], "rust"),
            ("c", vec![0.8, 0.2], "rust"),
        ]);
        assert_eq!(store.query(&[1.0, 0.0], 2, None).len(), 2);
    }

    #[test]
    fn test_query_language_filter() {
        let (_dir, store) = store_with(&[
            ("a.rs:1", vec![1.0, 0.0], "rust"),
            ("b.py:1", vec![1.0, 0.0], "python"),
        ]);

        let filter = MetadataFilter {
            languages: Some(vec!["python".to_string()]),
        };
        let hits = store.query(&[1.0, 0.0], 10, Some(&filter));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].metadata.language, "python");
    }

    #[test]
    fn test_query_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::open_or_create(dir.path(), "test").unwrap();
        assert!(store.query(&[1.0, 0.0], 10, None).is_empty());
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = VectorStore::open_or_create(dir.path(), "code").unwrap();
            store
                .upsert(
                    &["a.rs:1".to_string()],
                    vec![vec![1.0, 0.0]],
                    vec![meta("a.rs", "rust")],
                    vec!["fn main() {}".to_string()],
                )
                .unwrap();
        }

        let reopened = VectorStore::open_or_create(dir.path(), "code").unwrap();
        assert_eq!(reopened.count(), 1);
        let hits = reopened.query(&[1.0, 0.0], 1, None);
        assert_eq!(hits[0].document, "fn main() {}");
    }

    #[test]
    fn test_cosine_distance_convention() {
        let (_dir, store) = store_with(&[("opposite", vec![-1.0, 0.0], "rust")]);
        let hits = store.query(&[1.0, 0.0], 1, None);
        assert!((hits[0].distance - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}

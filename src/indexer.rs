//! Repository indexing: walk, chunk, embed, upsert.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use walkdir::WalkDir;

use crate::chunking;
use crate::language;
use crate::llm::embeddings::EmbeddingProvider;
use crate::models::IndexResponse;
use crate::vector::{ChunkMetadata, VectorStore};

/// A readable file collected from the walk.
struct SourceFile {
    path: String,
    language: String,
    content: String,
}

/// Walks a source tree and pushes embedded chunks into the vector store.
///
/// Chunk ids are derived from `(file_path, start_line)`, so indexing is
/// idempotent: re-running over unchanged files overwrites the same entries.
/// There is no locking across files; concurrent calls over overlapping
/// trees interleave at upsert granularity.
pub struct Indexer<E> {
    embedder: E,
    store: Arc<VectorStore>,
}

impl<E: EmbeddingProvider> Indexer<E> {
    pub fn new(embedder: E, store: Arc<VectorStore>) -> Self {
        Self { embedder, store }
    }

    /// Index every eligible file under `repo_path`.
    ///
    /// A missing root path fails the call. Per-file read failures (binary
    /// content, permissions) are logged and skipped; embedding and store
    /// errors abort the whole call.
    pub async fn index_repository(
        &self,
        repo_path: &str,
        languages: Option<&[String]>,
    ) -> Result<IndexResponse> {
        let start = Instant::now();
        let root = PathBuf::from(repo_path);

        if !root.exists() {
            anyhow::bail!("Repository path not found: {repo_path}");
        }

        let extensions = language::extensions_for_languages(languages);

        // The walk and file reads are blocking filesystem work; keep them
        // off the async workers so unrelated requests keep flowing.
        let files =
            tokio::task::spawn_blocking(move || collect_files(&root, extensions.as_deref()))
                .await?;

        let mut files_indexed = 0usize;
        let mut chunks_created = 0usize;

        for file in &files {
            let stored = self.index_file(file).await?;
            if stored > 0 {
                files_indexed += 1;
                chunks_created += stored;
            }
        }

        tracing::info!(
            "Indexed {files_indexed} files ({chunks_created} chunks) under {repo_path}"
        );

        Ok(IndexResponse {
            status: "completed".to_string(),
            files_indexed,
            chunks_created,
            time_taken: start.elapsed().as_secs_f64(),
        })
    }

    /// Chunk, embed, and upsert one file. Returns the number of chunks
    /// stored; files that chunk to nothing count as zero.
    async fn index_file(&self, file: &SourceFile) -> Result<usize> {
        let chunks = chunking::chunk(&file.content, &file.path);
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let ids: Vec<String> = chunks.iter().map(|c| c.id.clone()).collect();
        let metadatas: Vec<ChunkMetadata> = chunks
            .iter()
            .map(|c| ChunkMetadata {
                file_path: file.path.clone(),
                language: file.language.clone(),
                start_line: c.start_line,
                end_line: c.end_line,
            })
            .collect();

        // One batched provider call per file; provider errors are fatal
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let stored = chunks.len();
        self.store.upsert(&ids, embeddings, metadatas, texts)?;

        Ok(stored)
    }
}

/// Walk `root` and read every eligible file, skipping dot-prefixed
/// components and anything that fails to read as UTF-8. Walk errors and
/// skipped files never abort the collection.
fn collect_files(root: &Path, extensions: Option<&[&str]>) -> Vec<SourceFile> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();

        if let Some(exts) = extensions {
            let ext = language::dotted_extension(path);
            if !exts.contains(&ext.as_str()) {
                continue;
            }
        }

        match std::fs::read_to_string(path) {
            Ok(content) => files.push(SourceFile {
                path: path.to_string_lossy().to_string(),
                language: language::detect_language(path),
                content,
            }),
            Err(e) => {
                // Binary or unreadable file: skip, never abort the walk
                tracing::warn!("Skipping {}: {e}", path.display());
            }
        }
    }

    files
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_string_lossy()
        .starts_with('.')
}

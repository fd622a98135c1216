//! Startup loading of reference documents.
//!
//! A flat directory of files is read once, before any chat traffic is
//! accepted, and seeded into the history prefix as model-authored blob
//! turns. There is no partial mode: an unreadable directory or file is
//! fatal to startup.

use crate::HistoryStore;
use anyhow::Context;
use riftbot_core::{Document, Turn};
use std::path::Path;
use tracing::info;

const FALLBACK_MIME: &str = "application/octet-stream";

/// Read every regular file in `dir` (non-recursive, file-name order) and
/// sniff its media type from the leading bytes.
pub fn load_documents(dir: &Path) -> anyhow::Result<Vec<Document>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("cannot list document directory {}", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            names.push(entry.file_name());
        }
    }
    names.sort();

    let mut documents = Vec::with_capacity(names.len());
    for file_name in names {
        let path = dir.join(&file_name);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("cannot read document {}", path.display()))?;
        let mime_type = infer::get(&bytes)
            .map_or(FALLBACK_MIME, |kind| kind.mime_type())
            .to_string();
        let name = file_name.to_string_lossy().into_owned();
        info!("loaded document {name} ({mime_type}, {} bytes)", bytes.len());
        documents.push(Document {
            name,
            mime_type,
            bytes,
        });
    }
    Ok(documents)
}

/// Append one model turn per document. Must run before the dispatcher
/// starts so the document prefix precedes every user turn.
pub async fn seed_history(store: &HistoryStore, documents: Vec<Document>) {
    let count = documents.len();
    store
        .append(documents.into_iter().map(Turn::document))
        .await;
    info!("seeded history with {count} document turns");
}

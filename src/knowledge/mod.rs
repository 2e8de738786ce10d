//! Instructions loader.
//!
//! Builds the instructions text sent to the AI endpoint at the start of
//! every call: a fixed preamble followed by the text of every document in
//! the knowledge directory. Runs once at startup; the result never changes
//! for the lifetime of the process.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// Kind of knowledge document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" | "md" | "markdown" => Some(DocumentKind::Text),
            _ => None,
        }
    }
}

/// Build the instructions text from `preamble` and the documents in `dir`.
///
/// Documents are read in file-name order. A missing directory yields the bare
/// preamble; a document that cannot be read is skipped.
pub fn load_instructions(preamble: &str, dir: &Path) -> String {
    let mut instructions = preamble.to_string();

    let documents = match list_documents(dir) {
        Ok(documents) => documents,
        Err(e) => {
            warn!(
                dir = %dir.display(),
                error = %e,
                "Knowledge directory unavailable, using preamble only"
            );
            return instructions;
        }
    };

    let mut loaded = 0usize;
    for (path, kind) in documents {
        match extract_text(&path, kind) {
            Ok(text) => {
                debug!(file = %path.display(), chars = text.len(), "Loaded knowledge document");
                instructions.push_str(&text);
                loaded += 1;
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Skipping unreadable knowledge document");
            }
        }
    }

    info!(
        dir = %dir.display(),
        documents = loaded,
        chars = instructions.len(),
        "Instructions loaded"
    );
    instructions
}

fn list_documents(dir: &Path) -> std::io::Result<Vec<(PathBuf, DocumentKind)>> {
    let mut documents = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match DocumentKind::from_path(&path) {
            Some(kind) => documents.push((path, kind)),
            None => debug!(file = %path.display(), "Ignoring non-document file"),
        }
    }

    documents.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(documents)
}

fn extract_text(path: &Path, kind: DocumentKind) -> Result<String, String> {
    match kind {
        DocumentKind::Pdf => pdf_extract::extract_text(path)
            .map_err(|e| format!("Failed to extract PDF text: {e}")),
        DocumentKind::Text => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read text document: {e}")),
    }
}

//! Document loading for knowledge base ingestion

use std::path::{Path, PathBuf};

use helpdesk::DomainError;

/// Extensions picked up when ingesting a directory
const TEXT_EXTENSIONS: [&str; 8] = ["txt", "md", "markdown", "csv", "json", "html", "rst", "log"];

/// A loaded text document
#[derive(Debug, Clone)]
pub struct Document {
    pub source: String,
    pub text: String,
}

/// Load a single file, or every text file under a directory
pub async fn load_documents(path: &Path) -> Result<Vec<Document>, DomainError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| DomainError::Validation(format!("{}: {}", path.display(), e)))?;

    if metadata.is_file() {
        return Ok(vec![read_document(path).await?]);
    }

    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| DomainError::Repository(format!("{}: {}", dir.display(), e)))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::Repository(e.to_string()))?
        {
            let entry_path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| DomainError::Repository(e.to_string()))?;
            if file_type.is_dir() {
                pending.push(entry_path);
            } else if is_text_file(&entry_path) {
                files.push(entry_path);
            }
        }
    }
    files.sort();

    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        match read_document(&file).await {
            Ok(doc) => documents.push(doc),
            Err(e) => tracing::warn!("⚠️  Skipping {}: {}", file.display(), e),
        }
    }
    Ok(documents)
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            TEXT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

async fn read_document(path: &Path) -> Result<Document, DomainError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::Validation(format!("{}: {}", path.display(), e)))?;
    Ok(Document {
        source: path.display().to_string(),
        text,
    })
}

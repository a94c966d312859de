use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension {
            "txt" | "md" => {
                let content = fs::read_to_string(path)
                    .await
                    .context(format!("Failed to read file: {:?}", path))?;
                Ok(content)
            }
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    /// Read every txt/md file directly under `dir` and concatenate them into
    /// one document, in sorted path order so the chunk sequence is stable.
    pub async fn read_directory(dir: &Path) -> Result<String> {
        let mut paths = Vec::new();

        let mut entries = fs::read_dir(dir)
            .await
            .context(format!("Failed to read directory: {:?}", dir))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == "txt" || ext == "md" {
                        paths.push(path);
                    }
                }
            }
        }

        paths.sort();

        let mut combined = String::new();
        for path in &paths {
            let content = Self::read_file(path).await?;
            if !combined.is_empty() {
                combined.push_str("\n\n");
            }
            combined.push_str(&content);
        }

        Ok(combined)
    }
}

//! Task source: one SQL statement per regular file in a directory.

use std::path::Path;

use crate::error::SourceError;
use crate::executor::types::SqlTask;
use crate::util::normalize_line_endings;

/// Read every regular file directly inside `dir` as one task.
///
/// Files are taken in ascending file-name order and numbered from 1.
/// Subdirectories are logged and skipped, never traversed. Contents are
/// decoded as UTF-8 (invalid sequences replaced) with line endings
/// normalized to the platform separator.
pub async fn load_tasks(dir: &Path) -> Result<Vec<SqlTask>, SourceError> {
    let dir_label = dir.display().to_string();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SourceError::DirectoryNotFound { path: dir_label });
        }
        Err(source) => {
            return Err(SourceError::DirectoryUnreadable {
                path: dir_label,
                source,
            });
        }
    };

    let mut files = Vec::new();
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(source) => {
                return Err(SourceError::DirectoryUnreadable {
                    path: dir_label,
                    source,
                });
            }
        };

        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        // Follows symlinks, so a link to a file counts as a file.
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| SourceError::FileUnreadable {
                path: path.display().to_string(),
                source,
            })?;

        if metadata.is_file() {
            files.push((name, path));
        } else if metadata.is_dir() {
            tracing::info!(directory = %name, "found a directory; skipping");
        } else {
            tracing::debug!(entry = %name, "not a regular file; skipping");
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut tasks = Vec::with_capacity(files.len());
    for (idx, (name, path)) in files.into_iter().enumerate() {
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| SourceError::FileUnreadable {
                path: path.display().to_string(),
                source,
            })?;
        let sql = normalize_line_endings(&String::from_utf8_lossy(&bytes));
        tasks.push(SqlTask::new(name, idx + 1, sql));
    }

    tracing::info!(directory = %dir_label, tasks = tasks.len(), "loaded SQL files");
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::LINE_SEPARATOR;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn loads_files_in_name_order_and_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.sql"), "SELECT * FROM not_a_table").unwrap();
        std::fs::write(dir.path().join("a.sql"), "SELECT 1\r\nFROM dual\r\n").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.sql"), "SELECT 3").unwrap();

        let tasks = load_tasks(dir.path()).await.unwrap();

        let ids: Vec<(&str, usize)> = tasks
            .iter()
            .map(|t| (t.identifier(), t.sequence_number()))
            .collect();
        assert_eq!(ids, vec![("a.sql", 1), ("b.sql", 2)]);
        assert_eq!(
            tasks[0].sql_text(),
            format!("SELECT 1{LINE_SEPARATOR}FROM dual{LINE_SEPARATOR}")
        );
        assert_eq!(
            tasks[1].sql_text(),
            format!("SELECT * FROM not_a_table{LINE_SEPARATOR}")
        );
    }

    #[tokio::test]
    async fn empty_directory_yields_no_tasks() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_tasks(dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = load_tasks(&missing).await.unwrap_err();
        assert!(matches!(err, SourceError::DirectoryNotFound { .. }));
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[tokio::test]
    async fn a_file_path_is_not_a_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_tasks(file.path()).await.unwrap_err();
        assert!(matches!(err, SourceError::DirectoryUnreadable { .. }));
    }
}

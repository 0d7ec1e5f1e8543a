//! File read endpoint
//!
//! `POST /file-content` takes `file_path` from the query string or, failing
//! that, from a JSON body. Paths containing `..` and paths that do not exist
//! are both answered with 403. With `files.root` configured, relative paths
//! resolve against the root and the canonical path must stay inside it.

use hyper::body::Body;
use hyper::Request;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::AppState;
use crate::error::{Result, ServiceError};
use crate::http::{self, BoxError};
use crate::logger;

const FILE_PATH_PARAM: &str = "file_path";
const TRAVERSAL_TOKEN: &str = "..";
const INVALID_PATH: &str = "Invalid file path";

#[derive(Debug, Deserialize)]
struct FilePathBody {
    file_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContentResponse {
    pub content: String,
}

pub async fn handle<B>(req: Request<B>, state: &AppState) -> Result<FileContentResponse>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let file_path = match http::query_param(req.uri(), FILE_PATH_PARAM) {
        Some(path) => path,
        None => {
            let body = http::read_body(req.into_body(), state.config.http.max_body_size).await?;
            if body.is_empty() {
                return Err(ServiceError::Unprocessable(format!(
                    "Missing required parameter: {FILE_PATH_PARAM}"
                )));
            }
            http::parse_json::<FilePathBody>(&body)?.file_path
        }
    };

    read_file_content(&file_path, state.config.files.root.as_deref()).await
}

/// Read a UTF-8 text file after the path checks
pub async fn read_file_content(file_path: &str, root: Option<&Path>) -> Result<FileContentResponse> {
    if file_path.contains(TRAVERSAL_TOKEN) {
        logger::log_warning(&format!("Path traversal attempt blocked: {file_path}"));
        return Err(forbidden());
    }

    let path = resolve(file_path, root);
    if !fs::try_exists(&path).await.unwrap_or(false) {
        return Err(forbidden());
    }

    if let Some(root) = root {
        ensure_within_root(&path, root).await?;
    }

    let content = fs::read_to_string(&path).await?;
    Ok(FileContentResponse { content })
}

fn resolve(file_path: &str, root: Option<&Path>) -> PathBuf {
    let path = Path::new(file_path);
    match root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path.to_path_buf(),
    }
}

/// Canonical containment check, follows symlinks on both sides
async fn ensure_within_root(path: &Path, root: &Path) -> Result<()> {
    let canonical_root = fs::canonicalize(root).await.map_err(|e| {
        ServiceError::Internal(format!(
            "File root '{}' is not accessible: {e}",
            root.display()
        ))
    })?;
    let canonical_path = fs::canonicalize(path).await?;

    if canonical_path.starts_with(&canonical_root) {
        Ok(())
    } else {
        logger::log_warning(&format!(
            "File outside root blocked: {} -> {}",
            path.display(),
            canonical_path.display()
        ));
        Err(forbidden())
    }
}

fn forbidden() -> ServiceError {
    ServiceError::Forbidden(INVALID_PATH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    #[tokio::test]
    async fn test_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std_fs::write(&file, "héllo\nworld").unwrap();

        let resp = read_file_content(file.to_str().unwrap(), None).await.unwrap();
        assert_eq!(resp.content, "héllo\nworld");
    }

    #[tokio::test]
    async fn test_traversal_token_is_forbidden_even_if_path_exists() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("sub");
        std_fs::create_dir(&sub).unwrap();
        std_fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let path = format!("{}/../notes.txt", sub.display());
        let err = read_file_content(&path, None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = read_file_content("/etc/passwd/../shadow", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_forbidden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let err = read_file_content(path.to_str().unwrap(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(ref m) if m == INVALID_PATH));

        let err = read_file_content("", None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_non_utf8_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blob.bin");
        std_fs::write(&file, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let err = read_file_content(file.to_str().unwrap(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn test_directory_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file_content(dir.path().to_str().unwrap(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn test_root_containment() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        std_fs::write(root.path().join("inside.txt"), "inside").unwrap();
        let outside_file = outside.path().join("outside.txt");
        std_fs::write(&outside_file, "outside").unwrap();

        let resp = read_file_content("inside.txt", Some(root.path()))
            .await
            .unwrap();
        assert_eq!(resp.content, "inside");

        let err = read_file_content(outside_file.to_str().unwrap(), Some(root.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escaping_root_is_forbidden() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let target = outside.path().join("secret.txt");
        std_fs::write(&target, "secret").unwrap();
        std::os::unix::fs::symlink(&target, root.path().join("link.txt")).unwrap();

        let err = read_file_content("link.txt", Some(root.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }
}

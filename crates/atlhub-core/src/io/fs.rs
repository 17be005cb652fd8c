use std::path::{Path, PathBuf};

use crate::PackageError;

/// Write `contents` to `path`, attaching the path to any error.
pub async fn write_file(path: PathBuf, contents: &[u8]) -> Result<(), PackageError> {
    tokio::fs::write(&path, contents)
        .await
        .map_err(|e| PackageError::filesystem(&path, e))
}

/// Create `dir` and all of its parents.
pub async fn ensure_dir(dir: &Path) -> Result<(), PackageError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PackageError::filesystem(dir, e))
}

/// Whether `path` exists. Errors other than "not found" are surfaced.
pub async fn exists(path: &Path) -> Result<bool, PackageError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| PackageError::filesystem(path, e))
}

/// Mark a launcher script as executable (0755).
pub async fn make_executable(path: &Path) -> Result<(), PackageError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = tokio::fs::metadata(path)
            .await
            .map_err(|e| PackageError::filesystem(path, e))?
            .permissions();
        perms.set_mode(0o755);
        tokio::fs::set_permissions(path, perms)
            .await
            .map_err(|e| PackageError::filesystem(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_exists() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b");
        ensure_dir(&nested).await.unwrap();

        let file = nested.join("x.txt");
        assert!(!exists(&file).await.unwrap());
        write_file(file.clone(), b"hello").await.unwrap();
        assert!(exists(&file).await.unwrap());
        assert_eq!(std::fs::read(&file).unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_reports_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("missing/x.txt");
        let err = write_file(file.clone(), b"x").await.unwrap_err();
        match err {
            PackageError::Filesystem { path, .. } => assert_eq!(path, file),
            other => panic!("expected filesystem error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_make_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let script = dir.path().join("run.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        make_executable(&script).await.unwrap();

        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

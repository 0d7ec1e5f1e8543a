//! Recursive tree copy with exclusions
//!
//! Excluded directories are never descended. Regular files are copied with
//! permissions and modification time; symlinks to files are copied as the
//! file they point at, symlinks to directories are skipped.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use super::error::{PackageError, Result};
use super::exclude::ExclusionSet;

/// Copy `source` into `output`, returning the number of files copied
pub fn copy_tree(source: &Path, output: &Path, exclusions: &ExclusionSet) -> Result<usize> {
    if !source.is_dir() {
        return Err(PackageError::SourceNotFound(source.to_path_buf()));
    }

    fs::create_dir_all(output).map_err(PackageError::io(output))?;
    // The output may live inside the source tree; never copy it into itself
    let output_canonical = fs::canonicalize(output).map_err(PackageError::io(output))?;

    let walker = TreeCopy {
        exclusions,
        output_canonical,
    };
    let mut copied = 0;
    walker.copy_dir(source, output, &mut copied)?;
    Ok(copied)
}

struct TreeCopy<'a> {
    exclusions: &'a ExclusionSet,
    output_canonical: PathBuf,
}

impl TreeCopy<'_> {
    fn copy_dir(&self, src: &Path, dst: &Path, copied: &mut usize) -> Result<()> {
        fs::create_dir_all(dst).map_err(PackageError::io(dst))?;

        let mut entries = fs::read_dir(src)
            .map_err(PackageError::io(src))?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(PackageError::io(src))?;
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name();
            let src_path = entry.path();
            let dst_path = dst.join(&name);

            if self.exclusions.is_excluded(&name.to_string_lossy()) {
                tracing::debug!("Skipping excluded: {}", src_path.display());
                continue;
            }

            let file_type = entry.file_type().map_err(PackageError::io(&src_path))?;
            let is_dir = if file_type.is_symlink() {
                match fs::metadata(&src_path) {
                    Ok(meta) if meta.is_dir() => {
                        tracing::debug!("Skipping directory symlink: {}", src_path.display());
                        continue;
                    }
                    Ok(_) => false,
                    Err(e) => {
                        tracing::warn!("Skipping dangling symlink {}: {e}", src_path.display());
                        continue;
                    }
                }
            } else {
                file_type.is_dir()
            };

            if is_dir {
                if self.is_output_dir(&src_path) {
                    tracing::debug!("Skipping output directory: {}", src_path.display());
                    continue;
                }
                self.copy_dir(&src_path, &dst_path, copied)?;
            } else {
                copy_file(&src_path, &dst_path)?;
                *copied += 1;
                tracing::info!("Copied: {} -> {}", src_path.display(), dst_path.display());
            }
        }

        Ok(())
    }

    fn is_output_dir(&self, path: &Path) -> bool {
        fs::canonicalize(path).is_ok_and(|p| p == self.output_canonical)
    }
}

/// Copy content and permissions, then carry the modification time over
fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    fs::copy(src, dst).map_err(PackageError::io(src))?;

    // Timestamps are best effort, not every platform or filesystem allows it
    let preserved = fs::metadata(src)
        .and_then(|meta| meta.modified())
        .and_then(|mtime| open_for_times(dst)?.set_modified(mtime));
    if let Err(e) = preserved {
        tracing::debug!("Could not preserve mtime for {}: {e}", dst.display());
    }
    Ok(())
}

/// futimens only needs ownership, so a read-only copy can still be stamped
#[cfg(unix)]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    File::open(path)
}

#[cfg(not(unix))]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    File::options().write(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source() {
        let out = tempfile::tempdir().unwrap();
        let err = copy_tree(
            Path::new("definitely/not/here"),
            out.path(),
            &ExclusionSet::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PackageError::SourceNotFound(_)));
    }

    #[test]
    fn test_preserves_mtime() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let file = src.path().join("main.py");
        fs::write(&file, "print('hi')").unwrap();
        let old = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000_000);
        File::options()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(old)
            .unwrap();

        copy_tree(src.path(), out.path(), &ExclusionSet::default()).unwrap();

        let copied = fs::metadata(out.path().join("main.py")).unwrap();
        assert_eq!(copied.modified().unwrap(), old);
    }

    #[cfg(unix)]
    #[test]
    fn test_preserves_mtime_of_read_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let file = src.path().join("settings.py");
        fs::write(&file, "DEBUG = False").unwrap();
        let old = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000_000);
        File::options()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(old)
            .unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o444)).unwrap();

        copy_tree(src.path(), out.path(), &ExclusionSet::default()).unwrap();

        // A read-only descriptor must be enough to stamp the copy
        let copied = out.path().join("settings.py");
        fs::set_permissions(&copied, fs::Permissions::from_mode(0o444)).unwrap();
        open_for_times(&copied).unwrap().set_modified(old).unwrap();

        let meta = fs::metadata(&copied).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o444);
        assert_eq!(meta.modified().unwrap(), old);
        assert_eq!(fs::read_to_string(&copied).unwrap(), "DEBUG = False");
    }

    #[test]
    fn test_output_inside_source_is_not_copied_into_itself() {
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("main.py"), "x").unwrap();
        let out = src.path().join("staging");

        let copied = copy_tree(src.path(), &out, &ExclusionSet::default()).unwrap();
        assert_eq!(copied, 1);
        assert!(out.join("main.py").is_file());
        assert!(!out.join("staging").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        fs::write(src.path().join("real.txt"), "real").unwrap();
        std::os::unix::fs::symlink(src.path().join("real.txt"), src.path().join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(target_dir.path(), src.path().join("linked_dir")).unwrap();

        copy_tree(src.path(), out.path(), &ExclusionSet::default()).unwrap();

        assert_eq!(fs::read_to_string(out.path().join("link.txt")).unwrap(), "real");
        assert!(!out.path().join("link.txt").is_symlink());
        assert!(!out.path().join("linked_dir").exists());
    }
}

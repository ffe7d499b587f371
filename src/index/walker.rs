//! Recursive file enumeration
//!
//! Walks a directory tree and returns root-relative paths of every regular
//! file, skipping entries the exclusion predicate rejects. The walk never
//! fails as a whole: unreadable directories, broken symlinks and transient
//! errors are logged and skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// Enumerate all files under `root`.
///
/// `exclude` receives each entry's file name and full path; returning `true`
/// drops the entry (and, for directories, everything beneath it). Results
/// are sorted by name within each directory for determinism.
pub fn iterate_files<F>(root: &Path, exclude: F) -> Vec<PathBuf>
where
    F: Fn(&str, &Path) -> bool,
{
    let Ok(root) = root.canonicalize() else {
        log::debug!("walk root is not accessible: {}", root.display());
        return Vec::new();
    };
    let mut files = Vec::new();
    walk(&root, &root, &exclude, &mut files);
    files
}

fn walk<F>(root: &Path, dir: &Path, exclude: &F, out: &mut Vec<PathBuf>)
where
    F: Fn(&str, &Path) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::debug!("skipping unreadable directory {}: {}", dir.display(), err);
            return;
        }
    };
    let mut entries: Vec<_> = entries.flatten().collect();
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if exclude(&name, &path) {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            walk(root, &path, exclude, out);
        } else if file_type.is_file() {
            if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap();
    }

    #[test]
    fn test_walk_returns_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.py"));
        touch(&dir.path().join("pkg/b.py"));
        touch(&dir.path().join("pkg/sub/c.py"));

        let mut files = iterate_files(dir.path(), |_, _| false);
        files.sort();
        assert_eq!(
            files,
            vec![
                PathBuf::from("a.py"),
                PathBuf::from("pkg/b.py"),
                PathBuf::from("pkg/sub/c.py"),
            ]
        );
    }

    #[test]
    fn test_excluded_directories_are_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("keep.py"));
        touch(&dir.path().join(".git/objects/x"));
        touch(&dir.path().join("build/out.py"));

        let excluded = [".git", "build"];
        let files = iterate_files(dir.path(), |name, _| excluded.contains(&name));
        assert_eq!(files, vec![PathBuf::from("keep.py")]);
    }

    #[test]
    fn test_missing_root_yields_empty_list() {
        let files = iterate_files(Path::new("/definitely/not/here"), |_, _| false);
        assert!(files.is_empty());
    }

    #[test]
    fn test_exclusion_by_full_path() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a/skip.py"));
        touch(&dir.path().join("b/skip.py"));
        touch(&dir.path().join("b/keep.py"));

        let files = iterate_files(dir.path(), |name, full| {
            name == "skip.py" && full.to_string_lossy().contains("/a/")
        });
        let mut files = files;
        files.sort();
        assert_eq!(
            files,
            vec![PathBuf::from("b/keep.py"), PathBuf::from("b/skip.py")]
        );
    }
}

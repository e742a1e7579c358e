use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::shared::constants::IMAGE_EXTENSIONS;

/// Recursive enumeration of candidate photos under a root directory.
///
/// Entries are sorted by file name within each directory, so one filesystem
/// snapshot always yields the same order. Unreadable entries are logged and
/// skipped; they never abort the walk.
pub struct ImageWalker {
    root: PathBuf,
}

impl ImageWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts a fresh walk. Each call restarts from the root.
    pub fn walk(&self) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_supported_image(path))
    }
}

/// Case-insensitive extension check against [`IMAGE_EXTENSIONS`].
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    fn relative(root: &Path, paths: Vec<PathBuf>) -> Vec<String> {
        paths
            .into_iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[rstest]
    #[case::png("a.png", true)]
    #[case::jpg("a.jpg", true)]
    #[case::jpeg("a.jpeg", true)]
    #[case::upper_jpg("A.JPG", true)]
    #[case::mixed_case("a.JpEg", true)]
    #[case::gif("a.gif", false)]
    #[case::txt("notes.txt", false)]
    #[case::no_extension("README", false)]
    #[case::jpg_in_stem("photo.jpg.bak", false)]
    fn test_is_supported_image(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_supported_image(Path::new(name)), expected);
    }

    #[test]
    fn test_walk_recurses_and_filters() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(&root.join("b.jpg"));
        touch(&root.join("a.PNG"));
        touch(&root.join("notes.txt"));
        touch(&root.join("sub/c.jpeg"));
        touch(&root.join("sub/deeper/d.jpg"));

        let found = relative(root, ImageWalker::new(root).walk().collect());
        assert_eq!(found, vec!["a.PNG", "b.jpg", "sub/c.jpeg", "sub/deeper/d.jpg"]);
    }

    #[test]
    fn test_walk_is_deterministic_and_restartable() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        for name in ["z.jpg", "m.jpg", "a.jpg", "dir/x.png"] {
            touch(&root.join(name));
        }

        let walker = ImageWalker::new(root);
        let first: Vec<PathBuf> = walker.walk().collect();
        let second: Vec<PathBuf> = walker.walk().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_walk_empty_directory() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(ImageWalker::new(tmp.path()).walk().count(), 0);
    }

    #[test]
    fn test_walk_missing_root_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert_eq!(ImageWalker::new(missing).walk().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(&root.join("open/a.jpg"));
        touch(&root.join("sealed/b.jpg"));
        touch(&root.join("z.png"));
        let sealed = root.join("sealed");
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores directory permissions.
        if fs::read_dir(&sealed).is_ok() {
            fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let found = relative(root, ImageWalker::new(root).walk().collect());
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(found, vec!["open/a.jpg", "z.png"]);
    }

    #[test]
    fn test_directory_with_image_extension_is_not_a_file() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("album.jpg")).unwrap();
        touch(&tmp.path().join("album.jpg/inner.png"));

        let found = relative(tmp.path(), ImageWalker::new(tmp.path()).walk().collect());
        assert_eq!(found, vec!["album.jpg/inner.png"]);
    }
}

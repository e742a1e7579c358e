use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::clustering::domain::cluster_assignment::ClusterLabel;
use crate::distribution::domain::file_sink::FileSink;
use crate::shared::constants::{GROUP_DIR_PREFIX, NOISE_LABEL};

/// One output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// A clustered group, or the pooled noise directory.
    Label(ClusterLabel),
    /// The `n`-th noise image (0-based, batch order) kept on its own.
    NoiseSingleton(usize),
}

impl GroupKey {
    /// Directory name under the output root.
    pub fn dir_name(&self) -> String {
        match self {
            GroupKey::Label(label) => format!("{GROUP_DIR_PREFIX}{}", label.as_i64()),
            GroupKey::NoiseSingleton(n) => format!("{GROUP_DIR_PREFIX}{NOISE_LABEL}_{n}"),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}

/// Maps group keys to directories under the output root, creating each
/// directory the first time its key is seen.
pub struct OutputLayout<'a> {
    root: PathBuf,
    sink: &'a dyn FileSink,
    created: HashMap<GroupKey, PathBuf>,
}

impl<'a> OutputLayout<'a> {
    pub fn new(root: impl Into<PathBuf>, sink: &'a dyn FileSink) -> Self {
        Self {
            root: root.into(),
            sink,
            created: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory for `key`, creating it on first use.
    pub fn dir_for(&mut self, key: GroupKey) -> io::Result<&Path> {
        if !self.created.contains_key(&key) {
            let dir = self.root.join(key.dir_name());
            self.sink.ensure_dir(&dir)?;
            log::debug!("Created group directory {}", dir.display());
            self.created.insert(key, dir);
        }
        Ok(self.created[&key].as_path())
    }

    /// Number of distinct directories created so far.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        dirs: Mutex<Vec<PathBuf>>,
    }

    impl FileSink for RecordingSink {
        fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
            self.dirs.lock().unwrap().push(dir.to_path_buf());
            Ok(())
        }

        fn copy(&self, _src: &Path, _dst: &Path) -> io::Result<u64> {
            Ok(0)
        }
    }

    struct FailingSink;

    impl FileSink for FailingSink {
        fn ensure_dir(&self, _dir: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn copy(&self, _src: &Path, _dst: &Path) -> io::Result<u64> {
            Ok(0)
        }
    }

    #[rstest]
    #[case(GroupKey::Label(ClusterLabel::Group(0)), "person_0")]
    #[case(GroupKey::Label(ClusterLabel::Group(12)), "person_12")]
    #[case(GroupKey::Label(ClusterLabel::Noise), "person_-1")]
    #[case(GroupKey::NoiseSingleton(0), "person_-1_0")]
    #[case(GroupKey::NoiseSingleton(3), "person_-1_3")]
    fn test_dir_names(#[case] key: GroupKey, #[case] expected: &str) {
        assert_eq!(key.dir_name(), expected);
        assert_eq!(key.to_string(), expected);
    }

    #[test]
    fn test_directory_created_once_per_key() {
        let sink = RecordingSink::default();
        let mut layout = OutputLayout::new("/out", &sink);

        let a = layout.dir_for(GroupKey::Label(ClusterLabel::Group(0))).unwrap().to_path_buf();
        let b = layout.dir_for(GroupKey::Label(ClusterLabel::Group(0))).unwrap().to_path_buf();
        layout.dir_for(GroupKey::NoiseSingleton(0)).unwrap();

        assert_eq!(a, PathBuf::from("/out/person_0"));
        assert_eq!(a, b);
        assert_eq!(layout.created_count(), 2);
        assert_eq!(sink.dirs.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failed_creation_is_not_cached() {
        let sink = FailingSink;
        let mut layout = OutputLayout::new("/out", &sink);
        assert!(layout.dir_for(GroupKey::Label(ClusterLabel::Group(0))).is_err());
        assert_eq!(layout.created_count(), 0);
    }

    #[test]
    fn test_real_directories_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = crate::distribution::infrastructure::fs_file_sink::FsFileSink::new();
        let mut layout = OutputLayout::new(tmp.path(), &sink);

        let dir = layout.dir_for(GroupKey::NoiseSingleton(1)).unwrap().to_path_buf();
        assert!(dir.is_dir());
        assert_eq!(dir.file_name().unwrap(), "person_-1_1");
    }
}

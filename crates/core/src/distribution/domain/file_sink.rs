use std::io;
use std::path::Path;

/// Filesystem side effects of distribution.
pub trait FileSink: Send + Sync {
    /// Creates `dir` and any missing parents. Succeeds if it already exists.
    fn ensure_dir(&self, dir: &Path) -> io::Result<()>;

    /// Copies `src` to `dst`, replacing `dst` if present. Returns bytes written.
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64>;
}

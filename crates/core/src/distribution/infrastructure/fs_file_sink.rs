use std::fs;
use std::io;
use std::path::Path;

use crate::distribution::domain::file_sink::FileSink;

/// [`FileSink`] backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileSink;

impl FsFileSink {
    pub fn new() -> Self {
        Self
    }
}

impl FileSink for FsFileSink {
    fn ensure_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<u64> {
        fs::copy(src, dst)
    }
}

use std::fmt;

/// Counts reported at the end of a sorting run.
///
/// Every scanned image lands in exactly one of `duplicates`, `unreadable`,
/// `no_face`, `extraction_failures` or `faces`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scanned: usize,
    pub duplicates: usize,
    pub unreadable: usize,
    pub no_face: usize,
    pub extraction_failures: usize,
    /// Images that reached clustering.
    pub faces: usize,
    /// Dense identity groups (noise excluded).
    pub groups: usize,
    pub noise: usize,
    /// `person_*` directories written, noise directories included.
    pub output_folders: usize,
    pub copied: usize,
    pub copy_failures: usize,
}

impl RunSummary {
    /// `true` if no scanned image is unaccounted for.
    pub fn is_balanced(&self) -> bool {
        self.scanned
            == self.duplicates + self.unreadable + self.no_face + self.extraction_failures + self.faces
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Images scanned:       {}", self.scanned)?;
        writeln!(f, "Duplicates skipped:   {}", self.duplicates)?;
        writeln!(f, "Unreadable:           {}", self.unreadable)?;
        writeln!(f, "No face found:        {}", self.no_face)?;
        writeln!(f, "Extraction failures:  {}", self.extraction_failures)?;
        writeln!(f, "Groups:               {}", self.groups)?;
        writeln!(f, "Noise images:         {}", self.noise)?;
        writeln!(f, "Output folders:       {}", self.output_folders)?;
        writeln!(f, "Files copied:         {}", self.copied)?;
        write!(f, "Copy failures:        {}", self.copy_failures)
    }
}

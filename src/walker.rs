//! Directory traversal
//!
//! Lazy walk over regular files with per-file failures converted to
//! `Unreadable` reports at the boundary, so one bad file never aborts a
//! batch. Symlinks are not followed.

use std::path::{Path, PathBuf};

use rayon::iter::{ParallelBridge, ParallelIterator};
use walkdir::WalkDir;

use crate::detector::{Detector, FileReport};
use crate::error::ScanError;

/// Iterator over the regular files under a root
///
/// Restartable by constructing a new walker; consumers cancel by simply
/// not pulling the next entry.
pub struct FileWalker {
    entries: walkdir::IntoIter,
}

impl FileWalker {
    pub fn new(root: impl AsRef<Path>, recursive: bool) -> Self {
        let mut walk = WalkDir::new(root).follow_links(false).min_depth(1);
        if !recursive {
            walk = walk.max_depth(1);
        }
        Self {
            entries: walk.into_iter(),
        }
    }
}

impl Iterator for FileWalker {
    type Item = Result<PathBuf, walkdir::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.entries.next()? {
                Ok(entry) => {
                    if entry.file_type().is_file() {
                        return Some(Ok(entry.into_path()));
                    }
                    // directories and special files are skipped
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl Detector {
    /// Analyzes every regular file under `root` in parallel
    ///
    /// The walk fans out over the rayon pool (bounded workers), unreadable
    /// files land in the output as `Unreadable` reports, and the result is
    /// sorted by path so repeated scans are comparable.
    pub fn detect_directory(
        &self,
        root: impl AsRef<Path>,
        recursive: bool,
    ) -> Result<Vec<FileReport>, ScanError> {
        let root = root.as_ref();
        let metadata = std::fs::metadata(root)?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut reports: Vec<FileReport> = FileWalker::new(root, recursive)
            .par_bridge()
            .map(|entry| self.report_for(root, entry))
            .collect();
        reports.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::info!(
            "scanned {} files under {} ({})",
            reports.len(),
            root.display(),
            if recursive { "recursive" } else { "top level" }
        );
        Ok(reports)
    }

    /// Sequential, lazy variant of [`Detector::detect_directory`]
    ///
    /// Yields reports as the walk produces paths; dropping the iterator
    /// stops the scan.
    pub fn detect_directory_iter<'a>(
        &'a self,
        root: impl AsRef<Path>,
        recursive: bool,
    ) -> impl Iterator<Item = FileReport> + 'a {
        let root = root.as_ref().to_path_buf();
        let walker = FileWalker::new(&root, recursive);
        walker.map(move |entry| self.report_for(&root, entry))
    }

    fn report_for(&self, root: &Path, entry: Result<PathBuf, walkdir::Error>) -> FileReport {
        match entry {
            Ok(path) => self.detect_file(&path).unwrap_or_else(|e| {
                tracing::warn!("skipping unreadable file {}: {}", path.display(), e.source);
                FileReport::unreadable(path, e.source.to_string())
            }),
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                tracing::warn!("walk error at {}: {e}", path.display());
                FileReport::unreadable(path, e.to_string())
            }
        }
    }
}

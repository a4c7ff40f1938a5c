//! Detection engine
//!
//! Resolves the best-matching signature for a byte prefix and classifies
//! the outcome against the extension claimed by the file name. The engine
//! is read-only: it reads a bounded header prefix and never writes, moves
//! or executes the target, so it is safe to point at hostile input.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::database::SignatureDatabase;
use crate::error::FileUnreadable;
use crate::signature::{Confidence, Signature, canonical_extension};

/// Default upper bound on header bytes read per file
pub const DEFAULT_MAX_READ_BYTES: usize = 8192;

/// Metadata copied from the winning signature entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedType {
    /// Canonical extension implied by the signature
    pub extension: String,
    pub description: String,
    pub mime_type: String,
    pub confidence: Confidence,
}

impl DetectedType {
    fn from_signature(sig: &Signature) -> Self {
        Self {
            extension: sig.extension().to_string(),
            description: sig.description().to_string(),
            mime_type: sig.mime_type().to_string(),
            confidence: Confidence::from_pattern_len(sig.pattern().len()),
        }
    }
}

/// Outcome of classifying one file
///
/// Closed set of cases so callers can handle every outcome exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// A signature matched and agrees with the claimed extension, or the
    /// file claimed nothing
    Matched(DetectedType),
    /// A signature matched but disagrees with the claimed extension
    Mismatched(DetectedType),
    /// No signature matched; absence of information is not evidence of
    /// disguise, so this never counts as a mismatch
    Unknown,
    /// The header bytes could not be obtained
    Unreadable { error: String },
}

/// Result of analyzing a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    /// Byte length of the file (prefix length for in-memory detection)
    pub file_size: u64,
    /// Extension parsed from the file name, lowercase, aliases folded
    pub claimed_extension: Option<String>,
    pub detection: Detection,
}

impl FileReport {
    pub(crate) fn unreadable(path: PathBuf, error: String) -> Self {
        let claimed_extension = claimed_extension_of(&path);
        Self {
            path,
            file_size: 0,
            claimed_extension,
            detection: Detection::Unreadable { error },
        }
    }

    /// Canonical extension implied by the best match, if any
    pub fn detected_extension(&self) -> Option<&str> {
        match &self.detection {
            Detection::Matched(info) | Detection::Mismatched(info) => Some(&info.extension),
            Detection::Unknown | Detection::Unreadable { .. } => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match &self.detection {
            Detection::Matched(info) | Detection::Mismatched(info) => Some(&info.description),
            Detection::Unknown | Detection::Unreadable { .. } => None,
        }
    }

    pub fn mime_type(&self) -> Option<&str> {
        match &self.detection {
            Detection::Matched(info) | Detection::Mismatched(info) => Some(&info.mime_type),
            Detection::Unknown | Detection::Unreadable { .. } => None,
        }
    }

    pub fn confidence(&self) -> Confidence {
        match &self.detection {
            Detection::Matched(info) | Detection::Mismatched(info) => info.confidence,
            Detection::Unknown | Detection::Unreadable { .. } => Confidence::Unknown,
        }
    }

    /// True when the claimed extension disagrees with the detected type
    pub fn is_mismatch(&self) -> bool {
        matches!(self.detection, Detection::Mismatched(_))
    }

    pub fn is_unreadable(&self) -> bool {
        matches!(self.detection, Detection::Unreadable { .. })
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &self.detection {
            Detection::Matched(_) => "match",
            Detection::Mismatched(_) => "MISMATCH",
            Detection::Unknown => "unknown",
            Detection::Unreadable { .. } => "unreadable",
        };
        writeln!(f, "File:       {}", self.path.display())?;
        writeln!(f, "Status:     {status}")?;
        match &self.claimed_extension {
            Some(ext) => writeln!(f, "Claimed:    .{ext}")?,
            None => writeln!(f, "Claimed:    (none)")?,
        }
        match &self.detection {
            Detection::Matched(info) | Detection::Mismatched(info) => {
                writeln!(f, "Detected:   .{} ({})", info.extension, info.description)?;
                writeln!(f, "MIME type:  {}", info.mime_type)?;
                writeln!(f, "Confidence: {}", info.confidence)?;
            }
            Detection::Unknown => {
                writeln!(f, "Detected:   unknown")?;
            }
            Detection::Unreadable { error } => {
                writeln!(f, "Error:      {error}")?;
            }
        }
        write!(f, "Size:       {} bytes", self.file_size)
    }
}

/// Detects file types from magic numbers and flags extension mismatches
///
/// Each detection is a pure function of (database, byte prefix, claimed
/// name); many detectors or worker threads may share one database through
/// the `Arc`.
#[derive(Debug, Clone)]
pub struct Detector {
    database: Arc<SignatureDatabase>,
    max_read_bytes: usize,
}

impl Detector {
    /// Creates a detector bound to the given database
    pub fn new(database: Arc<SignatureDatabase>) -> Self {
        Self {
            database,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
        }
    }

    /// Overrides the header-read bound
    pub fn with_max_read_bytes(mut self, max_read_bytes: usize) -> Self {
        self.max_read_bytes = max_read_bytes;
        self
    }

    pub fn database(&self) -> &SignatureDatabase {
        &self.database
    }

    pub fn max_read_bytes(&self) -> usize {
        self.max_read_bytes
    }

    /// Classifies an in-memory header prefix against a claimed file name
    pub fn detect_bytes(&self, prefix: &[u8], claimed_name: &str) -> FileReport {
        let path = PathBuf::from(claimed_name);
        let claimed_extension = claimed_extension_of(&path);
        let detection = self.classify(prefix, claimed_extension.as_deref());
        FileReport {
            path,
            file_size: prefix.len() as u64,
            claimed_extension,
            detection,
        }
    }

    /// Analyzes a file on disk, reading at most `max_read_bytes` of header
    pub fn detect_file(&self, path: impl AsRef<Path>) -> Result<FileReport, FileUnreadable> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)
            .map_err(|e| FileUnreadable::new(path, e))?;
        if !metadata.is_file() {
            return Err(FileUnreadable::new(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let prefix = self.read_prefix(path)?;
        let claimed_extension = claimed_extension_of(path);
        let detection = self.classify(&prefix, claimed_extension.as_deref());

        Ok(FileReport {
            path: path.to_path_buf(),
            file_size: metadata.len(),
            claimed_extension,
            detection,
        })
    }

    fn read_prefix(&self, path: &Path) -> Result<Vec<u8>, FileUnreadable> {
        let file = File::open(path).map_err(|e| FileUnreadable::new(path, e))?;
        let mut prefix = Vec::with_capacity(self.max_read_bytes.min(DEFAULT_MAX_READ_BYTES));
        file.take(self.max_read_bytes as u64)
            .read_to_end(&mut prefix)
            .map_err(|e| FileUnreadable::new(path, e))?;
        if prefix.is_empty() {
            return Err(FileUnreadable::new(
                path,
                io::Error::new(io::ErrorKind::UnexpectedEof, "empty file"),
            ));
        }
        Ok(prefix)
    }

    fn classify(&self, prefix: &[u8], claimed: Option<&str>) -> Detection {
        let Some(winner) = self.best_match(prefix) else {
            return Detection::Unknown;
        };
        let info = DetectedType::from_signature(winner);
        match claimed {
            Some(claimed) if claimed != canonical_extension(&info.extension) => {
                Detection::Mismatched(info)
            }
            _ => Detection::Matched(info),
        }
    }

    /// Picks the winning candidate: longest pattern, then smallest offset,
    /// then first-inserted. Total order, so results are reproducible for a
    /// fixed database.
    fn best_match(&self, prefix: &[u8]) -> Option<&Signature> {
        let winner = self
            .database
            .candidates(prefix)
            .into_iter()
            .min_by_key(|(index, sig)| {
                (std::cmp::Reverse(sig.pattern().len()), sig.offset(), *index)
            })
            .map(|(_, sig)| sig)?;
        tracing::debug!(
            "best match: {} ({} candidate bytes at offset {})",
            winner.extension(),
            winner.pattern().len(),
            winner.offset()
        );
        Some(winner)
    }
}

/// Extension claimed by a file name, canonicalized; None when the name
/// carries no extension
pub(crate) fn claimed_extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(canonical_extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;

    fn detector() -> Detector {
        Detector::new(Arc::new(SignatureDatabase::new()))
    }

    #[test]
    fn test_pdf_disguised_as_exe() {
        let report = detector().detect_bytes(&[0x25, 0x50, 0x44, 0x46, 0x2D], "fake.exe");
        assert_eq!(report.detected_extension(), Some("pdf"));
        assert_eq!(report.claimed_extension.as_deref(), Some("exe"));
        assert!(report.is_mismatch());
        assert_eq!(report.confidence(), Confidence::High);
    }

    #[test]
    fn test_exe_claimed_as_exe() {
        let report = detector().detect_bytes(&[0x4D, 0x5A, 0x90, 0x00], "app.exe");
        assert_eq!(report.detected_extension(), Some("exe"));
        assert!(!report.is_mismatch());
        assert_eq!(report.confidence(), Confidence::Medium);
    }

    #[test]
    fn test_unknown_bytes_never_mismatch() {
        let report = detector().detect_bytes(&[0x00, 0x01, 0x02, 0x03], "data.bin");
        assert_eq!(report.detection, Detection::Unknown);
        assert_eq!(report.detected_extension(), None);
        assert!(!report.is_mismatch());
        assert_eq!(report.confidence(), Confidence::Unknown);
    }

    #[test]
    fn test_longest_pattern_wins() {
        let mut db = SignatureDatabase::empty();
        db.add(Signature::new([0xFF], "x", "one-byte marker")).unwrap();
        db.add(Signature::new([0xFF, 0xD8, 0xFF], "jpg", "JPEG image"))
            .unwrap();
        db.build_matcher();
        let detector = Detector::new(Arc::new(db));

        let report = detector.detect_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], "photo.jpg");
        assert_eq!(report.detected_extension(), Some("jpg"));
    }

    #[test]
    fn test_smaller_offset_breaks_length_tie() {
        let mut db = SignatureDatabase::empty();
        db.add(Signature::new(*b"ABCD", "far", "later anchor").with_offset(4))
            .unwrap();
        db.add(Signature::new(*b"ABCD", "near", "earlier anchor"))
            .unwrap();
        db.build_matcher();
        let detector = Detector::new(Arc::new(db));

        let report = detector.detect_bytes(b"ABCDABCD", "x.bin");
        assert_eq!(report.detected_extension(), Some("near"));
    }

    #[test]
    fn test_stale_matcher_resolves_identically() {
        let mut db = SignatureDatabase::empty();
        db.add(Signature::new(*b"AB", "short", "two bytes")).unwrap();
        db.add(Signature::new(*b"ABCD", "long", "four bytes")).unwrap();
        // matcher left unbuilt: candidate lookup takes the linear path
        let linear = Detector::new(Arc::new(db)).detect_bytes(b"ABCDXX", "x.bin");

        let mut db = SignatureDatabase::empty();
        db.add(Signature::new(*b"AB", "short", "two bytes")).unwrap();
        db.add(Signature::new(*b"ABCD", "long", "four bytes")).unwrap();
        db.build_matcher();
        let indexed = Detector::new(Arc::new(db)).detect_bytes(b"ABCDXX", "x.bin");

        assert_eq!(linear, indexed);
        assert_eq!(indexed.detected_extension(), Some("long"));
    }

    #[test]
    fn test_offset_pattern_does_not_slide() {
        // mp4 requires "ftyp" at offset 4, not at the start
        let report = detector().detect_bytes(b"ftyp\x00\x00\x00\x18", "clip.mp4");
        assert_eq!(report.detection, Detection::Unknown);

        let report = detector().detect_bytes(b"\x00\x00\x00\x18ftypisom", "clip.mp4");
        assert_eq!(report.detected_extension(), Some("mp4"));
        assert!(!report.is_mismatch());
    }

    #[test]
    fn test_alias_claim_is_not_a_mismatch() {
        let report = detector().detect_bytes(&[0xFF, 0xD8, 0xFF, 0xE0], "photo.jpeg");
        assert_eq!(report.detected_extension(), Some("jpg"));
        assert_eq!(report.claimed_extension.as_deref(), Some("jpg"));
        assert!(!report.is_mismatch());
    }

    #[test]
    fn test_container_family_claim_is_not_a_mismatch() {
        let report = detector().detect_bytes(&[0x50, 0x4B, 0x03, 0x04], "report.docx");
        assert_eq!(report.detected_extension(), Some("zip"));
        assert!(!report.is_mismatch());
    }

    #[test]
    fn test_no_claimed_extension_is_not_a_mismatch() {
        let report = detector().detect_bytes(&[0x25, 0x50, 0x44, 0x46], "README");
        assert_eq!(report.claimed_extension, None);
        assert_eq!(report.detected_extension(), Some("pdf"));
        assert!(!report.is_mismatch());
    }

    #[test]
    fn test_riff_forms_disambiguated() {
        let wav = detector().detect_bytes(b"RIFF\x24\x00\x00\x00WAVEfmt ", "tone.wav");
        assert_eq!(wav.detected_extension(), Some("wav"));
        assert!(!wav.is_mismatch());

        let webp = detector().detect_bytes(b"RIFF\x24\x00\x00\x00WEBPVP8 ", "pic.wav");
        assert_eq!(webp.detected_extension(), Some("webp"));
        assert!(webp.is_mismatch());
    }

    #[test]
    fn test_detection_is_deterministic() {
        let detector = detector();
        let prefix = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        let first = detector.detect_bytes(&prefix, "a.zip");
        for _ in 0..10 {
            assert_eq!(detector.detect_bytes(&prefix, "a.zip"), first);
        }
    }

    #[test]
    fn test_display_carries_mismatch_marker() {
        let report = detector().detect_bytes(&[0x25, 0x50, 0x44, 0x46, 0x2D], "fake.exe");
        let rendered = report.to_string();
        assert!(rendered.contains("MISMATCH"));
        assert!(rendered.contains(".pdf"));
        assert!(rendered.contains(".exe"));
    }
}

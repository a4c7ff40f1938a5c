//! Signature entry model
//!
//! A signature is the magic byte pattern identifying a file format, the
//! offset at which it must appear, and the metadata reported on a match.

use std::fmt;

/// MIME type reported for entries that do not declare one
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file signature (magic number) with its associated metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The byte pattern that identifies the file type
    pattern: Vec<u8>,
    /// Position in the file where the pattern must appear
    offset: usize,
    /// Canonical extension this signature implies, lowercase, no dot
    extension: String,
    /// Human-readable label
    description: String,
    /// MIME type of the file
    mime_type: String,
}

impl Signature {
    /// Creates a new signature anchored at offset 0
    pub fn new(
        pattern: impl Into<Vec<u8>>,
        extension: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let pattern = pattern.into();
        debug_assert!(!pattern.is_empty(), "signature pattern must be non-empty");
        Self {
            pattern,
            offset: 0,
            extension: normalize_extension(&extension.into()),
            description: description.into(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }

    /// Anchors the pattern at a custom byte offset
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Minimum prefix length needed to test this entry
    pub fn required_len(&self) -> usize {
        self.offset + self.pattern.len()
    }

    /// Checks whether the prefix carries this pattern at the required offset
    ///
    /// A prefix shorter than `required_len` is ineligible, not an error.
    pub fn matches(&self, prefix: &[u8]) -> bool {
        if prefix.len() < self.required_len() {
            return false;
        }
        &prefix[self.offset..self.offset + self.pattern.len()] == self.pattern.as_slice()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} -> .{} ({})",
            hex::encode_upper(&self.pattern),
            self.offset,
            self.extension,
            self.description
        )
    }
}

/// Qualitative strength of a match, derived from matched pattern length
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    Unknown,
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Tier for a winning pattern of the given length
    pub fn from_pattern_len(len: usize) -> Self {
        match len {
            0 => Confidence::Unknown,
            1 => Confidence::Low,
            2..=3 => Confidence::Medium,
            _ => Confidence::High,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Unknown => "UNKNOWN",
            Confidence::Low => "LOW",
            Confidence::Medium => "MEDIUM",
            Confidence::High => "HIGH",
        };
        write!(f, "{label}")
    }
}

/// Lowercases an extension and strips a leading dot
pub(crate) fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Folds extension aliases to a canonical form for comparison
///
/// Container-family extensions collapse onto the extension of the shared
/// signature entry, so a `.docx` claim agrees with a detected ZIP header
/// instead of being flagged as disguised.
pub fn canonical_extension(ext: &str) -> String {
    let ext = normalize_extension(ext);
    match ext.as_str() {
        "jpeg" | "jfif" => "jpg".to_string(),
        "tif" => "tiff".to_string(),
        "htm" => "html".to_string(),
        "mpeg" => "mpg".to_string(),
        "docx" | "xlsx" | "pptx" | "jar" | "apk" => "zip".to_string(),
        "xls" | "ppt" => "doc".to_string(),
        _ => ext,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_at_start() {
        let sig = Signature::new(*b"%PDF", "pdf", "PDF document");
        assert!(sig.matches(b"%PDF-1.7"));
        assert!(!sig.matches(b"PDF%-1.7"));
    }

    #[test]
    fn test_matches_respects_offset() {
        let sig = Signature::new(*b"WEBP", "webp", "WebP image").with_offset(8);
        assert!(sig.matches(b"RIFF\x10\x00\x00\x00WEBPVP8 "));
        // same bytes at position 0 must not match
        assert!(!sig.matches(b"WEBP\x10\x00\x00\x00RIFFVP8 "));
    }

    #[test]
    fn test_short_prefix_is_ineligible() {
        let sig = Signature::new(*b"WEBP", "webp", "WebP image").with_offset(8);
        assert!(!sig.matches(b"RIFF\x10\x00"));
        assert_eq!(sig.required_len(), 12);
    }

    #[test]
    fn test_extension_normalized_on_construction() {
        let sig = Signature::new(*b"MZ", ".EXE", "Windows executable");
        assert_eq!(sig.extension(), "exe");
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(Confidence::from_pattern_len(0), Confidence::Unknown);
        assert_eq!(Confidence::from_pattern_len(1), Confidence::Low);
        assert_eq!(Confidence::from_pattern_len(2), Confidence::Medium);
        assert_eq!(Confidence::from_pattern_len(3), Confidence::Medium);
        assert_eq!(Confidence::from_pattern_len(4), Confidence::High);
        assert_eq!(Confidence::from_pattern_len(16), Confidence::High);
        assert!(Confidence::High > Confidence::Medium);
    }

    #[test]
    fn test_canonical_extension_folds_aliases() {
        assert_eq!(canonical_extension("jpeg"), "jpg");
        assert_eq!(canonical_extension(".JPG"), "jpg");
        assert_eq!(canonical_extension("htm"), "html");
        assert_eq!(canonical_extension("tif"), "tiff");
        assert_eq!(canonical_extension("docx"), "zip");
        assert_eq!(canonical_extension("pdf"), "pdf");
    }
}

//! Signature database
//!
//! Insertion-ordered collection of signatures with an Aho-Corasick index
//! for candidate lookup, plus the JSON exchange format used to ship
//! custom signature sets.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};

use crate::builtin::builtin_signatures;
use crate::error::DatabaseError;
use crate::signature::{DEFAULT_MIME_TYPE, Signature, normalize_extension};

/// Version written into exported exchange records
pub const EXCHANGE_VERSION: &str = "1.0";

const SUPPORTED_MAJOR_VERSION: &str = "1";

/// Database of known file signatures
///
/// Entries keep their insertion order, which breaks ties during best-match
/// resolution, so candidate lookup must stay deterministic across runs.
/// Construction and merging happen before any detection pass; detectors
/// only ever borrow the database read-only.
#[derive(Debug)]
pub struct SignatureDatabase {
    signatures: Vec<Signature>,
    /// Aho-Corasick automaton over all patterns; pattern i maps to
    /// signatures[i]. None after a mutation, until the next rebuild.
    matcher: Option<AhoCorasick>,
    /// Longest `required_len` over all entries, bounds the scanned window
    max_required: usize,
}

impl SignatureDatabase {
    /// Creates an empty database
    pub fn empty() -> Self {
        Self {
            signatures: Vec::new(),
            matcher: None,
            max_required: 0,
        }
    }

    /// Creates a database holding the built-in signature set
    pub fn new() -> Self {
        let mut db = Self::empty();
        for sig in builtin_signatures() {
            // the builtin table is unique by construction
            let _ = db.add(sig);
        }
        db.build_matcher();
        db
    }

    /// Inserts a signature entry
    ///
    /// Rejects entries whose `(pattern, offset)` pair is already present,
    /// so no signature can ever be matched twice.
    pub fn add(&mut self, signature: Signature) -> Result<(), DatabaseError> {
        if self
            .signatures
            .iter()
            .any(|s| s.pattern() == signature.pattern() && s.offset() == signature.offset())
        {
            return Err(DatabaseError::Duplicate {
                pattern: hex::encode_upper(signature.pattern()),
                offset: signature.offset(),
            });
        }
        self.signatures.push(signature);
        // stale until the next build_matcher call
        self.matcher = None;
        Ok(())
    }

    /// Builds the Aho-Corasick automaton from the registered patterns
    ///
    /// Candidate lookup falls back to a linear scan while the matcher is
    /// stale, so calling this is an optimization, not a requirement.
    pub fn build_matcher(&mut self) {
        let patterns: Vec<&[u8]> = self.signatures.iter().map(|s| s.pattern()).collect();
        self.matcher = if patterns.is_empty() {
            None
        } else {
            AhoCorasick::new(&patterns).ok()
        };
        self.max_required = self
            .signatures
            .iter()
            .map(|s| s.required_len())
            .max()
            .unwrap_or(0);
    }

    /// Read-only iterator over all entries in insertion order
    pub fn entries(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    /// All entries whose extension equals the normalized form of `ext`
    pub fn entries_for_extension(&self, ext: &str) -> Vec<&Signature> {
        let ext = normalize_extension(ext);
        self.signatures
            .iter()
            .filter(|s| s.extension() == ext)
            .collect()
    }

    /// Sorted set of extensions the database can detect
    pub fn supported_extensions(&self) -> BTreeSet<String> {
        self.signatures
            .iter()
            .map(|s| s.extension().to_string())
            .collect()
    }

    /// Appends another database's entries to this one
    ///
    /// With `replace_defaults` the current entries are discarded first.
    /// Entries duplicating an existing `(pattern, offset)` pair are skipped;
    /// later entries may shadow earlier ones of the same extension for
    /// display purposes, but both stay matchable.
    pub fn merge(&mut self, other: SignatureDatabase, replace_defaults: bool) {
        if replace_defaults {
            self.signatures.clear();
        }
        for sig in other.signatures {
            if let Err(DatabaseError::Duplicate { pattern, offset }) = self.add(sig) {
                tracing::debug!("merge skipped duplicate signature {pattern} at offset {offset}");
            }
        }
        self.build_matcher();
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Every entry whose pattern appears at that entry's own offset within
    /// the prefix, paired with its insertion index for tie-breaking
    pub(crate) fn candidates<'a>(&'a self, prefix: &[u8]) -> Vec<(usize, &'a Signature)> {
        let Some(matcher) = &self.matcher else {
            return self.candidates_linear(prefix);
        };

        // no pattern can satisfy its offset beyond the longest required span
        let window = &prefix[..prefix.len().min(self.max_required)];

        let mut found = Vec::new();
        for mat in matcher.find_overlapping_iter(window) {
            let index = mat.pattern().as_usize();
            let sig = &self.signatures[index];
            if mat.start() == sig.offset() {
                found.push((index, sig));
            }
        }
        found
    }

    fn candidates_linear<'a>(&'a self, prefix: &[u8]) -> Vec<(usize, &'a Signature)> {
        self.signatures
            .iter()
            .enumerate()
            .filter(|(_, s)| s.matches(prefix))
            .collect()
    }

    /// Builds a database from a parsed exchange record
    ///
    /// The import is all-or-nothing: any malformed entry fails the whole
    /// load before a single signature is inserted.
    pub fn from_record(record: DatabaseRecord) -> Result<Self, DatabaseError> {
        let major = record.version.split('.').next().unwrap_or("");
        if major != SUPPORTED_MAJOR_VERSION {
            return Err(DatabaseError::UnsupportedVersion(record.version));
        }

        let mut parsed = Vec::with_capacity(record.signatures.len());
        for entry in &record.signatures {
            parsed.push(entry.to_signature()?);
        }

        let mut db = if record.replace_defaults {
            Self::empty()
        } else {
            Self::new()
        };
        for sig in parsed {
            if let Err(DatabaseError::Duplicate { pattern, offset }) = db.add(sig) {
                tracing::debug!("import skipped duplicate signature {pattern} at offset {offset}");
            }
        }
        db.build_matcher();
        Ok(db)
    }

    /// Serializes the full entry set to an exchange record
    ///
    /// Exports set `replace_defaults`, so reloading reproduces this
    /// database's matching behavior exactly rather than merging it into
    /// the builtins again.
    pub fn to_record(&self) -> DatabaseRecord {
        DatabaseRecord {
            version: EXCHANGE_VERSION.to_string(),
            replace_defaults: true,
            signatures: self
                .signatures
                .iter()
                .map(SignatureRecord::from_signature)
                .collect(),
        }
    }

    /// Parses a database from exchange-record JSON
    pub fn from_json(json: &str) -> Result<Self, DatabaseError> {
        let record: DatabaseRecord = serde_json::from_str(json)
            .map_err(|e| DatabaseError::Malformed(format!("invalid database JSON: {e}")))?;
        Self::from_record(record)
    }

    /// Renders the exchange record as pretty-printed JSON
    pub fn to_json(&self) -> String {
        // record serialization has no fallible fields
        serde_json::to_string_pretty(&self.to_record()).expect("exchange record serializes")
    }

    /// Loads a database from a JSON file on disk
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Writes the database to a JSON file on disk
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), DatabaseError> {
        fs::write(path, self.to_json())?;
        Ok(())
    }
}

impl Default for SignatureDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted form of a single signature entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Hex-encoded pattern; spaces, dashes, colons and `0x`/`\x` prefixes
    /// are tolerated on input
    pub signature: String,
    pub extension: String,
    pub description: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl SignatureRecord {
    fn from_signature(sig: &Signature) -> Self {
        Self {
            signature: hex::encode_upper(sig.pattern()),
            extension: sig.extension().to_string(),
            description: sig.description().to_string(),
            offset: sig.offset(),
            mime_type: Some(sig.mime_type().to_string()),
        }
    }

    fn to_signature(&self) -> Result<Signature, DatabaseError> {
        let pattern = decode_pattern(&self.signature)?;
        if self.extension.trim().is_empty() {
            return Err(DatabaseError::Malformed(format!(
                "entry {:?} has an empty extension",
                self.signature
            )));
        }
        let mime = self
            .mime_type
            .clone()
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        Ok(Signature::new(pattern, self.extension.as_str(), self.description.as_str())
            .with_offset(self.offset)
            .with_mime_type(mime))
    }
}

/// Full exchange record: `{ version, replace_defaults, signatures }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseRecord {
    pub version: String,
    #[serde(default)]
    pub replace_defaults: bool,
    pub signatures: Vec<SignatureRecord>,
}

/// Decodes a hex pattern string, tolerating the separators seen in the
/// wild: "FF D8 FF", "FFD8FF", "0xFFD8FF", "\xFF\xD8\xFF", "FF-D8-FF"
fn decode_pattern(raw: &str) -> Result<Vec<u8>, DatabaseError> {
    let cleaned: String = raw
        .trim()
        .replace("0x", "")
        .replace("0X", "")
        .replace("\\x", "")
        .replace([' ', '-', ':'], "");
    if cleaned.is_empty() {
        return Err(DatabaseError::Malformed(format!(
            "entry {raw:?} has an empty signature pattern"
        )));
    }
    hex::decode(&cleaned)
        .map_err(|e| DatabaseError::Malformed(format!("entry {raw:?} is not valid hex: {e}")))
}

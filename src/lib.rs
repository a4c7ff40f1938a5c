mod builtin;
pub mod database;
pub mod detector;
pub mod error;
pub mod report;
pub mod signature;
pub mod walker;

pub use database::{DatabaseRecord, EXCHANGE_VERSION, SignatureDatabase, SignatureRecord};
pub use detector::{
    DEFAULT_MAX_READ_BYTES, DetectedType, Detection, Detector, FileReport,
};
pub use error::{DatabaseError, FileUnreadable, ScanError};
pub use report::{RatePolicy, ScanSummary, filter_mismatches, generate_report};
pub use signature::{Confidence, DEFAULT_MIME_TYPE, Signature, canonical_extension};
pub use walker::FileWalker;

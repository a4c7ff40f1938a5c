use std::sync::Arc;

use anyhow::Result;
use janus::{DatabaseError, Detector, Signature, SignatureDatabase};
use proptest::prelude::*;

#[test]
fn test_save_and_load_file_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("signatures.json");

    let db = SignatureDatabase::new();
    db.save_file(&path)?;
    let reloaded = SignatureDatabase::load_file(&path)?;
    assert_eq!(db.len(), reloaded.len());

    // identical matching behavior after the trip
    for probe in [
        b"%PDF-1.7".as_slice(),
        &[0xFF, 0xD8, 0xFF, 0xE0],
        &[0x50, 0x4B, 0x03, 0x04],
        &[0x00, 0x01, 0x02, 0x03],
    ] {
        let original = Detector::new(Arc::new(SignatureDatabase::from_json(&db.to_json())?))
            .detect_bytes(probe, "probe.exe");
        let restored = Detector::new(Arc::new(SignatureDatabase::from_json(&reloaded.to_json())?))
            .detect_bytes(probe, "probe.exe");
        assert_eq!(original, restored);
    }
    Ok(())
}

#[test]
fn test_load_file_missing_path() {
    let err = SignatureDatabase::load_file("/nonexistent/signatures.json").unwrap_err();
    assert!(matches!(err, DatabaseError::Io(_)));
}

#[test]
fn test_load_file_rejects_garbage() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("garbage.json");
    std::fs::write(&path, "not json at all")?;

    let err = SignatureDatabase::load_file(&path).unwrap_err();
    assert!(matches!(err, DatabaseError::Malformed(_)));
    Ok(())
}

proptest! {
    /// Export then reimport never changes what the database matches.
    #[test]
    fn prop_round_trip_preserves_matching(
        entries in proptest::collection::vec(
            (
                proptest::collection::vec(any::<u8>(), 1..6),
                0usize..8,
                "[a-z]{1,4}",
            ),
            1..12,
        ),
        probe in proptest::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut db = SignatureDatabase::empty();
        for (pattern, offset, ext) in entries {
            // duplicate (pattern, offset) pairs are rejected; skip them
            let _ = db.add(
                Signature::new(pattern, ext.as_str(), "generated").with_offset(offset),
            );
        }
        db.build_matcher();

        let reloaded = SignatureDatabase::from_json(&db.to_json()).unwrap();
        prop_assert_eq!(db.len(), reloaded.len());

        let original = Detector::new(Arc::new(db)).detect_bytes(&probe, "probe.bin");
        let restored = Detector::new(Arc::new(reloaded)).detect_bytes(&probe, "probe.bin");
        prop_assert_eq!(original, restored);
    }

    /// Detection is a pure function of (database, prefix, name).
    #[test]
    fn prop_detection_is_deterministic(probe in proptest::collection::vec(any::<u8>(), 0..64)) {
        let detector = Detector::new(Arc::new(SignatureDatabase::new()));
        let first = detector.detect_bytes(&probe, "sample.pdf");
        for _ in 0..3 {
            prop_assert_eq!(detector.detect_bytes(&probe, "sample.pdf"), first.clone());
        }
    }
}

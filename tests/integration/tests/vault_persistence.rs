//! Key durability integration tests.
//!
//! These tests verify that the master key generated on first run survives
//! on disk and that envelopes written by one vault instance are readable by
//! an independent instance over the same backing stores.

use backlog_integration_tests::file_only_vault;
use tempfile::TempDir;

#[test]
fn test_first_run_generates_key_and_round_trips() {
    let dir = TempDir::new().unwrap();
    let vault = file_only_vault(dir.path());

    let envelope = vault.encrypt("sk-test-12345").unwrap();
    assert!(envelope.len() > 24);
    assert_eq!(vault.decrypt(&envelope).unwrap(), "sk-test-12345");

    // First use must have persisted a 32-byte key file.
    let key_bytes = std::fs::read(dir.path().join("key.bin")).unwrap();
    assert_eq!(key_bytes.len(), 32);
}

#[test]
fn test_envelope_survives_process_restart() {
    let dir = TempDir::new().unwrap();

    let envelope = {
        let vault = file_only_vault(dir.path());
        vault.encrypt("durable-token").unwrap()
    };

    // Fresh in-memory state, same backing store.
    let vault = file_only_vault(dir.path());
    assert_eq!(vault.decrypt(&envelope).unwrap(), "durable-token");
}

#[test]
fn test_key_file_stable_across_instances() {
    let dir = TempDir::new().unwrap();

    file_only_vault(dir.path()).encrypt("a").unwrap();
    let first = std::fs::read(dir.path().join("key.bin")).unwrap();

    file_only_vault(dir.path()).encrypt("b").unwrap();
    let second = std::fs::read(dir.path().join("key.bin")).unwrap();

    assert_eq!(first, second, "an existing key must never be regenerated");
}

#[test]
fn test_preseeded_key_file_is_used_verbatim() {
    let known_key = [0x42u8; 32];

    // Two installations sharing nothing but the same key bytes.
    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    std::fs::write(dir_a.path().join("key.bin"), known_key).unwrap();
    std::fs::write(dir_b.path().join("key.bin"), known_key).unwrap();

    let envelope = file_only_vault(dir_a.path()).encrypt("portable").unwrap();
    let plaintext = file_only_vault(dir_b.path()).decrypt(&envelope).unwrap();
    assert_eq!(plaintext, "portable");
}

#[test]
fn test_try_decrypt_tolerates_mixed_history() {
    let dir = TempDir::new().unwrap();
    let vault = file_only_vault(dir.path());

    assert_eq!(vault.try_decrypt(""), "");
    assert_eq!(vault.try_decrypt("not-a-valid-envelope"), "not-a-valid-envelope");

    let envelope = vault.encrypt("encrypted-token").unwrap();
    assert_eq!(vault.try_decrypt(&envelope), "encrypted-token");
}

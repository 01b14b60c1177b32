//! Preferences save/load integration tests.
//!
//! Exercises the settings persistence path end to end: plain preferences,
//! encrypted credentials, and a legacy plaintext value in the same file.

use backlog_integration_tests::file_only_vault;
use backlog_secrets::prefs::keys;
use backlog_secrets::PreferencesStore;
use tempfile::TempDir;

fn store_at(dir: &TempDir) -> PreferencesStore {
    let vault = file_only_vault(&dir.path().join("keys"));
    PreferencesStore::new(dir.path().join("preferences.json"), vault)
}

#[tokio::test]
async fn test_settings_save_and_reload() {
    let dir = TempDir::new().unwrap();

    {
        let store = store_at(&dir);
        store
            .set_string(keys::JIRA_DOMAIN, "example.atlassian.net")
            .await
            .unwrap();
        store
            .set_string(keys::JIRA_USER, "dev@example.com")
            .await
            .unwrap();
        store
            .set_secret(keys::JIRA_TOKEN, "jira-api-token-123")
            .await
            .unwrap();
    }

    // Fresh store and vault over the same files.
    let store = store_at(&dir);
    assert_eq!(
        store.string(keys::JIRA_DOMAIN).await.unwrap(),
        "example.atlassian.net"
    );
    assert_eq!(
        store.string(keys::JIRA_USER).await.unwrap(),
        "dev@example.com"
    );
    assert_eq!(
        store.secret(keys::JIRA_TOKEN).await.unwrap().expose_secret(),
        "jira-api-token-123"
    );
}

#[tokio::test]
async fn test_preferences_file_is_json_without_plaintext_secrets() {
    let dir = TempDir::new().unwrap();
    let store = store_at(&dir);

    store
        .set_secret(keys::OPENAI_API_KEY, "sk-super-secret")
        .await
        .unwrap();
    store.set_string(keys::OPENAI_MODEL, "gpt-4o").await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join("preferences.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(parsed[keys::OPENAI_MODEL], "gpt-4o");
    assert!(!raw.contains("sk-super-secret"));
}

#[tokio::test]
async fn test_mixed_plaintext_and_encrypted_values() {
    let dir = TempDir::new().unwrap();
    let store = store_at(&dir);

    // A token written before encryption was introduced sits next to an
    // encrypted one; both must read back as plaintext.
    store
        .set_string(keys::JIRA_TOKEN, "legacy-plain-token")
        .await
        .unwrap();
    store
        .set_secret(keys::OPENAI_API_KEY, "sk-encrypted")
        .await
        .unwrap();

    assert_eq!(
        store.secret(keys::JIRA_TOKEN).await.unwrap().expose_secret(),
        "legacy-plain-token"
    );
    assert_eq!(
        store
            .secret(keys::OPENAI_API_KEY)
            .await
            .unwrap()
            .expose_secret(),
        "sk-encrypted"
    );
}

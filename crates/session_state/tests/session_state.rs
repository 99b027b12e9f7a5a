use session_state::{ProfileDocument, SessionStateError, SessionStore, UserSummary};

fn operator() -> UserSummary {
    UserSummary {
        id: "u-17".to_owned(),
        username: "ops".to_owned(),
        display_name: Some("Operations".to_owned()),
        role: Some("admin".to_owned()),
    }
}

#[test]
fn save_persists_user_but_never_the_token() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("profile.json");

    let store = SessionStore::load(&path).expect("load against missing file");
    store.login(operator(), "secret-token");
    store.save().expect("save profile");

    let raw = std::fs::read_to_string(&path).expect("read profile");
    assert!(!raw.contains("secret-token"));
    assert!(raw.contains("\"ops\""));

    let document: ProfileDocument = serde_json::from_str(&raw).expect("parse profile");
    assert_eq!(document.version, 1);
    assert_eq!(document.user, Some(operator()));
}

#[test]
fn reload_restores_user_but_requires_fresh_authentication() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("profile.json");

    let store = SessionStore::load(&path).expect("load");
    store.login(operator(), "secret-token");
    store.save().expect("save");

    let reloaded = SessionStore::load(&path).expect("reload");
    assert_eq!(reloaded.user(), Some(operator()));
    assert_eq!(reloaded.token(), None);
    assert!(!reloaded.is_authenticated());
}

#[test]
fn load_rejects_unsupported_profile_version() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("profile.json");
    std::fs::write(&path, r#"{"type":"profile","version":2,"user":null}"#).expect("write");

    let error = SessionStore::load(&path).expect_err("version 2 must be rejected");
    assert!(matches!(
        error,
        SessionStateError::UnsupportedVersion { found: 2, .. }
    ));
}

#[test]
fn load_rejects_profiles_with_unknown_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("profile.json");
    std::fs::write(
        &path,
        r#"{"type":"profile","version":1,"user":null,"access_token":"leaked"}"#,
    )
    .expect("write");

    let error = SessionStore::load(&path).expect_err("unknown fields must be rejected");
    assert!(matches!(error, SessionStateError::ProfileParse { .. }));
}

#[test]
fn in_memory_store_refuses_to_save() {
    let store = SessionStore::in_memory();
    let error = store.save().expect_err("no profile path configured");
    assert!(matches!(error, SessionStateError::MissingProfilePath));
}

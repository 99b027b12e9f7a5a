use std::sync::Arc;

use ops_console::{ConsoleClient, ConsoleConfig, NoopNavigator, UserSummary};

#[test]
fn client_defaults_to_an_unauthenticated_in_memory_session() {
    let client = ConsoleClient::new(
        ConsoleConfig::new("http://127.0.0.1:9"),
        Arc::new(NoopNavigator),
    )
    .expect("client construction");

    assert!(!client.session().is_authenticated());
    assert_eq!(client.session().token(), None);
    client.shutdown().expect("nothing to persist");
}

#[test]
fn client_restores_the_session_profile_across_restarts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let profile = dir.path().join("profile.json");
    let config = ConsoleConfig::new("http://127.0.0.1:9").with_profile_path(&profile);

    {
        let client = ConsoleClient::new(config.clone(), Arc::new(NoopNavigator))
            .expect("client construction");
        client
            .session()
            .login(UserSummary::new("u-1", "ops"), "ephemeral-token");
        client.shutdown().expect("profile saved");
    }

    let reopened =
        ConsoleClient::new(config, Arc::new(NoopNavigator)).expect("client construction");
    assert_eq!(
        reopened.session().user().map(|user| user.username),
        Some("ops".to_owned())
    );
    // the credential is never persisted; it comes back through a refresh
    assert_eq!(reopened.session().token(), None);
    assert!(!reopened.session().is_authenticated());
}

#[tokio::test]
async fn log_stream_spawns_idle_until_a_job_is_observed() {
    let client = ConsoleClient::new(
        ConsoleConfig::new("http://127.0.0.1:9"),
        Arc::new(NoopNavigator),
    )
    .expect("client construction");

    let stream = client.log_stream();
    let view = stream.view();
    assert!(view.entries.is_empty());
    assert_eq!(view.status, ops_console::StreamStatus::Idle);
}

//! Multi-account session flows against the fake API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use seller_console_client::{AuthError, FileStore, SessionStatus};
use seller_console_core::AccountId;
use seller_console_integration_tests::{FakeApi, Harness};
use serde_json::Value;

fn password() -> SecretString {
    SecretString::from("hunter22")
}

// =============================================================================
// Bearer Credential
// =============================================================================

#[tokio::test]
async fn test_requests_without_session_carry_no_credential() {
    let server = FakeApi::start().await;
    let harness = Harness::in_memory(&server);

    let _: Value = harness.api.get(&["api", "profile"]).await.unwrap();

    let seen = server.seen_at("/api/profile");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization, None);
}

#[tokio::test]
async fn test_requests_after_login_carry_active_token() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    let account = harness
        .session
        .login("alice@example.com", password())
        .await
        .unwrap();
    let _: Value = harness.api.get(&["api", "profile"]).await.unwrap();

    let seen = server.seen_at("/api/profile");
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some(format!("Bearer {}", account.token.expose_secret()).as_str())
    );
}

#[tokio::test]
async fn test_login_request_itself_has_no_credential() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    harness
        .session
        .login("alice@example.com", password())
        .await
        .unwrap();

    let seen = server.seen_at("/api/auth/login");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization, None);
}

// =============================================================================
// Multi-Account Scenario
// =============================================================================

#[tokio::test]
async fn test_two_accounts_switch_and_logout() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    let a = harness
        .session
        .login("alice@example.com", password())
        .await
        .unwrap();
    let b = harness
        .session
        .login("bob@example.com", password())
        .await
        .unwrap();
    assert_eq!(harness.session.accounts().len(), 2);
    assert_eq!(harness.session.active_account().unwrap().id, b.id);

    assert!(harness.session.switch_account(&a.id).unwrap());
    let _: Value = harness.api.get(&["api", "profile"]).await.unwrap();
    let last = server.seen().pop().unwrap();
    assert_eq!(
        last.authorization,
        Some(format!("Bearer {}", a.token.expose_secret()))
    );

    harness.session.logout().unwrap();
    assert!(matches!(harness.session.status(), SessionStatus::LoggedOut));
    assert_eq!(harness.session.accounts().len(), 2);

    let _: Value = harness.api.get(&["api", "profile"]).await.unwrap();
    assert_eq!(server.seen().pop().unwrap().authorization, None);
}

#[tokio::test]
async fn test_relogin_replaces_account_with_same_email() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    harness
        .session
        .login("alice@example.com", password())
        .await
        .unwrap();
    harness
        .session
        .login("bob@example.com", password())
        .await
        .unwrap();
    let again = harness
        .session
        .login("alice@example.com", password())
        .await
        .unwrap();

    let accounts = harness.session.accounts();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].id, again.id);
    assert_eq!(accounts[0].token.expose_secret(), "tok-alice@example.com-3");
    assert_eq!(server.login_count(), 3);
}

#[tokio::test]
async fn test_switch_to_unknown_account_changes_nothing() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    let a = harness
        .session
        .login("alice@example.com", password())
        .await
        .unwrap();
    let switched = harness
        .session
        .switch_account(&AccountId::new("no-such-account"))
        .unwrap();

    assert!(!switched);
    assert_eq!(harness.session.active_account().unwrap().id, a.id);
}

#[tokio::test]
async fn test_logout_all_forgets_everything() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    harness
        .session
        .login("alice@example.com", password())
        .await
        .unwrap();
    harness.session.logout_all().unwrap();

    assert!(harness.session.accounts().is_empty());
    assert!(harness.session.active_account().is_none());

    let fresh = Harness::over(&server, harness.kv.clone());
    assert!(fresh.session.accounts().is_empty());
}

// =============================================================================
// Login Failures
// =============================================================================

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    let err = harness
        .session
        .login("alice@example.com", SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Rejected(ref msg) if msg == "Invalid credentials"));
    assert!(harness.session.accounts().is_empty());
}

#[tokio::test]
async fn test_response_without_token_is_missing_token() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    let err = harness
        .session
        .login("notoken@example.com", password())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::MissingToken));
    assert!(harness.session.active_account().is_none());
}

#[tokio::test]
async fn test_malformed_email_never_reaches_server() {
    let server = FakeApi::start().await;
    let mut harness = Harness::in_memory(&server);

    let err = harness
        .session
        .login("not-an-email", password())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Validation(_)));
    assert!(server.seen_at("/api/auth/login").is_empty());
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_session_survives_restart_on_disk() {
    let server = FakeApi::start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let account = {
        let mut first = Harness::over(&server, Arc::new(FileStore::new(&path)));
        first
            .session
            .login("alice@example.com", password())
            .await
            .unwrap()
    };

    let second = Harness::over(&server, Arc::new(FileStore::new(&path)));
    let restored = second.session.active_account().unwrap();
    assert_eq!(restored.id, account.id);
    assert_eq!(restored.shop_name, "alice shop");
    assert!(restored.user.as_ref().unwrap().is_confirmed());

    let _: Value = second.api.get(&["api", "profile"]).await.unwrap();
    assert_eq!(
        server.seen().pop().unwrap().authorization,
        Some(format!("Bearer {}", account.token.expose_secret()))
    );
}

#[tokio::test]
async fn test_register_returns_temporary_password() {
    let server = FakeApi::start().await;
    let harness = Harness::in_memory(&server);

    let response = harness
        .session
        .register("Alice", "alice@example.com")
        .await
        .unwrap();

    assert_eq!(response.temporary_password, "Temp-1234");
    assert!(harness.session.accounts().is_empty());
}

use std::sync::mpsc::RecvTimeoutError;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gigboard_core::User;
use gigboard_engine::{
    AuthError, AuthOp, ColumnMap, EngineEvent, EngineHandle, FetchError, IdentityProvider,
    PageFetcher, SessionStore, TableReader,
};
use serde_json::{json, Value};

struct FakeIdentity {
    signed_in: Mutex<Option<User>>,
}

impl FakeIdentity {
    fn new() -> Self {
        Self {
            signed_in: Mutex::new(None),
        }
    }
}

fn alice() -> User {
    User {
        id: "u-1".to_string(),
        email: Some("alice@example.com".to_string()),
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in(&self, _email: &str, password: &str) -> Result<User, AuthError> {
        if password != "pw" {
            return Err(AuthError {
                kind: gigboard_engine::AuthFailureKind::Rejected,
                message: "Invalid login credentials".to_string(),
            });
        }
        *self.signed_in.lock().unwrap() = Some(alice());
        Ok(alice())
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<Option<User>, AuthError> {
        Ok(None)
    }

    async fn request_password_reset(&self, _email: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn update_password(&self, _new_password: &str) -> Result<(), AuthError> {
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.signed_in.lock().unwrap() = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.signed_in.lock().unwrap().clone())
    }

    async fn restore_session(&self, _access_token: &str) -> Result<User, AuthError> {
        Ok(alice())
    }
}

struct FakeTable {
    rows: Vec<Value>,
}

#[async_trait::async_trait]
impl TableReader for FakeTable {
    async fn query(
        &self,
        _table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>, FetchError> {
        Ok(self.rows.iter().skip(offset).take(limit).cloned().collect())
    }
}

fn handle() -> EngineHandle {
    let rows = ["A", "B", "C"]
        .iter()
        .map(|id| json!({ "UNIQUE_ID": id }))
        .collect();
    let pages = PageFetcher::new(
        Arc::new(FakeTable { rows }),
        "jobs",
        ColumnMap::default(),
    );
    EngineHandle::with_services(Arc::new(FakeIdentity::new()), pages, SessionStore::default())
}

fn next_event(handle: &EngineHandle) -> EngineEvent {
    handle
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[test]
fn sign_in_reports_completion_then_identity() {
    let handle = handle();
    handle.sign_in("alice@example.com", "pw");

    assert_eq!(
        next_event(&handle),
        EngineEvent::AuthCompleted {
            op: AuthOp::SignIn,
            result: Ok(()),
        }
    );
    assert_eq!(next_event(&handle), EngineEvent::IdentityChanged(Some(alice())));
}

#[test]
fn failed_sign_in_reports_only_error() {
    let handle = handle();
    handle.sign_in("alice@example.com", "wrong");

    match next_event(&handle) {
        EngineEvent::AuthCompleted {
            op: AuthOp::SignIn,
            result: Err(err),
        } => assert_eq!(err.message, "Invalid login credentials"),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        handle.recv_timeout(Duration::from_millis(100)),
        Err(RecvTimeoutError::Timeout)
    );
}

#[test]
fn fetch_page_reports_epoch_and_rows() {
    let handle = handle();
    handle.fetch_page(3, 1, 2, 2);

    match next_event(&handle) {
        EngineEvent::PageFetched {
            epoch,
            page_index,
            result: Ok(page),
        } => {
            assert_eq!((epoch, page_index), (3, 1));
            let ids: Vec<_> = page.records.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, vec!["C"]);
            assert!(page.is_last);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn sign_out_always_reports_logged_out_identity() {
    let handle = handle();
    handle.sign_out();

    assert_eq!(
        next_event(&handle),
        EngineEvent::AuthCompleted {
            op: AuthOp::SignOut,
            result: Ok(()),
        }
    );
    assert_eq!(next_event(&handle), EngineEvent::IdentityChanged(None));
}

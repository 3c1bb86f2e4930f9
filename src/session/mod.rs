mod bootstrap;
pub use bootstrap::Bootstrapper;

mod guard;
pub use guard::{Access, Requirement, RouteGuard};

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::api::types::{Token, User};
use crate::api::{IdentityApi, LoginSuccess};
use crate::common::{debug, warn};
use crate::config::storagekey;
use crate::storage::Storage;
use crate::Result;

/// Snapshot of the client held session.
///
/// `is_authenticated` holds only when both `user` and `token` are present
/// and the token was last confirmed by the service. `is_loading` is
/// transient and never persisted; it is set while the startup validation
/// is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<Token>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

// Durable shape of the session blob. `is_loading` deliberately absent.
#[derive(Serialize, Deserialize)]
struct PersistedSession {
    user: Option<User>,
    token: Option<Token>,
    is_authenticated: bool,
}

struct State {
    session: Session,
    revision: u64,
}

/// Sole owner of session state.
///
/// Every mutation goes through the operations below and is written
/// through to storage before it returns. The revision counter protects
/// against a superseded response being applied after a newer session
/// affecting operation has run.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
    state: Mutex<State>,
}

impl SessionStore {
    /// Restore the persisted session. A missing or corrupted blob is
    /// treated as no session. When a credential was restored the session
    /// starts in the loading state until `Bootstrapper::initialize`
    /// settles it.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let session = match storage.load(storagekey::SESSION) {
            Ok(Some(bytes)) => match decode(&bytes) {
                Ok(persisted) => {
                    let confirmed = persisted.is_authenticated
                        && persisted.user.is_some()
                        && persisted.token.is_some();
                    Session {
                        is_loading: persisted.token.is_some(),
                        is_authenticated: confirmed,
                        user: persisted.user,
                        token: persisted.token,
                    }
                }
                Err(err) => {
                    warn!(%err, "Corrupted session blob, starting unauthenticated");
                    Session::default()
                }
            },
            Ok(None) => Session::default(),
            Err(err) => {
                warn!(%err, "Session blob unreadable, starting unauthenticated");
                Session::default()
            }
        };

        Self {
            storage,
            state: Mutex::new(State {
                session,
                revision: 0,
            }),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.lock().unwrap().session.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.lock().unwrap().revision
    }

    pub(crate) fn set_loading(&self, loading: bool) {
        self.state.lock().unwrap().session.is_loading = loading;
    }

    /// Exchange credentials and populate the store. A failed exchange
    /// leaves the store untouched and surfaces the service's reason.
    pub async fn login(&self, api: &dyn IdentityApi, email: &str, password: &str) -> Result<Session> {
        let revision = self.revision();
        let LoginSuccess { user, token } = api.login(email, password).await?;

        self.apply_login(revision, user, token)
    }

    fn apply_login(&self, revision: u64, user: User, token: Token) -> Result<Session> {
        let mut state = self.state.lock().unwrap();
        if state.revision != revision {
            debug!("Discarding superseded login response");
            return Ok(state.session.clone());
        }

        // Stage and persist first; the live session only changes once the
        // write-through succeeded, so a storage failure leaves the store
        // untouched.
        let session = Session {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
            is_loading: false,
        };
        self.persist(&session)?;

        state.revision += 1;
        state.session = session;

        Ok(state.session.clone())
    }

    /// Best effort server notification, then an unconditional local clear.
    /// The clear happens even when the notification fails.
    pub async fn logout(&self, api: &dyn IdentityApi) -> Session {
        let token = self.snapshot().token;
        if let Some(token) = token {
            if let Err(err) = api.logout(&token).await {
                warn!(%err, "Logout notification failed");
            }
        }

        self.clear_session()
    }

    /// Drop user, token and the authenticated flag, locally and from
    /// storage. Idempotent.
    pub fn clear_session(&self) -> Session {
        let mut state = self.state.lock().unwrap();
        state.revision += 1;
        state.session = Session::default();
        if let Err(err) = self.storage.remove(storagekey::SESSION) {
            warn!(%err, "Failed to remove persisted session");
        }

        state.session.clone()
    }

    // Clear the running session but keep the stored blob, so the next
    // start can retry validation. Used when the identity check failed for
    // transport reasons rather than an actual rejection.
    pub(crate) fn clear_in_memory(&self) -> Session {
        let mut state = self.state.lock().unwrap();
        state.revision += 1;
        state.session = Session::default();

        state.session.clone()
    }

    /// Confirm the user owning the current token, marking the session
    /// authenticated.
    pub fn set_user(&self, user: User) -> Result<Session> {
        let revision = self.revision();
        self.apply_user(revision, user)
    }

    pub(crate) fn apply_user(&self, revision: u64, user: User) -> Result<Session> {
        let mut state = self.state.lock().unwrap();
        if state.revision != revision {
            debug!("Discarding superseded identity response");
            return Ok(state.session.clone());
        }

        let session = Session {
            is_authenticated: state.session.token.is_some(),
            user: Some(user),
            token: state.session.token.clone(),
            is_loading: state.session.is_loading,
        };
        self.persist(&session)?;

        state.revision += 1;
        state.session = session;

        Ok(state.session.clone())
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let blob = serde_json::to_vec(&PersistedSession {
            user: session.user.clone(),
            token: session.token.clone(),
            is_authenticated: session.is_authenticated,
        })
        .map_err(crate::common::Error::from)?;

        self.storage.store(storagekey::SESSION, &blob)
    }
}

fn decode(bytes: &[u8]) -> crate::common::Result<PersistedSession> {
    serde_json::from_slice(bytes).map_err(crate::common::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Role;
    use crate::storage::MemoryStorage;
    use crate::ClubError;

    // Accepts reads, refuses every write.
    struct FailingStorage;

    impl Storage for FailingStorage {
        fn load(&self, _key: &str) -> crate::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        fn store(&self, _key: &str, _value: &[u8]) -> crate::Result<()> {
            Err(ClubError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        fn remove(&self, _key: &str) -> crate::Result<()> {
            Ok(())
        }
    }

    fn user(role: &str) -> User {
        User {
            id: "u1".into(),
            name: "Arber".into(),
            email: "a@b.com".into(),
            role: Role::new(role),
        }
    }

    #[test]
    fn corrupted_blob_loads_as_empty_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.store(storagekey::SESSION, b"{not json").unwrap();

        let store = SessionStore::load(storage);
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn missing_blob_loads_as_empty_session() {
        let store = SessionStore::load(Arc::new(MemoryStorage::new()));
        let session = store.snapshot();

        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert!(session.token.is_none());
    }

    #[test]
    fn restored_credential_starts_loading() {
        let storage = Arc::new(MemoryStorage::new());
        let seeded = SessionStore::load(storage.clone());
        seeded
            .apply_login(0, user("member"), Token::new("t-1"))
            .unwrap();

        let store = SessionStore::load(storage);
        let session = store.snapshot();

        assert!(session.is_loading);
        assert_eq!(session.token, Some(Token::new("t-1")));
    }

    #[test]
    fn clear_session_is_idempotent_and_removes_blob() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::load(storage.clone());
        store
            .apply_login(0, user("member"), Token::new("t-1"))
            .unwrap();
        assert!(storage.load(storagekey::SESSION).unwrap().is_some());

        store.clear_session();
        store.clear_session();

        assert_eq!(store.snapshot(), Session::default());
        assert!(storage.load(storagekey::SESSION).unwrap().is_none());
    }

    #[test]
    fn clear_in_memory_keeps_blob() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::load(storage.clone());
        store
            .apply_login(0, user("member"), Token::new("t-1"))
            .unwrap();

        store.clear_in_memory();

        assert_eq!(store.snapshot(), Session::default());
        assert!(storage.load(storagekey::SESSION).unwrap().is_some());
    }

    #[test]
    fn storage_write_failure_leaves_store_untouched() {
        let store = SessionStore::load(Arc::new(FailingStorage));
        let revision = store.revision();

        let err = store
            .apply_login(revision, user("member"), Token::new("t-1"))
            .unwrap_err();

        assert!(matches!(err, ClubError::Io(_)));
        // The live session must not say logged in while durable state
        // says logged out.
        assert_eq!(store.snapshot(), Session::default());
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn storage_write_failure_keeps_confirmed_user_out() {
        let store = SessionStore::load(Arc::new(FailingStorage));

        let err = store.set_user(user("member")).unwrap_err();

        assert!(matches!(err, ClubError::Io(_)));
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn stale_login_response_is_discarded() {
        let store = SessionStore::load(Arc::new(MemoryStorage::new()));
        let revision = store.revision();

        // A newer session affecting operation runs before the response
        // from the earlier login arrives.
        store.clear_session();

        let session = store
            .apply_login(revision, user("member"), Token::new("t-stale"))
            .unwrap();

        assert!(!session.is_authenticated);
        assert!(session.token.is_none());
    }
}

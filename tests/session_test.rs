use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use clubctl::api::types::{Role, Token, User};
use clubctl::api::{IdentityApi, LoginSuccess};
use clubctl::session::{Access, Bootstrapper, Requirement, RouteGuard, SessionStore};
use clubctl::storage::{MemoryStorage, Storage};
use clubctl::{ClubError, Result};

const SESSION_KEY: &str = "session";

fn member() -> User {
    User {
        id: "u1".into(),
        name: "Arber".into(),
        email: "a@b.com".into(),
        role: Role::new("member"),
    }
}

/// Identity endpoint double with scripted outcomes.
#[derive(Default)]
struct ScriptedIdentity {
    // Some: credentials and tokens resolve to this user. None: rejected.
    user: Option<User>,
    transport_down: bool,
    logout_fails: bool,
    whoami_calls: AtomicUsize,
    // When set, login waits for a permit before answering.
    login_gate: Option<Arc<tokio::sync::Notify>>,
}

impl ScriptedIdentity {
    fn accepting(user: User) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    fn rejecting() -> Self {
        Self::default()
    }

    fn offline() -> Self {
        Self {
            transport_down: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl IdentityApi for ScriptedIdentity {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginSuccess> {
        if let Some(gate) = &self.login_gate {
            gate.notified().await;
        }
        if self.transport_down {
            return Err(ClubError::Transport {
                message: "offline".into(),
            });
        }
        match &self.user {
            Some(user) => Ok(LoginSuccess {
                user: user.clone(),
                token: Token::new("token-1"),
            }),
            None => Err(ClubError::Unauthenticated {
                message: "invalid email or password".into(),
            }),
        }
    }

    async fn logout(&self, _token: &Token) -> Result<()> {
        if self.logout_fails {
            Err(ClubError::Transport {
                message: "connection reset".into(),
            })
        } else {
            Ok(())
        }
    }

    async fn current_user(&self, _token: &Token) -> Result<User> {
        self.whoami_calls.fetch_add(1, Ordering::SeqCst);
        if self.transport_down {
            return Err(ClubError::Transport {
                message: "offline".into(),
            });
        }
        match &self.user {
            Some(user) => Ok(user.clone()),
            None => Err(ClubError::Unauthenticated {
                message: "token expired".into(),
            }),
        }
    }
}

// Log in against an accepting endpoint so the storage holds a session blob.
async fn seed_session(storage: Arc<MemoryStorage>) {
    let api = ScriptedIdentity::accepting(member());
    let store = SessionStore::load(storage);
    store.login(&api, "a@b.com", "secret1").await.unwrap();
}

#[test]
fn startup_without_token_makes_no_network_call() {
    tokio_test::block_on(async move {
        let api = Arc::new(ScriptedIdentity::accepting(member()));
        let store = Arc::new(SessionStore::load(Arc::new(MemoryStorage::new())));

        let session = Bootstrapper::new(store, api.clone()).initialize().await;

        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(api.whoami_calls.load(Ordering::SeqCst), 0);
    })
}

#[test]
fn startup_with_token_validates_exactly_once() {
    tokio_test::block_on(async move {
        let storage = Arc::new(MemoryStorage::new());
        seed_session(storage.clone()).await;

        let api = Arc::new(ScriptedIdentity::accepting(member()));
        let store = Arc::new(SessionStore::load(storage));
        assert!(store.snapshot().is_loading);

        let session = Bootstrapper::new(store, api.clone()).initialize().await;

        assert_eq!(api.whoami_calls.load(Ordering::SeqCst), 1);
        assert!(session.is_authenticated);
        assert!(!session.is_loading);
        assert_eq!(session.user, Some(member()));
    })
}

#[test]
fn rejected_token_clears_session_and_redirects() {
    tokio_test::block_on(async move {
        let storage = Arc::new(MemoryStorage::new());
        seed_session(storage.clone()).await;

        let api = Arc::new(ScriptedIdentity::rejecting());
        let store = Arc::new(SessionStore::load(storage.clone()));

        let session = Bootstrapper::new(store.clone(), api).initialize().await;

        assert!(!session.is_authenticated);
        assert!(session.token.is_none());
        // Actively rejected, so the blob is erased too.
        assert!(storage.load(SESSION_KEY).unwrap().is_none());

        let guard = RouteGuard::default();
        assert_eq!(
            guard.authorize(&store.snapshot(), "/donors", &Requirement::Authenticated),
            Access::Redirect {
                to: "/login".into(),
                from: "/donors".into(),
            }
        );
    })
}

#[test]
fn offline_bootstrap_is_unauthenticated_but_keeps_blob() {
    tokio_test::block_on(async move {
        let storage = Arc::new(MemoryStorage::new());
        seed_session(storage.clone()).await;

        let api = Arc::new(ScriptedIdentity::offline());
        let store = Arc::new(SessionStore::load(storage.clone()));

        let session = Bootstrapper::new(store, api).initialize().await;

        assert!(!session.is_authenticated);
        assert!(!session.is_loading);
        // The credential was never rejected; it survives for the next start.
        assert!(storage.load(SESSION_KEY).unwrap().is_some());
    })
}

#[test]
fn failed_login_leaves_store_untouched() {
    tokio_test::block_on(async move {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::load(storage.clone());
        let api = ScriptedIdentity::rejecting();

        let err = store.login(&api, "a@b.com", "wrong").await.unwrap_err();
        match err {
            ClubError::Unauthenticated { message } => {
                assert_eq!(message, "invalid email or password")
            }
            other => panic!("unexpected {:?}", other),
        }

        let session = store.snapshot();
        assert!(session.user.is_none());
        assert!(session.token.is_none());
        assert!(!session.is_authenticated);
        assert!(storage.load(SESSION_KEY).unwrap().is_none());
    })
}

#[test]
fn successful_login_populates_store() {
    tokio_test::block_on(async move {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::load(storage.clone());
        let api = ScriptedIdentity::accepting(member());

        let session = store.login(&api, "a@b.com", "secret1").await.unwrap();

        assert!(session.is_authenticated);
        assert_eq!(session.user, Some(member()));
        assert_eq!(session.token, Some(Token::new("token-1")));
        assert!(storage.load(SESSION_KEY).unwrap().is_some());
    })
}

#[test]
fn logout_clears_session_even_when_backend_fails() {
    tokio_test::block_on(async move {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::load(storage.clone());
        store
            .login(&ScriptedIdentity::accepting(member()), "a@b.com", "secret1")
            .await
            .unwrap();

        let failing = ScriptedIdentity {
            logout_fails: true,
            ..ScriptedIdentity::default()
        };
        let session = store.logout(&failing).await;

        assert!(!session.is_authenticated);
        assert!(session.user.is_none());
        assert!(session.token.is_none());
        assert!(storage.load(SESSION_KEY).unwrap().is_none());
    })
}

#[test]
fn superseded_login_response_is_discarded() {
    tokio_test::block_on(async move {
        let gate = Arc::new(tokio::sync::Notify::new());
        let api = Arc::new(ScriptedIdentity {
            user: Some(member()),
            login_gate: Some(gate.clone()),
            ..ScriptedIdentity::default()
        });
        let store = Arc::new(SessionStore::load(Arc::new(MemoryStorage::new())));

        let login = tokio::spawn({
            let store = store.clone();
            let api = api.clone();
            async move { store.login(api.as_ref(), "a@b.com", "secret1").await }
        });

        // Let the login capture its revision and block on the gate, then
        // run a newer session affecting operation before answering it.
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.clear_session();
        gate.notify_one();

        let session = login.await.unwrap().unwrap();

        assert!(!session.is_authenticated);
        assert!(session.token.is_none());
        assert!(store.snapshot().token.is_none());
    })
}

#[test]
fn moderator_is_denied_admin_region_without_redirect() {
    tokio_test::block_on(async move {
        let moderator = User {
            role: Role::new("moderator"),
            ..member()
        };
        let store = SessionStore::load(Arc::new(MemoryStorage::new()));
        store
            .login(
                &ScriptedIdentity::accepting(moderator),
                "a@b.com",
                "secret1",
            )
            .await
            .unwrap();

        let guard = RouteGuard::default();
        let access = guard.authorize(&store.snapshot(), "/admin", &Requirement::role("admin"));

        assert_eq!(access, Access::Deny);
    })
}

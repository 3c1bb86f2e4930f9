use std::sync::Arc;

use crate::api::IdentityApi;
use crate::common::{info, warn};
use crate::session::{Session, SessionStore};
use crate::ClubError;

/// One shot reconciliation of the persisted credential with server truth.
///
/// Runs before the first guard decision; the guard reports `Pending`
/// until the session settles. `initialize` consumes the bootstrapper, a
/// second run per application start is not defined behavior.
pub struct Bootstrapper {
    store: Arc<SessionStore>,
    api: Arc<dyn IdentityApi>,
}

impl Bootstrapper {
    pub fn new(store: Arc<SessionStore>, api: Arc<dyn IdentityApi>) -> Self {
        Self { store, api }
    }

    /// Validate the restored token, if any, against the identity
    /// endpoint. Fails closed: the session never stays authenticated
    /// without a confirmed user. With no restored token, no request is
    /// made at all.
    pub async fn initialize(self) -> Session {
        let token = match self.store.snapshot().token {
            Some(token) => token,
            None => {
                self.store.set_loading(false);
                return self.store.snapshot();
            }
        };

        self.store.set_loading(true);
        let revision = self.store.revision();

        match self.api.current_user(&token).await {
            Ok(user) => {
                info!(email = %user.email, "Session restored");
                if let Err(err) = self.store.apply_user(revision, user) {
                    warn!(%err, "Failed to persist restored session");
                }
            }
            Err(ClubError::Transport { message }) => {
                // The service was unreachable, which says nothing about
                // the credential. Unauthenticated for this run, but the
                // stored blob survives for the next start.
                warn!(%message, "Identity check unreachable");
                self.store.clear_in_memory();
            }
            Err(err) => {
                info!(%err, "Stored credential rejected");
                self.store.clear_session();
            }
        }

        self.store.set_loading(false);
        self.store.snapshot()
    }
}

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::fs;

use crate::api::HttpApi;
use crate::config::config::DEFAULT_DATA_DIR;
use crate::config::Config;
use crate::prefs::PreferenceStore;
use crate::session::{Bootstrapper, RouteGuard, Session, SessionStore};
use crate::storage::{FileStorage, Storage};

/// Wires configuration into the stores and the service client.
#[derive(Debug)]
pub struct Initializer {
    pub config: Config,
}

impl Initializer {
    pub async fn load_config_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let content = fs::read(path).await?;
        let config =
            serde_yaml::from_slice::<Config>(&content).map_err(crate::common::Error::from)?;

        Ok(Self { config })
    }

    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> crate::Result<AppContext> {
        let data_dir = self
            .config
            .storage
            .data_dir
            .unwrap_or_else(|| DEFAULT_DATA_DIR.into());
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(data_dir)?);

        let api = match self.config.api.timeout_milliseconds {
            Some(timeout) => {
                HttpApi::with_timeout(self.config.api.endpoint, Duration::from_millis(timeout))?
            }
            None => HttpApi::new(self.config.api.endpoint)?,
        };

        Ok(AppContext::new(storage, Arc::new(api)))
    }
}

/// Explicit context passed to every command in place of store
/// singletons. Tests assemble their own from in-memory parts.
pub struct AppContext {
    pub session: Arc<SessionStore>,
    pub prefs: PreferenceStore,
    pub api: Arc<HttpApi>,
    pub guard: RouteGuard,
}

impl AppContext {
    pub fn new(storage: Arc<dyn Storage>, api: Arc<HttpApi>) -> Self {
        Self {
            session: Arc::new(SessionStore::load(storage.clone())),
            prefs: PreferenceStore::load(storage),
            api,
            guard: RouteGuard::default(),
        }
    }

    /// Run the startup validation. Called exactly once, before the first
    /// guard consultation.
    pub async fn bootstrap(&self) -> Session {
        Bootstrapper::new(self.session.clone(), self.api.clone())
            .initialize()
            .await
    }
}

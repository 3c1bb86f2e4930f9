mod initialize;
pub use initialize::{AppContext, Initializer};

mod config;
pub use config::{ApiConfig, Config, StorageConfig};

pub(crate) mod storagekey {
    pub const SESSION: &str = "session";
    pub const PREFERENCES: &str = "preferences";
}

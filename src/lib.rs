#![allow(clippy::module_inception)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod prefs;
pub mod session;
pub mod storage;

pub use crate::error::ClubError;
pub type Result<T, E = crate::error::ClubError> = std::result::Result<T, E>;

pub use api::types::{Role, Token, User};
pub use session::Session;

pub(crate) mod common {
    pub(crate) type Result<T, E = crate::error::internal::Error> = std::result::Result<T, E>;

    pub(crate) type Error = crate::error::internal::Error;

    pub use tracing::{debug, info, warn};
}

use async_trait::async_trait;

use crate::Result;

pub mod http;
pub mod types;

pub use http::HttpApi;
use types::{
    Announcement, DonationSettings, Donor, DonorRegistration, Event, HistoricalMoment, ListQuery,
    Page, Token, User,
};

/// Outcome of a successful credential exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginSuccess {
    pub user: User,
    pub token: Token,
}

/// Identity and session endpoints of the club service.
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// Exchange credentials for a user and bearer token. A rejected
    /// credential pair surfaces as `ClubError::Unauthenticated` carrying
    /// the service's human readable reason.
    async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess>;

    /// Invalidate the session server side.
    async fn logout(&self, token: &Token) -> Result<()>;

    /// Resolve the user owning `token`. Rejection of the token surfaces
    /// as `ClubError::Unauthenticated`.
    async fn current_user(&self, token: &Token) -> Result<User>;
}

/// Read endpoints for public content and the donor registry.
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn announcements(&self, query: &ListQuery) -> Result<Page<Announcement>>;
    async fn announcement(&self, id: &str) -> Result<Announcement>;

    async fn events(&self, query: &ListQuery) -> Result<Page<Event>>;
    async fn event(&self, id: &str) -> Result<Event>;

    async fn moments(&self, query: &ListQuery) -> Result<Page<HistoricalMoment>>;
    async fn moment(&self, id: &str) -> Result<HistoricalMoment>;

    async fn donation_settings(&self) -> Result<DonationSettings>;

    // The donor registry is only readable with a session.
    async fn donors(&self, token: &Token, query: &ListQuery) -> Result<Page<Donor>>;
    async fn register_donor(&self, token: &Token, registration: &DonorRegistration)
        -> Result<Donor>;
}

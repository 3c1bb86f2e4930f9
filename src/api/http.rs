use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::types::{
    Announcement, DonationSettings, Donor, DonorRegistration, Event, HistoricalMoment, ListQuery,
    Page, Pagination, Token, User,
};
use crate::api::{ContentApi, IdentityApi, LoginSuccess};
use crate::{ClubError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Club service client speaking the `{success, data, message?}` envelope.
pub struct HttpApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpApi {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        HttpApi::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn bearer(request: RequestBuilder, token: Option<&Token>) -> RequestBuilder {
        match token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token.expose())),
            None => request,
        }
    }

    async fn item<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();
        let envelope = response.json::<Envelope<T>>().await.ok();

        match envelope {
            Some(Envelope {
                success: true,
                data: Some(data),
                ..
            }) if status.is_success() => Ok(data),
            Some(envelope) => Err(failure(status, envelope.message)),
            None => Err(failure(status, None)),
        }
    }

    async fn list<T>(&self, path: &str, token: Option<&Token>, query: &ListQuery) -> Result<Page<T>>
    where
        T: DeserializeOwned,
    {
        let mut request = self.client.get(self.url(path)).query(&[
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ]);
        if let Some(filter) = query.filter.as_deref() {
            request = request.query(&[("filter", filter)]);
        }
        let response = Self::bearer(request, token).send().await?;
        let status = response.status();
        let envelope = response.json::<ListEnvelope<T>>().await.ok();

        match envelope {
            Some(ListEnvelope {
                success: true,
                data,
                pagination,
                ..
            }) if status.is_success() => {
                let pagination = pagination.unwrap_or(Pagination {
                    total_pages: 1,
                    total_items: data.len() as u64,
                });
                Ok(Page { data, pagination })
            }
            Some(envelope) => Err(failure(status, envelope.message)),
            None => Err(failure(status, None)),
        }
    }
}

#[async_trait]
impl IdentityApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let status = response.status();
        let envelope = response.json::<LoginEnvelope>().await.ok();

        match envelope {
            Some(LoginEnvelope {
                success: true,
                user: Some(user),
                token: Some(token),
                ..
            }) if status.is_success() => Ok(LoginSuccess {
                user,
                token: Token::new(token),
            }),
            Some(envelope) => Err(auth_rejection(failure(status, envelope.message))),
            None => Err(auth_rejection(failure(status, None))),
        }
    }

    async fn logout(&self, token: &Token) -> Result<()> {
        let request = self.client.post(self.url("/auth/logout"));
        let response = Self::bearer(request, Some(token)).send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(failure(status, None))
        }
    }

    async fn current_user(&self, token: &Token) -> Result<User> {
        let request = Self::bearer(self.client.get(self.url("/auth/me")), Some(token));

        // A non success body here means the token was rejected, even when
        // the transport status is 200.
        self.item::<User>(request).await.map_err(auth_rejection)
    }
}

#[async_trait]
impl ContentApi for HttpApi {
    async fn announcements(&self, query: &ListQuery) -> Result<Page<Announcement>> {
        self.list("/announcements", None, query).await
    }

    async fn announcement(&self, id: &str) -> Result<Announcement> {
        self.item(self.client.get(self.url(&format!("/announcements/{}", id))))
            .await
    }

    async fn events(&self, query: &ListQuery) -> Result<Page<Event>> {
        self.list("/events", None, query).await
    }

    async fn event(&self, id: &str) -> Result<Event> {
        self.item(self.client.get(self.url(&format!("/events/{}", id))))
            .await
    }

    async fn moments(&self, query: &ListQuery) -> Result<Page<HistoricalMoment>> {
        self.list("/historical-moments", None, query).await
    }

    async fn moment(&self, id: &str) -> Result<HistoricalMoment> {
        self.item(
            self.client
                .get(self.url(&format!("/historical-moments/{}", id))),
        )
        .await
    }

    async fn donation_settings(&self) -> Result<DonationSettings> {
        self.item(self.client.get(self.url("/donations/settings")))
            .await
    }

    async fn donors(&self, token: &Token, query: &ListQuery) -> Result<Page<Donor>> {
        self.list("/donors", Some(token), query).await
    }

    async fn register_donor(
        &self,
        token: &Token,
        registration: &DonorRegistration,
    ) -> Result<Donor> {
        let request = self.client.post(self.url("/donors")).json(registration);
        self.item(Self::bearer(request, Some(token))).await
    }
}

fn failure(status: StatusCode, message: Option<String>) -> ClubError {
    let message = message.unwrap_or_else(|| format!("service answered {}", status));
    match status {
        StatusCode::UNAUTHORIZED => ClubError::Unauthenticated { message },
        StatusCode::FORBIDDEN => ClubError::PermissionDenied,
        StatusCode::NOT_FOUND => ClubError::NotFound,
        _ => ClubError::Api { message },
    }
}

// The identity endpoints report rejected credentials with a success=false
// body. Fold that into the authentication variant so callers never have to
// inspect envelope details.
fn auth_rejection(err: ClubError) -> ClubError {
    match err {
        ClubError::Api { message } => ClubError::Unauthenticated { message },
        err => err,
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginEnvelope {
    success: bool,
    user: Option<User>,
    token: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct ListEnvelope<T> {
    success: bool,
    // An explicit default path keeps serde from inferring a T: Default
    // bound on the Deserialize impl.
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    pagination: Option<Pagination>,
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trailing_slash_is_normalized() {
        let api = HttpApi::new("http://localhost:8080/api/").unwrap();
        assert_eq!(api.url("/auth/login"), "http://localhost:8080/api/auth/login");
    }

    #[test]
    fn status_maps_into_taxonomy() {
        assert!(matches!(
            failure(StatusCode::UNAUTHORIZED, None),
            ClubError::Unauthenticated { .. }
        ));
        assert!(matches!(
            failure(StatusCode::FORBIDDEN, None),
            ClubError::PermissionDenied
        ));
        assert!(matches!(
            failure(StatusCode::NOT_FOUND, None),
            ClubError::NotFound
        ));
        assert!(matches!(
            failure(StatusCode::OK, Some("invalid".into())),
            ClubError::Api { .. }
        ));
    }

    #[test]
    fn envelope_rejection_becomes_unauthenticated() {
        let err = auth_rejection(failure(StatusCode::OK, Some("wrong password".into())));
        match err {
            ClubError::Unauthenticated { message } => assert_eq!(message, "wrong password"),
            other => panic!("unexpected {:?}", other),
        }
    }
}

//! HTTP client implementation

use crate::{
    config::ClientConfig,
    error::ConfigError,
    token::EnvToken,
    wire::{AttendanceBody, ErrorBody, LockBody, RegistrationBody, RoleBody},
};
use eventdesk_core::environment::{ApiFuture, EventsApi, TokenSource};
use eventdesk_core::error::ApiError;
use eventdesk_core::types::{
    Attendee, Event, EventId, EventUpdate, ReviewDecision, RoleId, UserId,
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Event-management backend client
#[derive(Clone)]
pub struct HttpEventsApi {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenSource>,
}

impl HttpEventsApi {
    /// Create a client from explicit configuration and token source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] if the underlying client cannot be built
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenSource>) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            tokens,
        })
    }

    /// Create a client configured from the environment
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `EVENTDESK_API_URL` or
    /// `EVENTDESK_TIMEOUT_SECS` hold invalid values
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ClientConfig::from_env()?;
        Self::new(&config, Arc::new(EnvToken))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // ClientConfig only accepts URLs that can carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let token = self.tokens.bearer_token().ok_or(ApiError::MissingToken)?;
        Ok(self
            .client
            .request(method, self.endpoint(segments))
            .bearer_auth(token))
    }

    async fn execute(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "Backend rejected request");
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message: ErrorBody::message_from(&body),
        })
    }

    async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        Self::execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn fetch_empty(request: RequestBuilder) -> Result<(), ApiError> {
        Self::execute(request).await.map(|_| ())
    }
}

impl EventsApi for HttpEventsApi {
    fn fetch_approved_events(&self) -> ApiFuture<'_, Vec<Event>> {
        Box::pin(async move {
            let request = self
                .request(Method::GET, &["events"])?
                .query(&[("status", "approved")]);
            Self::fetch_json(request).await
        })
    }

    fn register_for_event(&self, event_id: EventId, user_id: UserId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .request(Method::POST, &["events", event_id.as_str(), "registrations"])?
                .json(&RegistrationBody { user_id });
            Self::fetch_empty(request).await
        })
    }

    fn unregister_from_event(&self, event_id: EventId, user_id: UserId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.request(
                Method::DELETE,
                &["events", event_id.as_str(), "registrations", user_id.as_str()],
            )?;
            Self::fetch_empty(request).await
        })
    }

    fn fetch_attendees(&self, event_id: EventId) -> ApiFuture<'_, Vec<Attendee>> {
        Box::pin(async move {
            let request = self.request(Method::GET, &["events", event_id.as_str(), "attendees"])?;
            Self::fetch_json(request).await
        })
    }

    fn set_attendance(
        &self,
        event_id: EventId,
        user_id: UserId,
        attending: bool,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .request(
                    Method::PUT,
                    &["events", event_id.as_str(), "attendance", user_id.as_str()],
                )?
                .json(&AttendanceBody { attending });
            Self::fetch_empty(request).await
        })
    }

    fn update_event(&self, event_id: EventId, payload: EventUpdate) -> ApiFuture<'_, Event> {
        Box::pin(async move {
            let request = self
                .request(Method::PUT, &["events", event_id.as_str()])?
                .json(&payload);
            Self::fetch_json(request).await
        })
    }

    fn review_event(&self, event_id: EventId, decision: ReviewDecision) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .request(Method::POST, &["events", event_id.as_str(), "review"])?
                .json(&decision);
            Self::fetch_empty(request).await
        })
    }

    fn set_account_locked(&self, user_id: UserId, locked: bool) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .request(Method::PUT, &["users", user_id.as_str(), "lock"])?
                .json(&LockBody { locked });
            Self::fetch_empty(request).await
        })
    }

    fn assign_role(&self, user_id: UserId, role_id: RoleId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self
                .request(Method::PUT, &["users", user_id.as_str(), "role"])?
                .json(&RoleBody { role_id });
            Self::fetch_empty(request).await
        })
    }
}

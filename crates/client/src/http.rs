//! REST implementation of [`AdminApi`].

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use adminconsole_auth::{Credentials, LoginResponse, SessionHolder};
use adminconsole_core::{Module, ProfileId, Resource};

use crate::api::{LOGIN_PATH, item_path, profile_modules_path};
use crate::error::error_message;
use crate::{AdminApi, ApiError, ClientConfig};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client for the administration backend.
///
/// Every request carries the session's bearer token when one is held. A
/// `401` on any authenticated call clears the session; the caller sees
/// [`ApiError::SessionExpired`] and has to log in again.
pub struct HttpBackend {
    http: reqwest::Client,
    config: ClientConfig,
    session: Arc<SessionHolder>,
}

impl HttpBackend {
    pub fn new(config: ClientConfig, session: Arc<SessionHolder>) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionHolder> {
        &self.session
    }

    /// Send one logical request.
    ///
    /// GETs get `config.retries` extra attempts on transport errors and 5xx
    /// answers; anything that mutates is sent exactly once.
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response, ApiError> {
        let url = self.config.url(path);
        let attempts = attempts_for(&method, self.config.retries);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let request_id = Uuid::now_v7();

            let mut req = self
                .http
                .request(method.clone(), &url)
                .header(REQUEST_ID_HEADER, request_id.to_string());
            if let Some(token) = self.session.token() {
                req = req.bearer_auth(token);
            }
            if let Some(body) = &body {
                req = req.json(body);
            }

            tracing::debug!(%request_id, %method, %url, attempt, "sending request");

            match req.send().await {
                Ok(resp) if resp.status().is_server_error() && attempt < attempts => {
                    tracing::warn!(%request_id, status = resp.status().as_u16(), %url, "server error; retrying");
                }
                Ok(resp) => {
                    tracing::debug!(%request_id, status = resp.status().as_u16(), "response received");
                    return self.check(resp).await;
                }
                Err(err) if attempt < attempts && (err.is_timeout() || err.is_connect() || err.is_request()) => {
                    tracing::warn!(%request_id, error = %err, %url, "request failed; retrying");
                }
                Err(err) => {
                    tracing::warn!(%request_id, error = %err, %url, "request failed");
                    return Err(ApiError::from(err));
                }
            }
        }
    }

    async fn check(&self, resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!("backend rejected the session token; clearing session");
            if let Err(err) = self.session.clear() {
                tracing::warn!(error = %err, "failed to clear stored session");
            }
            return Err(ApiError::SessionExpired);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ApiError::status(status.as_u16(), error_message(&body)))
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(Method::GET, path, None).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Total tries for one request: GETs get `retries` extra, the rest one.
fn attempts_for(method: &Method, retries: u32) -> u32 {
    if *method == Method::GET {
        retries.saturating_add(1)
    } else {
        1
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl AdminApi for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let resp = match self
            .send(Method::POST, LOGIN_PATH, Some(to_body(credentials)?))
            .await
        {
            Ok(resp) => resp,
            Err(ApiError::SessionExpired) => return Err(ApiError::InvalidCredentials),
            Err(err) => return Err(err),
        };

        resp.json::<LoginResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.fetch(R::COLLECTION).await
    }

    async fn get<R: Resource>(&self, id: R::Id) -> Result<R, ApiError> {
        self.fetch(&item_path::<R>(id)).await
    }

    async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<(), ApiError> {
        self.send(Method::POST, R::COLLECTION, Some(to_body(draft)?))
            .await?;
        tracing::info!(kind = R::KIND, "created");
        Ok(())
    }

    async fn update<R: Resource>(&self, id: R::Id, draft: &R::Draft) -> Result<(), ApiError> {
        self.send(Method::PUT, &item_path::<R>(id), Some(to_body(draft)?))
            .await?;
        tracing::info!(kind = R::KIND, %id, "updated");
        Ok(())
    }

    async fn delete<R: Resource>(&self, id: R::Id) -> Result<(), ApiError> {
        self.send(Method::DELETE, &item_path::<R>(id), None).await?;
        tracing::info!(kind = R::KIND, %id, "deleted");
        Ok(())
    }

    async fn modules_for_profile(&self, profile: ProfileId) -> Result<Vec<Module>, ApiError> {
        self.fetch(&profile_modules_path(profile)).await
    }
}

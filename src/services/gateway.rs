// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Anima API client.
//!
//! Every call to the remote API goes through [`ApiClient::send`], which:
//! - attaches `Authorization: Bearer <token>` when a credential is stored
//! - defaults `Content-Type: application/json`
//! - maps non-2xx responses onto typed [`ClientError`]s
//!
//! The client never redirects and never writes the credential store; an
//! authorization failure is returned to the caller, which hands it to the
//! session guard.

use crate::config::Config;
use crate::error::{ClientError, ErrorPayload, Result};
use crate::models::{
    CreatedTreino, GenerateResponse, LoginRequest, LoginResponse, NewTreino, Objective, Plan,
    PlanRequest, QuickPlan, QuickPlanRequest, RegisterRequest, RegisterResponse, Treino,
};
use crate::services::credentials::CredentialStore;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Anima API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialStore,
    forbidden_is_unauthorized: bool,
}

impl ApiClient {
    /// Create a client reading its credential from `credentials`.
    pub fn new(config: &Config, credentials: CredentialStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credentials,
            forbidden_is_unauthorized: config.forbidden_is_unauthorized,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ─── Endpoints ───────────────────────────────────────────────────────────

    /// `POST /login`
    pub async fn login(&self, form: &LoginRequest) -> Result<LoginResponse> {
        self.post_json("/login", form).await
    }

    /// `POST /register`
    pub async fn register(&self, form: &RegisterRequest) -> Result<RegisterResponse> {
        self.post_json("/register", form).await
    }

    /// `GET /objetivos`
    pub async fn objectives(&self) -> Result<Vec<Objective>> {
        self.get_json("/objetivos").await
    }

    /// `POST /treino/criar`
    pub async fn create_treino(&self, treino: &NewTreino) -> Result<CreatedTreino> {
        self.post_json("/treino/criar", treino).await
    }

    /// `GET /treinos`
    pub async fn list_treinos(&self) -> Result<Vec<Treino>> {
        self.get_json("/treinos").await
    }

    /// `POST /gerar-treino`
    pub async fn quick_generate(&self, request: &QuickPlanRequest) -> Result<QuickPlan> {
        self.post_json("/gerar-treino", request).await
    }

    /// `POST /api/generate`
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<Plan> {
        let response: GenerateResponse = self.post_json("/api/generate", request).await?;
        Ok(response.plan)
    }

    /// `GET /health` (plain text).
    pub async fn health(&self) -> Result<String> {
        let response = self
            .send::<()>(Method::GET, "/health", None, None)
            .await?;
        response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))
    }

    // ─── Generic requests ────────────────────────────────────────────────────

    /// GET request with JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<(), T>(Method::GET, path, None, None).await
    }

    /// POST request with JSON body and response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body), None).await
    }

    /// Issue a request and decode the JSON body of a 2xx response.
    ///
    /// An empty 2xx body decodes as JSON `null`, so `()` and `Option<_>`
    /// targets accept `204 No Content`.
    pub async fn request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(method, path, body, headers).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| ClientError::Decode(format!("empty body: {}", e)));
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Dispatch a request and check its status.
    ///
    /// Returns the raw response only for 2xx statuses.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        headers: Option<HeaderMap>,
    ) -> Result<reqwest::Response>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let (request_headers, authenticated) = self.build_headers(headers)?;

        tracing::debug!(method = %method, path, authenticated, "API request");

        let mut builder = self.http.request(method.clone(), &url).headers(request_headers);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                ClientError::Validation(format!("could not encode request body: {}", e))
            })?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, path, error = %e, "API request failed without response");
            ClientError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(method = %method, path, status = status.as_u16(), "API response");
            return Ok(response);
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(method = %method, path, error = %e, "Failed to read error body");
                String::new()
            }
        };
        tracing::warn!(method = %method, path, status = status.as_u16(), "API error response");
        Err(self.classify(status, &body))
    }

    /// Headers for one call: JSON content type, bearer credential, then
    /// per-call overrides. Also reports whether a credential was attached.
    fn build_headers(&self, overrides: Option<HeaderMap>) -> Result<(HeaderMap, bool)> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut authenticated = false;
        if let Some(token) = self.credentials.get()? {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ClientError::Validation("stored credential is not a valid header value".into())
            })?;
            headers.insert(AUTHORIZATION, value);
            authenticated = true;
        }

        if let Some(overrides) = overrides {
            for (name, value) in overrides.iter() {
                headers.insert(name.clone(), value.clone());
            }
        }

        Ok((headers, authenticated))
    }

    /// Map a non-2xx status and body onto the error taxonomy.
    fn classify(&self, status: StatusCode, body: &str) -> ClientError {
        let payload = ErrorPayload::from_body(body);
        let unauthorized = status == StatusCode::UNAUTHORIZED
            || (self.forbidden_is_unauthorized && status == StatusCode::FORBIDDEN);

        if unauthorized {
            ClientError::Authorization { status, payload }
        } else {
            ClientError::Api { status, payload }
        }
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types with consistent user-facing messages.

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Error body returned by the API on a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// Body decoded as JSON (including `application/problem+json`).
    Json(Value),
    /// Plain text body, as written by the server's `http.Error` paths.
    Text(String),
}

impl ErrorPayload {
    /// Decode a raw response body. Empty bodies carry no payload.
    pub fn from_body(body: &str) -> Option<Self> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => Some(ErrorPayload::Json(value)),
            Err(_) => Some(ErrorPayload::Text(trimmed.to_string())),
        }
    }

    /// Best-effort human readable detail from the payload.
    ///
    /// Looks at the usual `error`, `detail`, `title` and `message` fields of
    /// JSON bodies before falling back to the raw text.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ErrorPayload::Text(text) => Some(text.as_str()),
            ErrorPayload::Json(value) => ["detail", "error", "message", "title"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str)),
        }
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPayload::Json(value) => write!(f, "{}", value),
            ErrorPayload::Text(text) => f.write_str(text),
        }
    }
}

/// Credential slot I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Corrupt storage file {path}: {message}")]
    Corrupt { path: String, message: String },
}

/// Client error type.
///
/// Every call through the request gateway resolves to either a decoded body
/// or one of these variants; nothing is swallowed.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Local, pre-network failure (malformed selection, missing field).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The server rejected or did not receive a credential.
    #[error("Not authorized (HTTP {status})")]
    Authorization {
        status: StatusCode,
        payload: Option<ErrorPayload>,
    },

    /// `POST /login` rejected the submitted email/password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Any other non-2xx response.
    #[error("API error (HTTP {status})")]
    Api {
        status: StatusCode,
        payload: Option<ErrorPayload>,
    },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx body that does not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// True when the failure must end the session.
    pub fn is_authorization(&self) -> bool {
        matches!(self, ClientError::Authorization { .. })
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Authorization { status, .. } | ClientError::Api { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Payload of the failed response, if any.
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            ClientError::Authorization { payload, .. } | ClientError::Api { payload, .. } => {
                payload.as_ref()
            }
            _ => None,
        }
    }

    /// Message scoped for display to the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) => msg.clone(),
            ClientError::Authorization { .. } => {
                "Sua sessão expirou. Faça login novamente.".to_string()
            }
            ClientError::InvalidCredentials => {
                "Falha no login. Verifique suas credenciais.".to_string()
            }
            ClientError::Api { status, payload } => match payload.as_ref().and_then(|p| p.detail())
            {
                Some(detail) => format!("Erro do servidor ({}): {}", status.as_u16(), detail),
                None => format!("Erro do servidor ({})", status.as_u16()),
            },
            ClientError::Network(_) => {
                "Não foi possível contactar o servidor. Tente novamente.".to_string()
            }
            ClientError::Decode(_) => "Resposta inesperada do servidor.".to_string(),
            ClientError::Storage(_) => "Falha ao acessar a sessão local.".to_string(),
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

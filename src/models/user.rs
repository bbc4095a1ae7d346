//! Sign-in and sign-up forms and the API responses they produce.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sign-in form (`POST /login`).
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email é obrigatório"))]
    pub email: String,
    #[validate(length(min = 1, message = "senha é obrigatória"))]
    pub password: String,
}

/// Sign-up form (`POST /register`).
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "nome é obrigatório"))]
    pub name: String,
    #[validate(length(min = 1, message = "email é obrigatório"))]
    pub email: String,
    #[validate(length(min = 1, message = "senha é obrigatória"))]
    pub password: String,
}

/// Response of `POST /login`.
///
/// Older servers answer `{token}`, newer ones `{access_token, expires_in,
/// token_type}`; both carry the bearer credential.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Response of `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(alias = "id")]
    pub user_id: i64,
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session guard: sign-in, sign-out and per-route access decisions.
//!
//! The session is `Authenticated` exactly when the credential store holds a
//! token. Only two transitions write the store:
//! - a successful `POST /login` stores the returned token
//! - sign-out (explicit, or after an authorization failure) clears it
//!
//! Both clear paths redirect to the sign-in route.

use crate::error::{ClientError, Result};
use crate::models::{LoginRequest, RegisterRequest, RegisterResponse};
use crate::routes::{Access, Navigator, Route};
use crate::services::credentials::CredentialStore;
use crate::services::gateway::ApiClient;
use std::sync::Arc;
use validator::Validate;

/// Client-side session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
}

/// Outcome of entering a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested view
    Render,
    /// The guard redirected elsewhere; do not render or fetch
    Redirected(Route),
}

/// What the caller should do after a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureAction {
    /// The session ended; drop protected data, the guard already redirected
    SignedOut,
    /// Show the message; the session is unaffected
    ShowMessage(String),
}

/// Session guard shared by all views.
#[derive(Clone)]
pub struct SessionGuard {
    credentials: CredentialStore,
    api: ApiClient,
    navigator: Arc<dyn Navigator>,
}

impl SessionGuard {
    pub fn new(credentials: CredentialStore, api: ApiClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            credentials,
            api,
            navigator,
        }
    }

    /// Current state, derived from credential presence.
    ///
    /// A storage read failure counts as anonymous.
    pub fn state(&self) -> SessionState {
        match self.credentials.get() {
            Ok(Some(_)) => SessionState::Authenticated,
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read credential, treating session as anonymous");
                SessionState::Anonymous
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Check run when a protected view mounts, before any protected request.
    pub fn check_protected(&self) -> GuardDecision {
        match self.state() {
            SessionState::Authenticated => GuardDecision::Render,
            SessionState::Anonymous => {
                tracing::info!("Anonymous access to protected view, redirecting to sign-in");
                self.navigator.redirect(Route::Login);
                GuardDecision::Redirected(Route::Login)
            }
        }
    }

    /// Check run when the sign-in or sign-up view mounts.
    ///
    /// Optimistic only: the server stays authoritative on the token.
    pub fn check_guest(&self) -> GuardDecision {
        match self.state() {
            SessionState::Anonymous => GuardDecision::Render,
            SessionState::Authenticated => {
                self.navigator.redirect(Route::Dashboard);
                GuardDecision::Redirected(Route::Dashboard)
            }
        }
    }

    /// Enter a route by path. Unknown paths redirect to sign-in.
    pub fn enter_path(&self, path: &str) -> Result<GuardDecision> {
        match Route::from_path(path) {
            Some(route) => self.enter(route),
            None => {
                self.navigator.redirect(Route::Login);
                Ok(GuardDecision::Redirected(Route::Login))
            }
        }
    }

    /// Enter a route, applying its access rule.
    pub fn enter(&self, route: Route) -> Result<GuardDecision> {
        match route.access() {
            Access::Guest => Ok(self.check_guest()),
            Access::Protected => Ok(self.check_protected()),
            Access::SignOut => {
                self.sign_out()?;
                Ok(GuardDecision::Redirected(Route::Login))
            }
        }
    }

    /// Authenticate and, on success, store the token and go to the dashboard.
    ///
    /// A rejected email/password is reported as
    /// [`ClientError::InvalidCredentials`] and leaves the user on sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        let form = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        form.validate().map_err(presence_error)?;

        let response = match self.api.login(&form).await {
            Ok(response) => response,
            Err(ClientError::Authorization { .. }) => {
                tracing::info!("Sign-in rejected by server");
                return Err(ClientError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if response.token.trim().is_empty() {
            return Err(ClientError::Decode("login response carried an empty token".into()));
        }

        self.credentials.set(&response.token)?;
        tracing::info!("Signed in");
        self.navigator.navigate(Route::Dashboard);
        Ok(())
    }

    /// Create an account. Does not sign in.
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisterResponse> {
        let form = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        form.validate().map_err(presence_error)?;

        let response = self.api.register(&form).await?;
        tracing::info!(user_id = response.user_id, "Account created");
        Ok(response)
    }

    /// Clear the credential and redirect to sign-in.
    ///
    /// The redirect happens even when clearing the storage fails.
    pub fn sign_out(&self) -> Result<()> {
        let cleared = self.credentials.clear();
        self.navigator.redirect(Route::Login);
        match cleared {
            Ok(()) => {
                tracing::info!("Signed out");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear credential during sign-out");
                Err(e.into())
            }
        }
    }

    /// Single handler for failed requests.
    ///
    /// Authorization failures end the session; everything else becomes a
    /// message for the calling view.
    pub fn handle_failure(&self, err: &ClientError) -> FailureAction {
        if err.is_authorization() {
            tracing::info!(status = ?err.status(), "Authorization failure, ending session");
            // sign_out already redirected and logged any storage failure
            let _ = self.sign_out();
            return FailureAction::SignedOut;
        }
        FailureAction::ShowMessage(err.user_message())
    }
}

/// Flatten form validation failures into one user-facing message.
fn presence_error(errors: validator::ValidationErrors) -> ClientError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|e| {
            e.message
                .as_deref()
                .map_or_else(|| e.code.to_string(), str::to_string)
        })
        .collect();
    messages.sort();
    ClientError::Validation(messages.join("; "))
}

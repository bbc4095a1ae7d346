// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Anima: client for the Anima workout planning API
//!
//! This crate provides the session guard, the authenticated request path
//! and the plan request/response shaping used by the `anima` front end.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

use config::Config;
use routes::Navigator;
use services::{ApiClient, CredentialStore, PlanRequestBuilder, SessionGuard};
use std::sync::Arc;
use views::{DashboardView, GeneratorView};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub credentials: CredentialStore,
    pub api: ApiClient,
    pub guard: SessionGuard,
}

impl AppState {
    /// Wire the services around one credential store and navigator.
    pub fn new(config: Config, credentials: CredentialStore, navigator: Arc<dyn Navigator>) -> Self {
        let api = ApiClient::new(&config, credentials.clone());
        let guard = SessionGuard::new(credentials.clone(), api.clone(), navigator);
        Self {
            config,
            credentials,
            api,
            guard,
        }
    }

    pub fn dashboard(&self) -> DashboardView {
        DashboardView::new(self.guard.clone(), self.api.clone())
    }

    pub fn generator(&self) -> GeneratorView {
        GeneratorView::new(
            self.guard.clone(),
            self.api.clone(),
            PlanRequestBuilder::new(self.config.day_bounds),
        )
    }
}

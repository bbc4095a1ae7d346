// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! View models for the protected screens.
//!
//! A view is mounted through the session guard and issues its requests
//! through the API client. Results arriving after the view unmounted are
//! dropped without touching view state; an authorization failure among them
//! still ends the session.

pub mod dashboard;
pub mod generator;

pub use dashboard::DashboardView;
pub use generator::{GeneratorView, SubmitOutcome};

use crate::error::ClientError;
use crate::routes::Route;
use crate::services::SessionGuard;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of mounting a view or running one of its actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    /// View state was updated
    Rendered,
    /// The guard sent the user elsewhere; protected data was discarded
    Redirected(Route),
    /// The action failed; the message is shown in the view
    Failed(String),
    /// The view unmounted before the request settled; result dropped
    Discarded,
}

/// Mounted flag shared between a view and its pending requests.
#[derive(Debug, Clone)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl ViewScope {
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

/// Settle a request whose view already unmounted.
///
/// View state is left untouched; a rejected credential is still cleared.
pub(crate) fn settle_unmounted<T>(
    guard: &SessionGuard,
    result: &Result<T, ClientError>,
) -> ViewOutcome {
    if let Err(e) = result {
        if e.is_authorization() {
            guard.handle_failure(e);
        }
    }
    ViewOutcome::Discarded
}

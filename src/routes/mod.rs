// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route table and the navigate/redirect contract.
//!
//! The session guard decides where to go; a [`Navigator`] carries it out.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Client-side routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in entry point
    Login,
    /// Sign-up entry point
    Register,
    /// Protected dashboard (saved workouts)
    Dashboard,
    /// Protected plan generator
    Generator,
    /// Sign-out action
    Logout,
}

/// What a route requires of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only meaningful while anonymous
    Guest,
    /// Requires a credential
    Protected,
    /// Performs the sign-out transition
    SignOut,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::Generator => "/treinos",
            Route::Logout => "/logout",
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register => Access::Guest,
            Route::Dashboard | Route::Generator => Access::Protected,
            Route::Logout => Access::SignOut,
        }
    }

    /// Match a path; unknown paths yield `None` and fall back to sign-in.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/dashboard" => Some(Route::Dashboard),
            "/treinos" => Some(Route::Generator),
            "/logout" => Some(Route::Logout),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation performed by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Push a new history entry
    Push(Route),
    /// Replace the current history entry
    Replace(Route),
}

impl Navigation {
    pub fn route(&self) -> Route {
        match self {
            Navigation::Push(route) | Navigation::Replace(route) => *route,
        }
    }
}

/// Navigate/redirect contract offered by the routing layer.
pub trait Navigator: Send + Sync {
    /// Push `route` (user-initiated navigation).
    fn navigate(&self, route: Route);

    /// Replace the current entry with `route` (guard redirect).
    fn redirect(&self, route: Route);
}

/// In-memory navigation history.
///
/// Used by the command line front end and by tests to observe where the
/// guard sent the user.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Arc<Mutex<Vec<Navigation>>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// All navigations, oldest first.
    pub fn entries(&self) -> Vec<Navigation> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Route the user currently sits on.
    pub fn current(&self) -> Option<Route> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .map(Navigation::route)
    }

    fn record(&self, navigation: Navigation) {
        tracing::debug!(?navigation, "Navigation");
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(navigation);
    }
}

impl Navigator for History {
    fn navigate(&self, route: Route) {
        self.record(Navigation::Push(route));
    }

    fn redirect(&self, route: Route) {
        self.record(Navigation::Replace(route));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_roundtrip() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Dashboard,
            Route::Generator,
            Route::Logout,
        ] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_route_from_path_ignores_query_and_trailing_slash() {
        assert_eq!(Route::from_path("/dashboard/"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/login?next=/treinos"), Some(Route::Login));
        assert_eq!(Route::from_path("/"), None);
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[test]
    fn test_history_records_current_route() {
        let history = History::new();
        assert_eq!(history.current(), None);

        history.navigate(Route::Dashboard);
        history.redirect(Route::Login);

        assert_eq!(history.current(), Some(Route::Login));
        assert_eq!(
            history.entries(),
            vec![
                Navigation::Push(Route::Dashboard),
                Navigation::Replace(Route::Login)
            ]
        );
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard: the user's saved workouts.

use super::{settle_unmounted, ViewOutcome, ViewScope};
use crate::error::ClientError;
use crate::models::{NewTreino, Objective, Treino};
use crate::services::{ApiClient, FailureAction, GuardDecision, SessionGuard};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct DashboardState {
    treinos: Option<Vec<Treino>>,
    objectives: Vec<Objective>,
    message: Option<String>,
}

/// Dashboard view model. Clones share state.
#[derive(Clone)]
pub struct DashboardView {
    guard: SessionGuard,
    api: ApiClient,
    scope: ViewScope,
    state: Arc<Mutex<DashboardState>>,
}

impl DashboardView {
    pub fn new(guard: SessionGuard, api: ApiClient) -> Self {
        Self {
            guard,
            api,
            scope: ViewScope::default(),
            state: Arc::new(Mutex::new(DashboardState::default())),
        }
    }

    /// Guard check, then load the workout list.
    pub async fn mount(&self) -> ViewOutcome {
        if let GuardDecision::Redirected(route) = self.guard.check_protected() {
            return ViewOutcome::Redirected(route);
        }
        self.reload().await
    }

    /// Fetch `GET /treinos` and replace the list.
    pub async fn reload(&self) -> ViewOutcome {
        let result = self.api.list_treinos().await;
        if !self.scope.is_mounted() {
            tracing::debug!("Dashboard unmounted, dropping workout list");
            return settle_unmounted(&self.guard, &result);
        }
        match result {
            Ok(treinos) => {
                tracing::debug!(count = treinos.len(), "Loaded workouts");
                let mut state = self.lock();
                state.treinos = Some(treinos);
                state.message = None;
                ViewOutcome::Rendered
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Load the objective catalog for the creation form.
    pub async fn load_objectives(&self) -> ViewOutcome {
        if let GuardDecision::Redirected(route) = self.guard.check_protected() {
            return ViewOutcome::Redirected(route);
        }
        let result = self.api.objectives().await;
        if !self.scope.is_mounted() {
            return settle_unmounted(&self.guard, &result);
        }
        match result {
            Ok(objectives) => {
                self.lock().objectives = objectives;
                ViewOutcome::Rendered
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Create a workout, then refresh the list.
    ///
    /// The creation response only acknowledges the new id; the list is
    /// always re-fetched.
    pub async fn create(&self, treino: &NewTreino) -> ViewOutcome {
        if let GuardDecision::Redirected(route) = self.guard.check_protected() {
            return ViewOutcome::Redirected(route);
        }
        let result = self.api.create_treino(treino).await;
        if !self.scope.is_mounted() {
            return settle_unmounted(&self.guard, &result);
        }
        match result {
            Ok(created) => {
                tracing::info!(treino_id = created.treino_id, "Workout created");
                self.reload().await
            }
            // Creation failures keep the current list on screen
            Err(e) => match self.guard.handle_failure(&e) {
                FailureAction::SignedOut => self.discard(),
                FailureAction::ShowMessage(_) => {
                    let msg = "Erro ao criar treino".to_string();
                    self.lock().message = Some(msg.clone());
                    ViewOutcome::Failed(msg)
                }
            },
        }
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    /// Loaded workouts; `None` until loaded or after the session ended.
    pub fn treinos(&self) -> Option<Vec<Treino>> {
        self.lock().treinos.clone()
    }

    pub fn objectives(&self) -> Vec<Objective> {
        self.lock().objectives.clone()
    }

    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    /// Text rendering of the dashboard.
    pub fn render(&self) -> String {
        let state = self.lock();
        let mut out = String::from("Painel de Treinos\n\nSeus Treinos\n");
        match state.treinos.as_deref() {
            Some([]) => out.push_str("Você ainda não tem treinos.\n"),
            Some(treinos) => {
                for treino in treinos {
                    out.push_str(&treino.summary());
                    out.push('\n');
                }
            }
            None => {}
        }
        if let Some(msg) = &state.message {
            out.push_str(msg);
            out.push('\n');
        }
        out
    }

    fn fail(&self, err: &ClientError) -> ViewOutcome {
        match self.guard.handle_failure(err) {
            FailureAction::SignedOut => self.discard(),
            FailureAction::ShowMessage(msg) => {
                self.lock().message = Some(msg.clone());
                ViewOutcome::Failed(msg)
            }
        }
    }

    /// Drop protected data after the session ended.
    fn discard(&self) -> ViewOutcome {
        let mut state = self.lock();
        state.treinos = None;
        state.objectives.clear();
        state.message = None;
        ViewOutcome::Redirected(crate::routes::Route::Login)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan generator view.
//!
//! At most one generation request is in flight per view. A submission made
//! while one is pending is rejected, not queued. Every plan received fully
//! replaces the previous one and its day schedule is rebuilt from scratch.

use super::{settle_unmounted, ViewOutcome, ViewScope};
use crate::error::ClientError;
use crate::models::{Plan, QuickPlan, QuickPlanRequest};
use crate::services::{
    shape, ApiClient, DaySchedule, FailureAction, GuardDecision, PlanRequestBuilder,
    PlanSelection, SessionGuard,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission is still pending; nothing was sent
    Busy,
    /// The submission settled (or never left, for validation failures)
    Settled(ViewOutcome),
}

#[derive(Debug, Default)]
struct GeneratorState {
    plan: Option<Plan>,
    schedule: Vec<DaySchedule>,
    quick_plan: Option<QuickPlan>,
    message: Option<String>,
}

/// Releases the in-flight flag when the submission settles or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlight(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Generator view model. Clones share state, so a clone can unmount the view
/// while a submission is pending.
#[derive(Clone)]
pub struct GeneratorView {
    guard: SessionGuard,
    api: ApiClient,
    builder: PlanRequestBuilder,
    scope: ViewScope,
    in_flight: Arc<AtomicBool>,
    state: Arc<Mutex<GeneratorState>>,
}

impl GeneratorView {
    pub fn new(guard: SessionGuard, api: ApiClient, builder: PlanRequestBuilder) -> Self {
        Self {
            guard,
            api,
            builder,
            scope: ViewScope::default(),
            in_flight: Arc::new(AtomicBool::new(false)),
            state: Arc::new(Mutex::new(GeneratorState::default())),
        }
    }

    /// Guard check on mount. The form needs no data, so nothing is fetched.
    pub fn mount(&self) -> ViewOutcome {
        match self.guard.check_protected() {
            GuardDecision::Render => ViewOutcome::Rendered,
            GuardDecision::Redirected(route) => ViewOutcome::Redirected(route),
        }
    }

    /// Build a request from `selection` and send it to the generator.
    pub async fn submit(&self, selection: &PlanSelection) -> SubmitOutcome {
        if let GuardDecision::Redirected(route) = self.guard.check_protected() {
            return SubmitOutcome::Settled(ViewOutcome::Redirected(route));
        }

        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            tracing::debug!("Generation already in flight, ignoring submission");
            return SubmitOutcome::Busy;
        };

        let request = match self.builder.build(selection) {
            Ok(request) => request,
            Err(e) => return SubmitOutcome::Settled(self.show(&e.user_message())),
        };

        tracing::info!(
            goal = %request.goal,
            level = %request.level,
            days_per_week = request.days_per_week,
            "Requesting plan"
        );
        let result = self.api.generate_plan(&request).await;

        if !self.scope.is_mounted() {
            tracing::debug!("Generator unmounted, dropping plan response");
            return SubmitOutcome::Settled(settle_unmounted(&self.guard, &result));
        }

        SubmitOutcome::Settled(match result {
            Ok(plan) => {
                self.replace_plan(plan);
                ViewOutcome::Rendered
            }
            Err(e) => self.fail(&e),
        })
    }

    /// Quick generation by goal only (`POST /gerar-treino`).
    pub async fn submit_quick(&self, goal: &str) -> SubmitOutcome {
        if let GuardDecision::Redirected(route) = self.guard.check_protected() {
            return SubmitOutcome::Settled(ViewOutcome::Redirected(route));
        }

        let Some(_in_flight) = InFlight::acquire(&self.in_flight) else {
            return SubmitOutcome::Busy;
        };

        let goal = goal.trim();
        if goal.is_empty() {
            return SubmitOutcome::Settled(self.show("objetivo é obrigatório"));
        }

        let request = QuickPlanRequest {
            objetivo: goal.to_lowercase(),
        };
        let result = self.api.quick_generate(&request).await;

        if !self.scope.is_mounted() {
            return SubmitOutcome::Settled(settle_unmounted(&self.guard, &result));
        }

        SubmitOutcome::Settled(match result {
            Ok(quick) => {
                tracing::info!(treino_id = %quick.treino_id, "Quick plan generated");
                let mut state = self.lock();
                state.quick_plan = Some(quick);
                state.message = None;
                ViewOutcome::Rendered
            }
            Err(e) => self.fail(&e),
        })
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    /// Whether a submission is pending (the trigger is disabled).
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn plan(&self) -> Option<Plan> {
        self.lock().plan.clone()
    }

    pub fn schedule(&self) -> Vec<DaySchedule> {
        self.lock().schedule.clone()
    }

    pub fn quick_plan(&self) -> Option<QuickPlan> {
        self.lock().quick_plan.clone()
    }

    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    /// Text rendering of the current plan.
    pub fn render(&self) -> String {
        let state = self.lock();
        let mut out = String::new();
        if let Some(plan) = &state.plan {
            out.push_str(&format!(
                "Plano {} ({}) – {} dias por semana\n\n",
                plan.goal, plan.level, plan.days_per_week
            ));
            for day in &state.schedule {
                out.push_str(&day.to_string());
            }
            if !plan.notes.trim().is_empty() {
                out.push_str(&format!("\nNotas: {}\n", plan.notes.trim()));
            }
        }
        if let Some(quick) = &state.quick_plan {
            out.push_str(&format!("Treino {}\n", quick.treino_id));
            for ex in &quick.exercicios {
                out.push_str(&format!("  • {}: {}x{}\n", ex.nome, ex.series, ex.repeticoes));
            }
            if let Some(notes) = quick.coach_notes.as_deref().filter(|n| !n.is_empty()) {
                out.push_str(&format!("\n{}\n", notes));
            }
        }
        if let Some(msg) = &state.message {
            out.push_str(msg);
            out.push('\n');
        }
        out
    }

    /// Replace the plan and rebuild the schedule wholesale.
    fn replace_plan(&self, plan: Plan) {
        let schedule = shape(&plan);
        let mut state = self.lock();
        state.schedule = schedule;
        state.plan = Some(plan);
        state.message = None;
    }

    fn fail(&self, err: &ClientError) -> ViewOutcome {
        match self.guard.handle_failure(err) {
            FailureAction::SignedOut => {
                let mut state = self.lock();
                *state = GeneratorState::default();
                ViewOutcome::Redirected(crate::routes::Route::Login)
            }
            FailureAction::ShowMessage(msg) => self.show(&msg),
        }
    }

    fn show(&self, msg: &str) -> ViewOutcome {
        self.lock().message = Some(msg.to_string());
        ViewOutcome::Failed(msg.to_string())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GeneratorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

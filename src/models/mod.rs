// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod plan;
pub mod treino;
pub mod user;

pub use plan::{GenerateResponse, Goal, Level, Plan, PlanItem, PlanRequest, Reps};
pub use treino::{
    CreatedTreino, ExerciseRef, NewTreino, Objective, QuickExercise, QuickPlan, QuickPlanRequest,
    Treino,
};
pub use user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

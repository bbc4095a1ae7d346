// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session, API access and plan shaping.

pub mod credentials;
pub mod gateway;
pub mod plan_builder;
pub mod plan_shaper;
pub mod session;

pub use credentials::{CredentialStore, FileStorage, KeyValueStorage, MemoryStorage};
pub use gateway::ApiClient;
pub use plan_builder::{EquipmentSelection, PlanRequestBuilder, PlanSelection};
pub use plan_shaper::{shape, DayGroup, DaySchedule};
pub use session::{FailureAction, GuardDecision, SessionGuard, SessionState};

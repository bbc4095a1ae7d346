// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Groups a generated plan's flat item list into per-day schedules.
//!
//! Grouping is a pure projection of a [`Plan`]: it is rebuilt from scratch
//! for every plan received and never patched, so nothing from an earlier
//! generation can leak into a later one.

use crate::models::{Plan, PlanItem};
use std::collections::BTreeMap;
use std::fmt;

/// Shown for a day with no items.
pub const EMPTY_DAY_MESSAGE: &str = "Nenhum exercício sugerido";

/// Upper bound on displayed days; a plan covers one week.
pub const DAYS_IN_WEEK: u32 = 7;

/// Items grouped by `day_index`, in response order within each day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayGroup {
    days: BTreeMap<u32, Vec<PlanItem>>,
}

impl DayGroup {
    /// Stable single-pass grouping.
    pub fn from_items(items: &[PlanItem]) -> Self {
        let mut days: BTreeMap<u32, Vec<PlanItem>> = BTreeMap::new();
        for item in items {
            days.entry(item.day_index).or_default().push(item.clone());
        }
        Self { days }
    }

    /// Items of `day` (empty when the generator suggested none).
    pub fn day(&self, day: u32) -> &[PlanItem] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Day indexes that received at least one item.
    pub fn day_indexes(&self) -> impl Iterator<Item = u32> + '_ {
        self.days.keys().copied()
    }
}

/// One day of the displayed schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub day: u32,
    pub label: String,
    pub items: Vec<PlanItem>,
}

impl DaySchedule {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for DaySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dia {} – {}", self.day, self.label)?;
        if self.items.is_empty() {
            return writeln!(f, "  {}", EMPTY_DAY_MESSAGE);
        }
        for item in &self.items {
            write!(f, "  • {}: {}x{}", item.name, item.sets, item.reps)?;
            if item.rest_seconds > 0 {
                write!(f, " (descanso {}s)", item.rest_seconds)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Pair each day `1..=days_per_week` with its split label and items.
///
/// Days missing a split label are called `Dia N`. A `days_per_week` beyond
/// [`DAYS_IN_WEEK`] is capped. Items whose day index falls outside the
/// displayed days are left out and logged.
pub fn shape(plan: &Plan) -> Vec<DaySchedule> {
    let group = DayGroup::from_items(&plan.items);

    let days = plan.days_per_week.min(DAYS_IN_WEEK);
    if days != plan.days_per_week {
        tracing::warn!(
            days_per_week = plan.days_per_week,
            displayed = days,
            "Plan declares more days than a week, capping"
        );
    }

    let stray = group
        .day_indexes()
        .filter(|d| *d == 0 || *d > days)
        .count();
    if stray > 0 {
        tracing::warn!(
            days_per_week = plan.days_per_week,
            stray_days = stray,
            "Plan has items outside the week, not displayed"
        );
    }

    (1..=days)
        .map(|day| DaySchedule {
            day,
            label: plan
                .split
                .get(day as usize - 1)
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Dia {}", day)),
            items: group.day(day).to_vec(),
        })
        .collect()
}

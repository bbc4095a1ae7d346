// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Builds the generator request from raw form selections.

use crate::config::DayBounds;
use crate::error::ClientError;
use crate::models::{Goal, Level, PlanRequest};

/// Toggle set of equipment tags, kept in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentSelection {
    tags: Vec<String>,
}

impl EquipmentSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a tag. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        if let Some(pos) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(pos);
            false
        } else {
            self.tags.push(tag.to_string());
            true
        }
    }

    /// Select a tag; selecting twice keeps one entry.
    pub fn select(&mut self, tag: &str) {
        if !self.is_selected(tag) {
            self.toggle(tag);
        }
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t == tag)
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl<S: AsRef<str>> FromIterator<S> for EquipmentSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for tag in iter {
            selection.select(tag.as_ref());
        }
        selection
    }
}

/// Raw selection state of the generator form.
#[derive(Debug, Clone, Default)]
pub struct PlanSelection {
    pub goal: String,
    pub level: String,
    pub days_per_week: i64,
    pub equipment: EquipmentSelection,
    /// Comma separated free text
    pub restrictions: String,
}

/// Turns a [`PlanSelection`] into a [`PlanRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanRequestBuilder {
    bounds: DayBounds,
}

impl PlanRequestBuilder {
    pub fn new(bounds: DayBounds) -> Self {
        Self { bounds }
    }

    /// Validate and normalize a selection. Runs before any network call.
    pub fn build(&self, selection: &PlanSelection) -> Result<PlanRequest, ClientError> {
        if selection.goal.trim().is_empty() {
            return Err(ClientError::Validation("objetivo é obrigatório".to_string()));
        }
        if selection.level.trim().is_empty() {
            return Err(ClientError::Validation("nível é obrigatório".to_string()));
        }
        let goal: Goal = selection.goal.parse().map_err(ClientError::Validation)?;
        let level: Level = selection.level.parse().map_err(ClientError::Validation)?;

        let days_per_week = self.bounds.clamp(selection.days_per_week);
        if i64::from(days_per_week) != selection.days_per_week {
            tracing::debug!(
                requested = selection.days_per_week,
                clamped = days_per_week,
                "Clamped days per week"
            );
        }

        Ok(PlanRequest {
            goal,
            level,
            days_per_week,
            equipment: selection.equipment.tags().to_vec(),
            restrictions: parse_restrictions(&selection.restrictions),
        })
    }
}

/// Split comma separated restrictions, trimming and dropping empty entries.
pub fn parse_restrictions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn selection(days: i64) -> PlanSelection {
        PlanSelection {
            goal: "hipertrofia".to_string(),
            level: "beginner".to_string(),
            days_per_week: days,
            equipment: ["halter", "barra"].into_iter().collect(),
            restrictions: "ombro, joelho".to_string(),
        }
    }

    #[test]
    fn test_build_reference_selection() {
        let request = PlanRequestBuilder::default().build(&selection(3)).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "goal": "hipertrofia",
                "level": "beginner",
                "days_per_week": 3,
                "equipment": ["halter", "barra"],
                "restrictions": ["ombro", "joelho"]
            })
        );
    }

    #[test]
    fn test_days_clamped_to_bounds() {
        let builder = PlanRequestBuilder::default();
        assert_eq!(builder.build(&selection(10)).unwrap().days_per_week, 6);
        assert_eq!(builder.build(&selection(0)).unwrap().days_per_week, 2);

        let narrow = PlanRequestBuilder::new(DayBounds::new(3, 4).unwrap());
        assert_eq!(narrow.build(&selection(5)).unwrap().days_per_week, 4);
    }

    #[test]
    fn test_invalid_goal_fails_fast() {
        let mut sel = selection(3);
        sel.goal = "cardio".to_string();
        let err = PlanRequestBuilder::default().build(&sel).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_missing_level_fails_fast() {
        let mut sel = selection(3);
        sel.level = "  ".to_string();
        let err = PlanRequestBuilder::default().build(&sel).unwrap_err();
        assert!(matches!(err, ClientError::Validation(msg) if msg.contains("nível")));
    }

    #[test]
    fn test_parse_restrictions_drops_empty_tokens() {
        assert_eq!(
            parse_restrictions(" lombar,, joelho ,  ,ombro "),
            vec!["lombar", "joelho", "ombro"]
        );
        assert!(parse_restrictions("").is_empty());
        assert!(parse_restrictions(" , ,").is_empty());
    }

    #[test]
    fn test_equipment_toggle_set() {
        let mut equipment = EquipmentSelection::new();
        assert!(equipment.toggle("halter"));
        assert!(equipment.toggle("barra"));
        assert!(!equipment.toggle("halter"));
        assert!(equipment.toggle("halter"));
        equipment.select("barra");
        assert!(!equipment.toggle("  "));
        assert_eq!(equipment.tags(), ["barra", "halter"]);
    }
}

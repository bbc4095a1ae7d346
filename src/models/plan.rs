// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Generated plan models: request selection and the plan returned by the
//! generator.

use crate::models::treino::ExerciseRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Training goal accepted by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Hipertrofia,
    Emagrecimento,
    Forca,
    Resistencia,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Hipertrofia => "hipertrofia",
            Goal::Emagrecimento => "emagrecimento",
            Goal::Forca => "forca",
            Goal::Resistencia => "resistencia",
        }
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "hipertrofia" | "hypertrophy" => Ok(Goal::Hipertrofia),
            "emagrecimento" | "weight_loss" | "fat_loss" => Ok(Goal::Emagrecimento),
            "forca" | "strength" => Ok(Goal::Forca),
            "resistencia" | "endurance" => Ok(Goal::Resistencia),
            _ => Err(format!(
                "objetivo inválido: {:?} (use hipertrofia, emagrecimento, forca ou resistencia)",
                s
            )),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Experience level accepted by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "beginner" | "iniciante" => Ok(Level::Beginner),
            "intermediate" | "intermediario" => Ok(Level::Intermediate),
            "advanced" | "avancado" => Ok(Level::Advanced),
            _ => Err(format!(
                "nível inválido: {:?} (use beginner, intermediate ou advanced)",
                s
            )),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase, trim and fold the Portuguese accents used in goal/level names.
fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            ' ' | '-' => '_',
            other => other,
        })
        .collect()
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub goal: Goal,
    pub level: Level,
    pub days_per_week: u32,
    pub equipment: Vec<String>,
    pub restrictions: Vec<String>,
}

/// Repetition prescription: a fixed count or a range such as `"8-12"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    Count(u32),
    Range(String),
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reps::Count(n) => write!(f, "{}", n),
            Reps::Range(r) => f.write_str(r),
        }
    }
}

/// One exercise entry of a generated plan, tagged with its day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    #[serde(alias = "exercicio_id")]
    pub exercise_id: ExerciseRef,
    #[serde(alias = "day")]
    pub day_index: u32,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "series")]
    pub sets: u32,
    #[serde(alias = "repeticoes")]
    pub reps: Reps,
    #[serde(default)]
    pub rest_seconds: u32,
}

/// A generated workout plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub goal: String,
    pub level: String,
    pub days_per_week: u32,
    /// `split[i]` labels day `i + 1`
    #[serde(default)]
    pub split: Vec<String>,
    #[serde(default)]
    pub items: Vec<PlanItem>,
    #[serde(default)]
    pub notes: String,
}

/// Envelope of the `POST /api/generate` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub plan: Plan,
}

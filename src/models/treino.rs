// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved workouts (`treinos`), objectives and the quick generator response.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exercise reference inside a saved workout: numeric id or name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExerciseRef {
    Id(i64),
    Name(String),
}

impl fmt::Display for ExerciseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseRef::Id(id) => write!(f, "{}", id),
            ExerciseRef::Name(name) => f.write_str(name),
        }
    }
}

/// Saved workout as listed by `GET /treinos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treino {
    pub id: i64,
    pub nivel: String,
    pub objetivo: String,
    pub dias: u32,
    pub divisao: String,
    #[serde(default)]
    pub exercicios: Vec<ExerciseRef>,
}

impl Treino {
    /// One-line summary as shown on the dashboard.
    pub fn summary(&self) -> String {
        let exercicios: Vec<String> = self.exercicios.iter().map(|e| e.to_string()).collect();
        format!(
            "{} – {} / {} | Dias: {} | Exercícios: {}",
            self.divisao,
            self.nivel,
            self.objetivo,
            self.dias,
            exercicios.join(", ")
        )
    }
}

/// Body of `POST /treino/criar`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTreino {
    pub nivel: String,
    pub objetivo: String,
    pub dias: u32,
    pub divisao: String,
    pub exercicios: Vec<i64>,
}

impl Default for NewTreino {
    /// Starter workout created from the dashboard button.
    fn default() -> Self {
        Self {
            nivel: "iniciante".to_string(),
            objetivo: "emagrecimento".to_string(),
            dias: 3,
            divisao: "A".to_string(),
            exercicios: vec![1, 2, 11],
        }
    }
}

/// Response of `POST /treino/criar`. The server acknowledges the new id; the
/// full workout is only visible through `GET /treinos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedTreino {
    pub treino_id: i64,
    #[serde(default)]
    pub mensagem: Option<String>,
}

/// Training objective from `GET /objetivos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub id: i64,
    pub nome: String,
}

/// Body of `POST /gerar-treino`.
#[derive(Debug, Clone, Serialize)]
pub struct QuickPlanRequest {
    pub objetivo: String,
}

/// Exercise entry of a quick plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickExercise {
    pub exercicio_id: i64,
    pub nome: String,
    pub series: u32,
    pub repeticoes: String,
}

/// Response of `POST /gerar-treino`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickPlan {
    /// Present when the server persisted the plan
    pub id: Option<i64>,
    pub treino_id: String,
    #[serde(default)]
    pub exercicios: Vec<QuickExercise>,
    #[serde(default)]
    pub coach_notes: Option<String>,
}

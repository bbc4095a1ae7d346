// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Anima command line client
//!
//! Each subcommand mounts one view through the session guard and prints
//! the result. The session token persists in the configured session file.

use anima_client::{
    config::Config,
    error::ClientError,
    models::NewTreino,
    routes::{History, Route},
    services::{CredentialStore, EquipmentSelection, GuardDecision, PlanSelection},
    views::{SubmitOutcome, ViewOutcome},
    AppState,
};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "anima", about = "Anima workout planner client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ANIMA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ANIMA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the session token
    Logout,
    /// Show whether a session token is stored
    Status,
    /// List training objectives
    Objectives,
    /// List saved workouts
    Plans,
    /// Create the starter workout and list saved workouts
    CreatePlan,
    /// Generate a weekly plan
    Generate {
        #[arg(long)]
        goal: String,
        #[arg(long)]
        level: String,
        #[arg(long, default_value_t = 3)]
        days: i64,
        /// Equipment tag; repeat for several
        #[arg(long = "equipment")]
        equipment: Vec<String>,
        /// Comma separated restrictions
        #[arg(long, default_value = "")]
        restrictions: String,
    },
    /// Quick plan from a goal only
    Quick {
        #[arg(long)]
        goal: String,
    },
    /// Check API health
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuração inválida: {}", e);
            return ExitCode::from(2);
        }
    };
    tracing::debug!(api_url = %config.api_url, "Starting Anima client");

    let credentials = CredentialStore::file(&config.session_path);
    let history = History::new();
    let state = AppState::new(config, credentials, Arc::new(history.clone()));

    match run(&state, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            if history.current() == Some(Route::Login) {
                eprintln!("Faça login com `anima login`.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(state: &AppState, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            if let GuardDecision::Redirected(_) = state.guard.enter(Route::Login)? {
                println!("Você já está conectado.");
                return Ok(());
            }
            state
                .guard
                .sign_in(&email, &password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Login realizado.");
        }
        Command::Register {
            name,
            email,
            password,
        } => {
            if let GuardDecision::Redirected(_) = state.guard.enter(Route::Register)? {
                println!("Você já está conectado.");
                return Ok(());
            }
            let created = state
                .guard
                .sign_up(&name, &email, &password)
                .await
                .map_err(registration_error)?;
            println!("Cadastrado com sucesso! ID: {}", created.user_id);
        }
        Command::Logout => {
            state.guard.enter(Route::Logout)?;
            println!("Sessão encerrada.");
        }
        Command::Status => {
            if state.guard.is_authenticated() {
                println!("Conectado ({})", state.config.api_url);
            } else {
                println!("Não conectado");
            }
        }
        Command::Objectives => {
            let view = state.dashboard();
            settle(view.load_objectives().await)?;
            for objective in view.objectives() {
                println!("{}\t{}", objective.id, objective.nome);
            }
        }
        Command::Plans => {
            let view = state.dashboard();
            settle(view.mount().await)?;
            print!("{}", view.render());
        }
        Command::CreatePlan => {
            let view = state.dashboard();
            settle(view.create(&NewTreino::default()).await)?;
            print!("{}", view.render());
        }
        Command::Generate {
            goal,
            level,
            days,
            equipment,
            restrictions,
        } => {
            let view = state.generator();
            settle(view.mount())?;
            let selection = PlanSelection {
                goal,
                level,
                days_per_week: days,
                equipment: equipment.iter().collect::<EquipmentSelection>(),
                restrictions,
            };
            submitted(view.submit(&selection).await)?;
            print!("{}", view.render());
        }
        Command::Quick { goal } => {
            let view = state.generator();
            settle(view.mount())?;
            submitted(view.submit_quick(&goal).await)?;
            print!("{}", view.render());
        }
        Command::Health => {
            let text = state
                .api
                .health()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}", text.trim());
        }
    }
    Ok(())
}

/// Validation and server-side rejections (e.g. a taken email) keep their
/// detail; anything else gets the generic registration message.
fn registration_error(err: ClientError) -> anyhow::Error {
    match err {
        ClientError::Validation(_) | ClientError::Api { .. } => {
            anyhow::anyhow!(err.user_message())
        }
        other => {
            tracing::warn!(error = %other, "Registration failed");
            anyhow::anyhow!("Falha no registro. Tente novamente.")
        }
    }
}

fn settle(outcome: ViewOutcome) -> anyhow::Result<()> {
    match outcome {
        ViewOutcome::Rendered => Ok(()),
        ViewOutcome::Redirected(route) => {
            anyhow::bail!("Sessão ausente ou expirada (redirecionado para {}).", route)
        }
        ViewOutcome::Failed(msg) => anyhow::bail!(msg),
        ViewOutcome::Discarded => anyhow::bail!("Operação cancelada."),
    }
}

fn submitted(outcome: SubmitOutcome) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Busy => anyhow::bail!("Já existe uma geração em andamento."),
        SubmitOutcome::Settled(outcome) => settle(outcome),
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("anima_client=warn,warn"));

    tracing_subscriber::registry().with(filter).with(format).init();
}

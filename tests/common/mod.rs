// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the Anima API.
//!
//! Issues and checks HS256 tokens like the real server, records every
//! request it sees, and can be told to answer a path with a fixed status.

use anima_client::config::Config;
use anima_client::routes::History;
use anima_client::services::CredentialStore;
use anima_client::AppState;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const SIGNING_KEY: &[u8] = b"test_signing_key_32_bytes_long!!";
pub const EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "secret";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    iat: usize,
}

/// A request as seen by the mock server.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct MockState {
    requests: Mutex<Vec<RecordedRequest>>,
    treinos: Mutex<Vec<Value>>,
    forced: Mutex<HashMap<String, (StatusCode, String)>>,
    generate_delay: Mutex<Duration>,
}

#[allow(dead_code)]
impl MockState {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Answer `path` with `status` and `body` until cleared.
    pub fn force(&self, path: &str, status: StatusCode, body: &str) {
        self.forced
            .lock()
            .unwrap()
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn set_generate_delay(&self, delay: Duration) {
        *self.generate_delay.lock().unwrap() = delay;
    }
}

/// Running mock server.
pub struct MockServer {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Start the mock API on an ephemeral port.
pub async fn start_mock_server() -> MockServer {
    let state = Arc::new(MockState::default());
    state.treinos.lock().unwrap().push(json!({
        "id": 1,
        "nivel": "iniciante",
        "objetivo": "hipertrofia",
        "dias": 3,
        "divisao": "ABC",
        "exercicios": ["Supino", "Remada"]
    }));

    let app = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/objetivos", get(objetivos))
        .route("/treinos", get(list_treinos))
        .route("/treino/criar", post(create_treino))
        .route("/gerar-treino", post(quick_generate))
        .route("/api/generate", post(generate))
        .route("/health", get(|| async { "ok" }))
        .route("/empty", post(|| async { StatusCode::NO_CONTENT }))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });

    MockServer {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// Client wired to a fresh mock server with an in-memory session.
#[allow(dead_code)]
pub struct TestApp {
    pub server: MockServer,
    pub app: AppState,
    pub history: History,
    pub credentials: CredentialStore,
}

#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    let server = start_mock_server().await;
    let credentials = CredentialStore::in_memory();
    let config = Config {
        api_url: server.base_url.clone(),
        ..Config::default()
    };
    let history = History::new();
    let app = AppState::new(config, credentials.clone(), Arc::new(history.clone()));
    TestApp {
        server,
        app,
        history,
        credentials,
    }
}

/// Mint a token the mock accepts. Expiry is checked with 60s leeway, so
/// an expired token needs a `ttl_secs` well below zero.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: u64, ttl_secs: i64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + ttl_secs) as usize,
        iat: now as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SIGNING_KEY),
    )
    .unwrap()
}

/// Address nothing listens on.
#[allow(dead_code)]
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

// ─── Middleware ─────────────────────────────────────────────────────────────

async fn record(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, 1024 * 1024).await.unwrap_or_default();

    let header_str = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    state.requests.lock().unwrap().push(RecordedRequest {
        method: parts.method.clone(),
        path: parts.uri.path().to_string(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    });

    let forced = state
        .forced
        .lock()
        .unwrap()
        .get(parts.uri.path())
        .cloned();
    if let Some((status, body)) = forced {
        return (status, body).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn authorize(headers: &HeaderMap) -> Result<u64, Response> {
    let unauthorized = |msg: &'static str| (StatusCode::UNAUTHORIZED, msg).into_response();

    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("missing bearer"))?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(SIGNING_KEY),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| unauthorized("Token inválido"))?;

    data.claims.sub.parse().map_err(|_| unauthorized("Token inválido"))
}

// ─── Handlers ───────────────────────────────────────────────────────────────

async fn login(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    if email != EMAIL || password != PASSWORD {
        return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
    }
    Json(json!({ "token": create_test_jwt(7, 3600) })).into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({"title": "Conflict", "detail": "email já cadastrado"})),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(json!({ "user_id": 42 }))).into_response()
}

async fn objetivos(headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&headers) {
        return r;
    }
    Json(json!([
        {"id": 1, "nome": "Hipertrofia"},
        {"id": 2, "nome": "Emagrecimento"}
    ]))
    .into_response()
}

async fn list_treinos(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Err(r) = authorize(&headers) {
        return r;
    }
    Json(Value::Array(state.treinos.lock().unwrap().clone())).into_response()
}

async fn create_treino(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(r) = authorize(&headers) {
        return r;
    }
    let mut treinos = state.treinos.lock().unwrap();
    let id = treinos.len() as i64 + 1;
    let mut treino = body;
    treino["id"] = json!(id);
    treinos.push(treino);
    Json(json!({ "mensagem": "Treino criado com sucesso", "treino_id": id })).into_response()
}

async fn quick_generate(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if let Err(r) = authorize(&headers) {
        return r;
    }
    let reps = if body["objetivo"] == "forca" { "4-6" } else { "8-12" };
    (
        StatusCode::CREATED,
        Json(json!({
            "id": 10,
            "treino_id": "gen-20260101T120000",
            "exercicios": [
                {"exercicio_id": 1, "nome": "Agachamento", "series": 3, "repeticoes": reps},
                {"exercicio_id": 2, "nome": "Supino", "series": 4, "repeticoes": reps}
            ],
            "coach_notes": "Mantenha técnica perfeita."
        })),
    )
        .into_response()
}

/// Plan with two items per day except the last, listed round-robin so
/// the client has to regroup them. The token is checked after the delay.
async fn generate(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let delay = *state.generate_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if let Err(r) = authorize(&headers) {
        return r;
    }

    let days = body["days_per_week"].as_u64().unwrap_or(3);
    let split: Vec<String> = (1..=days).map(|d| format!("Treino {}", d)).collect();
    let mut items = Vec::new();
    for round in 0..2 {
        for day in 1..days {
            let reps = if round == 0 { json!("8-12") } else { json!(10) };
            items.push(json!({
                "exercise_id": format!("d{}-r{}", day, round),
                "day_index": day,
                "name": format!("Exercício {}.{}", day, round),
                "sets": 3,
                "reps": reps,
                "rest_seconds": 60
            }));
        }
    }

    Json(json!({
        "plan": {
            "goal": body["goal"],
            "level": body["level"],
            "days_per_week": days,
            "split": split,
            "items": items,
            "notes": "Progressão gradual."
        }
    }))
    .into_response()
}

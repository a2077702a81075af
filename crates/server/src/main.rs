// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod actor;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use pizzeria_api::{
    AddPizzaToOrderRequest, ApiError, OrderResponse, PizzaResponse, StartOrderResponse,
    add_pizza_to_order, get_latest_order, get_order, list_pizzas, start_order,
};
use pizzeria_audit::Actor;
use pizzeria_persistence::Persistence;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::actor::RequestActor;

/// Pizzeria Server - HTTP server for the pizzeria store
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "PIZZERIA_DATABASE")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, env = "PIZZERIA_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// Port to bind the server to
    #[arg(short, long, env = "PIZZERIA_PORT", default_value_t = 3000)]
    port: u16,

    /// Do not insert the menu pizzas at startup
    #[arg(long, env = "PIZZERIA_SKIP_SEED")]
    skip_seed: bool,
}

/// Application state shared across handlers.
///
/// Diesel connections are synchronous, so the persistence layer sits behind
/// an async mutex. Each handler holds the lock for one whole load-mutate-save
/// sequence and never awaits while a transaction is open.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// Body of the health probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status != StatusCode::INTERNAL_SERVER_ERROR {
            warn!(status = status.as_u16(), error = %err, "Request rejected");
        }
        Self {
            status,
            message: err.message().to_string(),
        }
    }
}

/// Parses an identifier taken from the request path.
///
/// Axum's own `Path<Uuid>` rejection is plain text with parser detail, so ids
/// are extracted as strings and rejected here with the usual error body.
fn parse_path_id(field: &str, label: &str, value: &str) -> Result<Uuid, HttpError> {
    Uuid::parse_str(value).map_err(|_| {
        HttpError::from(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Invalid {label} ID."),
        })
    })
}

#[allow(clippy::unused_async)]
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

async fn handle_list_pizzas(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<PizzaResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<PizzaResponse> = list_pizzas(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_start_order(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
) -> Result<Json<StartOrderResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: StartOrderResponse = start_order(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_get_latest_order(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<OrderResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: OrderResponse = get_latest_order(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_get_order(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderResponse>, HttpError> {
    let order_id: Uuid = parse_path_id("order_id", "order", &order_id)?;

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderResponse = get_order(&mut persistence, order_id)?;
    drop(persistence);

    Ok(Json(response))
}

async fn handle_add_pizza_to_order(
    AxumState(app_state): AxumState<AppState>,
    RequestActor(actor): RequestActor,
    Path((order_id, pizza_id)): Path<(String, String)>,
) -> Result<Json<OrderResponse>, HttpError> {
    let request: AddPizzaToOrderRequest = AddPizzaToOrderRequest {
        order_id: parse_path_id("order_id", "order", &order_id)?,
        pizza_id: parse_path_id("pizza_id", "pizza", &pizza_id)?,
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: OrderResponse = add_pizza_to_order(&mut persistence, &request, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/pizzas", get(handle_list_pizzas))
        .route("/orders", post(handle_start_order))
        .route("/orders/latest", get(handle_get_latest_order))
        .route("/orders/{order_id}", get(handle_get_order))
        .route(
            "/orders/{order_id}/pizzas/{pizza_id}",
            put(handle_add_pizza_to_order),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Pizzeria Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if args.skip_seed {
        info!("Skipping menu seeding");
    } else {
        let inserted: usize = persistence.seed_menu(&Actor::system())?;
        info!(inserted, "Menu ready");
    }

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

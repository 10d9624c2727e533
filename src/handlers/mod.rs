//! HTTP surface of the poll service.
//!
//! Routes are bundled via [`setup`] into an [`axum::Router`], which [`run`]
//! serves on the configured address (see [`config`][`crate::config`]).

mod poll;
mod vote;

use crate::config::SRV_ADDRESS;
use crate::error::{PollError, RegistryError};
use crate::store::Store;
use crate::users::{Login, UserRegistry};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::{HeaderName, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};

pub struct AppState {
    pub store: Store,
    pub users: UserRegistry,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            store: Store::new(),
            users: UserRegistry::new(),
        }
    }
}

/// Builds the router with all routes and middleware attached.
pub fn setup(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/user", post(create_or_login_user))
        .route("/api/poll", post(poll::create_poll))
        .route("/api/poll/:poll_id", get(poll::get_poll_info))
        .route("/api/vote", post(vote::vote_in_poll))
        .layer(middleware::from_fn(log_requests))
        .layer(cors())
        .with_state(state)
}

/// Serves an application built by [`setup`] until SIGINT or SIGTERM.
pub async fn run(app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(SRV_ADDRESS.as_str()).await?;
    info!("Listening on: {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down... Goodbye!");
    Ok(())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::ACCEPT,
            HeaderName::from_static("token"),
        ])
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "[{} {}] -> {} ({:?})",
        method,
        uri,
        response.status(),
        started.elapsed()
    );
    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub msg: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MsgResponse {
    pub msg: String,
}

/// A rejection rendered as `{ "Msg", "Reason" }` with its status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    msg: &'static str,
    reason: String,
}

impl ApiError {
    pub fn bad_request(msg: &'static str, reason: impl ToString) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            msg,
            reason: reason.to_string(),
        }
    }

    pub fn not_found(reason: impl ToString) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            msg: "Poll not found!",
            reason: reason.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            msg: self.msg.to_string(),
            reason: self.reason,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<PollError> for ApiError {
    fn from(err: PollError) -> Self {
        let msg = match &err {
            PollError::PollNotFound(_) => return ApiError::not_found(&err),
            PollError::InvalidOptionCount { .. } => "Invalid option count!",
            PollError::EmptyOption | PollError::DuplicateOption(_) => "Invalid poll options!",
            PollError::AlreadyVoted(_) => "The user has already voted!",
            PollError::PollClosed => "The poll already ended!",
            PollError::IncompleteRanking(_) => "Incomplete voting options!",
            PollError::InvalidPosition(_) => "The 0 rank is not existent!",
            PollError::PositionOutOfRange { .. } => {
                "An option has a rank greater than voting options!"
            }
        };
        ApiError::bad_request(msg, err)
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        ApiError::bad_request("Invalid credentials", err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid object received!", rejection.body_text())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateOrLoginUserRequest {
    pub username: String,
    pub password: String,
}

async fn create_or_login_user(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateOrLoginUserRequest>, JsonRejection>,
) -> Result<Json<MsgResponse>, ApiError> {
    let Json(req) = body?;

    let msg = match state
        .users
        .register_or_login(&req.username, &req.password)
        .await?
    {
        Login::Registered => format!("Registered {} user!", req.username),
        Login::LoggedIn => format!("User {} logging in!", req.username),
    };

    Ok(Json(MsgResponse { msg }))
}

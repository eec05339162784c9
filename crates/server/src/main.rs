use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use progress::{Catalog, ProgressEngine, ProgressError};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{BackForm, SubmitForm},
};
use storage::{MemorySessionStore, SessionStore};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod cookie;
mod render;

use app_state::AppState;
use config::load_settings;
use cookie::{session_cookie, session_from_headers};

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings();
    let store = MemorySessionStore::new(settings.session_ttl());
    if settings.session_sweep_seconds > 0 {
        spawn_session_sweeper(
            store.clone(),
            Duration::from_secs(settings.session_sweep_seconds),
        );
    }

    let catalog = Arc::new(Catalog::standard()?);
    info!(
        questions = catalog.len(),
        session_ttl_seconds = store.ttl().num_seconds(),
        "catalog loaded"
    );
    let engine = ProgressEngine::new(catalog, Arc::new(store));
    let app = build_router(Arc::new(AppState { engine }), settings.max_form_bytes);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn spawn_session_sweeper(store: MemorySessionStore, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(removed) => {
                    let remaining = store.session_count().await;
                    info!(removed, remaining, "expired sessions evicted")
                }
                Err(error) => warn!(%error, "session sweep failed"),
            }
        }
    });
}

fn build_router(state: Arc<AppState>, max_form_bytes: usize) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/healthz", get(healthz))
        .route("/start", get(start))
        .route("/submit", post(submit))
        .route("/back", post(back))
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(max_form_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn landing() -> Html<String> {
    render::landing_page()
}

async fn not_found() -> HttpError {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(ErrorCode::NotFound, "no such page")),
    )
}

async fn start(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Html<String>, HttpError> {
    let session_id = session_from_headers(&headers);
    let view = state
        .engine
        .start(session_id.as_ref())
        .await
        .map_err(http_error)?;
    Ok(render::step_page(&view))
}

async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<SubmitForm>,
) -> Result<impl IntoResponse, HttpError> {
    let presented = session_from_headers(&headers);
    let outcome = state
        .engine
        .submit(presented.as_ref(), form.question_id, form.answer)
        .await
        .map_err(http_error)?;
    if outcome.session_issued {
        info!(session_id = %outcome.session_id, "session started");
    }

    let cookie = session_cookie(&outcome.session_id).map_err(|e| {
        error!(error = %e, "session id is not a valid header value");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::Internal, "failed to set session cookie")),
        )
    })?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        render::step_page(&outcome.view),
    ))
}

async fn back(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<BackForm>,
) -> Result<Html<String>, HttpError> {
    let session_id = session_from_headers(&headers);
    let view = state
        .engine
        .back(session_id.as_ref(), form.question_id)
        .await
        .map_err(http_error)?;
    Ok(render::step_page(&view))
}

fn http_error(err: ProgressError) -> HttpError {
    let api: ApiError = err.into();
    let status = match api.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(message = %api.message, "request failed");
    } else {
        warn!(message = %api.message, "request rejected");
    }
    (status, Json(api))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

use std::any::Any;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::Response;
use axum::routing::any;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::core::error::INTERNAL_ERROR_MESSAGE;
use crate::core::types::{HandlerResponse, InboundRequest};
use crate::handler::TranslationHandler;

/// Every method on `/` and `/translate` goes to the handler; method gating
/// happens there, not in the router.
pub fn router(handler: TranslationHandler) -> Router {
    Router::new()
        .route("/", any(translate_endpoint))
        .route("/translate", any(translate_endpoint))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(handler)
}

pub async fn serve(listener: TcpListener, handler: TranslationHandler) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, provider = %handler.provider().id(), "translation endpoint listening");
    }
    axum::serve(listener, router(handler)).await
}

async fn translate_endpoint(
    State(handler): State<TranslationHandler>,
    method: Method,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&body).into_owned())
    };

    let response = handler
        .handle(InboundRequest::new(method.as_str(), body))
        .await;
    into_http_response(response)
}

pub fn into_http_response(response: HandlerResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    builder.body(Body::from(response.body)).unwrap_or_else(|err| {
        error!(error = %err, "failed to build http response");
        let mut fallback = Response::new(Body::empty());
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(%detail, "request processing panicked");

    into_http_response(HandlerResponse::error(500, INTERNAL_ERROR_MESSAGE))
}

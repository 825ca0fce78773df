//! HTTP binding for the dispatcher.

use super::dispatcher::{Dispatcher, Reply, ThingRequest};
use super::middleware::{ThingLayer, ThingState};
use crate::core::error::ThingError;
use crate::core::protocol::constants::{headers, media_types};
use crate::core::types::ThingStatus;
use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
    Extension, Router,
};
use bytes::Bytes;
use std::sync::Arc;

/// Build the application router.
///
/// Every path is handed to the dispatcher, which owns routing, so the router
/// only has a fallback.
pub fn thing_router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(dispatcher)
        .layer(ThingLayer::new().middleware())
}

async fn dispatch(
    State(dispatcher): State<Arc<Dispatcher>>,
    Extension(thing_state): Extension<Arc<ThingState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let request = ThingRequest {
        method,
        path: uri.path().to_string(),
        accept: thing_state.accept.clone(),
        content_type: thing_state.content_type.clone(),
        observe: thing_state.subscribe,
        body,
    };

    match dispatcher.handle(&request) {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!("{} {} rejected: {}", request.method, request.path, e);
            } else {
                tracing::error!("{} {} failed: {}", request.method, request.path, e);
            }
            e.into_response()
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Complete {
                status,
                representation,
                body,
            } => (
                status.http_status(),
                [(header::CONTENT_TYPE, representation.token)],
                body,
            )
                .into_response(),
            Reply::Subscription(subscription) => {
                let content_type = subscription.representation().token.clone();
                (
                    ThingStatus::Subscribed.http_status(),
                    [
                        (header::CONTENT_TYPE, content_type),
                        (headers::SUBSCRIBE, "true".to_string()),
                        (header::CACHE_CONTROL, "no-cache".to_string()),
                    ],
                    Body::from_stream(subscription.into_stream()),
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for ThingError {
    fn into_response(self) -> Response {
        (
            self.status().http_status(),
            [(header::CONTENT_TYPE, media_types::TEXT_PLAIN)],
            self.to_string(),
        )
            .into_response()
    }
}

//! Axum middleware lifting negotiation headers out of the request.

use crate::core::protocol::wants_observation;
use axum::{
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Negotiation state extracted from HTTP request headers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ThingState {
    pub accept: Option<String>,
    pub content_type: Option<String>,
    /// `Subscribe: true` or `Observe: 0` was sent.
    pub subscribe: bool,
}

impl ThingState {
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        // repeated Accept lines form one comma-separated list
        let accept: Vec<&str> = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        ThingState {
            accept: (!accept.is_empty()).then(|| accept.join(", ")),
            content_type: headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            subscribe: wants_observation(headers),
        }
    }
}

async fn thing_middleware_handler(mut req: Request, next: Next) -> Response {
    let thing_state = ThingState::from_headers(req.headers());
    req.extensions_mut().insert(Arc::new(thing_state));

    let mut response = next.run(req).await;
    response.headers_mut().append(
        header::VARY,
        HeaderValue::from_static("Accept, Content-Type"),
    );
    response
}

/// Axum middleware layer inserting an `Arc<ThingState>` extension.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThingLayer;

impl ThingLayer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn middleware(
        &self,
    ) -> impl tower::Layer<
        axum::routing::Route,
        Service = impl tower::Service<
            Request,
            Response = Response,
            Error = std::convert::Infallible,
            Future = impl Send + 'static,
        > + Clone
                      + Send
                      + Sync
                      + 'static,
    > + Clone {
        axum::middleware::from_fn(thing_middleware_handler)
    }
}

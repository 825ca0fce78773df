//! Per-request routing and representation negotiation.
//!
//! The dispatcher is transport-neutral: it takes a [`ThingRequest`] (already
//! lifted out of HTTP by the middleware) and returns a [`Reply`] or a
//! [`ThingError`]. Each request moves through
//!
//! ```text
//! ReceivePath ─▶ ValidateResource ─┬▶ ServeDescription ─┐
//!                                  ├▶ HandleProperty ───┤
//!                                  ├▶ HandleAction ─────┼▶ Respond
//!                                  └▶ HandleEvent ──────┘
//! ```
//!
//! Every negotiation failure is raised before the state is touched.

use super::state::{CounterState, Mutation, Watched};
use super::subscription::{Subscription, SubscriptionManager};
use crate::core::description::ThingDescription;
use crate::core::error::{Result, ThingError};
use crate::core::protocol::{
    negotiate_accept, negotiate_content_type, negotiate_description_accept, Representation,
    RepresentationRegistry, OBSERVE_SEGMENT,
};
use crate::core::types::{AffordanceKind, ThingStatus};
use bytes::Bytes;
use http::Method;
use std::sync::Arc;

/// A request as seen by the dispatcher.
#[derive(Clone, Debug)]
pub struct ThingRequest {
    pub method: Method,
    pub path: String,
    /// Raw `Accept` value, if any.
    pub accept: Option<String>,
    /// Raw `Content-Type` value, if any.
    pub content_type: Option<String>,
    /// Observation requested through a header.
    pub observe: bool,
    pub body: Bytes,
}

impl ThingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            accept: None,
            content_type: None,
            observe: false,
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn observed(mut self) -> Self {
        self.observe = true;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Outcome of a successful request.
#[derive(Debug)]
pub enum Reply {
    /// A single encoded payload.
    Complete {
        status: ThingStatus,
        representation: Representation,
        body: Bytes,
    },
    /// A stream of notifications; the transport owns its lifetime.
    Subscription(Subscription),
}

impl Reply {
    #[must_use]
    pub fn status(&self) -> ThingStatus {
        match self {
            Reply::Complete { status, .. } => *status,
            Reply::Subscription(_) => ThingStatus::Subscribed,
        }
    }
}

/// Where a path points, after validation.
#[derive(Debug, PartialEq, Eq)]
enum Target<'a> {
    Description,
    Affordance {
        kind: AffordanceKind,
        name: &'a str,
        observe: bool,
    },
}

/// Routes requests to the description, the state store and the
/// subscription manager.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    thing_name: String,
    registry: Arc<RepresentationRegistry>,
    description: Arc<ThingDescription>,
    state: Arc<CounterState>,
    subscriptions: SubscriptionManager,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        thing_name: impl Into<String>,
        registry: Arc<RepresentationRegistry>,
        description: Arc<ThingDescription>,
        state: Arc<CounterState>,
        subscriptions: SubscriptionManager,
    ) -> Self {
        Self {
            thing_name: thing_name.into(),
            registry,
            description,
            state,
            subscriptions,
        }
    }

    #[inline]
    #[must_use]
    pub fn thing_name(&self) -> &str {
        &self.thing_name
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &RepresentationRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &ThingDescription {
        &self.description
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &Arc<CounterState> {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    /// Handle one request.
    ///
    /// # Errors
    ///
    /// Routing, negotiation and payload failures, each mapped to a
    /// [`ThingStatus`] by [`ThingError::status`].
    pub fn handle(&self, request: &ThingRequest) -> Result<Reply> {
        tracing::debug!("{} {}", request.method, request.path);

        match self.resolve(&request.path)? {
            Target::Description => self.serve_description(request),
            Target::Affordance {
                kind,
                name,
                observe,
            } => {
                let observe = observe || request.observe;
                match kind {
                    AffordanceKind::Property => self.handle_property(request, name, observe),
                    AffordanceKind::Action => self.handle_action(request, name),
                    AffordanceKind::Event => self.handle_event(request, observe),
                }
            }
        }
    }

    fn resolve<'p>(&self, path: &'p str) -> Result<Target<'p>> {
        let not_found = || ThingError::NotFound(path.to_string());
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [thing] if *thing == self.thing_name => Ok(Target::Description),
            [thing, section, name, rest @ ..] if *thing == self.thing_name => {
                let kind = AffordanceKind::from_section(section).ok_or_else(not_found)?;
                if self.description.affordance(kind, name).is_none() {
                    return Err(not_found());
                }
                let observe = match rest {
                    [] => false,
                    [segment] if *segment == OBSERVE_SEGMENT && kind != AffordanceKind::Action => {
                        true
                    }
                    _ => return Err(not_found()),
                };
                Ok(Target::Affordance {
                    kind,
                    name: *name,
                    observe,
                })
            }
            _ => Err(not_found()),
        }
    }

    fn serve_description(&self, request: &ThingRequest) -> Result<Reply> {
        if request.method != Method::GET {
            return Err(ThingError::method_not_allowed(&request.method, &request.path));
        }
        let representation =
            negotiate_description_accept(&self.registry, request.accept.as_deref())?;
        let body = representation
            .encoding
            .encode(self.description.current_description())?;

        Ok(Reply::Complete {
            status: ThingStatus::Ok,
            representation: representation.clone(),
            body,
        })
    }

    fn handle_property(&self, request: &ThingRequest, name: &str, observe: bool) -> Result<Reply> {
        if request.method != Method::GET {
            return Err(ThingError::method_not_allowed(&request.method, &request.path));
        }
        let watched =
            Watched::from_property(name).ok_or_else(|| ThingError::NotFound(request.path.clone()))?;
        let representation = negotiate_accept(&self.registry, request.accept.as_deref())?;

        if observe {
            let observable = self
                .description
                .affordance(AffordanceKind::Property, name)
                .is_some_and(|a| a.observable);
            if !observable {
                return Err(ThingError::BadRequest(format!(
                    "property {} is not observable",
                    name
                )));
            }
            let subscription = self.subscriptions.subscribe(watched, representation);
            return Ok(Reply::Subscription(subscription));
        }

        let value = watched.project(&self.state.snapshot());
        Ok(Reply::Complete {
            status: ThingStatus::Ok,
            representation: representation.clone(),
            body: representation.encoding.encode(&value)?,
        })
    }

    fn handle_action(&self, request: &ThingRequest, name: &str) -> Result<Reply> {
        if request.method != Method::POST {
            return Err(ThingError::method_not_allowed(&request.method, &request.path));
        }
        let mutation =
            Mutation::from_action(name).ok_or_else(|| ThingError::NotFound(request.path.clone()))?;

        let input = negotiate_content_type(&self.registry, request.content_type.as_deref())?;
        let output = negotiate_accept(&self.registry, request.accept.as_deref())?;
        let operand = input.encoding.decode_operand(&request.body)?;

        let snapshot = self.state.apply(mutation, operand)?;
        tracing::info!(
            "{} {} -> {} ({} -> {})",
            name,
            operand,
            snapshot.result,
            input.token,
            output.token
        );

        Ok(Reply::Complete {
            status: ThingStatus::Changed,
            representation: output.clone(),
            body: output.encoding.encode(&snapshot.result)?,
        })
    }

    fn handle_event(&self, request: &ThingRequest, observe: bool) -> Result<Reply> {
        if request.method != Method::GET {
            return Err(ThingError::method_not_allowed(&request.method, &request.path));
        }
        if !observe {
            return Err(ThingError::ObservationRequired(request.path.clone()));
        }
        let representation = negotiate_accept(&self.registry, request.accept.as_deref())?;
        Ok(Reply::Subscription(
            self.subscriptions.subscribe(Watched::Result, representation),
        ))
    }
}

//! Polling-based change notification.
//!
//! A single background task polls [`CounterState`] at a fixed interval and
//! publishes changed snapshots on a `tokio::sync::watch` channel. Every
//! subscription holds its own receiver, the field it watches and the last
//! value it sent, so subscribers never interfere with each other and the
//! state is polled once per tick no matter how many are connected.
//!
//! ```text
//!              ┌──────────── poller (one task) ────────────┐
//! CounterState ─▶ tick: snapshot, send_if_modified          │
//!              └───────────────────┬────────────────────────┘
//!                                  │ watch::Sender<CounterSnapshot>
//!               ┌──────────────────┼──────────────────┐
//!               ▼                  ▼                  ▼
//!       Subscription(result)  Subscription(result)  Subscription(lastChange)
//!       baseline, JSON        baseline, CBOR        baseline, JSON
//! ```
//!
//! A subscription ends when its stream is dropped, which for HTTP happens
//! when the connection closes. No timer is owned by a subscription.

use super::state::{CounterSnapshot, CounterState, Watched, WatchedValue};
use crate::core::error::{Result, ThingError};
use crate::core::protocol::Representation;
use bytes::Bytes;
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Aborts the poller when the last manager clone goes away.
#[derive(Debug)]
struct PollerHandle(JoinHandle<()>);

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Fan-out of state changes to any number of subscriptions.
#[derive(Clone, Debug)]
pub struct SubscriptionManager {
    state: Arc<CounterState>,
    sender: Arc<watch::Sender<CounterSnapshot>>,
    interval: Duration,
    _poller: Arc<PollerHandle>,
}

impl SubscriptionManager {
    /// Start the poller. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// [`ThingError::Config`] if `interval` is zero.
    pub fn spawn(state: Arc<CounterState>, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(ThingError::Config(
                "subscription poll interval must be greater than zero".to_string(),
            ));
        }
        let (sender, _) = watch::channel(state.snapshot());
        let sender = Arc::new(sender);
        let poller = tokio::spawn(poll_loop(state.clone(), sender.clone(), interval));
        tracing::debug!("Subscription poller started, interval {:?}", interval);

        Ok(Self {
            state,
            sender,
            interval,
            _poller: Arc::new(PollerHandle(poller)),
        })
    }

    /// Open a subscription on `watched`, encoded as `representation`.
    ///
    /// The baseline is read from the state itself rather than from the last
    /// published snapshot, so changes applied before this call are never
    /// reported as notifications.
    #[must_use]
    pub fn subscribe(&self, watched: Watched, representation: &Representation) -> Subscription {
        let receiver = self.sender.subscribe();
        let baseline = watched.project(&self.state.snapshot());
        tracing::debug!(
            "New subscription on {:?} as {} ({} active)",
            watched,
            representation.token,
            self.active()
        );

        Subscription {
            receiver,
            watched,
            baseline,
            representation: representation.clone(),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn active(&self) -> usize {
        self.sender.receiver_count()
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

async fn poll_loop(
    state: Arc<CounterState>,
    sender: Arc<watch::Sender<CounterSnapshot>>,
    period: Duration,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if sender.receiver_count() == 0 {
            continue;
        }
        let snapshot = state.snapshot();
        sender.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

/// One active subscription.
#[derive(Debug)]
pub struct Subscription {
    receiver: watch::Receiver<CounterSnapshot>,
    watched: Watched,
    baseline: WatchedValue,
    representation: Representation,
}

impl Subscription {
    #[must_use]
    pub fn watched(&self) -> Watched {
        self.watched
    }

    #[must_use]
    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    #[must_use]
    pub fn baseline(&self) -> WatchedValue {
        self.baseline
    }

    /// Wait for the watched value to differ from the baseline.
    ///
    /// Returns `None` once the manager has shut down.
    pub async fn next_change(&mut self) -> Option<WatchedValue> {
        loop {
            if self.receiver.changed().await.is_err() {
                return None;
            }
            let value = self.watched.project(&self.receiver.borrow_and_update());
            if value != self.baseline {
                self.baseline = value;
                return Some(value);
            }
        }
    }

    /// Framed notifications in the representation fixed at subscription time.
    ///
    /// A value that fails to encode is logged and skipped; the stream stays
    /// open.
    pub fn into_stream(self) -> impl Stream<Item = std::result::Result<Bytes, Infallible>> + Send + 'static {
        let mut subscription = self;
        async_stream::stream! {
            while let Some(value) = subscription.next_change().await {
                match subscription.representation.encoding.encode_frame(&value) {
                    Ok(frame) => yield Ok(frame),
                    Err(e) => tracing::warn!(
                        "Skipping notification for {:?}: {}",
                        subscription.watched,
                        e
                    ),
                }
            }
            tracing::debug!("Subscription on {:?} ended", subscription.watched);
        }
    }
}

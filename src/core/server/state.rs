//! Accumulator state with serialized mutation.
//!
//! The counter's value and its last-change timestamp live behind a single
//! `parking_lot::Mutex`. Every mutation and every snapshot takes that lock,
//! so a reader (request handler or subscription poller) only ever sees a
//! fully applied mutation.
//!
//! # Invariants
//!
//! - `last_change` strictly increases with every applied mutation
//! - A failed mutation leaves both fields untouched

use crate::core::error::Result;
use crate::core::types::Number;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde::{Serialize, Serializer};

/// Point-in-time copy of the accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CounterSnapshot {
    pub result: Number,
    pub last_change: DateTime<Utc>,
}

impl CounterSnapshot {
    /// `lastChange` as served on the wire.
    #[must_use]
    pub fn last_change_rfc3339(&self) -> String {
        self.last_change.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// The two mutations the counter supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Subtract,
}

impl Mutation {
    #[must_use]
    pub fn from_action(name: &str) -> Option<Self> {
        match name {
            "add" => Some(Mutation::Add),
            "subtract" => Some(Mutation::Subtract),
            _ => None,
        }
    }
}

/// Which part of the state a read or subscription refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Watched {
    Result,
    LastChange,
}

impl Watched {
    #[must_use]
    pub fn from_property(name: &str) -> Option<Self> {
        match name {
            "result" => Some(Watched::Result),
            "lastChange" => Some(Watched::LastChange),
            _ => None,
        }
    }

    #[must_use]
    pub fn project(self, snapshot: &CounterSnapshot) -> WatchedValue {
        match self {
            Watched::Result => WatchedValue::Number(snapshot.result),
            Watched::LastChange => WatchedValue::Timestamp(snapshot.last_change),
        }
    }
}

/// The value of a [`Watched`] field, serialized as a number or an RFC 3339 string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WatchedValue {
    Number(Number),
    Timestamp(DateTime<Utc>),
}

impl Serialize for WatchedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            WatchedValue::Number(n) => n.serialize(serializer),
            WatchedValue::Timestamp(t) => serializer
                .serialize_str(&t.to_rfc3339_opts(SecondsFormat::Micros, true)),
        }
    }
}

/// Owner of the accumulator state.
///
/// Shared as `Arc<CounterState>` between the dispatcher and the
/// subscription manager; [`CounterState::apply`] is the only write path.
#[derive(Debug)]
pub struct CounterState {
    inner: Mutex<CounterSnapshot>,
}

impl CounterState {
    /// A counter at zero, last changed now.
    #[must_use]
    pub fn new() -> Self {
        Self::with_value(Number::Integer(0))
    }

    #[must_use]
    pub fn with_value(result: Number) -> Self {
        Self {
            inner: Mutex::new(CounterSnapshot {
                result: result.normalized(),
                last_change: Utc::now(),
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        *self.inner.lock()
    }

    /// Apply a mutation atomically and return the resulting state.
    ///
    /// # Errors
    ///
    /// `BadRequest` when the arithmetic overflows or leaves the finite range;
    /// the state is unchanged in that case.
    pub fn apply(&self, mutation: Mutation, operand: Number) -> Result<CounterSnapshot> {
        let mut state = self.inner.lock();
        let result = match mutation {
            Mutation::Add => state.result.checked_add(operand)?,
            Mutation::Subtract => state.result.checked_sub(operand)?,
        };

        let now = Utc::now();
        let floor = state.last_change + Duration::microseconds(1);
        state.last_change = if now >= floor { now } else { floor };
        state.result = result;

        Ok(*state)
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_add_then_subtract() {
        let state = CounterState::new();
        state.apply(Mutation::Add, Number::Integer(10)).unwrap();
        let snap = state.apply(Mutation::Subtract, Number::Integer(5)).unwrap();
        assert_eq!(snap.result, Number::Integer(5));
        assert_eq!(state.snapshot().result, Number::Integer(5));
    }

    #[test]
    fn test_last_change_strictly_increases() {
        let state = CounterState::new();
        let mut previous = state.snapshot().last_change;
        for _ in 0..100 {
            let snap = state.apply(Mutation::Add, Number::Integer(1)).unwrap();
            assert!(snap.last_change > previous);
            previous = snap.last_change;
        }
    }

    #[test]
    fn test_zero_operand_is_applied() {
        let state = CounterState::with_value(Number::Integer(3));
        let before = state.snapshot();
        let after = state.apply(Mutation::Add, Number::Integer(0)).unwrap();
        assert_eq!(after.result, Number::Integer(3));
        assert!(after.last_change > before.last_change);
    }

    #[test]
    fn test_integral_float_settles_as_integer() {
        let state = CounterState::with_value(Number::Float(4.0));
        assert_eq!(state.snapshot().result, Number::Integer(4));

        state.apply(Mutation::Add, Number::Float(0.25)).unwrap();
        let snap = state.apply(Mutation::Add, Number::Float(0.75)).unwrap();
        assert_eq!(snap.result, Number::Integer(5));
    }

    #[test]
    fn test_failed_mutation_leaves_state() {
        let state = CounterState::with_value(Number::Integer(i64::MIN));
        let before = state.snapshot();
        assert!(state.apply(Mutation::Subtract, Number::Integer(1)).is_err());
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_concurrent_mutations_serialize() {
        let state = Arc::new(CounterState::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        state.apply(Mutation::Add, Number::Integer(1)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(state.snapshot().result, Number::Integer(8000));
    }

    #[test]
    fn test_watched_projection() {
        let state = CounterState::with_value(Number::Float(1.5));
        let snap = state.snapshot();
        assert_eq!(
            Watched::Result.project(&snap),
            WatchedValue::Number(Number::Float(1.5))
        );
        let json = serde_json::to_value(Watched::LastChange.project(&snap)).unwrap();
        assert_eq!(json, snap.last_change_rfc3339());
        assert!(snap.last_change_rfc3339().ends_with('Z'));
    }

    #[test]
    fn test_name_lookups() {
        assert_eq!(Mutation::from_action("add"), Some(Mutation::Add));
        assert_eq!(Mutation::from_action("multiply"), None);
        assert_eq!(Watched::from_property("lastChange"), Some(Watched::LastChange));
        assert_eq!(Watched::from_property("unknown"), None);
    }
}

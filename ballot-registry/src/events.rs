//! Event sinks: where committed-state notifications go.
//!
//! Delivery is fire-and-forget. A sink error is reported to the log by the
//! ballot and never undoes the state change that produced the event.

use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;

use ballot_shared_types::BallotEvent;

use crate::audit_log;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("event receiver is closed")]
    Closed,
    #[error("event delivery failed: {0}")]
    Delivery(String),
}

pub trait EventSink {
    fn emit(&self, event: &BallotEvent) -> Result<(), SinkError>;
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &BallotEvent) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<BallotEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far, in emission order.
    pub fn events(&self) -> Vec<BallotEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<BallotEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &BallotEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}

/// Forwards events to an async consumer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<BallotEvent>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::UnboundedSender<BallotEvent>) -> Self {
        Self { sender }
    }

    /// Creates a sink together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<BallotEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: &BallotEvent) -> Result<(), SinkError> {
        self.sender
            .send(event.clone())
            .map_err(|_| SinkError::Closed)
    }
}

/// Writes each event as a structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogSink;

impl EventSink for AuditLogSink {
    fn emit(&self, event: &BallotEvent) -> Result<(), SinkError> {
        audit_log::log_ballot_event(event);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: &BallotEvent) -> Result<(), SinkError> {
        (**self).emit(event)
    }
}

/// Sends every event to both sinks; the first failure is reported after
/// both have been attempted.
#[derive(Debug, Clone, Default)]
pub struct FanoutSink<A, B> {
    first: A,
    second: B,
}

impl<A: EventSink, B: EventSink> FanoutSink<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: EventSink, B: EventSink> EventSink for FanoutSink<A, B> {
    fn emit(&self, event: &BallotEvent) -> Result<(), SinkError> {
        let first = self.first.emit(event);
        let second = self.second.emit(event);
        first.and(second)
    }
}

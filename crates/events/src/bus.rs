//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is a fan-out channel: every subscription receives its own copy of
//! each published message. There is no persistence and no replay; a reader
//! that subscribes late only sees messages published afterwards.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

/// A subscription to an event stream.
///
/// Subscriptions are meant for a single consumer. Wrap one in a mutex if it
/// must be shared.
///
/// ```ignore
/// let sub = bus.subscribe();
/// if sub.drain() > 0 {
///     // something changed since we last looked
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Discard every message currently queued and return how many there were.
    ///
    /// Readers that only care *whether* something happened use this to
    /// collapse a burst of notifications into one.
    pub fn drain(&self) -> usize {
        let mut n = 0;
        while self.receiver.try_recv().is_ok() {
            n += 1;
        }
        n
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// ```text
/// mutation succeeds → publish(event) → every Subscription gets a copy
/// ```
///
/// `publish()` can fail (e.g. poisoned lock); callers decide whether that is
/// fatal. The trait requires `Send + Sync` so a bus can be shared behind an
/// `Arc` by concurrent publishers.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}

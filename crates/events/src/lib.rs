//! Change notifications between the parts of the catalog.
//!
//! Mutations publish an [`Event`] on an [`EventBus`]; readers that cache
//! catalog state hold a [`Subscription`] and treat any delivered event as an
//! invalidation signal.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};

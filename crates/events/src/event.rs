use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **named** (stable `event_type` strings such as `"products.product.created"`)
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier.
    fn event_type(&self) -> &'static str;

    /// When the event occurred (client or server clock, whichever emitted it).
    fn occurred_at(&self) -> DateTime<Utc>;
}

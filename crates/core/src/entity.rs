//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stores key documents by [`Entity::id`], so two values with the same id are
/// two versions of the same record.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + Ord + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one in-game month.
pub type Month = u32;

/// A stable, unique identifier for any entity in the simulation.
pub type EntityId = String;

/// Catalog identifier for growth actions, recurring actions and events.
pub type ActionId = String;

/// Dollar amounts. Whole-dollar rounding happens at the formula boundary.
pub type Money = f64;

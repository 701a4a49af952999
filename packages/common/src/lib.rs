//! Helpers shared by every page builder crate: id minting and the clock.

pub mod clock;
pub mod ids;

pub use clock::*;
pub use ids::*;

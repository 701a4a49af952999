//! # Connection / Filter Bus
//!
//! Lets independently rendered elements exchange selection and filter state
//! without knowing about each other.
//!
//! ## Model
//!
//! ```text
//! Document.connections ──sync──▶ ConnectionGraph (active edges, indexed)
//!                                     │
//! publish(source, payload) ───────────┼──▶ subscribers of each edge target
//!        │                            │
//!        └──▶ GlobalFilters ◀─────────┘  (filter payloads only)
//! ```
//!
//! Declared connections are the only routing table: a payload published by an
//! element reaches exactly the targets of its active outgoing edges whose
//! connection type matches the payload. The filter map is state, not a
//! channel; consumers pull a snapshot (`filters_for`, `GlobalFilters::snapshot`)
//! when they re-render and decide for themselves whether their inputs changed.

mod bus;
mod event;
mod filters;
mod graph;

pub use bus::{ConnectionBus, Delivery, PublishReport, SubscriptionId};
pub use event::{EventPayload, PayloadError};
pub use filters::{ElementFilterState, FilterAction, FilterSnapshot, FilterValue, GlobalFilters};
pub use graph::ConnectionGraph;

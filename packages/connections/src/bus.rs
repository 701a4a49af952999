//! # Connection Bus
//!
//! Publish/subscribe keyed by declared connection edges.
//!
//! ## Semantics
//!
//! - `publish(source, payload)` walks the source's active outgoing edges whose
//!   type matches the payload, in declaration order. Each edge delivers to the
//!   target's subscribers in subscription order.
//! - Filter payloads also update the filter map: the source's own selection is
//!   recorded under its property, and every filter edge with a
//!   `targetProperty` mirrors the value under that name. Mirrored keys belong
//!   to the source's selection and are released with it.
//! - Handler failures are logged and counted; they never reach the publisher.
//! - Handlers cannot reach the bus, so publishing is never re-entrant.

use crate::event::EventPayload;
use crate::filters::{ElementFilterState, FilterSnapshot, FilterValue, GlobalFilters};
use crate::graph::ConnectionGraph;
use pagebuilder_document::{Connection, ConnectionId, ElementId};
use std::collections::BTreeMap;

/// Handle returned by [`ConnectionBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// One payload arriving at one target over one edge
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub connection_id: ConnectionId,
    pub source_element_id: ElementId,
    pub target_element_id: ElementId,
    pub source_property: Option<String>,
    pub target_property: Option<String>,
    pub payload: EventPayload,
}

impl Delivery {
    /// Property name the target should read, honoring the edge's mapping
    pub fn effective_property(&self) -> Option<&str> {
        match (&self.target_property, &self.payload) {
            (Some(target), _) => Some(target),
            (None, EventPayload::Filter { property, .. }) => Some(property),
            (None, _) => None,
        }
    }
}

/// Outcome of a publish call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Edges that matched the payload type
    pub edges: usize,
    /// Handler invocations that succeeded
    pub delivered: usize,
    /// Handler invocations that returned an error
    pub failed: usize,
    /// Raw payload could not be parsed; nothing was dispatched
    pub rejected: bool,
    /// The filter map changed as a result
    pub filters_changed: bool,
}

type Handler = Box<dyn FnMut(&Delivery) -> anyhow::Result<()>>;

struct Subscription {
    id: SubscriptionId,
    element_id: ElementId,
    handler: Handler,
}

/// Connection-keyed event bus plus the session's filter state
#[derive(Default)]
pub struct ConnectionBus {
    graph: ConnectionGraph,
    filters: GlobalFilters,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl ConnectionBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild routing from the document's connections
    pub fn sync_connections(&mut self, connections: &[Connection]) {
        self.graph = ConnectionGraph::from_connections(connections);
        tracing::debug!(edges = self.graph.edge_count(), "connection graph rebuilt");
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    pub fn filters(&self) -> &GlobalFilters {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut GlobalFilters {
        &mut self.filters
    }

    /// Register `handler` for payloads arriving at `element_id`
    pub fn subscribe<F>(&mut self, element_id: impl Into<ElementId>, handler: F) -> SubscriptionId
    where
        F: FnMut(&Delivery) -> anyhow::Result<()> + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription {
            id,
            element_id: element_id.into(),
            handler: Box::new(handler),
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Drop every subscription of an element (it unmounted)
    pub fn unsubscribe_element(&mut self, element_id: &str) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.element_id != element_id);
        before - self.subscriptions.len()
    }

    pub fn subscription_count(&self, element_id: &str) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.element_id == element_id)
            .count()
    }

    /// Publish an untyped payload; malformed input is logged and dropped
    pub fn publish_value(&mut self, source: &str, value: serde_json::Value) -> PublishReport {
        match EventPayload::from_value(value) {
            Ok(payload) => self.publish(source, payload),
            Err(e) => {
                tracing::warn!(source, error = %e, "dropping malformed connection payload");
                PublishReport {
                    rejected: true,
                    ..PublishReport::default()
                }
            }
        }
    }

    /// Dispatch `payload` from `source` along its declared edges
    pub fn publish(&mut self, source: &str, payload: EventPayload) -> PublishReport {
        let mut report = PublishReport::default();
        let kind = payload.connection_type();

        let edges: Vec<Connection> = self
            .graph
            .outgoing_of(source, kind)
            .cloned()
            .collect();
        report.edges = edges.len();

        if let EventPayload::Filter {
            property,
            value,
            category_ids,
        } = &payload
        {
            report.filters_changed =
                self.record_filter(source, property, value.as_ref(), category_ids, &edges);
        }

        tracing::debug!(
            source,
            payload = payload.type_name(),
            edges = edges.len(),
            "publishing"
        );

        for edge in edges {
            let delivery = Delivery {
                connection_id: edge.id,
                source_element_id: edge.source_element_id,
                target_element_id: edge.target_element_id,
                source_property: edge.source_property,
                target_property: edge.target_property,
                payload: payload.clone(),
            };

            for subscription in self
                .subscriptions
                .iter_mut()
                .filter(|s| s.element_id == delivery.target_element_id)
            {
                match (subscription.handler)(&delivery) {
                    Ok(()) => report.delivered += 1,
                    Err(e) => {
                        report.failed += 1;
                        tracing::warn!(
                            connection_id = %delivery.connection_id,
                            target = %delivery.target_element_id,
                            error = %e,
                            "connection handler failed"
                        );
                    }
                }
            }
        }

        report
    }

    /// Filters that reach `target` over its incoming filter edges
    ///
    /// Each edge contributes its source element's current selection, under the
    /// edge's `targetProperty` when set. Later edges win on key collisions.
    pub fn filters_for(&self, target: &str) -> FilterSnapshot {
        let mut values = BTreeMap::new();

        for edge in self
            .graph
            .incoming(target)
            .filter(|c| c.connection_type == pagebuilder_document::ConnectionType::Filter)
        {
            if let Some(state) = self.filters.element_filter(&edge.source_element_id) {
                let key = edge
                    .target_property
                    .clone()
                    .unwrap_or_else(|| state.property_name.clone());
                values.insert(key, state.value.clone());
            }
        }

        FilterSnapshot::from_map(self.filters.revision(), values)
    }

    fn record_filter(
        &mut self,
        source: &str,
        property: &str,
        value: Option<&FilterValue>,
        category_ids: &[String],
        edges: &[Connection],
    ) -> bool {
        let revision = self.filters.revision();

        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                let mirrored = edges
                    .iter()
                    .filter_map(|e| e.target_property.clone());
                self.filters.select(
                    source,
                    ElementFilterState::new(property, value.clone(), category_ids.to_vec())
                        .with_mirrored(mirrored),
                );
            }
            None => {
                self.filters.clear_element_filter(source);
            }
        }

        self.filters.revision() != revision
    }
}

impl std::fmt::Debug for ConnectionBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionBus")
            .field("graph", &self.graph)
            .field("filters", &self.filters)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

//! Connection graph
//!
//! Indexes a document's active connections by source and by target so the bus
//! can walk only declared edges. Inactive connections are left out entirely.

use pagebuilder_document::{Connection, ConnectionType, ElementId};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct ConnectionGraph {
    /// Active edges in declaration order
    edges: Vec<Connection>,

    /// source element -> edge indices
    outgoing: HashMap<ElementId, Vec<usize>>,

    /// Reverse lookup: target element -> edge indices
    incoming: HashMap<ElementId, Vec<usize>>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_connections(connections: &[Connection]) -> Self {
        let mut graph = Self::new();

        for connection in connections.iter().filter(|c| c.is_active) {
            let index = graph.edges.len();
            graph
                .outgoing
                .entry(connection.source_element_id.clone())
                .or_default()
                .push(index);
            graph
                .incoming
                .entry(connection.target_element_id.clone())
                .or_default()
                .push(index);
            graph.edges.push(connection.clone());
        }

        graph
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Connection] {
        &self.edges
    }

    /// Active edges leaving `source`, in declaration order
    pub fn outgoing<'a>(&'a self, source: &str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.lookup(&self.outgoing, source)
    }

    /// Active edges arriving at `target`, in declaration order
    pub fn incoming<'a>(&'a self, target: &str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.lookup(&self.incoming, target)
    }

    /// Outgoing edges of one connection type
    pub fn outgoing_of<'a>(
        &'a self,
        source: &str,
        kind: ConnectionType,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.outgoing(source)
            .filter(move |c| c.connection_type == kind)
    }

    /// Every active edge touching `element`, each once, in declaration order
    pub fn connected(&self, element: &str) -> Vec<&Connection> {
        self.edges.iter().filter(|c| c.touches(element)).collect()
    }

    /// Edges whose endpoints fail `exists`
    pub fn dangling<F>(&self, exists: F) -> Vec<&Connection>
    where
        F: Fn(&str) -> bool,
    {
        self.edges
            .iter()
            .filter(|c| !exists(&c.source_element_id) || !exists(&c.target_element_id))
            .collect()
    }

    fn lookup<'a>(
        &'a self,
        index: &'a HashMap<ElementId, Vec<usize>>,
        element: &str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        index
            .get(element)
            .map(|v| v.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.edges[i])
    }
}

//! Network-facing API used by models and the dynamics.
//!
//! The simulation core only needs enumeration, neighbour queries and
//! attribute access; it never relies on how a network stores its data.

use super::{AttrValue, Graph, NodeId};

/// Capability interface over an undirected network.
pub trait Network: Clone {
    fn node_count(&self) -> usize;
    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_;
    /// Each undirected edge once.
    fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_;
    fn neighbors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_;

    fn node_attr(&self, n: NodeId, key: &str) -> Option<&AttrValue>;
    /// Returns `false` if the node does not exist.
    fn set_node_attr(&mut self, n: NodeId, key: &str, value: AttrValue) -> bool;

    fn edge_attr(&self, a: NodeId, b: NodeId, key: &str) -> Option<&AttrValue>;
    /// Returns `false` if the edge does not exist.
    fn set_edge_attr(&mut self, a: NodeId, b: NodeId, key: &str, value: AttrValue) -> bool;
}

impl Network for Graph {
    fn node_count(&self) -> usize {
        Graph::node_count(self)
    }

    fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..Graph::node_count(self)).map(NodeId)
    }

    fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.edge_list().iter().copied()
    }

    fn neighbors(&self, n: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacent(n).iter().copied()
    }

    fn node_attr(&self, n: NodeId, key: &str) -> Option<&AttrValue> {
        self.node_attrs(n)?.get(key)
    }

    fn set_node_attr(&mut self, n: NodeId, key: &str, value: AttrValue) -> bool {
        match self.node_attrs_mut(n) {
            Some(attrs) => {
                attrs.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    fn edge_attr(&self, a: NodeId, b: NodeId, key: &str) -> Option<&AttrValue> {
        self.edge_attrs(a, b)?.get(key)
    }

    fn set_edge_attr(&mut self, a: NodeId, b: NodeId, key: &str, value: AttrValue) -> bool {
        match self.edge_attrs_mut(a, b) {
            Some(attrs) => {
                attrs.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }
}

//! 网络拓扑存储
//!
//! 无向简单图：节点按插入顺序编号，边以 `(min, max)` 规范化存储，
//! 节点和边都带属性表。

use std::collections::HashMap;

use super::attr::Attrs;
use super::id::NodeId;

/// 内存中的无向图
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Attrs>,
    adj: Vec<Vec<NodeId>>,
    edges: Vec<(NodeId, NodeId)>,
    edge_index: HashMap<(NodeId, NodeId), usize>,
    edge_attrs: Vec<Attrs>,
}

fn canonical(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Graph {
    /// 创建含 `n` 个孤立节点的图
    pub fn with_nodes(n: usize) -> Self {
        let mut g = Self::default();
        for _ in 0..n {
            g.add_node();
        }
        g
    }

    /// 添加节点
    pub fn add_node(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Attrs::new());
        self.adj.push(Vec::new());
        id
    }

    /// 连接两个节点；自环、重复边或不存在的端点返回 `false`。
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> bool {
        if a == b || a.0 >= self.nodes.len() || b.0 >= self.nodes.len() {
            return false;
        }
        let key = canonical(a, b);
        if self.edge_index.contains_key(&key) {
            return false;
        }
        self.edge_index.insert(key, self.edges.len());
        self.edges.push(key);
        self.edge_attrs.push(Attrs::new());
        self.adj[a.0].push(b);
        self.adj[b.0].push(a);
        true
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_index.contains_key(&canonical(a, b))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn degree(&self, n: NodeId) -> usize {
        self.adj.get(n.0).map_or(0, Vec::len)
    }

    pub(crate) fn edge_list(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    pub(crate) fn adjacent(&self, n: NodeId) -> &[NodeId] {
        self.adj.get(n.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_attrs(&self, n: NodeId) -> Option<&Attrs> {
        self.nodes.get(n.0)
    }

    pub(crate) fn node_attrs_mut(&mut self, n: NodeId) -> Option<&mut Attrs> {
        self.nodes.get_mut(n.0)
    }

    pub fn edge_attrs(&self, a: NodeId, b: NodeId) -> Option<&Attrs> {
        let idx = *self.edge_index.get(&canonical(a, b))?;
        self.edge_attrs.get(idx)
    }

    pub(crate) fn edge_attrs_mut(&mut self, a: NodeId, b: NodeId) -> Option<&mut Attrs> {
        let idx = *self.edge_index.get(&canonical(a, b))?;
        self.edge_attrs.get_mut(idx)
    }
}

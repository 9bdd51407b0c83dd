//! 标识符类型
//!
//! 定义节点标识符以及事件作用的网络元素。

use serde::{Deserialize, Serialize};

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// 事件作用的网络元素：节点，或有向化的边 `(a, b)`。
///
/// 边位点里的方向有语义：例如 SI 位点中 `a` 是易感端、`b` 是感染端。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Node(NodeId),
    Edge(NodeId, NodeId),
}

impl Element {
    pub fn as_node(&self) -> Option<NodeId> {
        match *self {
            Element::Node(n) => Some(n),
            Element::Edge(..) => None,
        }
    }

    pub fn as_edge(&self) -> Option<(NodeId, NodeId)> {
        match *self {
            Element::Edge(a, b) => Some((a, b)),
            Element::Node(_) => None,
        }
    }

    /// 反向的边；节点元素原样返回
    pub fn reversed(&self) -> Self {
        match *self {
            Element::Edge(a, b) => Element::Edge(b, a),
            node => node,
        }
    }
}

//! 环形格子构建

use crate::net::{Graph, NodeId};

/// 环形格子配置选项
#[derive(Debug, Clone)]
pub struct RingOpts {
    pub nodes: usize,
    /// 每个节点向每一侧连接的邻居数
    pub k: usize,
}

impl Default for RingOpts {
    fn default() -> Self {
        Self { nodes: 100, k: 2 }
    }
}

/// 构建环形格子
///
/// 节点 `i` 与 `i+1, ..., i+k`（取模）相连；`2k >= nodes` 时多出的边会被去重。
pub fn build_ring(opts: &RingOpts) -> Graph {
    let n = opts.nodes;
    let mut g = Graph::with_nodes(n);
    if n < 2 {
        return g;
    }
    for i in 0..n {
        for d in 1..=opts.k {
            g.add_edge(NodeId(i), NodeId((i + d) % n));
        }
    }
    g
}

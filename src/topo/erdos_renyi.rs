//! Erdős–Rényi 随机图构建

use crate::net::{Graph, NodeId};
use crate::sim::RandomSource;

/// G(n, p) 配置选项
#[derive(Debug, Clone)]
pub struct ErdosRenyiOpts {
    pub nodes: usize,
    /// 每对节点之间连边的概率
    pub edge_prob: f64,
}

impl Default for ErdosRenyiOpts {
    fn default() -> Self {
        Self {
            nodes: 100,
            edge_prob: 0.05,
        }
    }
}

/// 构建 G(n, p) 随机图
///
/// 对每一对 `(i, j), i < j` 独立地以 `edge_prob` 连边。
pub fn build_erdos_renyi(opts: &ErdosRenyiOpts, rng: &mut RandomSource) -> Graph {
    let mut g = Graph::with_nodes(opts.nodes);
    for i in 0..opts.nodes {
        for j in (i + 1)..opts.nodes {
            if rng.chance(opts.edge_prob) {
                g.add_edge(NodeId(i), NodeId(j));
            }
        }
    }
    g
}

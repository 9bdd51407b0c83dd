use crate::net::{Network, NodeId};
use crate::sim::RandomSource;
use crate::topo::erdos_renyi::{ErdosRenyiOpts, build_erdos_renyi};
use crate::topo::ring::{RingOpts, build_ring};

#[test]
fn erdos_renyi_extremes() {
    let mut rng = RandomSource::new(1);
    let empty = build_erdos_renyi(
        &ErdosRenyiOpts {
            nodes: 30,
            edge_prob: 0.0,
        },
        &mut rng,
    );
    assert_eq!(empty.node_count(), 30);
    assert_eq!(empty.edge_count(), 0);

    let complete = build_erdos_renyi(
        &ErdosRenyiOpts {
            nodes: 30,
            edge_prob: 1.0,
        },
        &mut rng,
    );
    assert_eq!(complete.edge_count(), 30 * 29 / 2);
    assert!(complete.nodes().all(|n| complete.degree(n) == 29));
}

#[test]
fn erdos_renyi_is_reproducible_from_seed() {
    let opts = ErdosRenyiOpts {
        nodes: 80,
        edge_prob: 0.1,
    };
    let a = build_erdos_renyi(&opts, &mut RandomSource::new(5));
    let b = build_erdos_renyi(&opts, &mut RandomSource::new(5));
    let ea: Vec<_> = a.edges().collect();
    let eb: Vec<_> = b.edges().collect();
    assert_eq!(ea, eb);
    assert!(!ea.is_empty());
}

#[test]
fn ring_lattice_has_uniform_degree() {
    let g = build_ring(&RingOpts { nodes: 10, k: 2 });
    assert_eq!(g.node_count(), 10);
    assert_eq!(g.edge_count(), 20);
    assert!(g.nodes().all(|n| g.degree(n) == 4));
    assert!(g.has_edge(NodeId(9), NodeId(1)));
    assert!(g.has_edge(NodeId(0), NodeId(8)));
    assert!(!g.has_edge(NodeId(0), NodeId(5)));
}

#[test]
fn small_ring_does_not_duplicate_edges() {
    // n=4, k=3：每个节点与其余所有节点相连，共 6 条边
    let g = build_ring(&RingOpts { nodes: 4, k: 3 });
    assert_eq!(g.edge_count(), 6);
    assert!(g.nodes().all(|n| g.degree(n) == 3));
}

use crate::model::{CompartmentId, Locus, LocusKind};
use crate::net::{Element, NodeId};
use crate::sim::RandomSource;
use std::collections::HashSet;

fn node_locus() -> Locus {
    Locus::new(
        "I",
        LocusKind::Node {
            compartment: CompartmentId(1),
        },
    )
}

#[test]
fn insert_and_remove_track_membership() {
    let mut locus = node_locus();
    assert!(locus.is_empty());

    for n in 0..5 {
        assert!(locus.insert(Element::Node(NodeId(n))));
    }
    assert!(!locus.insert(Element::Node(NodeId(2))), "duplicate insert");
    assert_eq!(locus.len(), 5);

    // 删除中间元素后，其余成员的下标必须仍然正确
    assert!(locus.remove(&Element::Node(NodeId(1))));
    assert!(!locus.remove(&Element::Node(NodeId(1))));
    assert_eq!(locus.len(), 4);
    for n in [0, 2, 3, 4] {
        assert!(locus.contains(&Element::Node(NodeId(n))));
    }
    assert!(locus.remove(&Element::Node(NodeId(4))));
    assert!(locus.remove(&Element::Node(NodeId(0))));
    assert_eq!(locus.len(), 2);
    assert!(locus.contains(&Element::Node(NodeId(2))));
    assert!(locus.contains(&Element::Node(NodeId(3))));
}

#[test]
fn draw_returns_members_uniformly() {
    let mut locus = node_locus();
    let mut rng = RandomSource::new(11);
    assert_eq!(locus.draw(&mut rng), None);

    for n in 0..4 {
        locus.insert(Element::Node(NodeId(n)));
    }
    let mut seen = HashSet::new();
    for _ in 0..200 {
        let el = locus.draw(&mut rng).expect("non-empty");
        assert!(locus.contains(&el));
        seen.insert(el);
    }
    assert_eq!(seen.len(), 4);
}

#[test]
fn clear_empties_locus() {
    let mut locus = Locus::new(
        "SI",
        LocusKind::Edge {
            left: CompartmentId(0),
            right: CompartmentId(1),
        },
    );
    locus.insert(Element::Edge(NodeId(0), NodeId(1)));
    assert_eq!(locus.name(), "SI");
    locus.clear();
    assert!(locus.is_empty());
    assert!(!locus.contains(&Element::Edge(NodeId(0), NodeId(1))));
}

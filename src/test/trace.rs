use serde_json::Value;

use crate::net::{Element, NodeId};
use crate::trace::{EventTrace, TraceEvent, TraceEventKind};

fn sample() -> EventTrace {
    let mut trace = EventTrace::default();
    trace.push(TraceEvent {
        t: 0.25,
        element: Element::Edge(NodeId(0), NodeId(1)),
        effect: "Infect".into(),
        kind: TraceEventKind::Stochastic {
            locus: "SI".into(),
            total_rate: 2.0,
        },
    });
    trace.push(TraceEvent {
        t: 5.0,
        element: Element::Node(NodeId(1)),
        effect: "Recover".into(),
        kind: TraceEventKind::Posted,
    });
    trace
}

#[test]
fn split_by_kind() {
    let trace = sample();
    assert_eq!(trace.len(), 2);
    assert_eq!(trace.stochastic().count(), 1);
    assert_eq!(trace.posted().count(), 1);
    assert_eq!(trace.posted().next().map(|ev| ev.t), Some(5.0));
}

#[test]
fn json_shape() {
    let json = sample().to_json().expect("serialize");
    let v: Value = serde_json::from_str(&json).expect("parse");
    let events = v.as_array().expect("array");
    assert_eq!(events.len(), 2);

    let first = &events[0];
    assert_eq!(first["kind"], "stochastic");
    assert_eq!(first["locus"], "SI");
    assert_eq!(first["total_rate"], 2.0);
    assert_eq!(first["t"], 0.25);
    assert_eq!(first["element"], serde_json::json!({ "edge": [0, 1] }));

    let second = &events[1];
    assert_eq!(second["kind"], "posted");
    assert_eq!(second["effect"], "Recover");
    assert_eq!(second["element"], serde_json::json!({ "node": 1 }));
    assert!(second.get("locus").is_none());
}

#[test]
fn deserializes_back() {
    let trace = sample();
    let json = trace.to_json().expect("serialize");
    let events: Vec<TraceEvent> = serde_json::from_str(&json).expect("parse");
    assert_eq!(events, trace.events);
}

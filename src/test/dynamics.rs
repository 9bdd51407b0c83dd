use crate::error::{ConfigError, Error, SimulationError};
use crate::model::sis::SisEffect;
use crate::model::{COMPARTMENT, Model, Sir, Sis, SisFixedRecovery};
use crate::net::{AttrValue, Graph, Network, NodeId};
use crate::params::Params;
use crate::sim::{EngineState, RandomSource, RunLimits, SimTime, StochasticDynamics, StopReason};
use crate::topo::erdos_renyi::{ErdosRenyiOpts, build_erdos_renyi};
use crate::topo::ring::{RingOpts, build_ring};

fn ring(nodes: usize) -> Graph {
    build_ring(&RingOpts { nodes, k: 2 })
}

fn random_graph(seed: u64) -> Graph {
    let mut rng = RandomSource::new(seed);
    build_erdos_renyi(
        &ErdosRenyiOpts {
            nodes: 100,
            edge_prob: 0.05,
        },
        &mut rng,
    )
}

fn sis_params(p_infected: f64, p_infect: f64, p_recover: f64) -> Params {
    Params::new()
        .with("pInfected", p_infected)
        .with("pInfect", p_infect)
        .with("pRecover", p_recover)
}

fn compartments_of(g: &Graph) -> Vec<Option<AttrValue>> {
    g.nodes()
        .map(|n| g.node_attr(n, COMPARTMENT).cloned())
        .collect()
}

#[test]
fn step_before_set_up_is_an_error() {
    let mut dynamics = StochasticDynamics::new(ring(10), Sis::new(), 1);
    assert_eq!(dynamics.state(), EngineState::Uninitialized);
    assert_eq!(
        dynamics.step(),
        Err(Error::Simulation(SimulationError::NotSetUp))
    );
}

#[test]
fn no_infected_nodes_terminates_immediately() {
    let mut dynamics = StochasticDynamics::new(ring(20), Sis::new(), 1);
    dynamics
        .set_up(&sis_params(0.0, 1.0, 1.0))
        .expect("set up");
    assert_eq!(dynamics.state(), EngineState::Ready);

    let total: f64 = dynamics
        .event_rate_distribution(dynamics.now())
        .iter()
        .map(|r| r.rate)
        .sum();
    assert_eq!(total, 0.0);

    assert_eq!(dynamics.step(), Ok(false));
    assert_eq!(dynamics.state(), EngineState::Terminated);
    assert_eq!(dynamics.now(), SimTime::ZERO);
    // 终止后不再有状态转换
    assert_eq!(dynamics.step(), Ok(false));
    assert_eq!(dynamics.state(), EngineState::Terminated);
}

#[test]
fn rates_scale_with_locus_size() {
    let model = Sis::new().with_initially_infected([NodeId(0)]);
    let mut dynamics = StochasticDynamics::new(ring(10), model, 1);
    dynamics
        .set_up(&sis_params(0.0, 0.5, 0.25))
        .expect("set up");

    let rates = dynamics.event_rate_distribution(dynamics.now());
    assert_eq!(rates.len(), 2);
    for r in &rates {
        match r.effect {
            // 环形格子 k=2：节点 0 有 4 个易感邻居
            SisEffect::Infect => assert_eq!(r.rate, 0.5 * 4.0),
            SisEffect::Recover => assert_eq!(r.rate, 0.25),
        }
    }
}

#[test]
fn empty_locus_contributes_no_rate() {
    let mut dynamics = StochasticDynamics::new(ring(10), Sis::new(), 1);
    dynamics
        .set_up(&sis_params(0.0, 1.0, 1.0))
        .expect("set up");
    for r in dynamics.event_rate_distribution(SimTime::ZERO) {
        assert_eq!(Model::<Graph>::size_of_locus(dynamics.model(), r.locus), 0);
        assert_eq!(r.rate, 0.0);
    }
}

#[test]
fn same_seed_reproduces_event_sequence_and_results() {
    let run = |seed: u64| {
        let model = Sis::new().with_initially_infected([NodeId(0)]);
        let mut dynamics = StochasticDynamics::new(random_graph(3), model, seed);
        dynamics.enable_trace();
        dynamics
            .set_up(&sis_params(0.05, 0.2, 0.1))
            .expect("set up");
        dynamics.run_until(SimTime(20.0)).expect("run");
        (
            dynamics.take_trace().expect("trace"),
            dynamics.experimental_results(),
        )
    };

    let (trace_a, results_a) = run(42);
    let (trace_b, results_b) = run(42);
    assert!(!trace_a.is_empty());
    assert_eq!(trace_a, trace_b);
    assert_eq!(results_a, results_b);

    let (trace_c, _) = run(43);
    assert_ne!(trace_a, trace_c);
}

#[test]
fn failed_set_up_leaves_clock_and_network_untouched() {
    let model = Sis::new().with_initially_infected([NodeId(0)]);
    let mut dynamics = StochasticDynamics::new(ring(30), model, 9);
    dynamics
        .set_up(&sis_params(0.0, 0.5, 0.0))
        .expect("set up");
    for _ in 0..3 {
        assert_eq!(dynamics.step(), Ok(true));
    }
    let now = dynamics.now();
    let before = compartments_of(dynamics.network());
    assert!(now > SimTime::ZERO);

    let bad = Params::new().with("pInfected", 0.0).with("pInfect", 0.5);
    assert_eq!(
        dynamics.set_up(&bad),
        Err(Error::Config(ConfigError::MissingParameter("pRecover".into())))
    );
    assert_eq!(dynamics.now(), now);
    assert_eq!(compartments_of(dynamics.network()), before);
    assert_eq!(dynamics.state(), EngineState::Uninitialized);
    assert_eq!(
        dynamics.step(),
        Err(Error::Simulation(SimulationError::NotSetUp))
    );
}

#[test]
fn set_up_resets_clock_counters_and_posted_queue() {
    let params = Params::new()
        .with("pInfected", 0.2)
        .with("pInfect", 0.3)
        .with("tInfected", 2.0);
    let mut dynamics = StochasticDynamics::new(ring(40), SisFixedRecovery::new(), 5);
    dynamics.set_up(&params).expect("set up");
    dynamics.run_until(SimTime(3.0)).expect("run");
    assert!(dynamics.experimental_results().events > 0);

    dynamics.set_up(&params).expect("set up again");
    assert_eq!(dynamics.now(), SimTime::ZERO);
    assert_eq!(dynamics.state(), EngineState::Ready);
    let results = dynamics.experimental_results();
    assert_eq!(results.events, 0);
    assert_eq!(results.pending_posted, results.compartments["I"]);
    assert!(
        dynamics
            .posted()
            .iter_sorted()
            .iter()
            .all(|ev| ev.at == SimTime(2.0))
    );
}

#[test]
fn horizon_stops_before_later_events() {
    let model = Sis::new().with_initially_infected([NodeId(0), NodeId(50)]);
    let mut dynamics = StochasticDynamics::new(ring(100), model, 17);
    dynamics.enable_trace();
    dynamics
        .set_up(&sis_params(0.0, 0.5, 0.05))
        .expect("set up");

    let reason = dynamics.run_until(SimTime(2.0)).expect("run");
    assert!(dynamics.now() <= SimTime(2.0));
    if reason == StopReason::Horizon {
        assert_eq!(dynamics.now(), SimTime(2.0));
    }
    let trace = dynamics.trace().expect("trace");
    assert!(trace.events.iter().all(|ev| ev.t <= 2.0));
    assert_eq!(dynamics.state(), EngineState::Terminated);
    assert_eq!(dynamics.step(), Ok(false));
}

#[test]
fn event_limit_stops_the_run() {
    let params = Params::new()
        .with("pInfected", 0.0)
        .with("pInfect", 1.0)
        .with("tInfected", 100.0);
    let model = SisFixedRecovery::new().with_initially_infected([NodeId(0)]);
    let mut dynamics = StochasticDynamics::new(ring(20), model, 2);
    dynamics.set_up(&params).expect("set up");

    let reason = dynamics
        .run(RunLimits {
            until: None,
            max_events: Some(5),
        })
        .expect("run");
    assert_eq!(reason, StopReason::EventLimit);
    let results = dynamics.experimental_results();
    assert_eq!(results.events, 5);
    assert_eq!(results.stochastic_events, 5);
    assert_eq!(results.compartments["I"], 6);
}

#[test]
fn partition_and_loci_stay_consistent_after_every_event() {
    let params = Params::new()
        .with("pInfected", 0.05)
        .with("pInfect", 0.3)
        .with("pRemove", 0.1);
    let mut dynamics = StochasticDynamics::new(random_graph(8), Sir::new(), 4);
    dynamics.set_up(&params).expect("set up");

    let mut steps = 0;
    while dynamics.step().expect("step") {
        steps += 1;
        let network = dynamics.network();
        let model = dynamics.model();
        Model::<Graph>::check_partition(model, network).expect("partition");

        let counts = Model::<Graph>::results(model, network);
        assert_eq!(counts.values().sum::<usize>(), network.node_count());

        let mut rebuilt = Model::<Graph>::compartmented(model).clone();
        rebuilt.rebuild_loci(network).expect("rebuild");
        for name in ["SI", "I"] {
            let id = rebuilt.locus_id(name).expect("locus");
            assert_eq!(
                Model::<Graph>::size_of_locus(model, id),
                rebuilt.size_of_locus(id),
                "locus {name} after {steps} steps"
            );
        }
        assert!(steps < 1_000, "SIR must terminate");
    }

    // 每个节点最多被感染一次，因此 SIR 一定会耗尽
    let results = dynamics.experimental_results();
    assert_eq!(results.compartments["I"], 0);
    assert_eq!(dynamics.state(), EngineState::Terminated);
}

#[test]
fn posted_events_fire_when_there_is_no_rate_mass() {
    let params = Params::new()
        .with("pInfected", 0.0)
        .with("pInfect", 0.0)
        .with("tInfected", 3.0);
    let model = SisFixedRecovery::new().with_initially_infected([NodeId(5), NodeId(0)]);
    let mut dynamics = StochasticDynamics::new(ring(10), model, 1);
    dynamics.enable_trace();
    dynamics.set_up(&params).expect("set up");
    assert_eq!(dynamics.posted().len(), 2);

    assert_eq!(dynamics.step(), Ok(true));
    assert_eq!(dynamics.now(), SimTime(3.0));
    assert_eq!(dynamics.step(), Ok(true));
    assert_eq!(dynamics.now(), SimTime(3.0));
    assert_eq!(dynamics.step(), Ok(false));
    assert_eq!(dynamics.state(), EngineState::Terminated);

    // 同一时刻的预定事件按预定顺序（FIFO）执行
    let trace = dynamics.trace().expect("trace");
    let order: Vec<_> = trace.posted().map(|ev| ev.element).collect();
    assert_eq!(
        order,
        vec![
            crate::net::Element::Node(NodeId(0)),
            crate::net::Element::Node(NodeId(5)),
        ]
    );
    assert_eq!(dynamics.experimental_results().compartments["I"], 0);
}

#[test]
fn earlier_posted_event_preempts_stochastic_candidate() {
    let params = Params::new()
        .with("pInfected", 0.0)
        .with("pInfect", 1.0)
        .with("tInfected", 0.0);
    let model = SisFixedRecovery::new().with_initially_infected([NodeId(0)]);
    let mut dynamics = StochasticDynamics::new(ring(10), model, 1);
    dynamics.enable_trace();
    dynamics.set_up(&params).expect("set up");

    // 恢复预定在 t=0，任何随机等待时间都晚于它
    assert_eq!(dynamics.step(), Ok(true));
    assert_eq!(dynamics.now(), SimTime::ZERO);
    let trace = dynamics.trace().expect("trace");
    assert_eq!(trace.posted().count(), 1);
    assert_eq!(trace.stochastic().count(), 0);

    assert_eq!(dynamics.step(), Ok(false));
    assert_eq!(dynamics.experimental_results().compartments["S"], 10);
}

#[test]
fn run_after_termination_reports_halted() {
    let model = Sis::new().with_initially_infected([NodeId(0)]);
    let mut dynamics = StochasticDynamics::new(ring(30), model, 6);
    dynamics
        .set_up(&sis_params(0.0, 0.5, 0.0))
        .expect("set up");

    // pRecover=0 且感染一直在扩散，因此一定在时间上限处停止
    assert_eq!(dynamics.run_until(SimTime(0.5)), Ok(StopReason::Horizon));
    let results = dynamics.experimental_results();

    assert_eq!(dynamics.run_until(SimTime(10.0)), Ok(StopReason::Halted));
    assert_eq!(dynamics.run(RunLimits::default()), Ok(StopReason::Halted));
    assert_eq!(dynamics.experimental_results(), results);
    assert_eq!(dynamics.now(), SimTime(0.5));
}

#[test]
fn exhausted_then_halted() {
    let mut dynamics = StochasticDynamics::new(ring(10), Sis::new(), 1);
    dynamics
        .set_up(&sis_params(0.0, 1.0, 1.0))
        .expect("set up");
    assert_eq!(dynamics.run(RunLimits::default()), Ok(StopReason::Exhausted));
    assert_eq!(dynamics.run(RunLimits::default()), Ok(StopReason::Halted));
}

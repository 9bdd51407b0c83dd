//! 网络传染病仿真
//!
//! 在随机图或环形格子上运行 SIS / SIR / 固定感染时长 SIS 模型，
//! 结束时打印各仓室计数，可选写出结果和事件记录 JSON。

use clap::{Parser, ValueEnum};
use episim_rs::model::{Model, Sir, Sis, SisFixedRecovery};
use episim_rs::net::{Graph, NodeId};
use episim_rs::params::{ParamAssignment, Params};
use episim_rs::sim::{ExperimentResults, RandomSource, RunLimits, SimTime, StochasticDynamics, StopReason};
use episim_rs::topo::erdos_renyi::{ErdosRenyiOpts, build_erdos_renyi};
use episim_rs::topo::ring::{RingOpts, build_ring};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
enum ModelKind {
    Sis,
    Sir,
    SisFixed,
}

#[derive(Debug, Parser)]
#[command(name = "episim", about = "网络上的 Gillespie 传染病仿真")]
struct Args {
    #[arg(long, value_enum, default_value_t = ModelKind::SisFixed)]
    model: ModelKind,
    #[arg(long, default_value_t = 100)]
    nodes: usize,
    /// Erdős–Rényi 连边概率
    #[arg(long, default_value_t = 0.05)]
    edge_prob: f64,
    /// 改用环形格子，每侧 k 个邻居
    #[arg(long)]
    ring_k: Option<usize>,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// 初始强制感染的节点编号（可重复）
    #[arg(long = "seed-node")]
    seed_nodes: Vec<usize>,
    /// 参数 JSON 文件（对象：参数名 -> 数值）
    #[arg(long)]
    params: Option<PathBuf>,
    /// 单个参数赋值 key=value（可重复，覆盖文件中的值）
    #[arg(long = "param")]
    param: Vec<ParamAssignment>,
    /// 仿真时间上限
    #[arg(long)]
    until: Option<f64>,
    /// 事件数上限
    #[arg(long)]
    max_events: Option<u64>,
    /// 输出结果 JSON
    #[arg(long)]
    results_json: Option<PathBuf>,
    /// 输出事件记录 JSON
    #[arg(long)]
    trace_json: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    model: ModelKind,
    seed: u64,
    nodes: usize,
    edges: usize,
    reason: StopReason,
    params: &'a Params,
    results: ExperimentResults,
}

fn main() {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut params = match &args.params {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|e| format!("read {}: {e}", path.display()))?;
            Params::from_json_str(&raw).map_err(|e| format!("parse {}: {e}", path.display()))?
        }
        None => Params::new(),
    };
    for assignment in &args.param {
        params.assign(assignment);
    }

    let mut master = RandomSource::new(args.seed);
    let mut topo_rng = master.fork();
    let sim_rng = master.fork();

    let g = match args.ring_k {
        Some(k) => build_ring(&RingOpts {
            nodes: args.nodes,
            k,
        }),
        None => build_erdos_renyi(
            &ErdosRenyiOpts {
                nodes: args.nodes,
                edge_prob: args.edge_prob,
            },
            &mut topo_rng,
        ),
    };

    let seeds = args.seed_nodes.iter().copied().map(NodeId);
    match args.model {
        ModelKind::Sis => {
            let model = Sis::new().with_initially_infected(seeds);
            simulate(args, &params, g, model, sim_rng)
        }
        ModelKind::Sir => {
            let model = Sir::new().with_initially_infected(seeds);
            simulate(args, &params, g, model, sim_rng)
        }
        ModelKind::SisFixed => {
            let model = SisFixedRecovery::new().with_initially_infected(seeds);
            simulate(args, &params, g, model, sim_rng)
        }
    }
}

fn simulate<M: Model<Graph>>(
    args: &Args,
    params: &Params,
    g: Graph,
    model: M,
    rng: RandomSource,
) -> Result<(), Box<dyn Error>> {
    let nodes = g.node_count();
    let edges = g.edge_count();

    let mut dynamics = StochasticDynamics::with_rng(g, model, rng);
    if args.trace_json.is_some() {
        dynamics.enable_trace();
    }
    dynamics.set_up(params)?;

    let reason = dynamics.run(RunLimits {
        until: args.until.map(SimTime),
        max_events: args.max_events,
    })?;
    let results = dynamics.experimental_results();

    let counts = results
        .compartments
        .iter()
        .map(|(name, count)| format!("{name}={count}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "done @ t={:.6}, events={} (stochastic={}, posted={}), reason={:?}, {}",
        results.time, results.events, results.stochastic_events, results.posted_events, reason, counts
    );

    if let Some(path) = &args.results_json {
        let report = RunReport {
            model: args.model,
            seed: args.seed,
            nodes,
            edges,
            reason,
            params,
            results,
        };
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("wrote results to {}", path.display());
    }

    if let (Some(path), Some(trace)) = (&args.trace_json, dynamics.trace()) {
        fs::write(path, trace.to_json()?)?;
        eprintln!("wrote {} trace events to {}", trace.len(), path.display());
    }
    Ok(())
}

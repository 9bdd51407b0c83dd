//! 随机动力学仿真器（Gillespie）
//!
//! 每一步：把模型的概率分布按位点大小换算成速率，抽取指数等待时间，
//! 再与预定事件队列里最早的事件比较，执行时间上更早的那一个。

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, error, info, trace};

use super::posted::PostedEvents;
use super::rng::RandomSource;
use super::sampling::draw_from;
use super::time::SimTime;
use crate::error::{Error, SimulationError};
use crate::model::{EffectContext, LocusId, Model};
use crate::net::Network;
use crate::params::Params;
use crate::trace::{EventTrace, TraceEvent, TraceEventKind};

/// 仿真器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Ready,
    Running,
    Terminated,
}

/// 速率分布中的一项：`rate = probability * |locus|`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateEntry<E> {
    pub locus: LocusId,
    pub rate: f64,
    pub effect: E,
}

/// 单步结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// 执行了一个事件（随机或预定）
    Fired,
    /// 总速率为 0 且没有预定事件
    Exhausted,
    /// 下一个事件晚于时间上限
    HorizonReached,
    /// 仿真器已经终止
    Halted,
}

/// 运行限制
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLimits {
    pub until: Option<SimTime>,
    pub max_events: Option<u64>,
}

/// 运行停止的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Exhausted,
    Horizon,
    EventLimit,
    /// 调用 `run` 时仿真器已经终止，没有执行任何事件
    Halted,
}

/// 一次运行的实验结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentResults {
    pub time: f64,
    pub events: u64,
    pub stochastic_events: u64,
    pub posted_events: u64,
    pub pending_posted: usize,
    pub compartments: BTreeMap<String, usize>,
}

/// Gillespie 仿真器：拥有网络副本、模型、预定事件队列、随机数源和时钟。
pub struct StochasticDynamics<G: Network, M: Model<G>> {
    prototype: G,
    network: G,
    model: M,
    posted: PostedEvents<M::Effect>,
    rng: RandomSource,
    now: SimTime,
    state: EngineState,
    stochastic_events: u64,
    posted_events: u64,
    trace: Option<EventTrace>,
}

impl<G: Network, M: Model<G>> StochasticDynamics<G, M> {
    pub fn new(prototype: G, model: M, seed: u64) -> Self {
        Self::with_rng(prototype, model, RandomSource::new(seed))
    }

    pub fn with_rng(prototype: G, model: M, rng: RandomSource) -> Self {
        let network = prototype.clone();
        Self {
            prototype,
            network,
            model,
            posted: PostedEvents::new(),
            rng,
            now: SimTime::ZERO,
            state: EngineState::Uninitialized,
            stochastic_events: 0,
            posted_events: 0,
            trace: None,
        }
    }

    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// 当前运行所用的网络副本
    pub fn network(&self) -> &G {
        &self.network
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn posted(&self) -> &PostedEvents<M::Effect> {
        &self.posted
    }

    /// 打开事件记录（下一次 `set_up` 时清空）
    pub fn enable_trace(&mut self) {
        self.trace = Some(EventTrace::default());
    }

    pub fn trace(&self) -> Option<&EventTrace> {
        self.trace.as_ref()
    }

    pub fn take_trace(&mut self) -> Option<EventTrace> {
        self.trace.take()
    }

    /// 为一次运行做准备：复制原型网络、构建并初始化模型、时钟归零、清空预定事件。
    ///
    /// 初始化在新副本上进行，只有成功后才替换当前状态；失败时时钟、网络和
    /// 队列保持不变，仿真器回到 `Uninitialized`。
    #[tracing::instrument(skip(self, params))]
    pub fn set_up(&mut self, params: &Params) -> Result<(), Error> {
        info!(seed = self.rng.seed(), "初始化仿真");

        let (network, posted) = match self.prepare(params) {
            Ok(prepared) => prepared,
            Err(e) => {
                error!(error = %e, "初始化失败");
                self.state = EngineState::Uninitialized;
                return Err(e);
            }
        };

        self.network = network;
        self.posted = posted;
        self.now = SimTime::ZERO;
        self.stochastic_events = 0;
        self.posted_events = 0;
        if let Some(trace) = self.trace.as_mut() {
            trace.events.clear();
        }
        self.state = EngineState::Ready;

        debug!(
            nodes = self.network.node_count(),
            posted = self.posted.len(),
            compartments = ?self.model.results(&self.network),
            "初始化完成"
        );
        Ok(())
    }

    fn prepare(&mut self, params: &Params) -> Result<(G, PostedEvents<M::Effect>), Error> {
        let mut network = self.prototype.clone();
        let mut posted = PostedEvents::new();

        self.model.build(params)?;
        self.model.set_up(
            params,
            &mut self.rng,
            EffectContext {
                now: SimTime::ZERO,
                network: &mut network,
                posted: &mut posted,
            },
        )?;
        self.model.check_partition(&network)?;
        Ok((network, posted))
    }

    /// 把模型的概率分布换算成速率分布：`rate = probability * |locus|`
    pub fn event_rate_distribution(&self, t: SimTime) -> Vec<RateEntry<M::Effect>> {
        self.model
            .event_distribution(t)
            .into_iter()
            .map(|ev| RateEntry {
                locus: ev.locus,
                rate: ev.probability * self.model.size_of_locus(ev.locus) as f64,
                effect: ev.effect,
            })
            .collect()
    }

    /// 执行一步；返回是否触发了事件。
    pub fn step(&mut self) -> Result<bool, Error> {
        Ok(self.advance(None)? == StepOutcome::Fired)
    }

    /// 执行一步，但不执行晚于 `horizon` 的事件。
    ///
    /// 到达上限时时钟推进到 `horizon` 并终止；恰好位于 `horizon` 的事件仍会执行。
    pub fn advance(&mut self, horizon: Option<SimTime>) -> Result<StepOutcome, Error> {
        match self.state {
            EngineState::Uninitialized => return Err(SimulationError::NotSetUp.into()),
            EngineState::Terminated => return Ok(StepOutcome::Halted),
            EngineState::Ready | EngineState::Running => {}
        }

        match self.advance_inner(horizon) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!(error = %e, now = ?self.now, "事件执行失败，终止仿真");
                self.state = EngineState::Terminated;
                Err(e)
            }
        }
    }

    fn advance_inner(&mut self, horizon: Option<SimTime>) -> Result<StepOutcome, Error> {
        let rates = self.event_rate_distribution(self.now);
        let total: f64 = rates.iter().map(|r| r.rate).sum();
        let next_posted = self.posted.peek_earliest().map(|ev| ev.at);

        trace!(now = ?self.now, total_rate = total, next_posted = ?next_posted, "计算速率分布");

        let stochastic_at = if total > 0.0 {
            Some(self.now.after(self.rng.exponential(total)))
        } else {
            None
        };

        // 预定事件只有严格更早时才优先
        let (at, use_posted) = match (next_posted, stochastic_at) {
            (Some(p), Some(s)) if p < s => (p, true),
            (_, Some(s)) => (s, false),
            (Some(p), None) => (p, true),
            (None, None) => {
                self.state = EngineState::Terminated;
                info!(now = ?self.now, "没有可发生的事件，仿真结束");
                return Ok(StepOutcome::Exhausted);
            }
        };

        if let Some(h) = horizon {
            if at > h {
                self.now = self.now.max(h);
                self.state = EngineState::Terminated;
                info!(now = ?self.now, "到达时间上限，仿真结束");
                return Ok(StepOutcome::HorizonReached);
            }
        }

        if use_posted {
            self.fire_posted()?;
        } else {
            self.fire_stochastic(at, &rates, total)?;
        }
        self.state = EngineState::Running;
        Ok(StepOutcome::Fired)
    }

    fn fire_posted(&mut self) -> Result<(), Error> {
        let ev = self.posted.pop_earliest().ok_or_else(|| {
            SimulationError::InvariantViolation("posted queue emptied between peek and pop".into())
        })?;
        self.now = ev.at;
        self.posted_events += 1;

        debug!(
            now = ?self.now,
            seq = ev.seq,
            element = ?ev.element,
            effect = ?ev.effect,
            remaining_posted = self.posted.len(),
            "执行预定事件"
        );
        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceEvent {
                t: self.now.as_f64(),
                element: ev.element,
                effect: format!("{:?}", ev.effect),
                kind: TraceEventKind::Posted,
            });
        }

        self.model.apply(
            ev.effect,
            ev.element,
            EffectContext {
                now: self.now,
                network: &mut self.network,
                posted: &mut self.posted,
            },
        )
    }

    fn fire_stochastic(
        &mut self,
        at: SimTime,
        rates: &[RateEntry<M::Effect>],
        total: f64,
    ) -> Result<(), Error> {
        self.now = at;
        self.stochastic_events += 1;

        let weights: Vec<(usize, f64)> = rates.iter().enumerate().map(|(i, r)| (i, r.rate)).collect();
        let idx = *draw_from(&weights, self.rng.uniform())?;
        let entry = rates[idx];
        let element = self.model.draw_element(entry.locus, &mut self.rng)?;

        debug!(
            now = ?self.now,
            locus = self.model.locus_name(entry.locus),
            element = ?element,
            effect = ?entry.effect,
            total_rate = total,
            "执行随机事件"
        );
        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceEvent {
                t: self.now.as_f64(),
                element,
                effect: format!("{:?}", entry.effect),
                kind: TraceEventKind::Stochastic {
                    locus: self.model.locus_name(entry.locus).to_string(),
                    total_rate: total,
                },
            });
        }

        self.model.apply(
            entry.effect,
            element,
            EffectContext {
                now: self.now,
                network: &mut self.network,
                posted: &mut self.posted,
            },
        )
    }

    /// 运行直到没有事件、到达时间上限或事件数上限。
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self, limits: RunLimits) -> Result<StopReason, Error> {
        info!("▶️  开始运行仿真");

        let mut fired = 0_u64;
        let reason = loop {
            if limits.max_events.is_some_and(|max| fired >= max) {
                self.state = EngineState::Terminated;
                break StopReason::EventLimit;
            }
            match self.advance(limits.until)? {
                StepOutcome::Fired => fired += 1,
                StepOutcome::HorizonReached => break StopReason::Horizon,
                StepOutcome::Exhausted => break StopReason::Exhausted,
                StepOutcome::Halted => break StopReason::Halted,
            }
        };

        info!(
            total_events = fired,
            final_time = ?self.now,
            ?reason,
            "✅ 仿真完成"
        );
        Ok(reason)
    }

    /// 运行直到没有事件或到达 `until`。
    pub fn run_until(&mut self, until: SimTime) -> Result<StopReason, Error> {
        self.run(RunLimits {
            until: Some(until),
            max_events: None,
        })
    }

    /// 汇总实验结果（各仓室计数由模型给出）
    pub fn experimental_results(&self) -> ExperimentResults {
        ExperimentResults {
            time: self.now.as_f64(),
            events: self.stochastic_events + self.posted_events,
            stochastic_events: self.stochastic_events,
            posted_events: self.posted_events,
            pending_posted: self.posted.len(),
            compartments: self.model.results(&self.network),
        }
    }
}

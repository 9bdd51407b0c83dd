//! SIS 模型
//!
//! Susceptible-Infected-Susceptible：感染沿 SI 边随机发生，感染节点以
//! `pRecover` 的概率随机恢复为易感。

use super::{Compartmented, EffectContext, Model};
use crate::error::{ConfigError, Error, SimulationError};
use crate::net::{Element, Network, NodeId};
use crate::params::Params;
use crate::sim::RandomSource;

/// 初始感染概率
pub const P_INFECTED: &str = "pInfected";
/// 每条 SI 边单位时间内的感染概率
pub const P_INFECT: &str = "pInfect";
/// 每个感染节点单位时间内的恢复概率
pub const P_RECOVER: &str = "pRecover";

pub const SUSCEPTIBLE: &str = "S";
pub const INFECTED: &str = "I";

/// 一端易感、一端感染的边
pub const SI: &str = "SI";
/// 感染节点
pub const INFECTED_NODES: &str = "I";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SisEffect {
    Infect,
    Recover,
}

#[derive(Debug, Clone, Default)]
pub struct Sis {
    core: Compartmented<SisEffect>,
    seeds: Vec<NodeId>,
}

impl Sis {
    pub fn new() -> Self {
        Self::default()
    }

    /// 除按 `pInfected` 抽样外，强制这些节点初始为感染
    pub fn with_initially_infected(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.seeds = nodes.into_iter().collect();
        self
    }
}

impl<G: Network> Model<G> for Sis {
    type Effect = SisEffect;

    fn compartmented(&self) -> &Compartmented<SisEffect> {
        &self.core
    }

    fn build(&mut self, params: &Params) -> Result<(), ConfigError> {
        let p_infected = params.probability(P_INFECTED)?;
        let p_infect = params.probability(P_INFECT)?;
        let p_recover = params.probability(P_RECOVER)?;

        self.core.reset();
        self.core.add_compartment(SUSCEPTIBLE, 1.0 - p_infected)?;
        self.core.add_compartment(INFECTED, p_infected)?;

        self.core.add_edge_locus(SI, SUSCEPTIBLE, INFECTED)?;
        self.core.add_node_locus(INFECTED_NODES, INFECTED)?;

        self.core.add_event(SI, p_infect, SisEffect::Infect)?;
        self.core.add_event(INFECTED_NODES, p_recover, SisEffect::Recover)?;
        Ok(())
    }

    fn set_up(
        &mut self,
        _params: &Params,
        rng: &mut RandomSource,
        ctx: EffectContext<'_, G, SisEffect>,
    ) -> Result<(), Error> {
        self.core.set_up(&mut *ctx.network, rng)?;
        seed_infected(&mut self.core, &mut *ctx.network, &self.seeds)?;
        Ok(())
    }

    fn apply(
        &mut self,
        effect: SisEffect,
        element: Element,
        ctx: EffectContext<'_, G, SisEffect>,
    ) -> Result<(), Error> {
        match effect {
            SisEffect::Infect => {
                infect(&mut self.core, &mut *ctx.network, element)?;
            }
            SisEffect::Recover => {
                move_node(&mut self.core, &mut *ctx.network, element, INFECTED, SUSCEPTIBLE)?;
            }
        }
        Ok(())
    }
}

/// 沿 SI 边 `(n, m)` 感染：`n` 必须易感、`m` 必须已感染。返回被感染的节点。
pub(crate) fn infect<G: Network, E: Copy>(
    core: &mut Compartmented<E>,
    g: &mut G,
    element: Element,
) -> Result<NodeId, SimulationError> {
    let (n, m) = element.as_edge().ok_or_else(|| {
        SimulationError::InvariantViolation(format!("infection needs an edge, got {:?}", element))
    })?;
    let s = core.compartment(SUSCEPTIBLE).map_err(config_invariant)?;
    let i = core.compartment(INFECTED).map_err(config_invariant)?;
    if core.compartment_of(g, n)? != s || core.compartment_of(g, m)? != i {
        return Err(SimulationError::InvariantViolation(format!(
            "edge ({}, {}) is not susceptible-infected",
            n.0, m.0
        )));
    }
    core.change_compartment(g, n, i)?;
    Ok(n)
}

/// 把节点元素从仓室 `from` 移到 `to`；节点当前不在 `from` 时视为不变量被破坏。
pub(crate) fn move_node<G: Network, E: Copy>(
    core: &mut Compartmented<E>,
    g: &mut G,
    element: Element,
    from: &str,
    to: &str,
) -> Result<NodeId, SimulationError> {
    let n = element.as_node().ok_or_else(|| {
        SimulationError::InvariantViolation(format!("expected a node, got {:?}", element))
    })?;
    let from_id = core.compartment(from).map_err(config_invariant)?;
    let to_id = core.compartment(to).map_err(config_invariant)?;
    if core.compartment_of(g, n)? != from_id {
        return Err(SimulationError::InvariantViolation(format!(
            "node {} is not in compartment {}",
            n.0, from
        )));
    }
    core.change_compartment(g, n, to_id)?;
    Ok(n)
}

/// 把指定节点移入感染仓室；任何一个节点不在网络中时不做修改，返回配置错误。
pub(crate) fn seed_infected<G: Network, E: Copy>(
    core: &mut Compartmented<E>,
    g: &mut G,
    seeds: &[NodeId],
) -> Result<(), Error> {
    let nodes = g.node_count();
    if let Some(&node) = seeds.iter().find(|n| n.0 >= nodes) {
        return Err(ConfigError::UnknownNode { node, nodes }.into());
    }
    let i = core.compartment(INFECTED).map_err(config_invariant)?;
    for &n in seeds {
        core.change_compartment(g, n, i)?;
    }
    Ok(())
}

fn config_invariant(e: ConfigError) -> SimulationError {
    SimulationError::InvariantViolation(e.to_string())
}

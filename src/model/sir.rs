//! SIR 模型
//!
//! 感染节点以 `pRemove` 的概率随机移出（免疫或死亡），不会再被感染。

use super::sis::{
    INFECTED, INFECTED_NODES, P_INFECT, P_INFECTED, SI, SUSCEPTIBLE, infect, move_node, seed_infected,
};
use super::{Compartmented, EffectContext, Model};
use crate::error::{ConfigError, Error};
use crate::net::{Element, Network, NodeId};
use crate::params::Params;
use crate::sim::RandomSource;

/// 每个感染节点单位时间内被移出的概率
pub const P_REMOVE: &str = "pRemove";

pub const REMOVED: &str = "R";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SirEffect {
    Infect,
    Remove,
}

#[derive(Debug, Clone, Default)]
pub struct Sir {
    core: Compartmented<SirEffect>,
    seeds: Vec<NodeId>,
}

impl Sir {
    pub fn new() -> Self {
        Self::default()
    }

    /// 除按 `pInfected` 抽样外，强制这些节点初始为感染
    pub fn with_initially_infected(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.seeds = nodes.into_iter().collect();
        self
    }
}

impl<G: Network> Model<G> for Sir {
    type Effect = SirEffect;

    fn compartmented(&self) -> &Compartmented<SirEffect> {
        &self.core
    }

    fn build(&mut self, params: &Params) -> Result<(), ConfigError> {
        let p_infected = params.probability(P_INFECTED)?;
        let p_infect = params.probability(P_INFECT)?;
        let p_remove = params.probability(P_REMOVE)?;

        self.core.reset();
        self.core.add_compartment(SUSCEPTIBLE, 1.0 - p_infected)?;
        self.core.add_compartment(INFECTED, p_infected)?;
        self.core.add_compartment(REMOVED, 0.0)?;

        self.core.add_edge_locus(SI, SUSCEPTIBLE, INFECTED)?;
        self.core.add_node_locus(INFECTED_NODES, INFECTED)?;

        self.core.add_event(SI, p_infect, SirEffect::Infect)?;
        self.core.add_event(INFECTED_NODES, p_remove, SirEffect::Remove)?;
        Ok(())
    }

    fn set_up(
        &mut self,
        _params: &Params,
        rng: &mut RandomSource,
        ctx: EffectContext<'_, G, SirEffect>,
    ) -> Result<(), Error> {
        self.core.set_up(&mut *ctx.network, rng)?;
        seed_infected(&mut self.core, &mut *ctx.network, &self.seeds)?;
        Ok(())
    }

    fn apply(
        &mut self,
        effect: SirEffect,
        element: Element,
        ctx: EffectContext<'_, G, SirEffect>,
    ) -> Result<(), Error> {
        match effect {
            SirEffect::Infect => {
                infect(&mut self.core, &mut *ctx.network, element)?;
            }
            SirEffect::Remove => {
                move_node(&mut self.core, &mut *ctx.network, element, INFECTED, REMOVED)?;
            }
        }
        Ok(())
    }
}

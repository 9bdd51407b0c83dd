//! 固定感染时长的 SIS 模型
//!
//! 只有感染是按速率随机发生的；每次感染（包括初始感染）都会预定一个
//! 恰好 `tInfected` 之后的恢复事件，恢复从不由随机速率驱动。

use tracing::trace;

use super::sis::{
    INFECTED, P_INFECT, P_INFECTED, SI, SUSCEPTIBLE, infect, move_node, seed_infected,
};
use super::{Compartmented, EffectContext, Model};
use crate::error::{ConfigError, Error};
use crate::net::{AttrValue, Element, Network, NodeId};
use crate::params::Params;
use crate::sim::{RandomSource, SimTime};

/// 感染状态持续的时长
pub const T_INFECTED: &str = "tInfected";

/// 记录节点被感染时刻的属性名
pub const INFECTION_TIME: &str = "infection_time";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedRecoveryEffect {
    Infect,
    Recover,
}

#[derive(Debug, Clone, Default)]
pub struct SisFixedRecovery {
    core: Compartmented<FixedRecoveryEffect>,
    t_infected: f64,
    seeds: Vec<NodeId>,
}

impl SisFixedRecovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// 除按 `pInfected` 抽样外，强制这些节点初始为感染
    pub fn with_initially_infected(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.seeds = nodes.into_iter().collect();
        self
    }

    /// 构建时读到的感染时长
    pub fn t_infected(&self) -> f64 {
        self.t_infected
    }
}

impl<G: Network> Model<G> for SisFixedRecovery {
    type Effect = FixedRecoveryEffect;

    fn compartmented(&self) -> &Compartmented<FixedRecoveryEffect> {
        &self.core
    }

    fn build(&mut self, params: &Params) -> Result<(), ConfigError> {
        let p_infected = params.probability(P_INFECTED)?;
        let p_infect = params.probability(P_INFECT)?;
        let t_infected = params.non_negative(T_INFECTED)?;

        self.core.reset();
        self.t_infected = t_infected;
        self.core.add_compartment(SUSCEPTIBLE, 1.0 - p_infected)?;
        self.core.add_compartment(INFECTED, p_infected)?;

        self.core.add_edge_locus(SI, SUSCEPTIBLE, INFECTED)?;
        self.core.add_event(SI, p_infect, FixedRecoveryEffect::Infect)?;
        Ok(())
    }

    fn set_up(
        &mut self,
        _params: &Params,
        rng: &mut RandomSource,
        mut ctx: EffectContext<'_, G, FixedRecoveryEffect>,
    ) -> Result<(), Error> {
        self.core.set_up(&mut *ctx.network, rng)?;
        seed_infected(&mut self.core, &mut *ctx.network, &self.seeds)?;

        let infected = self.core.compartment(INFECTED)?;
        let recover_at = ctx.now.after(self.t_infected);
        for n in self.core.nodes_in(&*ctx.network, infected) {
            ctx.network
                .set_node_attr(n, INFECTION_TIME, AttrValue::Float(ctx.now.as_f64()));
            ctx.post(recover_at, Element::Node(n), FixedRecoveryEffect::Recover)?;
        }
        Ok(())
    }

    fn apply(
        &mut self,
        effect: FixedRecoveryEffect,
        element: Element,
        mut ctx: EffectContext<'_, G, FixedRecoveryEffect>,
    ) -> Result<(), Error> {
        match effect {
            FixedRecoveryEffect::Infect => {
                let n = infect(&mut self.core, &mut *ctx.network, element)?;
                let now = ctx.now;
                ctx.network
                    .set_node_attr(n, INFECTION_TIME, AttrValue::Float(now.as_f64()));
                let recover_at: SimTime = now.after(self.t_infected);
                trace!(node = n.0, ?recover_at, "预定恢复事件");
                ctx.post(recover_at, Element::Node(n), FixedRecoveryEffect::Recover)?;
            }
            FixedRecoveryEffect::Recover => {
                move_node(&mut self.core, &mut *ctx.network, element, INFECTED, SUSCEPTIBLE)?;
            }
        }
        Ok(())
    }
}

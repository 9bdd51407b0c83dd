//! 仓室疾病模型
//!
//! 此模块定义仿真器使用的模型接口，以及几个具体模型：
//! 随机恢复的 SIS、SIR，和固定感染时长的 SIS。

mod compartmented;
mod locus;
pub mod sir;
pub mod sis;
pub mod sis_fixed;

use std::collections::BTreeMap;
use std::fmt;

pub use compartmented::{COMPARTMENT, CompartmentId, Compartmented, EventDescriptor};
pub use locus::{Locus, LocusId, LocusKind};
pub use sir::Sir;
pub use sis::Sis;
pub use sis_fixed::SisFixedRecovery;

use crate::error::{ConfigError, Error, SimulationError};
use crate::net::{Element, Network};
use crate::params::Params;
use crate::sim::{PostedEvents, RandomSource, SimTime};

/// 效果执行时能看到的仿真状态：当前时间、网络和预定事件队列。
pub struct EffectContext<'a, G, E> {
    pub now: SimTime,
    pub network: &'a mut G,
    pub posted: &'a mut PostedEvents<E>,
}

impl<G, E> EffectContext<'_, G, E> {
    /// 预定一个未来事件（不能早于当前时间）
    pub fn post(&mut self, at: SimTime, element: Element, effect: E) -> Result<(), ConfigError> {
        self.posted.post(self.now, at, element, effect)
    }
}

/// 仓室模型接口
///
/// 效果用每个模型自己的枚举 `Effect` 表示，构建时绑定到事件描述上，
/// 触发时由 [`Model::apply`] 分发。
pub trait Model<G: Network> {
    type Effect: Copy + fmt::Debug + 'static;

    /// 共享的仓室/位点机制
    fn compartmented(&self) -> &Compartmented<Self::Effect>;

    /// 声明仓室、位点和事件；缺少参数时返回带键名的错误。
    fn build(&mut self, params: &Params) -> Result<(), ConfigError>;

    /// 初始化网络上的仓室分配（以及模型需要预定的事件）。
    fn set_up(
        &mut self,
        params: &Params,
        rng: &mut RandomSource,
        ctx: EffectContext<'_, G, Self::Effect>,
    ) -> Result<(), Error>;

    /// 执行一个效果（随机触发或预定触发）。
    fn apply(
        &mut self,
        effect: Self::Effect,
        element: Element,
        ctx: EffectContext<'_, G, Self::Effect>,
    ) -> Result<(), Error>;

    /// 时刻 `t` 的事件分布 `(位点, 单位概率, 效果)`
    fn event_distribution(&self, _t: SimTime) -> Vec<EventDescriptor<Self::Effect>> {
        self.compartmented().event_distribution()
    }

    fn size_of_locus(&self, locus: LocusId) -> usize {
        self.compartmented().size_of_locus(locus)
    }

    fn locus_name(&self, locus: LocusId) -> &str {
        self.compartmented().locus_name(locus)
    }

    fn draw_element(&self, locus: LocusId, rng: &mut RandomSource) -> Result<Element, SimulationError> {
        self.compartmented().draw_element(locus, rng)
    }

    /// 各仓室的节点数
    fn results(&self, network: &G) -> BTreeMap<String, usize> {
        self.compartmented().results(network)
    }

    fn check_partition(&self, network: &G) -> Result<(), SimulationError> {
        self.compartmented().check_partition(network)
    }
}

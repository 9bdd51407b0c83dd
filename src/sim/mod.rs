//! 仿真核心模块
//!
//! 此模块包含 Gillespie 仿真的核心组件：仿真时间、随机数源、加权抽样、
//! 预定事件队列和随机动力学仿真器。

// 子模块声明
mod dynamics;
mod posted;
mod rng;
mod sampling;
mod time;

// 重新导出公共接口
pub use dynamics::{
    EngineState, ExperimentResults, RateEntry, RunLimits, StepOutcome, StochasticDynamics,
    StopReason,
};
pub use posted::{PostedEvent, PostedEvents};
pub use rng::RandomSource;
pub use sampling::draw_from;
pub use time::SimTime;

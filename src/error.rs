//! 错误类型
//!
//! 配置类错误在任何仿真状态被修改之前返回；仿真类错误会终止当前运行。

use crate::net::NodeId;
use crate::sim::SimTime;
use thiserror::Error;

/// 配置错误：参数缺失/非法，或者把事件调度到过去。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required parameter `{0}`")]
    MissingParameter(String),

    #[error("invalid value {value} for parameter `{key}`: {reason}")]
    InvalidParameter {
        key: String,
        value: f64,
        reason: &'static str,
    },

    #[error("cannot post event at {at:?}: clock is already at {now:?}")]
    PostedInPast { at: SimTime, now: SimTime },

    #[error("duplicate compartment `{0}`")]
    DuplicateCompartment(String),

    #[error("unknown compartment `{0}`")]
    UnknownCompartment(String),

    #[error("duplicate locus `{0}`")]
    DuplicateLocus(String),

    #[error("unknown locus `{0}`")]
    UnknownLocus(String),

    #[error("initial compartment probabilities sum to {0}, which exceeds 1")]
    InitialProbabilities(f64),

    #[error("malformed parameter assignment `{0}` (expected key=value)")]
    MalformedAssignment(String),

    #[error("initially infected node {node:?} is not in the network ({nodes} nodes)")]
    UnknownNode { node: NodeId, nodes: usize },
}

/// 仿真错误：运行期不变量被破坏，当前运行无法继续。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("cannot draw from an empty distribution")]
    EmptyDistribution,

    #[error("cannot draw from a distribution whose weights are all zero")]
    ZeroTotalWeight,

    #[error("invalid weight {0} in distribution")]
    InvalidWeight(f64),

    #[error("locus `{0}` is empty")]
    EmptyLocus(String),

    #[error("node {0:?} is not in any declared compartment")]
    NoCompartment(NodeId),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("dynamics have not been set up")]
    NotSetUp,
}

/// 统一错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! 拓扑构建
//!
//! 供命令行和测试使用的网络生成器；仿真核心只通过 `Network` 接口使用网络。

pub mod erdos_renyi;
pub mod ring;

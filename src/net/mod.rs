//! 网络模块
//!
//! 此模块包含仿真所作用的网络：标识符、属性、能力接口和内存图实现。

// 子模块声明
mod api;
mod attr;
mod id;
mod network;

// 重新导出公共接口
pub use api::Network;
pub use attr::{AttrValue, Attrs};
pub use id::{Element, NodeId};
pub use network::Graph;

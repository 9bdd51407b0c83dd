//! 事件记录（用于离线分析和复现检查）
//!
//! 仿真器在每次执行事件时追加一条结构化记录；运行结束后由调用方写成 JSON。

use serde::{Deserialize, Serialize};

use crate::net::Element;

/// 事件来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEventKind {
    /// 按速率随机触发；`total_rate` 是触发时的总速率
    Stochastic { locus: String, total_rate: f64 },
    /// 预定事件
    Posted,
}

/// 一条已执行事件的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// 仿真时间（和 `SimTime.0` 同口径）
    pub t: f64,
    pub element: Element,
    pub effect: String,
    #[serde(flatten)]
    pub kind: TraceEventKind,
}

/// 一个简单的事件收集器（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTrace {
    pub events: Vec<TraceEvent>,
}

impl EventTrace {
    pub fn push(&mut self, ev: TraceEvent) {
        self.events.push(ev);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn stochastic(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events
            .iter()
            .filter(|ev| matches!(ev.kind, TraceEventKind::Stochastic { .. }))
    }

    pub fn posted(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events
            .iter()
            .filter(|ev| matches!(ev.kind, TraceEventKind::Posted))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events)
    }
}

//! 加权抽样
//!
//! 把一个 `[0, 1)` 均匀抽样转换成任意离散分布上的抽样。权重无需归一化：
//! 抽样值先乘以总权重，再在累积权重上走一遍。

use crate::error::SimulationError;

/// 从 `(value, weight)` 序列中抽取一个值。
///
/// 选中第一个满足 `r1 * W < Σ_{≤i} w` 的元素，即半开区间
/// `[Σ_{<i} w, Σ_{≤i} w)` 包含 `r1 * W`。权重为 0 的元素永远不会被选中；
/// 浮点累加造成的末尾不足会落到最后一个正权重元素上。
pub fn draw_from<T>(dist: &[(T, f64)], r1: f64) -> Result<&T, SimulationError> {
    if dist.is_empty() {
        return Err(SimulationError::EmptyDistribution);
    }

    let mut total = 0.0_f64;
    for (_, w) in dist {
        if !w.is_finite() || *w < 0.0 {
            return Err(SimulationError::InvalidWeight(*w));
        }
        total += *w;
    }
    if total <= 0.0 {
        return Err(SimulationError::ZeroTotalWeight);
    }

    let target = r1 * total;
    let mut acc = 0.0_f64;
    let mut last_positive = None;
    for (value, w) in dist {
        if *w == 0.0 {
            continue;
        }
        acc += *w;
        if target < acc {
            return Ok(value);
        }
        last_positive = Some(value);
    }

    // total > 0 保证至少有一个正权重元素
    last_positive.ok_or(SimulationError::ZeroTotalWeight)
}

//! 预定事件队列
//!
//! 按确定时间触发的未来事件；先按触发时间、再按插入序号（FIFO）排序。

use super::time::SimTime;
use crate::error::ConfigError;
use crate::net::Element;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::trace;

/// 预定事件：触发时间、序列号、目标元素和效果。
#[derive(Debug, Clone)]
pub struct PostedEvent<E> {
    pub at: SimTime,
    pub seq: u64,
    pub element: Element,
    pub effect: E,
}

// BinaryHeap 是 max-heap：反向比较，让最早（同时刻则最先预定）的事件在堆顶。
impl<E> Ord for PostedEvent<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.at.cmp(&other.at) {
            Ordering::Equal => self.seq.cmp(&other.seq),
            ord => ord,
        }
        .reverse()
    }
}

impl<E> PartialOrd for PostedEvent<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> PartialEq for PostedEvent<E> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<E> Eq for PostedEvent<E> {}

/// 预定事件队列
#[derive(Debug)]
pub struct PostedEvents<E> {
    next_seq: u64,
    q: BinaryHeap<PostedEvent<E>>,
}

impl<E> Default for PostedEvents<E> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            q: BinaryHeap::new(),
        }
    }
}

impl<E> PostedEvents<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在 `at` 时刻预定一个事件；`now` 为当前时钟，不能调度到过去。
    pub fn post(
        &mut self,
        now: SimTime,
        at: SimTime,
        element: Element,
        effect: E,
    ) -> Result<(), ConfigError> {
        if at < now || !at.is_finite() {
            return Err(ConfigError::PostedInPast { at, now });
        }

        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(PostedEvent {
            at,
            seq,
            element,
            effect,
        });

        trace!(?at, seq, queue_size = self.q.len(), "预定事件已加入队列");
        Ok(())
    }

    pub fn peek_earliest(&self) -> Option<&PostedEvent<E>> {
        self.q.peek()
    }

    pub fn pop_earliest(&mut self) -> Option<PostedEvent<E>> {
        self.q.pop()
    }

    pub fn len(&self) -> usize {
        self.q.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q.is_empty()
    }

    pub fn clear(&mut self) {
        self.q.clear();
        self.next_seq = 0;
    }

    /// 按触发顺序列出队列中的事件（不出队）
    pub fn iter_sorted(&self) -> Vec<&PostedEvent<E>> {
        let mut v: Vec<_> = self.q.iter().collect();
        // 反向比较 => 降序排序即为最早优先
        v.sort_by(|a, b| b.cmp(a));
        v
    }
}

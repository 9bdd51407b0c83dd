//! 位点（locus）
//!
//! 某类事件可以作用的节点或边的集合。大小查询、插入、删除和均匀抽取都是 O(1)：
//! 成员存在 `Vec` 里，另用下标表支持 swap-remove。

use std::collections::HashMap;

use super::compartmented::CompartmentId;
use crate::net::Element;
use crate::sim::RandomSource;

/// 位点标识符（在模型内部的下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocusId(pub usize);

/// 位点跟踪的成员类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocusKind {
    /// 处于某个仓室的节点
    Node { compartment: CompartmentId },
    /// 一端在 `left`、另一端在 `right` 的边，按 `(left 端, right 端)` 定向存储
    Edge {
        left: CompartmentId,
        right: CompartmentId,
    },
}

#[derive(Debug, Clone)]
pub struct Locus {
    name: String,
    kind: LocusKind,
    members: Vec<Element>,
    index: HashMap<Element, usize>,
}

impl Locus {
    pub fn new(name: impl Into<String>, kind: LocusKind) -> Self {
        Self {
            name: name.into(),
            kind,
            members: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LocusKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, el: &Element) -> bool {
        self.index.contains_key(el)
    }

    /// 加入成员；已存在时返回 `false`
    pub fn insert(&mut self, el: Element) -> bool {
        if self.index.contains_key(&el) {
            return false;
        }
        self.index.insert(el, self.members.len());
        self.members.push(el);
        true
    }

    /// 移除成员；不存在时返回 `false`
    pub fn remove(&mut self, el: &Element) -> bool {
        let Some(idx) = self.index.remove(el) else {
            return false;
        };
        self.members.swap_remove(idx);
        if let Some(moved) = self.members.get(idx) {
            self.index.insert(*moved, idx);
        }
        true
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.index.clear();
    }

    /// 均匀抽取一个成员
    pub fn draw(&self, rng: &mut RandomSource) -> Option<Element> {
        if self.members.is_empty() {
            return None;
        }
        Some(self.members[rng.index(self.members.len())])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.members.iter()
    }
}

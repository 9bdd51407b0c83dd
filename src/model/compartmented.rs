//! 仓室模型的公共机制
//!
//! 声明仓室、位点和事件；按初始概率给节点分配仓室；节点换仓室时同步维护
//! 所有受影响的位点。节点所属仓室记录在网络的 `compartment` 属性上。

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};

use super::locus::{Locus, LocusId, LocusKind};
use crate::error::{ConfigError, Error, SimulationError};
use crate::net::{AttrValue, Element, Network, NodeId};
use crate::sim::{RandomSource, draw_from};

/// 记录节点所属仓室的属性名
pub const COMPARTMENT: &str = "compartment";

/// 初始概率之和允许超出 1 的浮点误差
const PROBABILITY_SLACK: f64 = 1e-9;

/// 仓室标识符（声明顺序下标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompartmentId(pub usize);

#[derive(Debug, Clone)]
struct Compartment {
    name: String,
    initial: f64,
}

/// 事件描述：位点、单位概率和效果。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventDescriptor<E> {
    pub locus: LocusId,
    pub probability: f64,
    pub effect: E,
}

/// 仓室、位点与事件的声明及其运行期状态
#[derive(Debug, Clone)]
pub struct Compartmented<E> {
    compartments: Vec<Compartment>,
    compartment_by_name: HashMap<String, CompartmentId>,
    loci: Vec<Locus>,
    locus_by_name: HashMap<String, LocusId>,
    events: Vec<EventDescriptor<E>>,
}

impl<E> Default for Compartmented<E> {
    fn default() -> Self {
        Self {
            compartments: Vec::new(),
            compartment_by_name: HashMap::new(),
            loci: Vec::new(),
            locus_by_name: HashMap::new(),
            events: Vec::new(),
        }
    }
}

impl<E: Copy> Compartmented<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空全部声明（重新 build 之前调用）
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 声明仓室及其初始概率
    pub fn add_compartment(
        &mut self,
        name: &str,
        initial: f64,
    ) -> Result<CompartmentId, ConfigError> {
        if self.compartment_by_name.contains_key(name) {
            return Err(ConfigError::DuplicateCompartment(name.to_string()));
        }
        if !(0.0..=1.0).contains(&initial) {
            return Err(ConfigError::InvalidParameter {
                key: name.to_string(),
                value: initial,
                reason: "initial compartment probability must lie in [0, 1]",
            });
        }
        let id = CompartmentId(self.compartments.len());
        self.compartments.push(Compartment {
            name: name.to_string(),
            initial,
        });
        self.compartment_by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn compartment(&self, name: &str) -> Result<CompartmentId, ConfigError> {
        self.compartment_by_name
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownCompartment(name.to_string()))
    }

    pub fn compartment_name(&self, c: CompartmentId) -> &str {
        self.compartments
            .get(c.0)
            .map(|c| c.name.as_str())
            .unwrap_or("")
    }

    /// 声明节点位点：处于 `compartment` 的所有节点
    pub fn add_node_locus(&mut self, name: &str, compartment: &str) -> Result<LocusId, ConfigError> {
        let compartment = self.compartment(compartment)?;
        self.push_locus(name, LocusKind::Node { compartment })
    }

    /// 声明边位点：一端在 `left`、另一端在 `right` 的所有边
    pub fn add_edge_locus(
        &mut self,
        name: &str,
        left: &str,
        right: &str,
    ) -> Result<LocusId, ConfigError> {
        let left = self.compartment(left)?;
        let right = self.compartment(right)?;
        self.push_locus(name, LocusKind::Edge { left, right })
    }

    fn push_locus(&mut self, name: &str, kind: LocusKind) -> Result<LocusId, ConfigError> {
        if self.locus_by_name.contains_key(name) {
            return Err(ConfigError::DuplicateLocus(name.to_string()));
        }
        let id = LocusId(self.loci.len());
        self.loci.push(Locus::new(name, kind));
        self.locus_by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// 声明事件：作用在位点 `locus` 上，每个成员单位时间内以 `probability` 发生
    pub fn add_event(&mut self, locus: &str, probability: f64, effect: E) -> Result<(), ConfigError> {
        let id = self.locus_id(locus)?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::InvalidParameter {
                key: locus.to_string(),
                value: probability,
                reason: "event probability must lie in [0, 1]",
            });
        }
        self.events.push(EventDescriptor {
            locus: id,
            probability,
            effect,
        });
        Ok(())
    }

    pub fn locus_id(&self, name: &str) -> Result<LocusId, ConfigError> {
        self.locus_by_name
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownLocus(name.to_string()))
    }

    pub fn locus(&self, id: LocusId) -> Option<&Locus> {
        self.loci.get(id.0)
    }

    pub fn locus_name(&self, id: LocusId) -> &str {
        self.locus(id).map(Locus::name).unwrap_or("")
    }

    pub fn size_of_locus(&self, id: LocusId) -> usize {
        self.locus(id).map_or(0, Locus::len)
    }

    /// 从位点中均匀抽取一个元素
    pub fn draw_element(&self, id: LocusId, rng: &mut RandomSource) -> Result<Element, SimulationError> {
        let locus = self.locus(id).ok_or_else(|| {
            SimulationError::InvariantViolation(format!("unknown locus {:?}", id))
        })?;
        locus
            .draw(rng)
            .ok_or_else(|| SimulationError::EmptyLocus(locus.name().to_string()))
    }

    /// 当前事件分布；位点大小在计算速率时再读取，因此总反映当前成员。
    pub fn event_distribution(&self) -> Vec<EventDescriptor<E>> {
        self.events.clone()
    }

    /// 初始仓室分布：最后一个仓室吸收 `1 - Σ(其余)`，防止浮点累加漂移。
    pub fn initial_distribution(&self) -> Result<Vec<(CompartmentId, f64)>, ConfigError> {
        let total: f64 = self.compartments.iter().map(|c| c.initial).sum();
        if total > 1.0 + PROBABILITY_SLACK {
            return Err(ConfigError::InitialProbabilities(total));
        }

        let n = self.compartments.len();
        let mut dist = Vec::with_capacity(n);
        let mut others = 0.0_f64;
        for (i, c) in self.compartments.iter().enumerate() {
            if i + 1 == n {
                dist.push((CompartmentId(i), (1.0 - others).max(0.0)));
            } else {
                others += c.initial;
                dist.push((CompartmentId(i), c.initial));
            }
        }
        Ok(dist)
    }

    /// 给每个节点抽取初始仓室，然后从头重建所有位点。
    pub fn set_up<G: Network>(&mut self, g: &mut G, rng: &mut RandomSource) -> Result<(), Error> {
        let dist = self.initial_distribution()?;
        let nodes: Vec<NodeId> = g.nodes().collect();
        for n in nodes {
            let c = *draw_from(&dist, rng.uniform())?;
            let name = self.compartment_name(c).to_string();
            g.set_node_attr(n, COMPARTMENT, AttrValue::Str(name));
        }
        self.rebuild_loci(g)?;

        debug!(
            nodes = g.node_count(),
            compartments = ?self.results(g),
            "初始仓室分配完成"
        );
        Ok(())
    }

    /// 按网络上当前的仓室属性重建位点
    pub fn rebuild_loci<G: Network>(&mut self, g: &G) -> Result<(), SimulationError> {
        for locus in &mut self.loci {
            locus.clear();
        }
        for n in g.nodes() {
            let c = self.compartment_of(g, n)?;
            for locus in &mut self.loci {
                if locus.kind() == (LocusKind::Node { compartment: c }) {
                    locus.insert(Element::Node(n));
                }
            }
        }
        for (a, b) in g.edges() {
            let ca = self.compartment_of(g, a)?;
            let cb = self.compartment_of(g, b)?;
            for locus in &mut self.loci {
                if let Some(el) = edge_member(locus.kind(), a, ca, b, cb) {
                    locus.insert(el);
                }
            }
        }
        Ok(())
    }

    /// 读取节点所属仓室
    pub fn compartment_of<G: Network>(&self, g: &G, n: NodeId) -> Result<CompartmentId, SimulationError> {
        g.node_attr(n, COMPARTMENT)
            .and_then(AttrValue::as_str)
            .and_then(|name| self.compartment_by_name.get(name).copied())
            .ok_or(SimulationError::NoCompartment(n))
    }

    /// 把节点移到仓室 `to`，同时更新节点位点和所有与它相连的边位点。
    pub fn change_compartment<G: Network>(
        &mut self,
        g: &mut G,
        n: NodeId,
        to: CompartmentId,
    ) -> Result<(), SimulationError> {
        let from = self.compartment_of(g, n)?;
        if from == to {
            return Ok(());
        }
        let to_name = self
            .compartments
            .get(to.0)
            .map(|c| c.name.clone())
            .ok_or_else(|| SimulationError::InvariantViolation(format!("unknown compartment {:?}", to)))?;

        trace!(
            node = n.0,
            from = self.compartment_name(from),
            to = %to_name,
            "节点换仓室"
        );

        g.set_node_attr(n, COMPARTMENT, AttrValue::Str(to_name));

        let node_el = Element::Node(n);
        for locus in &mut self.loci {
            if let LocusKind::Node { compartment } = locus.kind() {
                if compartment == from {
                    locus.remove(&node_el);
                } else if compartment == to {
                    locus.insert(node_el);
                }
            }
        }

        for m in g.neighbors(n) {
            let cm = self.compartment_of(g, m)?;
            let forward = Element::Edge(n, m);
            let backward = forward.reversed();
            for locus in &mut self.loci {
                if !matches!(locus.kind(), LocusKind::Edge { .. }) {
                    continue;
                }
                locus.remove(&forward);
                locus.remove(&backward);
                if let Some(el) = edge_member(locus.kind(), n, to, m, cm) {
                    locus.insert(el);
                }
            }
        }
        Ok(())
    }

    /// 仓室 `c` 中的所有节点
    pub fn nodes_in<G: Network>(&self, g: &G, c: CompartmentId) -> Vec<NodeId> {
        g.nodes()
            .filter(|n| self.compartment_of(g, *n).ok() == Some(c))
            .collect()
    }

    /// 每个仓室的节点数（包括空仓室）
    pub fn results<G: Network>(&self, g: &G) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = self
            .compartments
            .iter()
            .map(|c| (c.name.clone(), 0))
            .collect();
        for n in g.nodes() {
            if let Ok(c) = self.compartment_of(g, n) {
                if let Some(count) = counts.get_mut(self.compartment_name(c)) {
                    *count += 1;
                }
            }
        }
        counts
    }

    /// 检查每个节点都恰好属于一个已声明的仓室
    pub fn check_partition<G: Network>(&self, g: &G) -> Result<(), SimulationError> {
        for n in g.nodes() {
            self.compartment_of(g, n)?;
        }
        Ok(())
    }
}

/// 边 `(a, b)` 是否属于给定边位点；属于时返回按位点方向定向的元素。
fn edge_member(
    kind: LocusKind,
    a: NodeId,
    ca: CompartmentId,
    b: NodeId,
    cb: CompartmentId,
) -> Option<Element> {
    let LocusKind::Edge { left, right } = kind else {
        return None;
    };
    if ca == left && cb == right {
        Some(Element::Edge(a, b))
    } else if cb == left && ca == right {
        Some(Element::Edge(b, a))
    } else {
        None
    }
}

//! 最大流算法
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson），
//! 用于计算两站之间可同时运行的最大列车数

use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId};
use crate::types::{Capacity, FlowValue};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// 残余图中的一段弧
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidualArc {
    /// 沿边方向，剩余容量为 weight - flow
    Forward(EdgeId),
    /// 逆边方向，剩余容量为 flow
    Backward(EdgeId),
}

impl ResidualArc {
    pub fn edge(&self) -> EdgeId {
        match *self {
            ResidualArc::Forward(e) | ResidualArc::Backward(e) => e,
        }
    }
}

/// 增广路径（从源点到汇点的弧序列）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AugmentingPath {
    pub arcs: Vec<ResidualArc>,
}

/// 最大流结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: FlowValue,
    /// 流量分配（按边 ID 下标）
    pub flow: Vec<Capacity>,
    /// 增广次数
    pub augmentations: usize,
    /// 最小割的源侧顶点集
    pub source_side: HashSet<VertexId>,
}

impl MaxFlow {
    /// 某条边上的流量
    pub fn edge_flow(&self, edge: EdgeId) -> Capacity {
        self.flow.get(edge.index()).copied().unwrap_or(0)
    }
}

/// 单次 BFS 的运行时状态
struct SearchState {
    visited: Vec<bool>,
    path: Vec<Option<EdgeId>>,
    queue: VecDeque<VertexId>,
}

impl SearchState {
    fn new(slots: usize) -> Self {
        Self {
            visited: vec![false; slots],
            path: vec![None; slots],
            queue: VecDeque::new(),
        }
    }

    fn reset(&mut self) {
        self.visited.fill(false);
        self.path.fill(None);
        self.queue.clear();
    }

    fn visit(&mut self, v: VertexId, via: Option<EdgeId>) {
        self.visited[v.index()] = true;
        self.path[v.index()] = via;
        self.queue.push_back(v);
    }

    fn is_visited(&self, v: VertexId) -> bool {
        self.visited[v.index()]
    }
}

/// Edmonds-Karp 最大流算法
pub struct EdmondsKarp<'a> {
    graph: &'a Graph,
}

impl<'a> EdmondsKarp<'a> {
    /// 创建算法实例
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// 计算从 source 到 sink 的最大流
    pub fn max_flow(&self, source: VertexId, sink: VertexId) -> Result<MaxFlow> {
        self.check_endpoints(source, sink)?;

        // 每次计算都从零流量开始
        let mut flow = vec![0; self.graph.edge_slots()];
        let mut state = SearchState::new(self.graph.vertex_slots());
        let mut total: Capacity = 0;
        let mut augmentations = 0;

        while self.search(source, sink, &flow, &mut state) {
            let path = self.trace_back(source, sink, &state);
            let bottleneck = self.bottleneck(&path, &flow);
            if bottleneck == 0 {
                break;
            }

            for arc in &path.arcs {
                match *arc {
                    ResidualArc::Forward(e) => flow[e.index()] += bottleneck,
                    ResidualArc::Backward(e) => flow[e.index()] -= bottleneck,
                }
            }

            total = total.saturating_add(bottleneck);
            augmentations += 1;
        }

        // 最后一次失败的搜索访问到的顶点即最小割源侧
        let source_side = self
            .graph
            .vertex_ids()
            .into_iter()
            .filter(|&v| state.is_visited(v))
            .collect();

        let value = if total > 0 {
            FlowValue::Flow(total)
        } else if self.is_connected(source, sink) {
            FlowValue::Flow(0)
        } else {
            FlowValue::Unreachable
        };

        debug!(
            source = source.index(),
            sink = sink.index(),
            value = %value,
            augmentations,
            "max flow computed"
        );

        Ok(MaxFlow {
            value,
            flow,
            augmentations,
            source_side,
        })
    }

    /// 在给定流量下查找一条增广路径（按边数最短）
    pub fn find_augmenting_path(
        &self,
        source: VertexId,
        sink: VertexId,
        flow: &[Capacity],
    ) -> Option<AugmentingPath> {
        if self.graph.vertex(source).is_none() || self.graph.vertex(sink).is_none() {
            return None;
        }
        let mut state = SearchState::new(self.graph.vertex_slots());
        if self.search(source, sink, flow, &mut state) {
            Some(self.trace_back(source, sink, &state))
        } else {
            None
        }
    }

    fn check_endpoints(&self, source: VertexId, sink: VertexId) -> Result<()> {
        let s = self
            .graph
            .vertex(source)
            .ok_or_else(|| Error::VertexNotFound(format!("{:?}", source)))?;
        self.graph
            .vertex(sink)
            .ok_or_else(|| Error::VertexNotFound(format!("{:?}", sink)))?;
        if source == sink {
            return Err(Error::SameEndpoints(s.name().to_string()));
        }
        Ok(())
    }

    /// BFS：先扫描剩余容量为正的出边，再扫描有流量的入边（逆向弧）
    fn search(
        &self,
        source: VertexId,
        sink: VertexId,
        flow: &[Capacity],
        state: &mut SearchState,
    ) -> bool {
        state.reset();
        state.visit(source, None);

        while let Some(v) = state.queue.pop_front() {
            if state.is_visited(sink) {
                break;
            }

            for edge in self.graph.outgoing_edges(v) {
                let w = edge.destination();
                let used = flow[edge.id().index()];
                if !state.is_visited(w) && edge.weight() > used {
                    state.visit(w, Some(edge.id()));
                }
            }

            for edge in self.graph.incoming_edges(v) {
                let w = edge.origin();
                if !state.is_visited(w) && flow[edge.id().index()] > 0 {
                    state.visit(w, Some(edge.id()));
                }
            }
        }

        state.is_visited(sink)
    }

    /// 沿前驱边从汇点回溯到源点
    fn trace_back(&self, source: VertexId, sink: VertexId, state: &SearchState) -> AugmentingPath {
        let mut arcs = Vec::new();
        let mut v = sink;

        while v != source {
            let Some(e) = state.path[v.index()] else {
                break;
            };
            let Some(edge) = self.graph.edge(e) else {
                break;
            };
            if edge.destination() == v {
                arcs.push(ResidualArc::Forward(e));
                v = edge.origin();
            } else {
                arcs.push(ResidualArc::Backward(e));
                v = edge.destination();
            }
        }

        arcs.reverse();
        AugmentingPath { arcs }
    }

    fn bottleneck(&self, path: &AugmentingPath, flow: &[Capacity]) -> Capacity {
        path.arcs
            .iter()
            .filter_map(|arc| {
                let edge = self.graph.edge(arc.edge())?;
                let used = flow[edge.id().index()];
                Some(match arc {
                    ResidualArc::Forward(_) => edge.weight() - used,
                    ResidualArc::Backward(_) => used,
                })
            })
            .min()
            .unwrap_or(0)
    }

    /// 忽略容量时 sink 是否可从 source 到达
    fn is_connected(&self, source: VertexId, sink: VertexId) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(source);
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            if v == sink {
                return true;
            }
            for edge in self.graph.outgoing_edges(v) {
                if visited.insert(edge.destination()) {
                    queue.push_back(edge.destination());
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Station;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn graph_with(names: &[&str]) -> Graph {
        let mut graph = Graph::new();
        for name in names {
            graph.add_vertex(Station::named(*name));
        }
        graph
    }

    fn create_flow_graph() -> Graph {
        // 经典最大流测试图
        //     10       10
        // S -----> A -----> T
        // |        ^        ^
        // |5       |5       |
        // v        |        |
        // B -----> C ------>|
        //     10       10
        let mut graph = graph_with(&["S", "A", "B", "C", "T"]);
        graph.add_edge("S", "A", 10, "IC");
        graph.add_edge("S", "B", 5, "IC");
        graph.add_edge("A", "T", 10, "IC");
        graph.add_edge("B", "C", 10, "IC");
        graph.add_edge("C", "A", 5, "IC");
        graph.add_edge("C", "T", 10, "IC");
        graph
    }

    fn id(graph: &Graph, name: &str) -> VertexId {
        graph.vertex_id(name).unwrap()
    }

    fn assert_valid_flow(graph: &Graph, result: &MaxFlow, source: VertexId, sink: VertexId) {
        for edge in graph.edges() {
            assert!(result.edge_flow(edge.id()) <= edge.weight());
        }
        for v in graph.vertex_ids() {
            if v == source || v == sink {
                continue;
            }
            let inflow: Capacity = graph.incoming_edges(v).map(|e| result.edge_flow(e.id())).sum();
            let outflow: Capacity = graph.outgoing_edges(v).map(|e| result.edge_flow(e.id())).sum();
            assert_eq!(inflow, outflow, "conservation broken at {:?}", v);
        }
    }

    #[test]
    fn test_max_flow_basic() {
        let graph = create_flow_graph();
        let (s, t) = (id(&graph, "S"), id(&graph, "T"));
        let result = EdmondsKarp::new(&graph).max_flow(s, t).unwrap();

        // 10 经 A，5 经 B-C
        assert_eq!(result.value, FlowValue::Flow(15));
        assert!(result.augmentations >= 2);
        assert_valid_flow(&graph, &result, s, t);

        assert!(result.source_side.contains(&s));
        assert!(!result.source_side.contains(&t));
    }

    #[test]
    fn test_line_bottleneck() {
        // 原始容量 4 和 2，双向共享后各方向为 2 和 1
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_bidirectional_edge("A", "B", 4 / 2, "REGIONAL");
        graph.add_bidirectional_edge("B", "C", 2 / 2, "REGIONAL");

        assert_eq!(graph.edmonds_karp("A", "C"), FlowValue::Flow(1));
        assert_eq!(graph.edmonds_karp("A", "C").as_sentinel(), 1);
    }

    #[test]
    fn test_disconnected_stations() {
        let mut graph = graph_with(&["A", "B"]);
        assert_eq!(graph.edmonds_karp("A", "B"), FlowValue::Unreachable);
        assert_eq!(graph.edmonds_karp("A", "B").as_sentinel(), -1);
    }

    #[test]
    fn test_zero_capacity_is_distinguished() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_bidirectional_edge("A", "B", 0, "REGIONAL");

        // 旧式返回值把零流量与不可达混为 -1
        assert_eq!(graph.edmonds_karp("A", "B"), FlowValue::Flow(0));
        assert_eq!(graph.edmonds_karp("A", "B").as_sentinel(), -1);
    }

    #[test]
    fn test_same_and_missing_endpoints() {
        let graph = create_flow_graph();
        let algo = EdmondsKarp::new(&graph);
        let s = id(&graph, "S");

        assert!(matches!(algo.max_flow(s, s), Err(Error::SameEndpoints(_))));
        assert!(matches!(
            algo.max_flow(s, VertexId::new(99)),
            Err(Error::VertexNotFound(_))
        ));
    }

    #[test]
    fn test_flow_pushed_back_on_reverse_arc() {
        // 第一次增广走 S-A-B-T，第二次必须经逆向弧 B->A 回退 A->B 上的流量
        let mut graph = graph_with(&["S", "A", "B", "C", "D", "T"]);
        graph.add_edge("S", "A", 1, "IC");
        graph.add_edge("A", "B", 1, "IC");
        graph.add_edge("B", "T", 1, "IC");
        graph.add_edge("S", "C", 1, "IC");
        graph.add_edge("C", "B", 1, "IC");
        graph.add_edge("A", "D", 1, "IC");
        graph.add_edge("D", "T", 1, "IC");

        let (s, t) = (id(&graph, "S"), id(&graph, "T"));
        let result = EdmondsKarp::new(&graph).max_flow(s, t).unwrap();
        assert_eq!(result.value, FlowValue::Flow(2));
        assert_eq!(result.augmentations, 2);
        assert_valid_flow(&graph, &result, s, t);

        let ab = graph.edges_between("A", "B")[0].id();
        assert_eq!(result.edge_flow(ab), 0);
    }

    #[test]
    fn test_huge_parallel_capacities_saturate() {
        let mut graph = graph_with(&["S", "A", "B", "C", "Z"]);
        for mid in ["A", "B", "C"] {
            graph.add_bidirectional_edge("S", mid, Capacity::MAX / 2, "IC");
            graph.add_bidirectional_edge(mid, "Z", Capacity::MAX / 2, "IC");
        }

        let (s, z) = (id(&graph, "S"), id(&graph, "Z"));
        let result = EdmondsKarp::new(&graph).max_flow(s, z).unwrap();
        assert_eq!(result.value, FlowValue::Flow(Capacity::MAX));
        assert_eq!(result.augmentations, 3);
        for edge in graph.edges() {
            assert!(result.edge_flow(edge.id()) <= edge.weight());
        }

        assert_eq!(graph.edmonds_karp("S", "Z").as_sentinel(), i64::MAX);
    }

    #[test]
    fn test_find_augmenting_path() {
        let graph = create_flow_graph();
        let (s, t) = (id(&graph, "S"), id(&graph, "T"));
        let algo = EdmondsKarp::new(&graph);

        let zero = vec![0; graph.edge_slots()];
        let path = algo.find_augmenting_path(s, t, &zero).unwrap();
        // BFS 找到边数最少的 S-A-T
        assert_eq!(path.arcs.len(), 2);
        assert!(path.arcs.iter().all(|a| matches!(a, ResidualArc::Forward(_))));

        let saturated: Vec<Capacity> = (0..graph.edge_slots())
            .map(|i| graph.edge(EdgeId::new(i)).unwrap().weight())
            .collect();
        assert!(algo.find_augmenting_path(s, t, &saturated).is_none());
    }

    #[test]
    fn test_symmetric_and_idempotent() {
        let mut graph = graph_with(&["A", "B", "C", "D"]);
        graph.add_bidirectional_edge("A", "B", 3, "IC");
        graph.add_bidirectional_edge("B", "C", 2, "IC");
        graph.add_bidirectional_edge("A", "D", 4, "IC");
        graph.add_bidirectional_edge("D", "C", 1, "IC");

        let ab = graph.edmonds_karp("A", "C");
        assert_eq!(ab, FlowValue::Flow(3));
        assert_eq!(graph.edmonds_karp("A", "C"), ab);
        assert_eq!(graph.edmonds_karp("C", "A"), ab);
    }

    #[test]
    fn test_random_networks_respect_capacity_and_conservation() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let names: Vec<String> = (0..8).map(|i| format!("S{}", i)).collect();
            let mut graph = Graph::new();
            for name in &names {
                graph.add_vertex(Station::named(name.as_str()));
            }
            for _ in 0..14 {
                let a = rng.gen_range(0..names.len());
                let b = rng.gen_range(0..names.len());
                if a == b {
                    continue;
                }
                let weight = rng.gen_range(0..6);
                if rng.gen_bool(0.5) {
                    graph.add_bidirectional_edge(&names[a], &names[b], weight, "IC");
                } else {
                    graph.add_edge(&names[a], &names[b], weight, "IC");
                }
            }

            let (s, t) = (id(&graph, "S0"), id(&graph, "S7"));
            let result = EdmondsKarp::new(&graph).max_flow(s, t).unwrap();
            assert_valid_flow(&graph, &result, s, t);

            // 最大流等于最小割容量
            let cut: Capacity = graph
                .edges()
                .filter(|e| {
                    result.source_side.contains(&e.origin())
                        && !result.source_side.contains(&e.destination())
                })
                .map(|e| e.weight())
                .sum();
            assert_eq!(result.value.or_zero(), cut);
        }
    }
}

//! 最短路径算法
//!
//! Dijkstra 最小累计容量路径，以及基于该路径的“最大流最小成本”估算

use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId};
use crate::types::Capacity;
use priority_queue::PriorityQueue;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// 单源最短路径结果
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: VertexId,
    /// 到各顶点的最小距离（按顶点 ID 下标）
    distance: Vec<Option<Capacity>>,
    /// 到达各顶点所用的边
    predecessor: Vec<Option<EdgeId>>,
}

impl ShortestPaths {
    /// 到 target 的最小距离，不可达时为 None
    pub fn distance(&self, target: VertexId) -> Option<Capacity> {
        self.distance.get(target.index()).copied().flatten()
    }

    /// 到达 target 所用的边
    pub fn predecessor(&self, target: VertexId) -> Option<EdgeId> {
        self.predecessor.get(target.index()).copied().flatten()
    }

    /// 从源点到 target 的边序列
    pub fn path_edges(&self, graph: &Graph, target: VertexId) -> Option<Vec<EdgeId>> {
        self.distance(target)?;

        let mut edges = Vec::new();
        let mut current = target;
        while current != self.source {
            let edge_id = self.predecessor(current)?;
            edges.push(edge_id);
            current = graph.edge(edge_id)?.origin();
        }
        edges.reverse();
        Some(edges)
    }
}

/// 最便宜路径上的列车运行方案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheapestRoute {
    /// 经过的车站
    pub stations: Vec<String>,
    /// 路径总距离
    pub distance: Capacity,
    /// 路径瓶颈容量
    pub flow: Capacity,
    /// flow × distance
    pub cost: Capacity,
}

/// Dijkstra 最短路径
pub struct Dijkstra<'a> {
    graph: &'a Graph,
}

impl<'a> Dijkstra<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// 以边容量为代价，计算 source 到所有顶点的最短路径
    pub fn run(&self, source: VertexId) -> ShortestPaths {
        let slots = self.graph.vertex_slots();
        let mut distance: Vec<Option<Capacity>> = vec![None; slots];
        let mut predecessor = vec![None; slots];
        let mut settled = vec![false; slots];
        let mut queue: PriorityQueue<VertexId, Reverse<Capacity>> = PriorityQueue::new();

        if self.graph.vertex(source).is_some() {
            distance[source.index()] = Some(0);
            queue.push(source, Reverse(0));
        }

        while let Some((u, Reverse(dist_u))) = queue.pop() {
            settled[u.index()] = true;

            for edge in self.graph.outgoing_edges(u) {
                let v = edge.destination();
                if settled[v.index()] {
                    continue;
                }
                let candidate = dist_u.saturating_add(edge.weight());
                if distance[v.index()].map_or(true, |d| candidate < d) {
                    distance[v.index()] = Some(candidate);
                    predecessor[v.index()] = Some(edge.id());
                    // 已在队列中时 push 只更新优先级
                    queue.push(v, Reverse(candidate));
                }
            }
        }

        ShortestPaths {
            source,
            distance,
            predecessor,
        }
    }

    /// 最便宜路径的瓶颈容量与成本
    ///
    /// 成本定义为 `瓶颈容量 × 路径总距离`，只考虑 Dijkstra 选出的那一条路径。
    /// 终点不可达时返回 `Ok(None)`。
    pub fn cheapest_route(&self, source: &str, dest: &str) -> Result<Option<CheapestRoute>> {
        let s = self
            .graph
            .vertex_id(source)
            .ok_or_else(|| Error::VertexNotFound(source.to_string()))?;
        let t = self
            .graph
            .vertex_id(dest)
            .ok_or_else(|| Error::VertexNotFound(dest.to_string()))?;
        if s == t {
            return Err(Error::SameEndpoints(source.to_string()));
        }

        let paths = self.run(s);
        let (Some(distance), Some(edges)) = (paths.distance(t), paths.path_edges(self.graph, t))
        else {
            return Ok(None);
        };

        let mut stations = vec![source.to_string()];
        let mut flow = Capacity::MAX;
        for edge_id in &edges {
            let Some(edge) = self.graph.edge(*edge_id) else {
                continue;
            };
            flow = flow.min(edge.weight());
            if let Some(v) = self.graph.vertex(edge.destination()) {
                stations.push(v.name().to_string());
            }
        }

        Ok(Some(CheapestRoute {
            stations,
            distance,
            flow,
            cost: flow.saturating_mul(distance),
        }))
    }
}

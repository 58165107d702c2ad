//! 图数据结构
//!
//! 铁路网络图：顶点与边保存在按槽位编号的内存区中，ID 在删除后不复用，
//! 因此克隆即得到拓扑相同、ID 相同的独立副本

use super::edge::{Edge, EdgeId};
use super::index::StationIndex;
use super::vertex::{Vertex, VertexId};
use crate::algorithm::{
    AffectedStation, ArrivalAnalyzer, CheapestRoute, Dijkstra, EdmondsKarp, FlowAggregator,
    MaxCapacityPairs, MaxFlow, RegionRanking, ShortestPaths,
};
use crate::error::{Error, Result};
use crate::types::{Capacity, FlowValue, Station};
use tracing::{debug, warn};

/// 铁路网络图
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// 顶点槽位（插入顺序即迭代顺序）
    vertices: Vec<Option<Vertex>>,
    /// 边槽位
    edges: Vec<Option<Edge>>,
    /// 站名索引
    station_index: StationIndex,
    /// 存活顶点数
    vertex_count: usize,
    /// 存活边数
    edge_count: usize,
}

impl Graph {
    /// 创建空图
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 顶点操作 ====================

    /// 添加车站，同名车站已存在时返回 false
    pub fn add_vertex(&mut self, station: Station) -> bool {
        let id = VertexId::new(self.vertices.len());
        if !self.station_index.insert(station.name(), id) {
            return false;
        }
        self.vertices.push(Some(Vertex::new(id, station)));
        self.vertex_count += 1;
        true
    }

    /// 添加不进入站名索引的临时顶点（超级源点等）
    pub(crate) fn add_synthetic_vertex(&mut self, label: &str) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Some(Vertex::new(id, Station::named(label))));
        self.vertex_count += 1;
        id
    }

    /// 删除车站及其所有相邻线路
    pub fn remove_vertex(&mut self, name: &str) -> bool {
        let Some(id) = self.station_index.remove(name) else {
            return false;
        };

        if let Some(vertex) = self.vertices[id.index()].take() {
            let attached: Vec<EdgeId> = vertex
                .adjacency()
                .iter()
                .chain(vertex.incoming().iter())
                .copied()
                .collect();
            for edge_id in attached {
                self.delete_edge(edge_id);
            }
            self.vertex_count -= 1;
        }

        true
    }

    /// 按站名查找顶点
    pub fn find_vertex(&self, name: &str) -> Option<&Vertex> {
        self.station_index.get(name).and_then(|id| self.vertex(id))
    }

    /// 站名是否已登记
    pub fn contains_station(&self, name: &str) -> bool {
        self.station_index.contains(name)
    }

    /// 按站名查找顶点 ID
    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.station_index.get(name)
    }

    /// 获取顶点
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index()).and_then(Option::as_ref)
    }

    /// 所有顶点（插入顺序）
    pub fn vertex_set(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().filter_map(Option::as_ref)
    }

    /// 所有顶点 ID（插入顺序）
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertex_set().map(Vertex::id).collect()
    }

    /// 顶点数量
    pub fn num_vertex(&self) -> usize {
        self.vertex_count
    }

    /// 顶点槽位数（按 ID 下标分配运行时状态用）
    pub(crate) fn vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    // ==================== 边操作 ====================

    /// 添加有向线路，任一端车站不存在时返回 false
    pub fn add_edge(&mut self, source: &str, dest: &str, weight: Capacity, service: &str) -> bool {
        match (self.vertex_id(source), self.vertex_id(dest)) {
            (Some(src), Some(dst)) => {
                self.insert_edge(src, dst, weight, service);
                true
            }
            _ => false,
        }
    }

    /// 添加双向线路：两条方向相反的边互为配对边
    pub fn add_bidirectional_edge(
        &mut self,
        source: &str,
        dest: &str,
        weight: Capacity,
        service: &str,
    ) -> bool {
        let (Some(src), Some(dst)) = (self.vertex_id(source), self.vertex_id(dest)) else {
            return false;
        };

        let forward = self.insert_edge(src, dst, weight, service);
        let backward = self.insert_edge(dst, src, weight, service);
        self.link_reverse(forward, backward);
        true
    }

    /// 删除 source -> dest 的所有线路及其配对边
    pub fn remove_edge(&mut self, source: &str, dest: &str) -> bool {
        let (Some(src), Some(dst)) = (self.vertex_id(source), self.vertex_id(dest)) else {
            return false;
        };

        let targets: Vec<EdgeId> = self
            .outgoing_edges(src)
            .filter(|e| e.destination() == dst)
            .map(Edge::id)
            .collect();

        for edge_id in &targets {
            let reverse = self.edge(*edge_id).and_then(Edge::reverse);
            self.delete_edge(*edge_id);
            if let Some(reverse) = reverse {
                self.delete_edge(reverse);
            }
        }

        !targets.is_empty()
    }

    pub(crate) fn insert_edge(
        &mut self,
        src: VertexId,
        dst: VertexId,
        weight: Capacity,
        service: &str,
    ) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Some(Edge::new(id, src, dst, weight, service)));
        self.edge_count += 1;

        if let Some(v) = self.vertex_mut(src) {
            v.push_outgoing(id);
        }
        if let Some(v) = self.vertex_mut(dst) {
            v.push_incoming(id);
        }
        id
    }

    fn link_reverse(&mut self, a: EdgeId, b: EdgeId) {
        if let Some(e) = self.edge_mut(a) {
            e.set_reverse(Some(b));
        }
        if let Some(e) = self.edge_mut(b) {
            e.set_reverse(Some(a));
        }
    }

    /// 删除单条边，并从两端顶点的边列表中摘除
    fn delete_edge(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.get_mut(id.index()).and_then(Option::take) else {
            return;
        };
        self.edge_count -= 1;

        if let Some(v) = self.vertex_mut(edge.origin()) {
            v.detach(id);
        }
        if let Some(v) = self.vertex_mut(edge.destination()) {
            v.detach(id);
        }
        if let Some(partner) = edge.reverse().and_then(|r| self.edge_mut(r)) {
            partner.set_reverse(None);
        }
    }

    /// 获取边
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    /// 所有边
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter_map(Option::as_ref)
    }

    /// 边数量
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub(crate) fn edge_slots(&self) -> usize {
        self.edges.len()
    }

    /// 顶点的出边
    pub fn outgoing_edges(&self, id: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.vertex(id)
            .map(Vertex::adjacency)
            .unwrap_or_default()
            .iter()
            .filter_map(move |&e| self.edge(e))
    }

    /// 顶点的入边
    pub fn incoming_edges(&self, id: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.vertex(id)
            .map(Vertex::incoming)
            .unwrap_or_default()
            .iter()
            .filter_map(move |&e| self.edge(e))
    }

    /// 两站之间的有向线路
    pub fn edges_between(&self, source: &str, dest: &str) -> Vec<&Edge> {
        match (self.vertex_id(source), self.vertex_id(dest)) {
            (Some(src), Some(dst)) => self
                .outgoing_edges(src)
                .filter(|e| e.destination() == dst)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.index()).and_then(Option::as_mut)
    }

    // ==================== 流量 ====================

    /// 所有边流量清零
    pub fn reset_flow(&mut self) {
        for edge in self.edges.iter_mut().flatten() {
            edge.set_flow(0);
        }
    }

    /// 写入一次最大流计算的逐边流量
    fn apply_flow(&mut self, result: &MaxFlow) {
        for edge in self.edges.iter_mut().flatten() {
            edge.set_flow(result.edge_flow(edge.id()));
        }
    }

    // ==================== 派生图 ====================

    /// 生成删除指定车站与线路后的独立副本，原图不变
    pub fn reduced<'a, S, E>(&self, stations: S, segments: E) -> Graph
    where
        S: IntoIterator<Item = &'a str>,
        E: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut reduced = self.clone();

        for name in stations {
            if !reduced.remove_vertex(name) {
                warn!(station = name, "reduced graph: station not found, skipped");
            }
        }

        for (source, dest) in segments {
            if !reduced.remove_edge(source, dest) {
                warn!(source, dest, "reduced graph: segment not found, skipped");
            }
        }

        debug!(
            vertices = reduced.num_vertex(),
            edges = reduced.edge_count(),
            "reduced graph built"
        );
        reduced
    }

    // ==================== 查询 ====================

    /// 两站之间可同时运行的最大列车数
    ///
    /// 车站不存在或起终点相同时返回 `Unreachable`，不修改图。
    /// 计算成功后每条边的 `flow` 即为本次的流量分配。
    pub fn edmonds_karp(&mut self, source: &str, dest: &str) -> FlowValue {
        let result = match self.max_flow(source, dest) {
            Ok(result) => result,
            Err(e) => {
                debug!(source, dest, error = %e, "max flow rejected");
                return FlowValue::Unreachable;
            }
        };
        self.apply_flow(&result);
        result.value
    }

    /// 严格版最大流，返回逐边流量和最小割
    pub fn max_flow(&self, source: &str, dest: &str) -> Result<MaxFlow> {
        let s = self
            .vertex_id(source)
            .ok_or_else(|| Error::VertexNotFound(source.to_string()))?;
        let t = self
            .vertex_id(dest)
            .ok_or_else(|| Error::VertexNotFound(dest.to_string()))?;
        EdmondsKarp::new(self).max_flow(s, t)
    }

    /// 全网最大流量的车站对
    pub fn max_train_capacity_pairs(&self) -> MaxCapacityPairs {
        FlowAggregator::new(self).max_train_capacity_pairs()
    }

    /// 按流量中心性排名前 k 的市镇和区
    pub fn find_top_municipalities_and_districts(&self, k: usize) -> Result<RegionRanking> {
        FlowAggregator::new(self).top_municipalities_and_districts(k)
    }

    /// 从 source 出发的最短路径
    pub fn dijkstra(&self, source: &str) -> Result<ShortestPaths> {
        let s = self
            .vertex_id(source)
            .ok_or_else(|| Error::VertexNotFound(source.to_string()))?;
        Ok(Dijkstra::new(self).run(s))
    }

    /// 最便宜路径上的最大列车数及其成本
    pub fn cheapest_route(&self, source: &str, dest: &str) -> Result<Option<CheapestRoute>> {
        Dijkstra::new(self).cheapest_route(source, dest)
    }

    /// 可同时到达某站的最大列车数
    pub fn arrival_capacity(&self, station: &str) -> FlowValue {
        ArrivalAnalyzer::new(self).arrival_capacity(station)
    }

    /// 与缩减图相比到达能力下降最多的 k 个车站
    pub fn most_affected_stations(&self, reduced: &Graph, k: usize) -> Result<Vec<AffectedStation>> {
        ArrivalAnalyzer::new(self).most_affected_stations(reduced, k)
    }
}

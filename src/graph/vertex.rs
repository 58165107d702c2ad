//! 顶点定义
//!
//! 每个车站对应一个顶点，顶点记录出边与入边的 ID 列表

use crate::graph::edge::EdgeId;
use crate::types::Station;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// 顶点 ID（图内槽位下标，删除后不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub usize);

impl VertexId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for VertexId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// 边 ID 列表，大部分车站只有少量相邻区段
pub type EdgeList = SmallVec<[EdgeId; 4]>;

/// 顶点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// 顶点 ID
    id: VertexId,
    /// 车站
    station: Station,
    /// 出边（按插入顺序）
    adjacency: EdgeList,
    /// 入边（按插入顺序）
    incoming: EdgeList,
}

impl Vertex {
    /// 创建新顶点
    pub fn new(id: VertexId, station: Station) -> Self {
        Self {
            id,
            station,
            adjacency: EdgeList::new(),
            incoming: EdgeList::new(),
        }
    }

    /// 获取顶点 ID
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// 获取车站
    pub fn station(&self) -> &Station {
        &self.station
    }

    /// 站名
    pub fn name(&self) -> &str {
        self.station.name()
    }

    /// 出边
    pub fn adjacency(&self) -> &[EdgeId] {
        &self.adjacency
    }

    /// 入边
    pub fn incoming(&self) -> &[EdgeId] {
        &self.incoming
    }

    pub fn out_degree(&self) -> usize {
        self.adjacency.len()
    }

    pub fn in_degree(&self) -> usize {
        self.incoming.len()
    }

    pub(crate) fn push_outgoing(&mut self, edge: EdgeId) {
        self.adjacency.push(edge);
    }

    pub(crate) fn push_incoming(&mut self, edge: EdgeId) {
        self.incoming.push(edge);
    }

    pub(crate) fn detach(&mut self, edge: EdgeId) {
        self.adjacency.retain(|e| *e != edge);
        self.incoming.retain(|e| *e != edge);
    }
}

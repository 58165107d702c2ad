//! 边定义
//!
//! 有向线路区段：容量、当前流量、服务类型以及双向线路的配对反向边

use crate::graph::vertex::VertexId;
use crate::types::Capacity;
use serde::{Deserialize, Serialize};

/// 边 ID（图内槽位下标，删除后不复用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

impl EdgeId {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for EdgeId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

/// 边
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// 边 ID
    id: EdgeId,
    /// 起点
    origin: VertexId,
    /// 终点
    destination: VertexId,
    /// 容量
    weight: Capacity,
    /// 最近一次最大流计算得到的流量
    flow: Capacity,
    /// 服务类型（仅用于展示）
    service: String,
    /// 双向线路中的配对边
    reverse: Option<EdgeId>,
}

impl Edge {
    /// 创建新边
    pub fn new(
        id: EdgeId,
        origin: VertexId,
        destination: VertexId,
        weight: Capacity,
        service: impl Into<String>,
    ) -> Self {
        Self {
            id,
            origin,
            destination,
            weight,
            flow: 0,
            service: service.into(),
            reverse: None,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn origin(&self) -> VertexId {
        self.origin
    }

    pub fn destination(&self) -> VertexId {
        self.destination
    }

    pub fn weight(&self) -> Capacity {
        self.weight
    }

    pub fn flow(&self) -> Capacity {
        self.flow
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn reverse(&self) -> Option<EdgeId> {
        self.reverse
    }

    /// 剩余容量
    pub fn residual(&self) -> Capacity {
        self.weight.saturating_sub(self.flow)
    }

    pub(crate) fn set_reverse(&mut self, reverse: Option<EdgeId>) {
        self.reverse = reverse;
    }

    pub(crate) fn set_flow(&mut self, flow: Capacity) {
        debug_assert!(flow <= self.weight);
        self.flow = flow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_residual() {
        let mut e = Edge::new(
            EdgeId::new(0),
            VertexId::new(1),
            VertexId::new(2),
            5,
            "ALFA PENDULAR",
        );

        assert_eq!(e.flow(), 0);
        assert_eq!(e.residual(), 5);
        assert_eq!(e.reverse(), None);

        e.set_flow(3);
        assert_eq!(e.residual(), 2);
        assert_eq!(e.service(), "ALFA PENDULAR");
    }
}

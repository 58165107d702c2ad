//! 车站索引
//!
//! 站名到顶点 ID 的内存索引，支持快速查找

use crate::graph::vertex::VertexId;
use std::collections::HashMap;

/// 车站索引
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    /// 站名到顶点 ID 的映射
    name_to_id: HashMap<String, VertexId>,
}

impl StationIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加站名索引，站名已存在时返回 false 且不修改索引
    pub fn insert(&mut self, name: &str, vertex_id: VertexId) -> bool {
        if self.name_to_id.contains_key(name) {
            return false;
        }
        self.name_to_id.insert(name.to_string(), vertex_id);
        true
    }

    /// 通过站名查找顶点
    pub fn get(&self, name: &str) -> Option<VertexId> {
        self.name_to_id.get(name).copied()
    }

    /// 移除站名
    pub fn remove(&mut self, name: &str) -> Option<VertexId> {
        self.name_to_id.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }
}

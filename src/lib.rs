//! RailFlow - 铁路网络运力分析
//!
//! 以车站为顶点、线路为带容量边的有向图，支持：
//! - 两站之间可同时运行的最大列车数（Edmonds-Karp 最大流）
//! - 全网最大流量车站对与市镇/区的流量中心性排名
//! - 最便宜路径上的运力与成本
//! - 删除车站或线路后受影响最大的车站
//! - 从 CSV 表格导入车站与线路

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod graph;
pub mod import;
pub mod types;

// 重导出常用类型
pub use algorithm::{
    AffectedStation, CheapestRoute, EdmondsKarp, MaxCapacityPairs, MaxFlow, RegionRanking,
};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Graph, Vertex, VertexId};
pub use import::{load_network, ImportOptions, NetworkImporter};
pub use types::{Capacity, FlowValue, Station, UNLIMITED_CAPACITY};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

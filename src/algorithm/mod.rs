//! 图算法模块
//!
//! 包含最大流、最短路径、全网聚合排名与故障影响分析

mod aggregation;
mod max_flow;
mod resilience;
mod shortest_path;

pub use aggregation::{CapacityPair, FlowAggregator, MaxCapacityPairs, RegionRanking};
pub use max_flow::{AugmentingPath, EdmondsKarp, MaxFlow, ResidualArc};
pub use resilience::{AffectedStation, ArrivalAnalyzer};
pub use shortest_path::{CheapestRoute, Dijkstra, ShortestPaths};

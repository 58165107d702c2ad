//! 图核心模块
//!
//! 定义车站顶点、线路边和铁路网络图的核心数据结构

mod edge;
mod graph;
mod index;
mod vertex;

pub use edge::{Edge, EdgeId};
pub use graph::Graph;
pub use index::StationIndex;
pub use vertex::{EdgeList, Vertex, VertexId};

//! 到达能力与故障影响分析

use super::aggregation::top_k;
use super::max_flow::EdmondsKarp;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::types::{Capacity, FlowValue, UNLIMITED_CAPACITY};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

const SUPER_SOURCE: &str = "<super-source>";

/// 受线路缩减影响的车站
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedStation {
    pub name: String,
    /// 原网络中的到达能力
    pub original: FlowValue,
    /// 缩减网络中的到达能力
    pub reduced: FlowValue,
    /// 到达能力下降量（不可达按 0 计）
    pub difference: Capacity,
}

pub struct ArrivalAnalyzer<'a> {
    graph: &'a Graph,
}

impl<'a> ArrivalAnalyzer<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// 可同时到达 station 的最大列车数
    ///
    /// 在图的副本上加入超级源点，以无限容量连接所有出度为 1 且存在到 station 增广路径的车站
    /// （station 本身除外），再计算超级源点到 station 的最大流。原图不会被修改。
    pub fn arrival_capacity(&self, station: &str) -> FlowValue {
        let Some(target) = self.graph.vertex_id(station) else {
            return FlowValue::Unreachable;
        };

        let probe = EdmondsKarp::new(self.graph);
        let zero = vec![0; self.graph.edge_slots()];
        let feeders: Vec<_> = self
            .graph
            .vertex_set()
            .filter(|v| v.id() != target && v.out_degree() == 1)
            .filter(|v| probe.find_augmenting_path(v.id(), target, &zero).is_some())
            .map(|v| v.id())
            .collect();

        if feeders.is_empty() {
            debug!(station, "no terminal station feeds this station");
            return FlowValue::Unreachable;
        }

        let mut scratch = self.graph.clone();
        let source = scratch.add_synthetic_vertex(SUPER_SOURCE);
        for &feeder in &feeders {
            scratch.insert_edge(source, feeder, UNLIMITED_CAPACITY, "");
        }

        let value = EdmondsKarp::new(&scratch)
            .max_flow(source, target)
            .map(|r| r.value)
            .unwrap_or(FlowValue::Unreachable);

        debug!(station, feeders = feeders.len(), value = %value, "arrival capacity");
        value
    }

    /// 与缩减网络相比到达能力下降最多的 k 个车站（降序，只含下降量为正的车站）
    pub fn most_affected_stations(
        &self,
        reduced: &Graph,
        k: usize,
    ) -> Result<Vec<AffectedStation>> {
        let max = self.graph.num_vertex();
        if k > max {
            return Err(Error::InvalidK { k, max });
        }

        let reduced_analyzer = ArrivalAnalyzer::new(reduced);
        let mut affected = Vec::new();

        for (order, vertex) in self.graph.vertex_set().enumerate() {
            let original = self.arrival_capacity(vertex.name());
            let after = reduced_analyzer.arrival_capacity(vertex.name());
            let difference = original.or_zero().saturating_sub(after.or_zero());
            if difference == 0 {
                continue;
            }

            affected.push((
                (Reverse(order), vertex.name().to_string(), original, after),
                difference,
            ));
        }

        Ok(top_k(affected, k)
            .into_iter()
            .map(|((_, name, original, reduced), difference)| AffectedStation {
                name,
                original,
                reduced,
                difference,
            })
            .collect())
    }
}

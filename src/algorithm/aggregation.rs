//! 全网聚合查询
//!
//! 基于反复最大流计算的车站对与地区排名

use super::max_flow::EdmondsKarp;
use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};
use crate::types::{Capacity, FlowValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::debug;

/// 车站对及其最大流
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityPair {
    pub source: String,
    pub dest: String,
    pub value: Capacity,
}

/// 全网最大流量的车站对（按发现顺序）
///
/// 同一无序车站对的两个方向会同时出现。只保留每对首次出现方向的旧版输出
/// 对应 `unordered()` 的结果。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxCapacityPairs {
    pub pairs: Vec<CapacityPair>,
}

impl MaxCapacityPairs {
    /// 全网最大流量，没有任何可达车站对时为 None
    pub fn max(&self) -> Option<Capacity> {
        self.pairs.first().map(|p| p.value)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 每个无序车站对只保留首次出现的方向
    pub fn unordered(&self) -> Vec<CapacityPair> {
        let mut seen = HashSet::new();
        self.pairs
            .iter()
            .filter(|p| {
                let key = if p.source <= p.dest {
                    (p.source.as_str(), p.dest.as_str())
                } else {
                    (p.dest.as_str(), p.source.as_str())
                };
                seen.insert(key)
            })
            .cloned()
            .collect()
    }
}

/// 市镇与区的流量中心性排名（降序）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRanking {
    pub municipalities: Vec<(String, Capacity)>,
    pub districts: Vec<(String, Capacity)>,
}

impl RegionRanking {
    pub fn municipality_names(&self) -> Vec<&str> {
        self.municipalities.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn district_names(&self) -> Vec<&str> {
        self.districts.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// 聚合查询
pub struct FlowAggregator<'a> {
    graph: &'a Graph,
}

impl<'a> FlowAggregator<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// 找出最大流等于全网最大值的所有车站对
    ///
    /// 遍历所有有序车站对，最大流按无序车站对缓存，每对只计算一次。
    pub fn max_train_capacity_pairs(&self) -> MaxCapacityPairs {
        let algo = EdmondsKarp::new(self.graph);
        let ids = self.graph.vertex_ids();
        let mut memo: HashMap<(VertexId, VertexId), FlowValue> = HashMap::new();
        let mut best: Capacity = 0;
        let mut pairs = Vec::new();

        for &s in &ids {
            for &t in &ids {
                if s == t {
                    continue;
                }
                let key = (s.min(t), s.max(t));
                let value = *memo.entry(key).or_insert_with(|| {
                    algo.max_flow(s, t)
                        .map(|r| r.value)
                        .unwrap_or(FlowValue::Unreachable)
                });

                let Some(trains) = value.positive() else {
                    continue;
                };
                if trains > best {
                    best = trains;
                    pairs.clear();
                }
                if trains == best {
                    pairs.push(CapacityPair {
                        source: self.name(s),
                        dest: self.name(t),
                        value: trains,
                    });
                }
            }
        }

        debug!(computed = memo.len(), max = best, pairs = pairs.len(), "max capacity pairs");
        MaxCapacityPairs { pairs }
    }

    /// 按流量中心性排名前 k 的市镇和区
    ///
    /// 中心性为以该地区车站为起点的所有有序车站对最大流之和，不可达的车站对不计入。
    pub fn top_municipalities_and_districts(&self, k: usize) -> Result<RegionRanking> {
        let max = self.graph.num_vertex();
        if k > max {
            return Err(Error::InvalidK { k, max });
        }
        if k == 0 {
            return Ok(RegionRanking::default());
        }

        let algo = EdmondsKarp::new(self.graph);
        let mut municipalities: IndexMap<String, Capacity> = IndexMap::new();
        let mut districts: IndexMap<String, Capacity> = IndexMap::new();

        for vertex in self.graph.vertex_set() {
            municipalities
                .entry(vertex.station().municipality().to_string())
                .or_insert(0);
            districts
                .entry(vertex.station().district().to_string())
                .or_insert(0);
        }

        for source in self.graph.vertex_set() {
            for dest in self.graph.vertex_set() {
                if source.id() == dest.id() {
                    continue;
                }
                let Some(trains) = algo
                    .max_flow(source.id(), dest.id())
                    .ok()
                    .and_then(|r| r.value.positive())
                else {
                    continue;
                };

                let station = source.station();
                if let Some(total) = municipalities.get_mut(station.municipality()) {
                    *total = total.saturating_add(trains);
                }
                if let Some(total) = districts.get_mut(station.district()) {
                    *total = total.saturating_add(trains);
                }
            }
        }

        Ok(RegionRanking {
            municipalities: ranked_regions(municipalities, k),
            districts: ranked_regions(districts, k),
        })
    }

    fn name(&self, id: VertexId) -> String {
        self.graph
            .vertex(id)
            .map(|v| v.name().to_string())
            .unwrap_or_default()
    }
}

/// 总量相同时先出现的地区排在前面
fn ranked_regions(totals: IndexMap<String, Capacity>, k: usize) -> Vec<(String, Capacity)> {
    let indexed = totals
        .into_iter()
        .enumerate()
        .map(|(order, (name, total))| ((Reverse(order), name), total));
    top_k(indexed, k)
        .into_iter()
        .map(|((_, name), total)| (name, total))
        .collect()
}

/// 大小为 k 的最小堆选出总量最大的 k 项，按总量降序返回
pub(crate) fn top_k<T: Ord>(
    items: impl IntoIterator<Item = (T, Capacity)>,
    k: usize,
) -> Vec<(T, Capacity)> {
    if k == 0 {
        return Vec::new();
    }

    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (item, total) in items {
        heap.push(Reverse((total, item)));
        if heap.len() > k {
            heap.pop();
        }
    }

    let mut ranked: Vec<(T, Capacity)> = Vec::with_capacity(heap.len());
    while let Some(Reverse((total, item))) = heap.pop() {
        ranked.push((item, total));
    }
    ranked.reverse();
    ranked
}

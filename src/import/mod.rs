//! 数据导入模块
//!
//! 从两份 CSV 表格构建铁路网络：车站表与线路表

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::types::{Capacity, Station};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// 导入统计
#[derive(Debug, Default, Clone)]
pub struct ImportStats {
    pub stations_imported: usize,
    pub segments_imported: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

impl ImportStats {
    fn merge(&mut self, other: &ImportStats) {
        self.stations_imported += other.stations_imported;
        self.segments_imported += other.segments_imported;
        self.errors += other.errors;
        self.duration_ms += other.duration_ms;
    }
}

/// 导入选项
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// 原始容量除数，双向共享轨道时为 2
    capacity_divisor: Capacity,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            capacity_divisor: 2,
        }
    }
}

impl ImportOptions {
    /// 设置容量除数（最小为 1）
    pub fn with_capacity_divisor(mut self, divisor: Capacity) -> Self {
        self.capacity_divisor = divisor.max(1);
        self
    }

    pub fn capacity_divisor(&self) -> Capacity {
        self.capacity_divisor
    }
}

/// 铁路网络导入器
#[derive(Debug, Clone, Default)]
pub struct NetworkImporter {
    options: ImportOptions,
}

impl NetworkImporter {
    /// 创建导入器
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ImportOptions) -> Self {
        Self { options }
    }

    /// 导入车站表：name,district,municipality,township,line
    pub fn import_stations<R: Read>(&self, graph: &mut Graph, reader: R) -> Result<ImportStats> {
        let start = Instant::now();
        let mut stats = ImportStats::default();

        for (row, record) in csv_reader(reader).records().enumerate() {
            let inserted = record
                .map_err(Error::from)
                .and_then(|r| parse_station(&r))
                .and_then(|station| {
                    let name = station.name().to_string();
                    if graph.add_vertex(station) {
                        Ok(())
                    } else {
                        Err(Error::VertexAlreadyExists(name))
                    }
                });

            match inserted {
                Ok(()) => stats.stations_imported += 1,
                Err(e) => {
                    warn!(row = row + 2, error = %e, "invalid station row");
                    stats.errors += 1;
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// 导入线路表：station_a,station_b,capacity,service
    ///
    /// 容量按除数取整后以双向线路加入。
    pub fn import_network<R: Read>(&self, graph: &mut Graph, reader: R) -> Result<ImportStats> {
        let start = Instant::now();
        let mut stats = ImportStats::default();

        for (row, record) in csv_reader(reader).records().enumerate() {
            let segment = record
                .map_err(Error::from)
                .and_then(|r| parse_segment(&r));

            match segment {
                Ok((a, b, capacity, service)) => {
                    let weight = capacity / self.options.capacity_divisor;
                    if graph.add_bidirectional_edge(&a, &b, weight, &service) {
                        stats.segments_imported += 1;
                    } else {
                        warn!(row = row + 2, source = %a, dest = %b, "segment references unknown station");
                        stats.errors += 1;
                    }
                }
                Err(e) => {
                    warn!(row = row + 2, error = %e, "invalid network row");
                    stats.errors += 1;
                }
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// 从两个文件构建网络
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        stations: P,
        network: Q,
    ) -> Result<(Graph, ImportStats)> {
        let mut graph = Graph::new();

        let mut stats = self.import_stations(&mut graph, File::open(stations)?)?;
        let network_stats = self.import_network(&mut graph, File::open(network)?)?;
        stats.merge(&network_stats);

        info!(
            stations = stats.stations_imported,
            segments = stats.segments_imported,
            errors = stats.errors,
            duration_ms = stats.duration_ms,
            "railway network loaded"
        );
        Ok((graph, stats))
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("")
}

fn parse_station(record: &StringRecord) -> Result<Station> {
    let name = field(record, 0);
    if name.is_empty() {
        return Err(Error::ImportError("车站名为空".to_string()));
    }
    Ok(Station::new(
        name,
        field(record, 1),
        field(record, 2),
        field(record, 3),
        field(record, 4),
    ))
}

fn parse_segment(record: &StringRecord) -> Result<(String, String, Capacity, String)> {
    if record.len() < 3 {
        return Err(Error::ImportError(format!(
            "线路行字段不足: 期望至少 3 列, 实际 {} 列",
            record.len()
        )));
    }

    let capacity = field(record, 2)
        .parse::<Capacity>()
        .map_err(|e| Error::ParseError(format!("容量 '{}': {}", field(record, 2), e)))?;

    Ok((
        field(record, 0).to_string(),
        field(record, 1).to_string(),
        capacity,
        field(record, 3).to_string(),
    ))
}

/// 从车站表与线路表文件构建网络
pub fn load_network<P: AsRef<Path>, Q: AsRef<Path>>(stations: P, network: Q) -> Result<Graph> {
    NetworkImporter::new()
        .load(stations, network)
        .map(|(graph, _)| graph)
}

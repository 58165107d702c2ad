//! 结果打印器
//!
//! 提供表格和 JSON 格式的结果输出

use crate::algorithm::{AffectedStation, CheapestRoute, MaxCapacityPairs, RegionRanking};
use crate::error::Result;
use crate::types::{Capacity, FlowValue};
use clap::ValueEnum;
use prettytable::{format, row, Cell, Row, Table};
use serde::Serialize;
use serde_json::json;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// 表格
    #[default]
    Table,
    /// JSON
    Json,
}

/// 结果打印器
pub struct Printer {
    format: OutputFormat,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// 两站之间的最大列车数
    pub fn max_flow(&self, source: &str, dest: &str, value: FlowValue) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(&json!({
                "source": source,
                "dest": dest,
                "trains": value.positive(),
                "sentinel": value.as_sentinel(),
            }));
        }

        Ok(match value.positive() {
            Some(trains) => format!(
                "{} -> {}: 最多可同时运行 {} 列列车\n",
                source, dest, trains
            ),
            None => format!("{} -> {}: 没有可用线路\n", source, dest),
        })
    }

    /// 最大流量车站对
    pub fn capacity_pairs(&self, result: &MaxCapacityPairs) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(result);
        }
        if result.is_empty() {
            return Ok("没有可达的车站对\n".to_string());
        }

        let rows: Vec<Vec<String>> = result
            .pairs
            .iter()
            .map(|p| vec![p.source.clone(), p.dest.clone(), p.value.to_string()])
            .collect();
        Ok(table(&["Source", "Destination", "Trains"], &rows))
    }

    /// 地区排名
    pub fn regions(&self, ranking: &RegionRanking) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(ranking);
        }

        let mut output = String::new();
        output.push_str("Municipalities\n");
        output.push_str(&table(&["#", "Municipality", "Flow"], &ranked_rows(&ranking.municipalities)));
        output.push_str("Districts\n");
        output.push_str(&table(&["#", "District", "Flow"], &ranked_rows(&ranking.districts)));
        Ok(output)
    }

    /// 可同时到达的列车数
    pub fn arrivals(&self, station: &str, value: FlowValue) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(&json!({
                "station": station,
                "trains": value.positive(),
                "sentinel": value.as_sentinel(),
            }));
        }

        Ok(match value.positive() {
            Some(trains) => format!("{}: 最多可同时到达 {} 列列车\n", station, trains),
            None => format!("{}: 没有可到达的列车\n", station),
        })
    }

    /// 最便宜路径
    pub fn cheapest_route(&self, route: Option<&CheapestRoute>) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(&route);
        }

        let Some(route) = route else {
            return Ok("没有可用线路\n".to_string());
        };

        let mut t = Table::new();
        t.set_format(*format::consts::FORMAT_BOX_CHARS);
        t.set_titles(row!["Property", "Value"]);
        t.add_row(row!["Route", route.stations.join(" -> ")]);
        t.add_row(row!["Distance", route.distance.to_string()]);
        t.add_row(row!["Trains", route.flow.to_string()]);
        t.add_row(row!["Cost", route.cost.to_string()]);
        Ok(t.to_string())
    }

    /// 受影响最大的车站
    pub fn affected(&self, stations: &[AffectedStation]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(&stations);
        }
        if stations.is_empty() {
            return Ok("没有车站受到影响\n".to_string());
        }

        let rows: Vec<Vec<String>> = stations
            .iter()
            .enumerate()
            .map(|(i, s)| {
                vec![
                    (i + 1).to_string(),
                    s.name.clone(),
                    s.original.to_string(),
                    s.reduced.to_string(),
                    s.difference.to_string(),
                ]
            })
            .collect();
        Ok(table(&["#", "Station", "Before", "After", "Lost"], &rows))
    }

    /// 图统计信息
    pub fn stats(&self, vertex_count: usize, edge_count: usize) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(&json!({ "stations": vertex_count, "segments": edge_count }));
        }

        let mut t = Table::new();
        t.set_format(*format::consts::FORMAT_BOX_CHARS);
        t.set_titles(row!["Property", "Value"]);
        t.add_row(row!["Stations", vertex_count.to_string()]);
        t.add_row(row!["Segments", edge_count.to_string()]);
        Ok(t.to_string())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)? + "\n")
}

fn ranked_rows(items: &[(String, Capacity)]) -> Vec<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(i, (name, total))| vec![(i + 1).to_string(), name.clone(), total.to_string()])
        .collect()
}

fn table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    let header: Vec<Cell> = columns.iter().map(|c| Cell::new(c)).collect();
    table.set_titles(Row::new(header));

    for row_data in rows {
        let cells: Vec<Cell> = row_data.iter().map(|v| Cell::new(v)).collect();
        table.add_row(Row::new(cells));
    }

    table.to_string()
}

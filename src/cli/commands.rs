//! 查询命令
//!
//! 命令行子命令定义与执行

use super::printer::Printer;
use crate::error::{Error, Result};
use crate::graph::Graph;
use clap::Subcommand;
use tracing::info;

/// 查询命令
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 图统计信息
    Stats,

    /// 两站之间可同时运行的最大列车数
    MaxFlow {
        /// 起点站
        source: String,
        /// 终点站
        dest: String,
    },

    /// 全网最大列车数的车站对
    MaxPairs {
        /// 每个无序车站对只输出一次
        #[arg(long)]
        unordered: bool,
    },

    /// 按流量中心性排名前 k 的市镇和区
    TopRegions {
        /// 排名数量
        k: usize,
    },

    /// 可同时到达某站的最大列车数
    Arrivals {
        /// 车站
        station: String,
    },

    /// 最便宜路径上的最大列车数与成本
    Cheapest {
        /// 起点站
        source: String,
        /// 终点站
        dest: String,
    },

    /// 删除车站或线路后受影响最大的 k 个车站
    Affected {
        /// 排名数量
        k: usize,
        /// 删除的车站（可重复）
        #[arg(long = "remove-station")]
        remove_stations: Vec<String>,
        /// 删除的线路，格式为 "站A:站B"（可重复）
        #[arg(long = "remove-segment", value_parser = parse_segment)]
        remove_segments: Vec<(String, String)>,
    },
}

/// 解析 "站A:站B"
pub fn parse_segment(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once(':') {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            Ok((a.trim().to_string(), b.trim().to_string()))
        }
        _ => Err(format!("线路格式应为 '站A:站B'，实际为 '{}'", s)),
    }
}

/// 执行命令并返回格式化结果
pub fn execute(graph: &mut Graph, command: &Command, printer: &Printer) -> Result<String> {
    info!(?command, "executing query");

    match command {
        Command::Stats => printer.stats(graph.num_vertex(), graph.edge_count()),

        Command::MaxFlow { source, dest } => {
            require_station(graph, source)?;
            require_station(graph, dest)?;
            let value = graph.edmonds_karp(source, dest);
            printer.max_flow(source, dest, value)
        }

        Command::MaxPairs { unordered } => {
            let mut result = graph.max_train_capacity_pairs();
            if *unordered {
                result.pairs = result.unordered();
            }
            printer.capacity_pairs(&result)
        }

        Command::TopRegions { k } => {
            let ranking = graph.find_top_municipalities_and_districts(*k)?;
            printer.regions(&ranking)
        }

        Command::Arrivals { station } => {
            require_station(graph, station)?;
            printer.arrivals(station, graph.arrival_capacity(station))
        }

        Command::Cheapest { source, dest } => {
            let route = graph.cheapest_route(source, dest)?;
            printer.cheapest_route(route.as_ref())
        }

        Command::Affected {
            k,
            remove_stations,
            remove_segments,
        } => {
            for name in remove_stations {
                require_station(graph, name)?;
            }
            for (a, b) in remove_segments {
                if graph.edges_between(a, b).is_empty() {
                    return Err(Error::EdgeNotFound(a.clone(), b.clone()));
                }
            }
            let reduced = graph.reduced(
                remove_stations.iter().map(String::as_str),
                remove_segments
                    .iter()
                    .map(|(a, b)| (a.as_str(), b.as_str())),
            );
            let affected = graph.most_affected_stations(&reduced, *k)?;
            printer.affected(&affected)
        }
    }
}

fn require_station(graph: &Graph, name: &str) -> Result<()> {
    if !graph.contains_station(name) {
        return Err(Error::VertexNotFound(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::types::Station;

    fn create_test_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_vertex(Station::new("A", "D1", "M1", "", ""));
        graph.add_vertex(Station::new("B", "D1", "M2", "", ""));
        graph.add_vertex(Station::new("C", "D2", "M3", "", ""));
        graph.add_bidirectional_edge("A", "B", 2, "IC");
        graph.add_bidirectional_edge("B", "C", 1, "IC");
        graph
    }

    #[test]
    fn test_parse_segment() {
        assert_eq!(
            parse_segment("Porto:Gaia").unwrap(),
            ("Porto".to_string(), "Gaia".to_string())
        );
        assert!(parse_segment("Porto").is_err());
        assert!(parse_segment(":Gaia").is_err());
    }

    #[test]
    fn test_execute_max_flow() {
        let mut graph = create_test_graph();
        let printer = Printer::new(OutputFormat::Json);
        let command = Command::MaxFlow {
            source: "A".into(),
            dest: "C".into(),
        };

        let output = execute(&mut graph, &command, &printer).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["trains"], 1);

        let command = Command::MaxFlow {
            source: "A".into(),
            dest: "Z".into(),
        };
        assert!(matches!(
            execute(&mut graph, &command, &printer),
            Err(Error::VertexNotFound(_))
        ));
    }

    #[test]
    fn test_execute_queries() {
        let mut graph = create_test_graph();
        let printer = Printer::default();

        let output = execute(&mut graph, &Command::MaxPairs { unordered: true }, &printer).unwrap();
        assert!(output.contains("A"));

        let output = execute(&mut graph, &Command::TopRegions { k: 2 }, &printer).unwrap();
        assert!(output.contains("D1"));

        assert!(matches!(
            execute(&mut graph, &Command::TopRegions { k: 4 }, &printer),
            Err(Error::InvalidK { .. })
        ));

        let command = Command::Affected {
            k: 3,
            remove_stations: vec![],
            remove_segments: vec![("B".into(), "C".into())],
        };
        let output = execute(&mut graph, &command, &printer).unwrap();
        assert!(output.contains("C"));
        assert_eq!(graph.edge_count(), 4);

        let command = Command::Affected {
            k: 1,
            remove_stations: vec![],
            remove_segments: vec![("A".into(), "C".into())],
        };
        assert!(matches!(
            execute(&mut graph, &command, &printer),
            Err(Error::EdgeNotFound(_, _))
        ));
    }
}

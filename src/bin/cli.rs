//! RailFlow CLI 工具
//!
//! 加载车站表与线路表后执行单个查询

use clap::Parser;
use railflow::cli::{execute, Command, OutputFormat, Printer};
use railflow::import::{ImportOptions, NetworkImporter};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "railflow-cli")]
#[command(about = "RailFlow 铁路网络运力分析工具", version)]
struct Args {
    /// 车站表 CSV
    #[arg(short, long, default_value = "stations.csv")]
    stations: PathBuf,

    /// 线路表 CSV
    #[arg(short, long, default_value = "network.csv")]
    network: PathBuf,

    /// 线路容量除数
    #[arg(long, default_value_t = 2)]
    capacity_divisor: u64,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("railflow=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("RailFlow v{}", railflow::VERSION);

    let options = ImportOptions::default().with_capacity_divisor(args.capacity_divisor);
    let (mut graph, stats) =
        NetworkImporter::with_options(options).load(&args.stations, &args.network)?;

    if stats.errors > 0 {
        info!(errors = stats.errors, "some rows were skipped during import");
    }

    let printer = Printer::new(args.format);
    let output = execute(&mut graph, &args.command, &printer)?;
    print!("{}", output);

    Ok(())
}

//! 命令行模块
//!
//! 查询命令与结果打印

mod commands;
mod printer;

pub use commands::{execute, parse_segment, Command};
pub use printer::{OutputFormat, Printer};

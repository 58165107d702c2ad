//! 错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("车站不存在: {0}")]
    VertexNotFound(String),

    #[error("车站已存在: {0}")]
    VertexAlreadyExists(String),

    #[error("线路不存在: {0} -> {1}")]
    EdgeNotFound(String, String),

    #[error("起点与终点相同: {0}")]
    SameEndpoints(String),

    #[error("无效的 k 值: {k}（允许范围 0..={max}）")]
    InvalidK { k: usize, max: usize },

    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("导入错误: {0}")]
    ImportError(String),

    #[error("CSV 错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

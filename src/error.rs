//! # 统一错误处理模块
//!
//! 定义 chempot 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// chempot 统一错误类型
#[derive(Error, Debug)]
pub enum ChempotError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {path} (line {line})\nReason: {reason}")]
    ParseError {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Inconsistent row width in {path} (line {line}): expected {expected} columns, found {found}")]
    InconsistentRowWidth {
        path: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid region: low ({low}) must not exceed high ({high})")]
    InvalidRegion { low: f64, high: f64 },

    // ─────────────────────────────────────────────────────────────
    // 数值计算错误
    // ─────────────────────────────────────────────────────────────
    #[error("Degenerate linear system: {0}")]
    DegenerateSystem(String),

    #[error("Insufficient species: need at least 2 atomic types, found {num_types}")]
    InsufficientSpecies { num_types: usize },

    #[error("Insufficient samples: {atoms} atoms cannot fill a window of {window_size}")]
    InsufficientSamples { atoms: usize, window_size: usize },

    #[error("Least-squares solve failed: {0}")]
    SolverError(String),

    // ─────────────────────────────────────────────────────────────
    // 输出错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plot error: {0}")]
    PlotError(String),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ChempotError>;

//! # sweep 子命令 CLI 定义
//!
//! 沿坐标轴滑动窗口分块，逐块估计化学势。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/sweep.rs`

use crate::models::Axis;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 扫描结果输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SweepOutputFormat {
    /// Whitespace-delimited table with a `# center mu_1 ...` header
    Dat,
    /// CSV with chunk bounds, atom count and p
    Csv,
}

impl SweepOutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            SweepOutputFormat::Dat => "dat",
            SweepOutputFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for SweepOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// sweep 子命令参数
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Input: per-atom table (init_type E_1..E_k x y z) or directory of tables
    pub input: PathBuf,

    /// Axis along which chunks are formed
    #[arg(value_enum)]
    pub axis: Axis,

    /// Number of atoms per chunk (sliding window size)
    pub window_size: usize,

    /// Output: file path (single mode) or directory (batch mode)
    #[arg(default_value = "chemical_potentials.dat")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<SweepOutputFormat>,

    /// Also write a scatter plot of mu_k versus chunk center (PNG, or SVG by extension)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Relative singular value cutoff for the least-squares solve (default: machine precision)
    #[arg(long)]
    pub rcond: Option<f64>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, env = "CHEMPOT_JOBS", default_value_t = 0)]
    pub jobs: usize,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, e.g., "*.txt,*.dat")
    #[arg(long, default_value = "*.txt,*.dat")]
    pub pattern: String,

    /// Recurse into subdirectories (batch mode)
    #[arg(long, default_value_t = false)]
    pub recursive: bool,

    /// Overwrite existing output files (batch mode)
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

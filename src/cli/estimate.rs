//! # estimate 子命令 CLI 定义
//!
//! 对整个模拟胞或一个区间区域做一次化学势估计。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/estimate.rs`

use crate::models::Axis;

use clap::Args;
use std::path::PathBuf;

/// estimate 子命令参数
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Input per-atom table (init_type E_1..E_k x y z)
    pub input: PathBuf,

    /// Restrict to a region along this axis (requires --low and --high)
    #[arg(long, value_enum, requires_all = ["low", "high"])]
    pub axis: Option<Axis>,

    /// Lower bound of the region (inclusive)
    #[arg(long, requires = "axis", allow_negative_numbers = true)]
    pub low: Option<f64>,

    /// Upper bound of the region (inclusive)
    #[arg(long, requires = "axis", allow_negative_numbers = true)]
    pub high: Option<f64>,

    /// Relative singular value cutoff for the least-squares solve (default: machine precision)
    #[arg(long)]
    pub rcond: Option<f64>,

    /// Write species, concentration and mu to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

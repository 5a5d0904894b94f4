//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `potential/`, `utils/`
//! - 子模块: sweep, estimate

pub mod estimate;
pub mod sweep;

use crate::cli::Commands;
use crate::error::Result;
use crate::potential::{ChemicalPotentialEstimator, EstimatorConfig};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Sweep(args) => sweep::execute(args),
        Commands::Estimate(args) => estimate::execute(args),
    }
}

/// 由命令行参数构造估计器
fn build_estimator(rcond: Option<f64>) -> Result<ChemicalPotentialEstimator> {
    ChemicalPotentialEstimator::new(EstimatorConfig {
        rcond,
        ..Default::default()
    })
}

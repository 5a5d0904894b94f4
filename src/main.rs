//! # chempot - 化学势估计工具
//!
//! 由原子模拟快照中每个位点的占据能，以约束最小二乘估计各原子类型的化学势，
//! 可沿某一坐标轴按滑动窗口分块得到化学势的空间分布。
//!
//! ## 子命令
//! - `sweep`    - 沿坐标轴分块扫描（单文件或目录批量）
//! - `estimate` - 单次估计（全体或区间区域）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (数值表解析)
//!   │     ├── potential/ (过滤、估计、分块扫描、导出、绘图)
//!   │     ├── batch/     (批量处理)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod potential;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}

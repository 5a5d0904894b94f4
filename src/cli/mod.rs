//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `sweep`: 沿坐标轴分块扫描化学势
//! - `estimate`: 单次估计（全体或区间区域）
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: sweep, estimate

pub mod estimate;
pub mod sweep;

use clap::{Parser, Subcommand};

/// chempot - 基于占据能的化学势估计工具
#[derive(Parser)]
#[command(name = "chempot")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Per-species chemical potentials from occupying energies", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Estimate chemical potentials in sliding chunks along an axis
    Sweep(sweep::SweepArgs),

    /// Estimate chemical potentials for the whole cell or one region
    Estimate(estimate::EstimateArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Axis;

    #[test]
    fn test_parse_sweep_positionals() {
        let cli = Cli::try_parse_from(["chempot", "sweep", "data.txt", "z", "100", "out.dat"]).unwrap();
        match cli.command {
            Commands::Sweep(args) => {
                assert_eq!(args.axis, Axis::Z);
                assert_eq!(args.window_size, 100);
                assert_eq!(args.output.to_str(), Some("out.dat"));
                assert!(args.format.is_none());
            }
            _ => panic!("expected sweep"),
        }
    }

    #[test]
    fn test_parse_sweep_default_output() {
        let cli = Cli::try_parse_from(["chempot", "sweep", "data.txt", "x", "10"]).unwrap();
        match cli.command {
            Commands::Sweep(args) => {
                assert_eq!(args.axis, Axis::X);
                assert_eq!(args.output.to_str(), Some("chemical_potentials.dat"));
            }
            _ => panic!("expected sweep"),
        }
    }

    #[test]
    fn test_parse_sweep_rejects_bad_axis() {
        assert!(Cli::try_parse_from(["chempot", "sweep", "data.txt", "w", "10"]).is_err());
    }

    #[test]
    fn test_parse_estimate_region() {
        let cli = Cli::try_parse_from([
            "chempot", "estimate", "data.txt", "--axis", "y", "--low", "-1.5", "--high", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Estimate(args) => {
                assert_eq!(args.axis, Some(Axis::Y));
                assert_eq!(args.low, Some(-1.5));
                assert_eq!(args.high, Some(2.0));
            }
            _ => panic!("expected estimate"),
        }

        assert!(Cli::try_parse_from(["chempot", "estimate", "data.txt", "--axis", "y"]).is_err());
    }
}

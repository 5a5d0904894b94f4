//! # 化学势计算模块
//!
//! 由每个位点的占据能估计各原子类型的化学势，可限定在空间分块内。
//!
//! ## 子模块
//! - `filter`: 区域过滤器（全体 / 一维区间）
//! - `estimator`: 线性方程组构造与最小二乘求解
//! - `sweep`: 沿坐标轴的滑动窗口分块扫描
//! - `export`: 数据导出
//! - `plot`: 图表生成
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/` 数据模型

pub mod estimator;
pub mod export;
pub mod filter;
pub mod plot;
pub mod sweep;

pub use estimator::{ChemicalPotentialEstimator, EstimatorConfig};
pub use filter::RegionFilter;
pub use sweep::{ChunkSweep, SortedAxis};

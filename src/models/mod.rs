//! # 数据模型模块
//!
//! 定义原子记录、数据集和化学势结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`potential/` 和 `commands/` 使用
//! - 子模块: dataset, potential

pub mod dataset;
pub mod potential;

pub use dataset::{AtomRecord, Axis, Dataset};
pub use potential::{ChemicalPotentials, ChunkEstimate};

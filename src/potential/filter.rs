//! # 区域过滤器
//!
//! 从完整数据集中选出位于某一区域的原子，并给出保留比例 p。
//!
//! ## 变体
//! - `Identity`: 不做过滤，p = 1
//! - `Interval`: 沿某一坐标轴的闭区间 [low, high]
//!
//! ## 依赖关系
//! - 被 `potential/estimator.rs`, `potential/sweep.rs` 使用
//! - 使用 `models/dataset.rs`

use crate::error::{ChempotError, Result};
use crate::models::{AtomRecord, Axis, Dataset};

/// 区域过滤器
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RegionFilter {
    /// 保留全部原子
    #[default]
    Identity,
    /// 保留坐标满足 low <= coord <= high 的原子
    Interval { axis: Axis, low: f64, high: f64 },
}

impl RegionFilter {
    /// 创建一维区间过滤器，要求 low <= high
    pub fn interval(axis: Axis, low: f64, high: f64) -> Result<Self> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(ChempotError::InvalidRegion { low, high });
        }
        Ok(RegionFilter::Interval { axis, low, high })
    }

    /// 判断原子是否落在区域内
    pub fn contains(&self, atom: &AtomRecord) -> bool {
        match *self {
            RegionFilter::Identity => true,
            RegionFilter::Interval { axis, low, high } => {
                let coord = atom.coordinate(axis);
                low <= coord && coord <= high
            }
        }
    }

    /// 应用过滤器，返回子集及其保留比例
    pub fn employ<'a>(&self, dataset: &'a Dataset) -> Selection<'a> {
        match self {
            RegionFilter::Identity => Selection::full(dataset),
            RegionFilter::Interval { .. } => {
                let atoms: Vec<&AtomRecord> =
                    dataset.atoms().iter().filter(|a| self.contains(a)).collect();
                let probability = if dataset.is_empty() {
                    0.0
                } else {
                    atoms.len() as f64 / dataset.len() as f64
                };
                Selection {
                    num_types: dataset.num_types(),
                    atoms,
                    probability,
                }
            }
        }
    }
}

impl std::fmt::Display for RegionFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionFilter::Identity => write!(f, "whole cell"),
            RegionFilter::Interval { axis, low, high } => {
                write!(f, "{} in [{}, {}]", axis, low, high)
            }
        }
    }
}

/// 过滤结果：原子子集（保持原始相对顺序）与保留比例 p
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    num_types: usize,
    atoms: Vec<&'a AtomRecord>,
    probability: f64,
}

impl<'a> Selection<'a> {
    /// 整个数据集，p = 1
    pub fn full(dataset: &'a Dataset) -> Self {
        Self {
            num_types: dataset.num_types(),
            atoms: dataset.atoms().iter().collect(),
            probability: 1.0,
        }
    }

    pub fn num_types(&self) -> usize {
        self.num_types
    }

    pub fn atoms(&self) -> &[&'a AtomRecord] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// 保留比例 p = |子集| / |数据集|
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// 子集中各原子类型的浓度
    pub fn concentrations(&self) -> Vec<f64> {
        let mut counts = vec![0usize; self.num_types];
        for atom in &self.atoms {
            counts[atom.species()] += 1;
        }
        let n = self.atoms.len() as f64;
        counts.into_iter().map(|c| c as f64 / n).collect()
    }
}

//! # 化学势结果数据模型
//!
//! 存储估计得到的化学势向量，以及每个空间分块的估计结果。
//!
//! ## 依赖关系
//! - 被 `potential/estimator.rs`, `potential/sweep.rs` 构造
//! - 被 `potential/export.rs`, `potential/plot.rs` 和 `commands/` 使用

/// 化学势向量，按原子类型索引排列
#[derive(Debug, Clone, PartialEq)]
pub struct ChemicalPotentials {
    values: Vec<f64>,
}

impl ChemicalPotentials {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// 全部为 NaN 的向量（求解失败时使用）
    pub fn undetermined(num_types: usize) -> Self {
        Self {
            values: vec![f64::NAN; num_types],
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 第 k 种原子类型（0 起始）的化学势
    pub fn get(&self, k: usize) -> Option<f64> {
        self.values.get(k).copied()
    }

    /// 所有分量均为有限值
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

/// 单个分块的估计结果
#[derive(Debug, Clone)]
pub struct ChunkEstimate {
    /// 窗口序号
    pub index: usize,
    /// 窗口坐标均值
    pub center: f64,
    /// 区域下界（窗口最小坐标）
    pub low: f64,
    /// 区域上界（窗口最大坐标）
    pub high: f64,
    /// 区域内原子数（可能因边界坐标相同而多于窗口大小）
    pub atoms: usize,
    /// 区域占全体原子的比例 p
    pub probability: f64,
    pub potentials: ChemicalPotentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undetermined_is_not_finite() {
        let mu = ChemicalPotentials::undetermined(3);
        assert_eq!(mu.values().len(), 3);
        assert!(!mu.is_finite());
        assert!(mu.get(0).unwrap().is_nan());
        assert!(mu.get(3).is_none());
    }
}

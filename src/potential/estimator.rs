//! # 化学势估计器
//!
//! 由占据能构造线性方程组，并以最小二乘求解各原子类型的化学势。
//!
//! ## 算法概述
//! 1. 占据能整体乘以区域保留比例 p
//! 2. 对每一对原子类型 (t1 < t2) 写一行：μ[t1] - μ[t2] = mean(E[t1] - E[t2])
//! 3. 追加归一化行：Σ c_k μ[k] = mean(E[init_type]) / N，c_k 为区域内浓度
//! 4. 以 SVD 最小二乘求解 (C(k,2) + 1) × k 方程组
//!
//! 仅靠两两差值只能确定化学势到一个加性常数，归一化行将其锚定到参考构型。
//! 某些原子类型缺失或输入含 NaN 时解可能含 NaN，这不视为错误。
//!
//! ## 依赖关系
//! - 被 `potential/sweep.rs` 和 `commands/estimate.rs` 调用
//! - 使用 `potential/filter.rs` 的 Selection
//! - 使用 `nalgebra` 进行 SVD 分解

use crate::error::{ChempotError, Result};
use crate::models::ChemicalPotentials;
use crate::potential::filter::Selection;

use nalgebra::{DMatrix, DVector, SVD};

/// SVD 默认最大迭代次数（0 表示不限）
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// 估计器数值参数
#[derive(Debug, Clone, Copy)]
pub struct EstimatorConfig {
    /// 相对奇异值截断阈值；None 时取 f64::EPSILON * max(行数, 列数)
    pub rcond: Option<f64>,
    /// SVD 迭代上限，0 表示迭代至收敛
    pub max_iterations: usize,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            rcond: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// 化学势线性方程组 A μ = b
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// 系数矩阵，前 C(k,2) 行为类型对，最后一行为浓度
    pub matrix: DMatrix<f64>,
    /// 右端项
    pub rhs: DVector<f64>,
}

impl LinearSystem {
    /// 残差 A μ - b
    pub fn residual(&self, potentials: &ChemicalPotentials) -> DVector<f64> {
        let mu = DVector::from_column_slice(potentials.values());
        &self.matrix * mu - &self.rhs
    }
}

/// 化学势估计器
#[derive(Debug, Clone, Copy, Default)]
pub struct ChemicalPotentialEstimator {
    config: EstimatorConfig,
}

impl ChemicalPotentialEstimator {
    /// 创建新的估计器
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        if let Some(rcond) = config.rcond {
            if rcond.is_nan() || rcond < 0.0 {
                return Err(ChempotError::InvalidArgument(format!(
                    "rcond must be non-negative, got {}",
                    rcond
                )));
            }
        }
        Ok(Self { config })
    }

    /// 估计过滤后子集的化学势
    pub fn estimate(&self, selection: &Selection<'_>) -> Result<ChemicalPotentials> {
        let system = self.build_system(selection)?;
        self.solve(&system)
    }

    /// 构造线性方程组
    pub fn build_system(&self, selection: &Selection<'_>) -> Result<LinearSystem> {
        let num_types = selection.num_types();
        if num_types < 2 {
            return Err(ChempotError::InsufficientSpecies { num_types });
        }
        if selection.is_empty() {
            return Err(ChempotError::DegenerateSystem(
                "no atoms in the selected region".to_string(),
            ));
        }

        let atoms = selection.atoms();
        let n = atoms.len() as f64;
        let p = selection.probability();

        let pairs = species_pairs(num_types);
        let num_pairs = pairs.len();

        let mut matrix = DMatrix::<f64>::zeros(num_pairs + 1, num_types);
        let mut rhs = DVector::<f64>::zeros(num_pairs + 1);

        for (row, &(t1, t2)) in pairs.iter().enumerate() {
            matrix[(row, t1)] = 1.0;
            matrix[(row, t2)] = -1.0;
            let sum: f64 = atoms
                .iter()
                .map(|a| p * a.occupying_energy(t1) - p * a.occupying_energy(t2))
                .sum();
            rhs[row] = sum / n;
        }

        for (k, c) in selection.concentrations().into_iter().enumerate() {
            matrix[(num_pairs, k)] = c;
        }

        // 参考能量均值再除以 N
        let reference_sum: f64 = atoms.iter().map(|a| p * a.reference_energy()).sum();
        rhs[num_pairs] = reference_sum / n / n;

        Ok(LinearSystem { matrix, rhs })
    }

    /// SVD 最小二乘求解；SVD 不收敛时返回全 NaN 向量
    pub fn solve(&self, system: &LinearSystem) -> Result<ChemicalPotentials> {
        let (rows, cols) = system.matrix.shape();

        let svd = match SVD::try_new(
            system.matrix.clone(),
            true,
            true,
            f64::EPSILON,
            self.config.max_iterations,
        ) {
            Some(svd) => svd,
            None => return Ok(ChemicalPotentials::undetermined(cols)),
        };

        let largest = svd
            .singular_values
            .iter()
            .copied()
            .fold(0.0_f64, f64::max);
        let rcond = self
            .config
            .rcond
            .unwrap_or(f64::EPSILON * rows.max(cols) as f64);

        let solution = svd
            .solve(&system.rhs, rcond * largest)
            .map_err(|e| ChempotError::SolverError(e.to_string()))?;

        Ok(ChemicalPotentials::new(solution.iter().copied().collect()))
    }
}

/// 所有无序原子类型对 (t1 < t2)，按字典序排列
pub fn species_pairs(num_types: usize) -> Vec<(usize, usize)> {
    (0..num_types)
        .flat_map(|t1| (t1 + 1..num_types).map(move |t2| (t1, t2)))
        .collect()
}

//! # 分块扫描
//!
//! 沿选定坐标轴对原子排序，以固定原子数的滑动窗口划分空间分块，
//! 对每个分块构造区间过滤器并调用估计器。
//!
//! ## 流程
//! 1. 按坐标升序稳定排序
//! 2. 生成 N - w + 1 个相邻窗口（相邻窗口共享 w - 1 个原子）
//! 3. 每个窗口取 [min, max] 作为区域，对完整数据集重新过滤
//!    （边界坐标相同的原子也会被纳入，区域由坐标而非原子数定义）
//! 4. 估计化学势，窗口中心为窗口坐标均值
//!
//! 窗口之间相互独立，使用 rayon 并行计算，输出按窗口顺序排列。
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 调用
//! - 使用 `potential/filter.rs`, `potential/estimator.rs`
//! - 使用 `rayon` 进行并行计算，`indicatif` 报告进度

use crate::error::{ChempotError, Result};
use crate::models::{Axis, ChunkEstimate, Dataset};
use crate::potential::estimator::ChemicalPotentialEstimator;
use crate::potential::filter::RegionFilter;

use indicatif::ProgressBar;
use rayon::prelude::*;

/// 一个滑动窗口
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// 窗口序号
    pub index: usize,
    /// 窗口内最小坐标
    pub low: f64,
    /// 窗口内最大坐标
    pub high: f64,
    /// 窗口内坐标均值
    pub center: f64,
}

/// 沿某一坐标轴升序排列的坐标序列
#[derive(Debug, Clone)]
pub struct SortedAxis {
    coords: Vec<f64>,
}

impl SortedAxis {
    /// 提取并稳定排序坐标
    pub fn new(dataset: &Dataset, axis: Axis) -> Self {
        let mut coords = dataset.coordinates(axis);
        coords.sort_by(f64::total_cmp);
        Self { coords }
    }

    /// 窗口数 N - w + 1；窗口无法填满时报错
    pub fn window_count(&self, window_size: usize) -> Result<usize> {
        if window_size == 0 || self.coords.len() < window_size {
            return Err(ChempotError::InsufficientSamples {
                atoms: self.coords.len(),
                window_size,
            });
        }
        Ok(self.coords.len() - window_size + 1)
    }

    /// 按顺序生成全部窗口，可重复调用
    pub fn windows(&self, window_size: usize) -> Result<impl Iterator<Item = Window> + '_> {
        self.window_count(window_size)?;

        Ok(self
            .coords
            .windows(window_size)
            .enumerate()
            .map(|(index, w)| Window {
                index,
                low: w[0],
                high: w[w.len() - 1],
                center: w.iter().sum::<f64>() / w.len() as f64,
            }))
    }
}

/// 分块扫描器
#[derive(Debug, Clone)]
pub struct ChunkSweep {
    axis: Axis,
    window_size: usize,
    estimator: ChemicalPotentialEstimator,
    jobs: usize,
}

impl ChunkSweep {
    /// 创建新的扫描器
    pub fn new(axis: Axis, window_size: usize) -> Self {
        Self {
            axis,
            window_size,
            estimator: ChemicalPotentialEstimator::default(),
            jobs: 0,
        }
    }

    /// 设置估计器
    pub fn with_estimator(mut self, estimator: ChemicalPotentialEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// 设置并行线程数（0 = 自动）
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// 执行扫描
    pub fn run(&self, dataset: &Dataset) -> Result<Vec<ChunkEstimate>> {
        self.run_with_progress(dataset, None)
    }

    /// 执行扫描，每完成一个窗口推进一次进度条
    pub fn run_with_progress(
        &self,
        dataset: &Dataset,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<ChunkEstimate>> {
        let sorted = SortedAxis::new(dataset, self.axis);
        let windows: Vec<Window> = sorted.windows(self.window_size)?.collect();

        let jobs = if self.jobs == 0 {
            num_cpus::get()
        } else {
            self.jobs
        };

        let evaluate = |window: &Window| {
            let estimate = self.estimate_window(dataset, window);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            estimate
        };

        // 单线程时不建线程池（批量模式下每个文件都走这里）
        if jobs == 1 {
            return windows.iter().map(evaluate).collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| ChempotError::Other(format!("Failed to build thread pool: {}", e)))?;

        pool.install(|| {
            windows
                .par_iter()
                .map(evaluate)
                .collect::<Result<Vec<_>>>()
        })
    }

    /// 过滤并估计单个窗口
    fn estimate_window(&self, dataset: &Dataset, window: &Window) -> Result<ChunkEstimate> {
        let filter = RegionFilter::interval(self.axis, window.low, window.high)?;
        let selection = filter.employ(dataset);
        let potentials = self.estimator.estimate(&selection)?;

        Ok(ChunkEstimate {
            index: window.index,
            center: window.center,
            low: window.low,
            high: window.high,
            atoms: selection.len(),
            probability: selection.probability(),
            potentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potential::filter::Selection;

    fn scenario() -> Dataset {
        let rows = vec![
            vec![1.0, 1.0, 2.0, 0.0, 0.0, 0.0],
            vec![1.0, 1.2, 1.8, 0.0, 0.0, 1.0],
            vec![2.0, 0.5, 0.9, 0.0, 0.0, 2.0],
            vec![2.0, 0.6, 1.0, 0.0, 0.0, 3.0],
            vec![1.0, 1.1, 2.1, 0.0, 0.0, 4.0],
            vec![2.0, 0.4, 0.8, 0.0, 0.0, 5.0],
        ];
        Dataset::from_rows(&rows).unwrap()
    }

    fn shuffled(n: usize) -> Dataset {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                let z = ((i * 7) % n) as f64 * 0.3;
                let e0 = -3.0 + 0.01 * i as f64;
                let e1 = -2.5 - 0.02 * (i % 5) as f64;
                let e2 = -2.0 + 0.03 * (i % 3) as f64;
                vec![(i % 3 + 1) as f64, e0, e1, e2, i as f64, 0.0, z]
            })
            .collect();
        Dataset::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_window_count() {
        let dataset = shuffled(20);
        let sorted = SortedAxis::new(&dataset, Axis::Z);
        assert_eq!(sorted.window_count(5).unwrap(), 16);
        assert_eq!(sorted.window_count(20).unwrap(), 1);
        assert_eq!(sorted.windows(5).unwrap().count(), 16);
        // 可重复生成
        assert_eq!(sorted.windows(5).unwrap().count(), 16);
    }

    #[test]
    fn test_insufficient_samples() {
        let dataset = scenario();
        let sorted = SortedAxis::new(&dataset, Axis::Z);
        assert!(matches!(
            sorted.window_count(7),
            Err(ChempotError::InsufficientSamples {
                atoms: 6,
                window_size: 7
            })
        ));
        assert!(sorted.window_count(0).is_err());
        assert!(ChunkSweep::new(Axis::Z, 7).run(&dataset).is_err());
    }

    #[test]
    fn test_sorting_is_ascending() {
        let dataset = shuffled(11);
        let sorted = SortedAxis::new(&dataset, Axis::Z);
        assert!(sorted.coords.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_scenario_windows() {
        let dataset = scenario();
        let results = ChunkSweep::new(Axis::Z, 3).with_jobs(1).run(&dataset).unwrap();
        assert_eq!(results.len(), 4);

        let centers: Vec<f64> = results.iter().map(|r| r.center).collect();
        for (c, expected) in centers.iter().zip([1.0, 2.0, 3.0, 4.0]) {
            assert!((c - expected).abs() < 1e-12);
        }

        let estimator = ChemicalPotentialEstimator::default();
        for result in &results {
            assert_eq!(result.atoms, 3);
            assert!((result.probability - 0.5).abs() < 1e-15);
            assert_eq!(result.potentials.values().len(), 2);

            let filter = RegionFilter::interval(Axis::Z, result.low, result.high).unwrap();
            let selection = filter.employ(&dataset);
            let system = estimator.build_system(&selection).unwrap();
            let residual = system.residual(&result.potentials);
            assert!(residual.iter().all(|r| r.abs() < 1e-12));

            // 类型对方程：μ0 - μ1 = p · mean(E0 - E1)
            let diff: f64 = selection
                .atoms()
                .iter()
                .map(|a| a.occupying_energy(0) - a.occupying_energy(1))
                .sum::<f64>()
                / selection.len() as f64;
            let mu = result.potentials.values();
            assert!((mu[0] - mu[1] - 0.5 * diff).abs() < 1e-12);
        }
    }

    #[test]
    fn test_first_scenario_window_values() {
        let dataset = scenario();
        let results = ChunkSweep::new(Axis::Z, 3).with_jobs(1).run(&dataset).unwrap();
        let mu = results[0].potentials.values();
        // d = 0.5 · (-2/3), r = 0.5 · 3.1/3 / 3, c = (2/3, 1/3)
        let d = -1.0 / 3.0;
        let r = 3.1 / 18.0;
        let mu1 = r - 2.0 / 3.0 * d;
        assert!((mu[1] - mu1).abs() < 1e-12);
        assert!((mu[0] - (mu1 + d)).abs() < 1e-12);
    }

    #[test]
    fn test_centers_are_non_decreasing() {
        let dataset = shuffled(30);
        let results = ChunkSweep::new(Axis::Z, 6).run(&dataset).unwrap();
        assert_eq!(results.len(), 25);
        assert!(results.windows(2).all(|w| w[0].center <= w[1].center));
        assert!(results.iter().enumerate().all(|(i, r)| r.index == i));
    }

    #[test]
    fn test_boundary_ties_admit_extra_atoms() {
        let rows = vec![
            vec![1.0, 1.0, 2.0, 0.0, 0.0, 0.0],
            vec![2.0, 1.5, 2.5, 0.0, 0.0, 1.0],
            vec![1.0, 1.1, 2.1, 0.0, 0.0, 1.0],
            vec![2.0, 1.6, 2.4, 0.0, 0.0, 2.0],
        ];
        let dataset = Dataset::from_rows(&rows).unwrap();
        let results = ChunkSweep::new(Axis::Z, 2).with_jobs(1).run(&dataset).unwrap();
        assert_eq!(results.len(), 3);
        // 窗口 [0, 1] 通过坐标重新过滤得到 3 个原子
        assert_eq!(results[0].atoms, 3);
        assert!((results[0].probability - 0.75).abs() < 1e-15);
        // 窗口 [1, 1] 包含两个坐标相同的原子
        assert_eq!(results[1].low, 1.0);
        assert_eq!(results[1].high, 1.0);
        assert_eq!(results[1].atoms, 2);
    }

    #[test]
    fn test_sweep_uses_chosen_axis() {
        let dataset = shuffled(12);
        let results = ChunkSweep::new(Axis::X, 4).with_jobs(1).run(&dataset).unwrap();
        // x 坐标为 0..12，区间恰好包含 4 个原子
        assert!(results.iter().all(|r| r.atoms == 4));
        assert!((results[0].center - 1.5).abs() < 1e-12);

        let filter = RegionFilter::interval(Axis::X, 0.0, 3.0).unwrap();
        let expected = ChemicalPotentialEstimator::default()
            .estimate(&filter.employ(&dataset))
            .unwrap();
        assert_eq!(results[0].potentials, expected);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dataset = shuffled(40);
        let sequential = ChunkSweep::new(Axis::Z, 8).with_jobs(1).run(&dataset).unwrap();
        let parallel = ChunkSweep::new(Axis::Z, 8).with_jobs(4).run(&dataset).unwrap();
        assert_eq!(sequential.len(), parallel.len());
        for (a, b) in sequential.iter().zip(&parallel) {
            assert_eq!(a.index, b.index);
            assert_eq!(a.center, b.center);
            assert_eq!(a.potentials, b.potentials);
        }
    }

    #[test]
    fn test_progress_counts_every_window() {
        let dataset = shuffled(15);
        for jobs in [1, 3] {
            let pb = ProgressBar::hidden();
            let results = ChunkSweep::new(Axis::Z, 5)
                .with_jobs(jobs)
                .run_with_progress(&dataset, Some(&pb))
                .unwrap();
            assert_eq!(results.len(), 11);
            assert_eq!(pb.position(), 11);
            assert!(results.iter().enumerate().all(|(i, r)| r.index == i));
        }
    }

    #[test]
    fn test_single_species_window() {
        // 第一个窗口 z ∈ [0, 2] 只含类型 1
        let rows = vec![
            vec![1.0, -1.0, -1.9, -3.0, 0.0, 0.0, 0.0],
            vec![1.0, -1.2, -2.1, -2.9, 0.0, 0.0, 1.0],
            vec![1.0, -1.1, -2.0, -3.0, 0.0, 0.0, 2.0],
            vec![2.0, -1.3, -2.2, -3.1, 0.0, 0.0, 3.0],
            vec![3.0, -0.9, -1.9, -2.8, 0.0, 0.0, 4.0],
            vec![2.0, -1.0, -2.0, -3.0, 0.0, 0.0, 5.0],
        ];
        let dataset = Dataset::from_rows(&rows).unwrap();
        let results = ChunkSweep::new(Axis::Z, 3).with_jobs(1).run(&dataset).unwrap();
        assert_eq!(results.len(), 4);

        let first = &results[0];
        assert_eq!(first.atoms, 3);
        assert!(first.potentials.is_finite());

        let estimator = ChemicalPotentialEstimator::default();
        let filter = RegionFilter::interval(Axis::Z, first.low, first.high).unwrap();
        let selection = filter.employ(&dataset);
        assert_eq!(selection.concentrations(), vec![1.0, 0.0, 0.0]);
        let system = estimator.build_system(&selection).unwrap();
        assert!(system.residual(&first.potentials).amax() < 1e-10);

        // μ0 - μ1 = p · mean(E0 - E1)，μ0 = p · mean(E0) / n
        let mu = first.potentials.values();
        assert!((mu[0] - mu[1] - 0.5 * 0.9).abs() < 1e-12);
        assert!((mu[0] - 0.5 * (-1.1) / 3.0).abs() < 1e-12);
        assert!((mu[0] - mu[2] - 0.5 * (5.6 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_whole_cell_window_matches_identity() {
        let dataset = scenario();
        let results = ChunkSweep::new(Axis::Z, 6).with_jobs(1).run(&dataset).unwrap();
        assert_eq!(results.len(), 1);
        let direct = ChemicalPotentialEstimator::default()
            .estimate(&Selection::full(&dataset))
            .unwrap();
        assert_eq!(results[0].potentials, direct);
    }
}

//! # 原子数据集模型
//!
//! 每一行对应一个原子位点：参考构型中的实际占据类型、
//! 每种原子类型假想占据该位点时的能量，以及三个空间坐标。
//!
//! ```text
//! init_type  E_1 ... E_k  x  y  z
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/table.rs` 构造
//! - 被 `potential/` 使用
//! - 无外部模块依赖

use crate::error::{ChempotError, Result};

use clap::ValueEnum;

/// 行中除占据能以外的列数（init_type + x, y, z）
pub const NON_ENERGY_COLUMNS: usize = 4;

/// 空间坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// 坐标列在 (x, y, z) 中的索引
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// 单个原子位点记录
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// 参考构型中实际占据的原子类型（从 1 开始）
    pub init_type: usize,
    /// 各原子类型占据该位点时的能量
    pub occupying_energies: Vec<f64>,
    /// 笛卡尔坐标 (x, y, z)
    pub position: [f64; 3],
}

impl AtomRecord {
    pub fn new(init_type: usize, occupying_energies: Vec<f64>, position: [f64; 3]) -> Self {
        Self {
            init_type,
            occupying_energies,
            position,
        }
    }

    /// 沿指定轴的坐标
    pub fn coordinate(&self, axis: Axis) -> f64 {
        self.position[axis.index()]
    }

    /// 实际占据类型的 0 起始索引
    pub fn species(&self) -> usize {
        self.init_type - 1
    }

    /// 第 k 种原子类型的占据能
    pub fn occupying_energy(&self, k: usize) -> f64 {
        self.occupying_energies[k]
    }

    /// 参考构型下该位点的能量（实际占据类型的占据能）
    pub fn reference_energy(&self) -> f64 {
        self.occupying_energies[self.species()]
    }
}

/// 共享相同原子类型数的原子数据集
#[derive(Debug, Clone)]
pub struct Dataset {
    num_types: usize,
    atoms: Vec<AtomRecord>,
}

impl Dataset {
    /// 从原子记录创建数据集，校验每条记录的形状
    pub fn new(num_types: usize, atoms: Vec<AtomRecord>) -> Result<Self> {
        for (i, atom) in atoms.iter().enumerate() {
            if atom.occupying_energies.len() != num_types {
                return Err(ChempotError::InvalidArgument(format!(
                    "atom {} has {} occupying energies, expected {}",
                    i,
                    atom.occupying_energies.len(),
                    num_types
                )));
            }
            if atom.init_type == 0 || atom.init_type > num_types {
                return Err(ChempotError::InvalidArgument(format!(
                    "atom {} has init_type {} outside 1..={}",
                    i, atom.init_type, num_types
                )));
            }
        }

        Ok(Self { num_types, atoms })
    }

    /// 从等宽数值行创建数据集，`num_types = 行宽 - 4`
    ///
    /// 行相关的错误以 `InvalidRow` 返回，`row` 为 0 起始的行序号。
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let width = match rows.first() {
            Some(row) => row.len(),
            None => {
                return Err(ChempotError::InvalidArgument(
                    "no data rows found".to_string(),
                ))
            }
        };
        if width <= NON_ENERGY_COLUMNS {
            return Err(ChempotError::InvalidRow {
                row: 0,
                reason: format!(
                    "expected init_type, at least one occupying energy and x y z, found {} columns",
                    width
                ),
            });
        }
        let num_types = width - NON_ENERGY_COLUMNS;

        let mut atoms = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ChempotError::InvalidRow {
                    row: i,
                    reason: format!("{} columns, expected {}", row.len(), width),
                });
            }
            let init_type =
                parse_init_type(row[0], num_types).ok_or_else(|| ChempotError::InvalidRow {
                    row: i,
                    reason: format!(
                        "init_type {} must be an integer in 1..={}",
                        row[0], num_types
                    ),
                })?;
            atoms.push(AtomRecord::new(
                init_type,
                row[1..=num_types].to_vec(),
                [row[width - 3], row[width - 2], row[width - 1]],
            ));
        }

        Self::new(num_types, atoms)
    }

    pub fn num_types(&self) -> usize {
        self.num_types
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// 沿指定轴的全部坐标（保持原始顺序）
    pub fn coordinates(&self, axis: Axis) -> Vec<f64> {
        self.atoms.iter().map(|a| a.coordinate(axis)).collect()
    }

    /// 各原子类型的计数
    pub fn species_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_types];
        for atom in &self.atoms {
            counts[atom.species()] += 1;
        }
        counts
    }
}

/// 将浮点列解释为 1 起始的原子类型
pub fn parse_init_type(value: f64, num_types: usize) -> Option<usize> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > num_types as f64 {
        return None;
    }
    Some(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_splits_columns() {
        let rows = vec![
            vec![1.0, 1.0, 2.0, 3.0, 0.1, 0.2, 0.3],
            vec![3.0, 4.0, 5.0, 6.0, 1.1, 1.2, 1.3],
        ];
        let dataset = Dataset::from_rows(&rows).unwrap();
        assert_eq!(dataset.num_types(), 3);
        assert_eq!(dataset.len(), 2);

        let atom = &dataset.atoms()[1];
        assert_eq!(atom.init_type, 3);
        assert_eq!(atom.occupying_energies, vec![4.0, 5.0, 6.0]);
        assert_eq!(atom.coordinate(Axis::X), 1.1);
        assert_eq!(atom.coordinate(Axis::Z), 1.3);
        assert_eq!(atom.reference_energy(), 6.0);
    }

    #[test]
    fn test_from_rows_rejects_bad_init_type() {
        let rows = vec![vec![3.0, 1.0, 2.0, 0.0, 0.0, 0.0]];
        assert!(Dataset::from_rows(&rows).is_err());

        let rows = vec![vec![1.5, 1.0, 2.0, 0.0, 0.0, 0.0]];
        assert!(Dataset::from_rows(&rows).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let rows = vec![
            vec![1.0, 1.0, 2.0, 0.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0, 0.0, 0.0],
        ];
        assert!(matches!(
            Dataset::from_rows(&rows),
            Err(ChempotError::InvalidRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_species_counts() {
        let rows = vec![
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            vec![2.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            vec![2.0, 0.0, 0.0, 0.0, 0.0, 2.0],
        ];
        let dataset = Dataset::from_rows(&rows).unwrap();
        assert_eq!(dataset.species_counts(), vec![1, 2]);
        assert_eq!(dataset.coordinates(Axis::Z), vec![0.0, 1.0, 2.0]);
    }
}

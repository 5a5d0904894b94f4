//! # 化学势数据导出
//!
//! 将扫描结果导出为文本表格或 CSV。
//!
//! ## 支持格式
//! - DAT: 空白分隔，首行注释 `# center mu_1 ... mu_k`，每个窗口一行
//! - CSV: window, center, low, high, atoms, p, mu_1 ... mu_k
//! - 单次估计的 CSV: species, concentration, mu
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs`, `commands/estimate.rs` 调用
//! - 使用 `models/potential.rs` 的 ChunkEstimate
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{ChempotError, Result};
use crate::models::{ChemicalPotentials, ChunkEstimate};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 化学势列名 mu_1 ... mu_k
pub fn potential_columns(num_types: usize) -> Vec<String> {
    (1..=num_types).map(|k| format!("mu_{}", k)).collect()
}

/// 导出扫描结果为空白分隔文本
pub fn to_dat(results: &[ChunkEstimate], num_types: usize, output_path: &Path) -> Result<()> {
    let write_error = |e: std::io::Error| ChempotError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    };

    let file = File::create(output_path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);

    let mut header = vec!["center".to_string()];
    header.extend(potential_columns(num_types));
    writeln!(writer, "# {}", header.join(" ")).map_err(write_error)?;

    for result in results {
        let line = std::iter::once(result.center)
            .chain(result.potentials.values().iter().copied())
            .map(|v| format!("{:.18e}", v))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line).map_err(write_error)?;
    }

    writer.flush().map_err(write_error)?;

    Ok(())
}

/// 导出扫描结果为 CSV
pub fn to_csv(results: &[ChunkEstimate], num_types: usize, output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    let mut header = vec![
        "window".to_string(),
        "center".to_string(),
        "low".to_string(),
        "high".to_string(),
        "atoms".to_string(),
        "p".to_string(),
    ];
    header.extend(potential_columns(num_types));
    wtr.write_record(&header)?;

    for result in results {
        let mut record = vec![
            result.index.to_string(),
            format!("{:.10}", result.center),
            format!("{:.10}", result.low),
            format!("{:.10}", result.high),
            result.atoms.to_string(),
            format!("{:.10}", result.probability),
        ];
        record.extend(result.potentials.values().iter().map(|v| format!("{:.10}", v)));
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| ChempotError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 单个原子类型的估计结果
#[derive(Debug, Serialize)]
struct SpeciesRow {
    species: usize,
    concentration: f64,
    mu: f64,
}

/// 导出单次估计结果为 CSV
pub fn potentials_to_csv(
    potentials: &ChemicalPotentials,
    concentrations: &[f64],
    output_path: &Path,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for (k, (mu, c)) in potentials.values().iter().zip(concentrations).enumerate() {
        wtr.serialize(SpeciesRow {
            species: k + 1,
            concentration: *c,
            mu: *mu,
        })?;
    }

    wtr.flush().map_err(|e| ChempotError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn results() -> Vec<ChunkEstimate> {
        (0..3)
            .map(|i| ChunkEstimate {
                index: i,
                center: i as f64 + 1.0,
                low: i as f64,
                high: i as f64 + 2.0,
                atoms: 3,
                probability: 0.5,
                potentials: ChemicalPotentials::new(vec![0.1 * i as f64, -0.2, f64::NAN]),
            })
            .collect()
    }

    #[test]
    fn test_to_dat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mu.dat");
        to_dat(&results(), 3, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "# center mu_1 mu_2 mu_3");
        assert_eq!(lines.len(), 4);

        let row: Vec<f64> = lines[2]
            .split_whitespace()
            .map(|t| t.parse().unwrap())
            .collect();
        assert_eq!(row.len(), 4);
        assert_eq!(row[0], 2.0);
        assert!((row[1] - 0.1).abs() < 1e-15);
        assert!(row[3].is_nan());
    }

    #[test]
    fn test_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mu.csv");
        to_csv(&results(), 3, &path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["window", "center", "low", "high", "atoms", "p", "mu_1", "mu_2", "mu_3"]
        );
        let windows: Vec<String> = rdr
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(windows, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_potentials_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimate.csv");
        let mu = ChemicalPotentials::new(vec![-1.5, -2.5]);
        potentials_to_csv(&mu, &[0.25, 0.75], &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "species,concentration,mu");
        assert_eq!(lines[1], "1,0.25,-1.5");
        assert_eq!(lines[2], "2,0.75,-2.5");
    }
}

//! # 空白分隔数值表解析器
//!
//! 解析每行一个原子的数值表格。
//!
//! ## 格式说明
//! ```text
//! # 注释行
//! init_type  E_1  E_2 ... E_k  x  y  z
//! 1          1.0  2.0          0  0  0
//! 2          0.5  0.9          0  0  2
//! ```
//!
//! - 空行和 `#` 开头的行被忽略，行尾 `#` 之后的内容视为注释
//! - 所有数据行列数必须相同，原子类型数 k = 列数 - 4
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/dataset.rs`

use crate::error::{ChempotError, Result};
use crate::models::Dataset;
use std::fs;
use std::path::Path;

/// 解析数值表文件
pub fn parse_table_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(ChempotError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ChempotError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_table_content(&content, &path.display().to_string())
}

/// 从字符串内容解析数值表
pub fn parse_table_content(content: &str, source_name: &str) -> Result<Dataset> {
    let mut width: Option<usize> = None;
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut line_numbers: Vec<usize> = Vec::new();

    for (line_idx, raw) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| ChempotError::ParseError {
                    path: source_name.to_string(),
                    line: line_no,
                    reason: format!("'{}' is not a number", tok),
                })
            })
            .collect::<Result<Vec<f64>>>()?;

        let expected = *width.get_or_insert(values.len());
        if values.len() != expected {
            return Err(ChempotError::InconsistentRowWidth {
                path: source_name.to_string(),
                line: line_no,
                expected,
                found: values.len(),
            });
        }

        rows.push(values);
        line_numbers.push(line_no);
    }

    if rows.is_empty() {
        return Err(ChempotError::ParseError {
            path: source_name.to_string(),
            line: 0,
            reason: "no data rows found".to_string(),
        });
    }

    // 行序号映射回文件行号
    Dataset::from_rows(&rows).map_err(|e| match e {
        ChempotError::InvalidRow { row, reason } => ChempotError::ParseError {
            path: source_name.to_string(),
            line: line_numbers[row],
            reason,
        },
        other => other,
    })
}

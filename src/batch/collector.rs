//! # 快照文件收集器
//!
//! 批量模式下从目录中收集待处理的数值表文件。
//!
//! ## 功能
//! - 逗号分隔的多个 glob 模式
//! - 可选递归搜索
//! - 结果按路径排序，保证输出稳定
//!
//! ## 依赖关系
//! - 被 `commands/sweep.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{ChempotError, Result};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    root: PathBuf,
    patterns: Vec<glob::Pattern>,
    recursive: bool,
}

impl FileCollector {
    /// 创建收集器，`pattern` 为逗号分隔的 glob 模式
    pub fn new(root: PathBuf, pattern: &str) -> Result<Self> {
        let patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                glob::Pattern::new(s).map_err(|e| {
                    ChempotError::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if patterns.is_empty() {
            return Err(ChempotError::InvalidArgument(format!(
                "Empty file pattern '{}'",
                pattern
            )));
        }

        Ok(Self {
            root,
            patterns,
            recursive: false,
        })
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Vec<PathBuf> {
        let walker = if self.recursive {
            WalkDir::new(&self.root)
        } else {
            WalkDir::new(&self.root).max_depth(1)
        };

        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort();
        files
    }

    fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.patterns.iter().any(|p| p.matches(name)))
            .unwrap_or(false)
    }
}

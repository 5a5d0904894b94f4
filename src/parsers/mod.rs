//! # 解析器模块
//!
//! 提供输入数值表的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: table

pub mod table;

pub use table::parse_table_file;

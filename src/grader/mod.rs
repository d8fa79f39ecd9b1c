//! 大模型自动评分客户端
//!
//! 对外提供两层接口：`try_evaluate` 返回 `Result<String, GradeError>` 供需要
//! 区分失败类别的调用方使用；`evaluate_code` / `evaluate_content` 等字符串
//! 包装把错误映射为固定的哨兵文案，评分失败永远不会冒泡成 HTTP 错误。

pub mod client;
pub mod error;

pub use client::{BatchItem, BatchRecord, GraderClient};
pub use error::GradeError;

//! 评分调用的错误分类
//!
//! 只有超时参与重试，其余类别一律立即失败。每个类别对应一条固定的
//! 中文哨兵文案，由字符串层包装统一转换。

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeError {
    /// 单次请求超时（唯一可重试的类别）
    Timeout,
    /// 连接失败或非 2xx 状态
    Transport(String),
    /// 响应缺少 choices[0].message.content
    MalformedResponse(String),
    /// 其余未归类失败
    Other(String),
}

impl GradeError {
    /// 映射为面向用户的哨兵文案
    pub fn sentinel(&self) -> String {
        match self {
            GradeError::Timeout => "❌ 评分失败：请求超时，请稍后重试".to_string(),
            GradeError::Transport(e) => format!("❌ 网络错误：{e}"),
            GradeError::MalformedResponse(e) => format!("❌ API响应格式错误：{e}"),
            GradeError::Other(e) => format!("❌ 未知错误：{e}"),
        }
    }
}

impl fmt::Display for GradeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeError::Timeout => write!(f, "request timed out"),
            GradeError::Transport(e) => write!(f, "transport error: {e}"),
            GradeError::MalformedResponse(e) => write!(f, "malformed response: {e}"),
            GradeError::Other(e) => write!(f, "unexpected error: {e}"),
        }
    }
}

impl std::error::Error for GradeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_sentinel_is_exact() {
        assert_eq!(
            GradeError::Timeout.sentinel(),
            "❌ 评分失败：请求超时，请稍后重试"
        );
    }

    #[test]
    fn test_sentinels_carry_detail() {
        let err = GradeError::Transport("connection refused".to_string());
        assert_eq!(err.sentinel(), "❌ 网络错误：connection refused");

        let err = GradeError::MalformedResponse("missing field `choices`".to_string());
        assert!(err.sentinel().starts_with("❌ API响应格式错误："));
    }
}

//! 目标错误的结构化快照
//!
//! after-throwing 通知只能观察错误，不能吞掉或替换它，
//! 这里提供一份可记录的只读视图

use std::error::Error;
use std::fmt;

/// 传递给 after-throwing 通知的错误信息
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// 错误消息
    pub message: String,

    /// 错误类型名称
    pub type_name: &'static str,

    /// 错误源链（cause chain）
    pub source_chain: Vec<String>,
}

impl ErrorInfo {
    /// 从标准错误构建快照
    pub fn from_error<E: Error>(error: &E) -> Self {
        let mut source_chain = Vec::new();
        let mut cursor = error.source();
        while let Some(source) = cursor {
            source_chain.push(source.to_string());
            cursor = source.source();
        }

        Self {
            message: error.to_string(),
            type_name: std::any::type_name::<E>(),
            source_chain,
        }
    }

    /// 含源链的完整描述
    pub fn full_description(&self) -> String {
        if self.source_chain.is_empty() {
            self.message.clone()
        } else {
            format!(
                "{}\nCaused by:\n  {}",
                self.message,
                self.source_chain.join("\n  ")
            )
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct Inner;

    #[derive(Debug, Error)]
    #[error("query failed")]
    struct Outer(#[source] Inner);

    #[test]
    fn test_from_error_captures_message_and_type() {
        let info = ErrorInfo::from_error(&Inner);
        assert_eq!(info.message, "connection refused");
        assert!(info.type_name.ends_with("Inner"));
        assert!(info.source_chain.is_empty());
    }

    #[test]
    fn test_from_error_walks_source_chain() {
        let info = ErrorInfo::from_error(&Outer(Inner));
        assert_eq!(info.message, "query failed");
        assert_eq!(info.source_chain, vec!["connection refused".to_string()]);
        assert_eq!(
            info.full_description(),
            "query failed\nCaused by:\n  connection refused"
        );
    }

    #[test]
    fn test_display_is_the_message() {
        let info = ErrorInfo::from_error(&Inner);
        assert_eq!(info.to_string(), "connection refused");
    }
}

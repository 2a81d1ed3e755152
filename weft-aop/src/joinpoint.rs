//! 连接点（JoinPoint）定义
//!
//! 连接点是一次被拦截的操作调用，由拦截引擎在 before 通知之前创建，
//! 通知全部结束后即丢弃，不做持久化

use crate::error_info::ErrorInfo;
use std::fmt;
use std::time::Instant;

/// 操作可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    Package,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Package => "package",
        };
        write!(f, "{token}")
    }
}

/// 调用结果
///
/// 每次调度恰好从 Pending 迁移一次，且只会迁移到
/// Returned 和 Threw 其中之一
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    /// 目标操作尚未执行
    Pending,
    /// 目标操作正常返回
    Returned(T),
    /// 目标操作报错
    Threw(ErrorInfo),
}

impl<T> Outcome<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }

    pub fn as_returned(&self) -> Option<&T> {
        match self {
            Outcome::Returned(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_threw(&self) -> Option<&ErrorInfo> {
        match self {
            Outcome::Threw(info) => Some(info),
            _ => None,
        }
    }
}

/// 用于切点匹配的静态调用形状
///
/// 匹配器只能看到形状，永远看不到参数值
#[derive(Debug, Clone, Copy)]
pub struct CallShape<'a> {
    /// 声明单元，`.` 分隔
    pub scope: &'a str,

    /// 操作名称
    pub operation: &'a str,

    /// 操作可见性
    pub visibility: Visibility,

    /// 参数个数
    pub arity: usize,
}

/// 连接点信息
///
/// 包含一次被拦截调用的完整上下文；对通知只读，
/// outcome 只由拦截引擎在目标操作完成后写入一次
pub struct JoinPoint<T> {
    scope: String,
    operation: String,
    visibility: Visibility,
    args: Vec<T>,
    outcome: Outcome<T>,
    entered_at: Instant,
}

impl<T> JoinPoint<T> {
    /// 创建新的连接点，结果为 Pending
    pub fn new(
        scope: impl Into<String>,
        operation: impl Into<String>,
        visibility: Visibility,
        args: Vec<T>,
    ) -> Self {
        Self {
            scope: scope.into(),
            operation: operation.into(),
            visibility,
            args,
            outcome: Outcome::Pending,
            entered_at: Instant::now(),
        }
    }

    /// 声明单元
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// 操作名称
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// 操作可见性
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// 有序的参数值
    pub fn args(&self) -> &[T] {
        &self.args
    }

    /// 调用结果
    pub fn outcome(&self) -> &Outcome<T> {
        &self.outcome
    }

    /// 进入连接点的时刻
    pub fn entered_at(&self) -> Instant {
        self.entered_at
    }

    /// 完整签名
    pub fn signature(&self) -> String {
        format!("{}::{}", self.scope, self.operation)
    }

    /// 本次调用的静态形状
    pub fn shape(&self) -> CallShape<'_> {
        CallShape {
            scope: &self.scope,
            operation: &self.operation,
            visibility: self.visibility,
            arity: self.args.len(),
        }
    }

    /// 写入调用结果，每次调度只允许一次
    pub(crate) fn complete(&mut self, outcome: Outcome<T>) {
        debug_assert!(self.outcome.is_pending(), "join point completed twice");
        self.outcome = outcome;
    }
}

impl<T: fmt::Debug> fmt::Debug for JoinPoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinPoint")
            .field("signature", &self.signature())
            .field("visibility", &self.visibility)
            .field("args", &self.args)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl<T> fmt::Display for JoinPoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JoinPoint<i64> {
        JoinPoint::new("calc.Calculator", "sum", Visibility::Public, vec![5, 3])
    }

    #[test]
    fn test_signature_joins_scope_and_operation() {
        assert_eq!(sample().signature(), "calc.Calculator::sum");
    }

    #[test]
    fn test_shape_reflects_the_call() {
        let jp = sample();
        let shape = jp.shape();
        assert_eq!(shape.scope, "calc.Calculator");
        assert_eq!(shape.operation, "sum");
        assert_eq!(shape.visibility, Visibility::Public);
        assert_eq!(shape.arity, 2);
    }

    #[test]
    fn test_outcome_starts_pending_and_transitions_once() {
        let mut jp = sample();
        assert!(jp.outcome().is_pending());

        jp.complete(Outcome::Returned(8));
        assert_eq!(jp.outcome().as_returned(), Some(&8));
        // Returned 和 Threw 互斥
        assert!(jp.outcome().as_threw().is_none());
    }

    #[test]
    fn test_args_keep_order() {
        assert_eq!(sample().args(), &[5, 3]);
    }
}

//! 统一的错误类型
//!
//! 配置错误在注册阶段立即失败；调度错误只中止当前调用；
//! 目标操作自身的业务错误永远原样传播

use crate::advice::AdvicePhase;
use thiserror::Error;

/// 配置阶段错误
///
/// 全部产生于 define_pointcut / register_advice，调度阶段不会出现
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AopError {
    /// 切点名称冲突
    #[error("duplicate pointcut '{0}'")]
    DuplicatePointcut(String),

    /// 切点表达式语法错误
    #[error("malformed pointcut pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },

    /// 引用了未定义的切点
    #[error("unknown pointcut '{0}'")]
    UnknownPointcut(String),
}

/// 通知执行失败
///
/// 包装 before / after-returning 回调返回的错误；
/// 同阶段后续通知不再执行，错误传播给调用方
#[derive(Debug, Error)]
#[error("{phase} advice failed at {signature}: {source}")]
pub struct AdviceExecutionError {
    /// 失败的通知阶段
    pub phase: AdvicePhase,

    /// 连接点签名
    pub signature: String,

    /// 回调返回的原始错误
    #[source]
    pub source: anyhow::Error,
}

impl AdviceExecutionError {
    pub(crate) fn new(phase: AdvicePhase, signature: String, source: anyhow::Error) -> Self {
        Self {
            phase,
            signature,
            source,
        }
    }
}

/// 代理调用错误
///
/// Target 变体按值携带业务错误，调用方观察到的错误
/// 与直接调用目标完全一致
#[derive(Debug, Error)]
pub enum InvocationError<E>
where
    E: std::error::Error + 'static,
{
    /// 目标对象没有声明该操作
    #[error("unknown operation '{operation}' on {scope}")]
    UnknownOperation { scope: String, operation: String },

    /// before / after-returning 通知执行失败
    #[error(transparent)]
    Advice(#[from] AdviceExecutionError),

    /// 目标操作自身的业务错误
    #[error(transparent)]
    Target(E),
}

impl<E> InvocationError<E>
where
    E: std::error::Error + 'static,
{
    /// 取出业务错误
    pub fn into_target(self) -> Option<E> {
        match self {
            Self::Target(error) => Some(error),
            _ => None,
        }
    }

    /// 借用业务错误
    pub fn as_target(&self) -> Option<&E> {
        match self {
            Self::Target(error) => Some(error),
            _ => None,
        }
    }
}

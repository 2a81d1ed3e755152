//! Weft AOP - 运行时方法拦截
//!
//! 提供类似 Spring AOP 的动态拦截能力，支持：
//! - 命名切点与 execution 风格的表达式匹配
//! - Before / AfterReturning / AfterThrowing 三种通知，显式 order 排序
//! - 基于能力接口的透明代理：返回值与业务错误原样传播
//! - 多个独立注册表可在同一进程中共存，便于测试与隔离

pub mod advice;
pub mod aspect;
pub mod error;
pub mod error_info;
pub mod joinpoint;
pub mod logging;
pub mod pointcut;
pub mod proxy;
pub mod registry;
pub mod target;

// 重新导出核心类型
pub use advice::{AdviceEntry, AdviceFn, AdvicePhase, AfterReturningFn, AfterThrowingFn, BeforeFn};
pub use aspect::{LoggingAspect, TimingAspect};
pub use error::{AdviceExecutionError, AopError, InvocationError};
pub use error_info::ErrorInfo;
pub use joinpoint::{CallShape, JoinPoint, Outcome, Visibility};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use pointcut::{Pointcut, PointcutPattern};
pub use proxy::AopProxy;
pub use registry::{AdviceRegistry, ResolvedAdvice};
pub use target::Interceptable;

/// 预导入模块
pub mod prelude {
    pub use crate::advice::{AdviceFn, AdvicePhase};
    pub use crate::aspect::{LoggingAspect, TimingAspect};
    pub use crate::error::{AdviceExecutionError, AopError, InvocationError};
    pub use crate::error_info::ErrorInfo;
    pub use crate::joinpoint::{CallShape, JoinPoint, Outcome, Visibility};
    pub use crate::logging::LoggingConfig;
    pub use crate::proxy::AopProxy;
    pub use crate::registry::AdviceRegistry;
    pub use crate::target::Interceptable;
}

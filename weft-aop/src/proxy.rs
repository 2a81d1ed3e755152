//! 拦截引擎（代理/调度器）
//!
//! 站在调用方和目标之间，按 before、目标操作、after-returning 或
//! after-throwing 的顺序执行通知，并把真实结果或错误原样交还调用方。
//! 每次调用持有自己的 JoinPoint，并发调用之间互不可见

use crate::advice::AdvicePhase;
use crate::error::{AdviceExecutionError, InvocationError};
use crate::error_info::ErrorInfo;
use crate::joinpoint::{JoinPoint, Outcome};
use crate::registry::AdviceRegistry;
use crate::target::Interceptable;
use std::sync::Arc;

/// AOP 代理
///
/// 对调用方透明：参数、返回值、业务错误与直接调用目标完全一致
pub struct AopProxy<S: Interceptable> {
    target: Arc<S>,
    registry: Arc<AdviceRegistry<S::Value>>,
}

impl<S: Interceptable> AopProxy<S> {
    /// 包装目标对象
    pub fn new(target: Arc<S>, registry: Arc<AdviceRegistry<S::Value>>) -> Self {
        Self { target, registry }
    }

    /// 目标对象
    pub fn target(&self) -> &S {
        &self.target
    }

    /// 调度一次被拦截的调用
    pub fn invoke(
        &self,
        operation: &str,
        args: Vec<S::Value>,
    ) -> Result<S::Value, InvocationError<S::Error>> {
        let Some(visibility) = self.target.visibility_of(operation) else {
            return Err(InvocationError::UnknownOperation {
                scope: self.target.scope().to_string(),
                operation: operation.to_string(),
            });
        };

        let mut join_point = JoinPoint::new(self.target.scope(), operation, visibility, args);
        let advice = self.registry.resolve_advice_for(&join_point.shape());
        tracing::trace!(
            "Dispatching {} ({} before / {} after-returning / {} after-throwing)",
            join_point.signature(),
            advice.before.len(),
            advice.after_returning.len(),
            advice.after_throwing.len(),
        );

        // before 失败立即传播：目标操作与 after 通知都不执行
        for before in &advice.before {
            before(&join_point).map_err(|source| {
                AdviceExecutionError::new(AdvicePhase::Before, join_point.signature(), source)
            })?;
        }

        match self.target.invoke(operation, join_point.args()) {
            Ok(value) => {
                join_point.complete(Outcome::Returned(value.clone()));
                // after-returning 失败时该错误代替返回值传播，
                // 同阶段后续通知不再执行
                for after in &advice.after_returning {
                    after(&join_point, &value).map_err(|source| {
                        AdviceExecutionError::new(
                            AdvicePhase::AfterReturning,
                            join_point.signature(),
                            source,
                        )
                    })?;
                }
                Ok(value)
            }
            Err(error) => {
                let info = ErrorInfo::from_error(&error);
                join_point.complete(Outcome::Threw(info.clone()));
                // after-throwing 只观察，原始错误照常传播
                for after in &advice.after_throwing {
                    after(&join_point, &info);
                }
                Err(InvocationError::Target(error))
            }
        }
    }
}

impl<S: Interceptable> Clone for AopProxy<S> {
    fn clone(&self) -> Self {
        Self {
            target: Arc::clone(&self.target),
            registry: Arc::clone(&self.registry),
        }
    }
}

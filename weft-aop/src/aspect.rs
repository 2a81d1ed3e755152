//! 预定义切面
//!
//! 覆盖最常见的横切需求：调用日志与慢调用监控。
//! 切面只是一组打包好的通知，安装时逐条注册到目标切点上

use crate::error::AopError;
use crate::registry::AdviceRegistry;
use std::fmt::Display;
use std::time::Duration;

/// 日志切面 - 记录方法进入、返回与异常
pub struct LoggingAspect {
    log_args: bool,
    log_result: bool,
}

impl LoggingAspect {
    pub fn new() -> Self {
        Self {
            log_args: false,
            log_result: true,
        }
    }

    /// 进入时记录参数
    pub fn with_args(mut self) -> Self {
        self.log_args = true;
        self
    }

    /// 返回时记录返回值
    pub fn with_result(mut self) -> Self {
        self.log_result = true;
        self
    }

    /// 在注册表上安装三个阶段的日志通知
    pub fn install<T>(
        self,
        registry: &AdviceRegistry<T>,
        pointcut: &str,
        order: i32,
    ) -> Result<(), AopError>
    where
        T: Display + Clone + Send + Sync + 'static,
    {
        let log_args = self.log_args;
        registry.register_before(pointcut, order, move |jp| {
            tracing::info!("→ Entering: {}", jp.signature());
            if log_args && !jp.args().is_empty() {
                let rendered: Vec<String> = jp.args().iter().map(ToString::to_string).collect();
                tracing::info!("  Args: {}", rendered.join(", "));
            }
            Ok(())
        })?;

        let log_result = self.log_result;
        registry.register_after_returning(pointcut, order, move |jp, result| {
            if log_result {
                tracing::info!("← Returning from {}: {}", jp.signature(), result);
            } else {
                tracing::info!("← Returning from {}", jp.signature());
            }
            Ok(())
        })?;

        registry.register_after_throwing(pointcut, order, |jp, error| {
            tracing::error!("❌ Exception in {}: {}", jp.signature(), error);
        })
    }
}

impl Default for LoggingAspect {
    fn default() -> Self {
        Self::new()
    }
}

/// 性能监控切面 - 超过阈值的调用记 warn
pub struct TimingAspect {
    slow_threshold: Duration,
}

impl TimingAspect {
    pub fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }

    /// 在注册表上安装计时通知
    pub fn install<T>(
        self,
        registry: &AdviceRegistry<T>,
        pointcut: &str,
        order: i32,
    ) -> Result<(), AopError>
    where
        T: Clone + Send + Sync + 'static,
    {
        let threshold = self.slow_threshold;
        registry.register_after_returning(pointcut, order, move |jp, _| {
            let elapsed = jp.entered_at().elapsed();
            if elapsed > threshold {
                tracing::warn!(
                    "⚠️ Slow call: {} took {:?} (threshold: {:?})",
                    jp.signature(),
                    elapsed,
                    threshold
                );
            } else {
                tracing::debug!("{} took {:?}", jp.signature(), elapsed);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_aspect_installs_one_advice_per_phase() {
        let registry: AdviceRegistry<i64> = AdviceRegistry::new();
        registry.define_pointcut("all", "public * *(..)").unwrap();

        LoggingAspect::new()
            .with_args()
            .install(&registry, "all", 0)
            .unwrap();
        assert_eq!(registry.advice_count(), 3);
    }

    #[test]
    fn test_timing_aspect_installs_a_single_after_returning_advice() {
        let registry: AdviceRegistry<i64> = AdviceRegistry::new();
        registry.define_pointcut("all", "public * *(..)").unwrap();

        TimingAspect::new(Duration::from_millis(100))
            .install(&registry, "all", 10)
            .unwrap();
        assert_eq!(registry.advice_count(), 1);
    }

    #[test]
    fn test_install_against_unknown_pointcut_fails() {
        let registry: AdviceRegistry<i64> = AdviceRegistry::new();
        let result = LoggingAspect::new().install(&registry, "missing", 0);
        assert_eq!(result, Err(AopError::UnknownPointcut("missing".to_string())));
    }
}

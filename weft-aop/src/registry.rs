//! 通知注册表
//!
//! 持有全部切点定义和通知条目；切点引用在注册时校验，
//! 因此注册表在第一次调度之前就是完整解析好的

use crate::advice::{AdviceEntry, AdviceFn, AfterReturningFn, AfterThrowingFn, BeforeFn};
use crate::error::AopError;
use crate::error_info::ErrorInfo;
use crate::joinpoint::{CallShape, JoinPoint};
use crate::pointcut::Pointcut;
use parking_lot::RwLock;
use std::sync::Arc;

/// 一次调用解析出的通知列表
///
/// 三个阶段各自按 (order, 注册序号) 排好序。持有回调的克隆，
/// 解析之后再注册的通知不会影响进行中的调用
pub struct ResolvedAdvice<T> {
    pub before: Vec<BeforeFn<T>>,
    pub after_returning: Vec<AfterReturningFn<T>>,
    pub after_throwing: Vec<AfterThrowingFn<T>>,
}

impl<T> ResolvedAdvice<T> {
    fn new() -> Self {
        Self {
            before: Vec::new(),
            after_returning: Vec::new(),
            after_throwing: Vec::new(),
        }
    }

    /// 三个阶段的通知总数
    pub fn len(&self) -> usize {
        self.before.len() + self.after_returning.len() + self.after_throwing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct RegistryInner<T> {
    pointcuts: Vec<Pointcut>,
    entries: Vec<AdviceEntry<T>>,
}

/// 通知注册表
///
/// 配置阶段写入，调度阶段只读；读路径走读写锁加回调克隆，
/// 运行期再注册通知也不会让 resolve 观察到半更新的列表。
/// 一个进程里可以有多个互不相干的注册表实例
pub struct AdviceRegistry<T> {
    inner: RwLock<RegistryInner<T>>,
}

impl<T> AdviceRegistry<T> {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner {
                pointcuts: Vec::new(),
                entries: Vec::new(),
            }),
        }
    }

    /// 定义命名切点
    ///
    /// 表达式在这里编译：语法错误立即返回 MalformedPattern，
    /// 不会拖到调度阶段；名称冲突返回 DuplicatePointcut
    pub fn define_pointcut(&self, name: impl Into<String>, pattern: &str) -> Result<(), AopError> {
        let name = name.into();
        let pointcut = Pointcut::new(name.clone(), pattern)?;

        let mut inner = self.inner.write();
        if inner.pointcuts.iter().any(|p| p.name() == name) {
            return Err(AopError::DuplicatePointcut(name));
        }
        tracing::debug!("Defining pointcut '{}': {}", name, pattern);
        inner.pointcuts.push(pointcut);
        Ok(())
    }

    /// 注册通知
    ///
    /// 引用未定义的切点返回 UnknownPointcut
    pub fn register_advice(
        &self,
        pointcut: &str,
        order: i32,
        advice: AdviceFn<T>,
    ) -> Result<(), AopError> {
        let mut inner = self.inner.write();
        if !inner.pointcuts.iter().any(|p| p.name() == pointcut) {
            return Err(AopError::UnknownPointcut(pointcut.to_string()));
        }

        let seq = inner.entries.len();
        tracing::debug!(
            "Registering {} advice #{} on pointcut '{}' (order {})",
            advice.phase(),
            seq,
            pointcut,
            order
        );
        inner.entries.push(AdviceEntry {
            pointcut: pointcut.to_string(),
            order,
            seq,
            advice,
        });
        Ok(())
    }

    /// 注册 before 通知
    pub fn register_before<F>(&self, pointcut: &str, order: i32, advice: F) -> Result<(), AopError>
    where
        F: Fn(&JoinPoint<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register_advice(pointcut, order, AdviceFn::Before(Arc::new(advice)))
    }

    /// 注册 after-returning 通知
    pub fn register_after_returning<F>(
        &self,
        pointcut: &str,
        order: i32,
        advice: F,
    ) -> Result<(), AopError>
    where
        F: Fn(&JoinPoint<T>, &T) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register_advice(pointcut, order, AdviceFn::AfterReturning(Arc::new(advice)))
    }

    /// 注册 after-throwing 通知
    pub fn register_after_throwing<F>(
        &self,
        pointcut: &str,
        order: i32,
        advice: F,
    ) -> Result<(), AopError>
    where
        F: Fn(&JoinPoint<T>, &ErrorInfo) + Send + Sync + 'static,
    {
        self.register_advice(pointcut, order, AdviceFn::AfterThrowing(Arc::new(advice)))
    }

    /// 解析匹配该调用形状的全部通知
    ///
    /// 只读操作，可重复调用，每次都以当前注册状态为准
    pub fn resolve_advice_for(&self, shape: &CallShape<'_>) -> ResolvedAdvice<T> {
        let inner = self.inner.read();
        let matched: Vec<&str> = inner
            .pointcuts
            .iter()
            .filter(|p| p.matches(shape))
            .map(|p| p.name())
            .collect();
        if matched.is_empty() {
            return ResolvedAdvice::new();
        }

        let mut selected: Vec<&AdviceEntry<T>> = inner
            .entries
            .iter()
            .filter(|entry| matched.iter().any(|name| *name == entry.pointcut))
            .collect();
        selected.sort_by_key(|entry| (entry.order, entry.seq));

        let mut resolved = ResolvedAdvice::new();
        for entry in selected {
            match &entry.advice {
                AdviceFn::Before(f) => resolved.before.push(Arc::clone(f)),
                AdviceFn::AfterReturning(f) => resolved.after_returning.push(Arc::clone(f)),
                AdviceFn::AfterThrowing(f) => resolved.after_throwing.push(Arc::clone(f)),
            }
        }
        resolved
    }

    /// 已定义的切点数量
    pub fn pointcut_count(&self) -> usize {
        self.inner.read().pointcuts.len()
    }

    /// 已注册的通知数量
    pub fn advice_count(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// 是否没有任何切点和通知
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.read();
        inner.pointcuts.is_empty() && inner.entries.is_empty()
    }

    /// 清空全部切点与通知
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.pointcuts.clear();
        inner.entries.clear();
    }
}

impl<T> Default for AdviceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

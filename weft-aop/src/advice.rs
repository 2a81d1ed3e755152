//! 通知（Advice）定义
//!
//! 通知是挂在连接点上的回调，按阶段区分；
//! 同一阶段内按 (order, 注册序号) 稳定排序执行

use crate::error_info::ErrorInfo;
use crate::joinpoint::JoinPoint;
use std::fmt;
use std::sync::Arc;

/// 通知阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvicePhase {
    /// 目标操作执行之前
    Before,
    /// 目标操作成功返回之后
    AfterReturning,
    /// 目标操作报错之后
    AfterThrowing,
}

impl fmt::Display for AdvicePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AdvicePhase::Before => "before",
            AdvicePhase::AfterReturning => "after-returning",
            AdvicePhase::AfterThrowing => "after-throwing",
        };
        write!(f, "{label}")
    }
}

/// before 回调
///
/// 返回 Err 会立即中止本次调用：目标操作与 after 通知都不会执行
pub type BeforeFn<T> = Arc<dyn Fn(&JoinPoint<T>) -> anyhow::Result<()> + Send + Sync>;

/// after-returning 回调，额外拿到返回值
///
/// 返回 Err 时该错误代替返回值传播，同阶段后续通知不再执行
pub type AfterReturningFn<T> = Arc<dyn Fn(&JoinPoint<T>, &T) -> anyhow::Result<()> + Send + Sync>;

/// after-throwing 回调，额外拿到错误快照
///
/// 只观察不报错：目标错误永远原样传播给调用方
pub type AfterThrowingFn<T> = Arc<dyn Fn(&JoinPoint<T>, &ErrorInfo) + Send + Sync>;

/// 按阶段区分的通知回调，变体即阶段
#[derive(Clone)]
pub enum AdviceFn<T> {
    Before(BeforeFn<T>),
    AfterReturning(AfterReturningFn<T>),
    AfterThrowing(AfterThrowingFn<T>),
}

impl<T> AdviceFn<T> {
    /// 回调所属的阶段
    pub fn phase(&self) -> AdvicePhase {
        match self {
            AdviceFn::Before(_) => AdvicePhase::Before,
            AdviceFn::AfterReturning(_) => AdvicePhase::AfterReturning,
            AdviceFn::AfterThrowing(_) => AdvicePhase::AfterThrowing,
        }
    }
}

impl<T> fmt::Debug for AdviceFn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdviceFn({})", self.phase())
    }
}

/// 一条已注册的通知
#[derive(Debug)]
pub struct AdviceEntry<T> {
    /// 关联切点的名称（引用关系，注册表持有切点本体）
    pub(crate) pointcut: String,

    /// 显式优先级，小的先执行
    pub(crate) order: i32,

    /// 注册序号，优先级相同时保持注册顺序
    pub(crate) seq: usize,

    /// 回调本体
    pub(crate) advice: AdviceFn<T>,
}

impl<T> AdviceEntry<T> {
    /// 关联的切点名称
    pub fn pointcut(&self) -> &str {
        &self.pointcut
    }

    /// 优先级
    pub fn order(&self) -> i32 {
        self.order
    }

    /// 通知阶段
    pub fn phase(&self) -> AdvicePhase {
        self.advice.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(AdvicePhase::Before.to_string(), "before");
        assert_eq!(AdvicePhase::AfterReturning.to_string(), "after-returning");
        assert_eq!(AdvicePhase::AfterThrowing.to_string(), "after-throwing");
    }

    #[test]
    fn test_advice_fn_knows_its_phase() {
        let before: AdviceFn<i64> = AdviceFn::Before(Arc::new(|_| Ok(())));
        assert_eq!(before.phase(), AdvicePhase::Before);

        let returning: AdviceFn<i64> = AdviceFn::AfterReturning(Arc::new(|_, _| Ok(())));
        assert_eq!(returning.phase(), AdvicePhase::AfterReturning);

        let throwing: AdviceFn<i64> = AdviceFn::AfterThrowing(Arc::new(|_, _| {}));
        assert_eq!(throwing.phase(), AdvicePhase::AfterThrowing);
    }
}

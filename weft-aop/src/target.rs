//! 可拦截目标的能力接口
//!
//! 代理只要求目标暴露按名调用的能力；业务代码本身不感知拦截机制

use crate::joinpoint::Visibility;

/// 可被代理拦截的目标对象
///
/// `Value` 是参数与返回值共享的值域，`Error` 是目标自身的业务错误。
/// 实现者通常是为具体业务类型手写（或生成）的一层薄壳，
/// 把操作名分发到真正的方法上
pub trait Interceptable: Send + Sync {
    /// 参数与返回值类型
    type Value: Clone + Send + Sync + 'static;

    /// 业务错误类型
    type Error: std::error::Error + Send + Sync + 'static;

    /// 声明单元，`.` 分隔（模块路径 + 类型名）
    fn scope(&self) -> &str;

    /// 操作可见性；未声明的操作返回 None
    fn visibility_of(&self, operation: &str) -> Option<Visibility>;

    /// 执行真实操作
    fn invoke(&self, operation: &str, args: &[Self::Value]) -> Result<Self::Value, Self::Error>;
}

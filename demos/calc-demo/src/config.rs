//! 切面配置
//!
//! 切点表达式与通知参数从 aspects.toml 读取，核心库只提供内存 API；
//! 文件不存在时退回默认值

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// aspects.toml 的根结构
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AspectsConfig {
    pub logging: LoggingAspectConfig,
    pub timing: TimingAspectConfig,
}

/// 日志切面配置
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoggingAspectConfig {
    /// 日志切面作用的切点表达式
    pub pointcut: String,

    /// 进入时是否记录参数
    pub log_args: bool,

    /// 通知优先级
    pub order: i32,
}

impl Default for LoggingAspectConfig {
    fn default() -> Self {
        Self {
            pointcut: "public * calc.*.*(..)".to_string(),
            log_args: true,
            order: 0,
        }
    }
}

/// 计时切面配置
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TimingAspectConfig {
    /// 计时切面作用的切点表达式
    pub pointcut: String,

    /// 慢调用阈值（毫秒）
    pub slow_threshold_ms: u64,

    /// 通知优先级
    pub order: i32,
}

impl Default for TimingAspectConfig {
    fn default() -> Self {
        Self {
            pointcut: "public * calc.*.*(..)".to_string(),
            slow_threshold_ms: 100,
            order: 10,
        }
    }
}

impl AspectsConfig {
    /// 读取配置文件；不存在时使用默认值
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No aspect config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }
}

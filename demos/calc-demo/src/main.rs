//! Weft AOP 演示：切面自动记录计算器服务的调用
//!
//! 业务对象（CalculatorService）对拦截一无所知，
//! 切点与通知在启动时由这里装配

mod config;
mod service;

use crate::config::AspectsConfig;
use crate::service::CalculatorService;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use weft_aop::{AdviceRegistry, AopProxy, LoggingAspect, LoggingConfig, TimingAspect};

fn main() -> Result<()> {
    LoggingConfig::from_env().init()?;

    println!("Demo - Aspects\n");

    let config = AspectsConfig::load("aspects.toml")?;

    // 装配：定义切点，安装切面
    let registry = Arc::new(AdviceRegistry::new());
    registry.define_pointcut("service-methods", &config.logging.pointcut)?;
    registry.define_pointcut("timed-methods", &config.timing.pointcut)?;

    let mut logging = LoggingAspect::new().with_result();
    if config.logging.log_args {
        logging = logging.with_args();
    }
    logging.install(&registry, "service-methods", config.logging.order)?;

    TimingAspect::new(Duration::from_millis(config.timing.slow_threshold_ms)).install(
        &registry,
        "timed-methods",
        config.timing.order,
    )?;

    let calc = AopProxy::new(Arc::new(CalculatorService), registry);

    // 切面会自动记录下面的调用
    let sum = calc.invoke("sum", vec![5, 3])?;
    println!("Result: {sum}");

    let mult = calc.invoke("multiply", vec![4, 7])?;
    println!("Result: {mult}");

    let divi = calc.invoke("divide", vec![4, 2])?;
    println!("Result: {divi}");

    if let Err(err) = calc.invoke("divide", vec![2, 0]) {
        println!("Exception: {err}");
    }

    Ok(())
}

//! 计算器服务 - 被拦截的业务对象
//!
//! 业务方法完全不感知拦截机制，Interceptable 实现只是
//! 一层按名分发的薄壳

use thiserror::Error;
use weft_aop::{Interceptable, Visibility};

/// 计算器的业务错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Can't divide by 0")]
    DivideByZero,

    #[error("operation '{operation}' expects {expected} argument(s), got {got}")]
    WrongArity {
        operation: String,
        expected: usize,
        got: usize,
    },

    #[error("unsupported operation '{0}'")]
    Unsupported(String),
}

/// 计算器服务
pub struct CalculatorService;

impl CalculatorService {
    pub fn sum(&self, a: i64, b: i64) -> i64 {
        a + b
    }

    pub fn multiply(&self, a: i64, b: i64) -> i64 {
        a * b
    }

    pub fn divide(&self, a: i64, b: i64) -> Result<i64, CalcError> {
        if b == 0 {
            return Err(CalcError::DivideByZero);
        }
        Ok(a / b)
    }

    fn binary_args(&self, operation: &str, args: &[i64]) -> Result<(i64, i64), CalcError> {
        match args {
            [a, b] => Ok((*a, *b)),
            _ => Err(CalcError::WrongArity {
                operation: operation.to_string(),
                expected: 2,
                got: args.len(),
            }),
        }
    }
}

impl Interceptable for CalculatorService {
    type Value = i64;
    type Error = CalcError;

    fn scope(&self) -> &str {
        "calc.CalculatorService"
    }

    fn visibility_of(&self, operation: &str) -> Option<Visibility> {
        match operation {
            "sum" | "multiply" | "divide" => Some(Visibility::Public),
            _ => None,
        }
    }

    fn invoke(&self, operation: &str, args: &[i64]) -> Result<i64, CalcError> {
        let (a, b) = self.binary_args(operation, args)?;
        match operation {
            "sum" => Ok(self.sum(a, b)),
            "multiply" => Ok(self.multiply(a, b)),
            "divide" => self.divide(a, b),
            other => Err(CalcError::Unsupported(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_by_zero_message() {
        let service = CalculatorService;
        assert_eq!(
            service.divide(2, 0).unwrap_err().to_string(),
            "Can't divide by 0"
        );
    }

    #[test]
    fn test_invoke_dispatches_by_name() {
        let service = CalculatorService;
        assert_eq!(service.invoke("sum", &[5, 3]).unwrap(), 8);
        assert_eq!(service.invoke("multiply", &[4, 7]).unwrap(), 28);
        assert_eq!(service.invoke("divide", &[4, 2]).unwrap(), 2);
    }

    #[test]
    fn test_invoke_checks_arity() {
        let service = CalculatorService;
        assert!(matches!(
            service.invoke("sum", &[1]).unwrap_err(),
            CalcError::WrongArity { got: 1, .. }
        ));
    }
}

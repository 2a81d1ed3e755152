//! 切点（Pointcut）表达式系统
//!
//! 语法沿用 execution 风格：`可见性 [返回类型] 作用域路径.操作名(参数)`，
//! 例如 `public * com.example.service.*.*(..)`
//!
//! - 可见性：`public` / `protected` / `private` / `*`
//! - 返回类型：语法上接受一个简单 token，匹配时忽略
//! - 作用域路径：`.` 分隔；单独的 `*` 匹配恰好一段，`..` 匹配任意多段（可为零），
//!   段内也可以嵌入 `*`（如 `*Service`）；空作用域匹配任何作用域
//! - 操作名：路径的最后一段，字面量或 `*`
//! - 参数：`(..)` 任意个数；`()` 零个；`(*,*)` 逐个列出的严格模式
//!
//! 表达式在 define_pointcut 时编译，语法错误立即失败；
//! 匹配是结构化的、大小写敏感的纯函数，调度阶段不会再报错

use crate::error::AopError;
use crate::joinpoint::{CallShape, Visibility};
use regex::Regex;
use std::fmt;

/// 可见性匹配
#[derive(Debug, Clone, PartialEq, Eq)]
enum VisibilityPattern {
    /// `*`
    Any,
    /// 字面量 token
    Exactly(Visibility),
}

impl VisibilityPattern {
    fn matches(&self, visibility: Visibility) -> bool {
        match self {
            VisibilityPattern::Any => true,
            VisibilityPattern::Exactly(expected) => *expected == visibility,
        }
    }
}

/// 单段匹配
#[derive(Debug, Clone)]
enum SegmentPattern {
    /// 字面量段
    Literal(String),
    /// 单独的 `*`
    Wildcard,
    /// 段内嵌入 `*`，如 `*Service`
    Embedded(Regex),
}

impl SegmentPattern {
    fn compile(text: &str) -> Result<Self, String> {
        if text == "*" {
            return Ok(SegmentPattern::Wildcard);
        }
        if !text.contains('*') {
            return Ok(SegmentPattern::Literal(text.to_string()));
        }

        // 把 `*` 之外的部分转义后拼成锚定正则
        let escaped: Vec<String> = text.split('*').map(|part| regex::escape(part)).collect();
        let anchored = format!("^{}$", escaped.join(".*"));
        Regex::new(&anchored)
            .map(SegmentPattern::Embedded)
            .map_err(|e| format!("invalid segment '{text}': {e}"))
    }

    fn matches(&self, segment: &str) -> bool {
        match self {
            SegmentPattern::Literal(literal) => literal == segment,
            SegmentPattern::Wildcard => true,
            SegmentPattern::Embedded(regex) => regex.is_match(segment),
        }
    }
}

/// 作用域路径元素
#[derive(Debug, Clone)]
enum PathElem {
    /// 匹配恰好一段
    Segment(SegmentPattern),
    /// `..`：匹配任意多段
    Deep,
}

/// 参数个数匹配
#[derive(Debug, Clone, PartialEq, Eq)]
enum ArityPattern {
    /// `(..)`
    Any,
    /// `()` 或 `(*,*)` 这类逐个列出的形式
    Exact(usize),
}

impl ArityPattern {
    fn matches(&self, arity: usize) -> bool {
        match self {
            ArityPattern::Any => true,
            ArityPattern::Exact(expected) => *expected == arity,
        }
    }
}

/// 编译后的切点表达式
///
/// 编译结果是对调用形状的确定性布尔谓词：
/// 可见性、作用域、操作名、参数个数四项逻辑与，没有部分匹配
#[derive(Debug, Clone)]
pub struct PointcutPattern {
    raw: String,
    visibility: VisibilityPattern,
    scope: Vec<PathElem>,
    operation: SegmentPattern,
    arity: ArityPattern,
}

impl PointcutPattern {
    /// 编译切点表达式
    pub fn parse(pattern: &str) -> Result<Self, AopError> {
        let malformed = |reason: String| AopError::MalformedPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut tokens = pattern.split_whitespace();
        let visibility = match tokens.next() {
            Some("public") => VisibilityPattern::Exactly(Visibility::Public),
            Some("protected") => VisibilityPattern::Exactly(Visibility::Protected),
            Some("private") => VisibilityPattern::Exactly(Visibility::Private),
            Some("*") => VisibilityPattern::Any,
            Some(other) => {
                return Err(malformed(format!("unknown visibility token '{other}'")));
            }
            None => return Err(malformed("empty pattern".to_string())),
        };

        let rest: Vec<&str> = tokens.collect();
        if rest.is_empty() {
            return Err(malformed("missing signature".to_string()));
        }

        // 返回类型只做语法接受：一个既不含 `.` 也不含 `(` 的独立 token
        let signature = if rest.len() > 1 && !rest[0].contains('.') && !rest[0].contains('(') {
            rest[1..].concat()
        } else {
            rest.concat()
        };

        let Some(open) = signature.find('(') else {
            return Err(malformed("missing argument list".to_string()));
        };
        if !signature.ends_with(')') {
            return Err(malformed("argument list is not closed".to_string()));
        }
        let close = signature.len() - 1;

        let arity = Self::parse_arity(&signature[open + 1..close]).map_err(&malformed)?;
        let mut elems = Self::parse_path(&signature[..open]).map_err(&malformed)?;

        let operation = match elems.pop() {
            Some(PathElem::Segment(segment)) => segment,
            Some(PathElem::Deep) | None => {
                return Err(malformed("missing operation name".to_string()));
            }
        };

        Ok(Self {
            raw: pattern.to_string(),
            visibility,
            scope: elems,
            operation,
            arity,
        })
    }

    fn parse_arity(text: &str) -> Result<ArityPattern, String> {
        if text == ".." {
            return Ok(ArityPattern::Any);
        }
        if text.is_empty() {
            return Ok(ArityPattern::Exact(0));
        }

        let mut count = 0;
        for item in text.split(',') {
            if item != "*" {
                return Err(format!("argument pattern must be '*', got '{item}'"));
            }
            count += 1;
        }
        Ok(ArityPattern::Exact(count))
    }

    fn parse_path(path: &str) -> Result<Vec<PathElem>, String> {
        let mut elems = Vec::new();
        let mut rest = path;

        // 允许以 `..` 开头：任意作用域前缀
        if let Some(stripped) = rest.strip_prefix("..") {
            elems.push(PathElem::Deep);
            rest = stripped;
        }

        while !rest.is_empty() {
            let end = rest.find('.').unwrap_or(rest.len());
            let segment = &rest[..end];
            if segment.is_empty() {
                return Err("empty path segment".to_string());
            }
            if let Some(bad) = segment
                .chars()
                .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '_' | '$' | '*'))
            {
                return Err(format!("invalid character '{bad}' in segment '{segment}'"));
            }
            elems.push(PathElem::Segment(SegmentPattern::compile(segment)?));

            rest = &rest[end..];
            if let Some(stripped) = rest.strip_prefix("..") {
                if stripped.starts_with('.') {
                    return Err("too many consecutive dots".to_string());
                }
                elems.push(PathElem::Deep);
                rest = stripped;
            } else if let Some(stripped) = rest.strip_prefix('.') {
                if stripped.is_empty() {
                    return Err("trailing '.'".to_string());
                }
                rest = stripped;
            }
        }

        Ok(elems)
    }

    /// 原始表达式文本
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// 对调用形状求值
    ///
    /// 纯函数，无副作用：相同输入永远得到相同结果
    pub fn matches(&self, shape: &CallShape<'_>) -> bool {
        self.visibility.matches(shape.visibility)
            && self.operation.matches(shape.operation)
            && self.arity.matches(shape.arity)
            && self.scope_matches(shape.scope)
    }

    fn scope_matches(&self, scope: &str) -> bool {
        // 空作用域模式匹配任何作用域：`public * *(..)` 即全局切点
        if self.scope.is_empty() {
            return true;
        }
        let segments: Vec<&str> = scope.split('.').collect();
        match_path(&self.scope, &segments)
    }
}

impl fmt::Display for PointcutPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

fn match_path(elems: &[PathElem], segments: &[&str]) -> bool {
    match elems.split_first() {
        None => segments.is_empty(),
        Some((PathElem::Deep, rest)) => {
            (0..=segments.len()).any(|skip| match_path(rest, &segments[skip..]))
        }
        Some((PathElem::Segment(pattern), rest)) => match segments.split_first() {
            Some((head, tail)) => pattern.matches(head) && match_path(rest, tail),
            None => false,
        },
    }
}

/// 命名切点
#[derive(Debug, Clone)]
pub struct Pointcut {
    name: String,
    pattern: PointcutPattern,
}

impl Pointcut {
    /// 定义命名切点，表达式在这里编译
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, AopError> {
        Ok(Self {
            name: name.into(),
            pattern: PointcutPattern::parse(pattern)?,
        })
    }

    /// 切点名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 编译后的表达式
    pub fn pattern(&self) -> &PointcutPattern {
        &self.pattern
    }

    /// 检查调用形状是否落在切点内
    pub fn matches(&self, shape: &CallShape<'_>) -> bool {
        self.pattern.matches(shape)
    }
}

impl fmt::Display for Pointcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.name, self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape<'a>(
        scope: &'a str,
        operation: &'a str,
        visibility: Visibility,
        arity: usize,
    ) -> CallShape<'a> {
        CallShape {
            scope,
            operation,
            visibility,
            arity,
        }
    }

    #[test]
    fn test_execution_style_pattern_from_the_logging_demo() {
        // 对应 execution(public * com.example.service.*.*(..))
        let pattern = PointcutPattern::parse("public * com.example.service.*.*(..)").unwrap();

        assert!(pattern.matches(&shape(
            "com.example.service.CalculatorService",
            "sum",
            Visibility::Public,
            2
        )));
        assert!(pattern.matches(&shape(
            "com.example.service.OrderService",
            "cancel",
            Visibility::Public,
            0
        )));
        // 包不同，不匹配
        assert!(!pattern.matches(&shape(
            "com.example.web.Controller",
            "sum",
            Visibility::Public,
            2
        )));
        // 少一层，`*` 必须恰好吃掉类型名那一段
        assert!(!pattern.matches(&shape("com.example.service", "sum", Visibility::Public, 2)));
    }

    #[test]
    fn test_matching_is_deterministic() {
        let pattern = PointcutPattern::parse("public * com..*.*(..)").unwrap();
        let s = shape("com.a.b.Svc", "run", Visibility::Public, 1);
        let first = pattern.matches(&s);
        let second = pattern.matches(&s);
        assert_eq!(first, second);
        assert!(first);
    }

    #[test]
    fn test_universal_pointcut_matches_every_public_call() {
        let pattern = PointcutPattern::parse("public * *(..)").unwrap();

        assert!(pattern.matches(&shape("Calculator", "sum", Visibility::Public, 2)));
        assert!(pattern.matches(&shape("a.b.c.Deep", "op", Visibility::Public, 0)));
        assert!(pattern.matches(&shape("x", "y", Visibility::Public, 9)));
        // 可见性照常过滤
        assert!(!pattern.matches(&shape("x", "y", Visibility::Private, 0)));
    }

    #[test]
    fn test_visibility_mismatch_rejects() {
        // 形状 {private, com.pkg.Svc, x, 0} 对 public 切点
        let pattern = PointcutPattern::parse("public com.pkg.Svc.*(..)").unwrap();
        assert!(!pattern.matches(&shape("com.pkg.Svc", "x", Visibility::Private, 0)));
        assert!(pattern.matches(&shape("com.pkg.Svc", "x", Visibility::Public, 0)));
    }

    #[test]
    fn test_wildcard_visibility_matches_package_too() {
        let pattern = PointcutPattern::parse("* com.pkg.Svc.*(..)").unwrap();
        assert!(pattern.matches(&shape("com.pkg.Svc", "x", Visibility::Package, 0)));
        assert!(pattern.matches(&shape("com.pkg.Svc", "x", Visibility::Protected, 0)));
    }

    #[test]
    fn test_single_star_matches_exactly_one_segment() {
        let pattern = PointcutPattern::parse("public *.*(..)").unwrap();
        assert!(pattern.matches(&shape("Calculator", "sum", Visibility::Public, 2)));
        assert!(!pattern.matches(&shape("calc.Calculator", "sum", Visibility::Public, 2)));
    }

    #[test]
    fn test_deep_wildcard_matches_any_number_of_segments() {
        let pattern = PointcutPattern::parse("public * com..*(..)").unwrap();
        assert!(pattern.matches(&shape("com", "op", Visibility::Public, 0)));
        assert!(pattern.matches(&shape("com.a", "op", Visibility::Public, 0)));
        assert!(pattern.matches(&shape("com.a.b.c", "op", Visibility::Public, 0)));
        assert!(!pattern.matches(&shape("org.a", "op", Visibility::Public, 0)));

        let pattern = PointcutPattern::parse("public * ..Svc.*(..)").unwrap();
        assert!(pattern.matches(&shape("Svc", "op", Visibility::Public, 0)));
        assert!(pattern.matches(&shape("a.b.Svc", "op", Visibility::Public, 0)));
        assert!(!pattern.matches(&shape("a.b.Other", "op", Visibility::Public, 0)));
    }

    #[test]
    fn test_embedded_star_in_a_segment() {
        let pattern = PointcutPattern::parse("public * *Service.*(..)").unwrap();
        assert!(pattern.matches(&shape("UserService", "find", Visibility::Public, 1)));
        assert!(!pattern.matches(&shape("UserRepository", "find", Visibility::Public, 1)));

        let pattern = PointcutPattern::parse("public * Svc.get*(..)").unwrap();
        assert!(pattern.matches(&shape("Svc", "get_user", Visibility::Public, 1)));
        assert!(!pattern.matches(&shape("Svc", "find_user", Visibility::Public, 1)));
    }

    #[test]
    fn test_arity_patterns() {
        let any = PointcutPattern::parse("public * Svc.op(..)").unwrap();
        assert!(any.matches(&shape("Svc", "op", Visibility::Public, 0)));
        assert!(any.matches(&shape("Svc", "op", Visibility::Public, 5)));

        let zero = PointcutPattern::parse("public * Svc.op()").unwrap();
        assert!(zero.matches(&shape("Svc", "op", Visibility::Public, 0)));
        assert!(!zero.matches(&shape("Svc", "op", Visibility::Public, 1)));

        let two = PointcutPattern::parse("public * Svc.op(*,*)").unwrap();
        assert!(two.matches(&shape("Svc", "op", Visibility::Public, 2)));
        assert!(!two.matches(&shape("Svc", "op", Visibility::Public, 1)));
        assert!(!two.matches(&shape("Svc", "op", Visibility::Public, 3)));

        // 逗号后带空格也接受
        let spaced = PointcutPattern::parse("public * Svc.op(*, *)").unwrap();
        assert!(spaced.matches(&shape("Svc", "op", Visibility::Public, 2)));
    }

    #[test]
    fn test_return_type_token_is_optional_and_ignored() {
        let with = PointcutPattern::parse("public i64 Svc.op(..)").unwrap();
        let without = PointcutPattern::parse("public Svc.op(..)").unwrap();
        let s = shape("Svc", "op", Visibility::Public, 3);
        assert!(with.matches(&s));
        assert!(without.matches(&s));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let pattern = PointcutPattern::parse("public * Svc.op(..)").unwrap();
        assert!(!pattern.matches(&shape("svc", "op", Visibility::Public, 0)));
        assert!(!pattern.matches(&shape("Svc", "Op", Visibility::Public, 0)));
    }

    #[test]
    fn test_malformed_patterns_fail_at_parse_time() {
        let cases = [
            "",
            "banana * Svc.op(..)",
            "public",
            "public *",
            "public * Svc.op",
            "public * Svc.op(",
            "public * .op(..)",
            "public * Svc.(..)",
            "public * Svc...op(..)",
            "public * Svc..(..)",
            "public * Svc.op(x)",
            "public * Svc.op(*,)",
            "public * S#vc.op(..)",
        ];
        for case in cases {
            let result = PointcutPattern::parse(case);
            assert!(
                matches!(result, Err(AopError::MalformedPattern { .. })),
                "expected malformed: {case:?} -> {result:?}"
            );
        }
    }

    #[test]
    fn test_pattern_keeps_raw_text() {
        let raw = "public * com.pkg.Svc.*(..)";
        let pointcut = Pointcut::new("svc", raw).unwrap();
        assert_eq!(pointcut.name(), "svc");
        assert_eq!(pointcut.pattern().raw(), raw);
        assert_eq!(pointcut.to_string(), format!("svc => {raw}"));
    }
}

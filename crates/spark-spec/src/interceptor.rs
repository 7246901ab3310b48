//! 期望拦截器：包装主体值，使其可以用流式语法发起期望检查。
//!
//! # 教案式综述
//! - **意图 (Why)**：示例体写 `self.spec(value).should().to("equal", 3)?` 即可发起检查，
//!   拦截器负责把主体值与示例组的匹配器工厂拼接起来。
//! - **逻辑 (How)**：[`Interceptor`] 仅借用工厂，不持有所有权；[`Expectation`] 决定正向或反向，
//!   匹配不符时通过 [`crate::signal::expectation_failed`] 展开调用栈。
//! - **契约 (What)**：多个主体值以元组形式传入（见 [`crate::spec!`]），由调用方决定形状；
//!   拦截器本身不会产生失败，失败只发生在期望求值时。

use std::fmt;

use crate::error::Result;
use crate::matcher::{Matcher, MatcherFactory};
use crate::signal;

/// 绑定了匹配器工厂的主体值包装。
pub struct Interceptor<'m, T, M> {
    actual: T,
    matchers: &'m M,
}

impl<'m, T, M: MatcherFactory> Interceptor<'m, T, M> {
    pub fn new(actual: T, matchers: &'m M) -> Self {
        Self { actual, matchers }
    }

    pub fn actual(&self) -> &T {
        &self.actual
    }

    /// 拦截器所绑定的匹配器工厂。
    pub fn matcher_factory(&self) -> &'m M {
        self.matchers
    }

    pub fn into_inner(self) -> T {
        self.actual
    }

    /// 发起正向期望。
    pub fn should(self) -> Expectation<'m, T, M> {
        Expectation {
            actual: self.actual,
            matchers: self.matchers,
            negated: false,
        }
    }

    /// 发起反向期望。
    pub fn should_not(self) -> Expectation<'m, T, M> {
        Expectation {
            actual: self.actual,
            matchers: self.matchers,
            negated: true,
        }
    }
}

impl<T: fmt::Debug, M> fmt::Debug for Interceptor<'_, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("actual", &self.actual)
            .finish_non_exhaustive()
    }
}

/// 一次待求值的期望。
pub struct Expectation<'m, T, M> {
    actual: T,
    matchers: &'m M,
    negated: bool,
}

impl<T: 'static, M: MatcherFactory> Expectation<'_, T, M> {
    /// 按名称从工厂获取匹配器并求值。
    ///
    /// # 教案式说明
    /// - **逻辑 (How)**：先向工厂索取 `name` 对应的匹配器；获取失败以 `Err` 返回，
    ///   获取成功则立即求值，不符时展开调用栈。
    /// - **契约 (What)**：返回 `Ok(())` 表示期望成立；匹配失败永远不会以 `Err` 出现。
    pub fn to<E: 'static>(self, name: &str, expected: E) -> Result<()> {
        let matcher = self.matchers.create::<T, E>(name, expected)?;
        tracing::trace!(matcher = name, negated = self.negated, "evaluating expectation");
        self.check(matcher.as_ref());
        Ok(())
    }
}

impl<T, M> Expectation<'_, T, M> {
    /// 直接以给定匹配器求值，绕过工厂。
    pub fn satisfy(self, matcher: impl Matcher<T>) {
        self.check(&matcher);
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    fn check(&self, matcher: &dyn Matcher<T>) {
        let matched = matcher.matches(&self.actual);
        if matched == self.negated {
            let message = if self.negated {
                matcher.negative_failure_message(&self.actual)
            } else {
                matcher.failure_message(&self.actual)
            };
            signal::expectation_failed(message);
        }
    }
}

//! 匹配器协议与默认的按名称构造工厂。
//!
//! # 教案式综述
//! - **意图 (Why)**：内核不实现任何具体匹配器，只约定“如何获得并使用匹配器”：
//!   拦截器按名称向工厂索取匹配器，再以主体值调用它。
//! - **逻辑 (How)**：[`Matcher`] 描述一次比较策略；[`MatcherFactory`] 要求可默认构造，
//!   供示例组在首次使用时惰性创建；[`MatcherRegistry`] 以“名称 + 主体/期望类型”为键保存构造函数。
//! - **契约 (What)**：未知名称或类型不匹配时返回 [`SpecError::UnknownMatcher`]，不 panic。

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, SpecError};

/// 一种比较/断言策略。
pub trait Matcher<T> {
    /// 主体值是否满足期望。
    fn matches(&self, actual: &T) -> bool;

    /// 正向期望失败时的说明。
    fn failure_message(&self, actual: &T) -> String;

    /// 反向期望（`should_not`）失败时的说明。
    fn negative_failure_message(&self, actual: &T) -> String;
}

/// 可按名称产出匹配器的工厂。
///
/// # 教案式说明
/// - **意图 (Why)**：示例组只依赖“默认构造一个工厂并交给拦截器”这一能力，
///   具体匹配器库可自由替换。
/// - **契约 (What)**：
///   - `Default` 用于示例组的惰性单例构造；
///   - `create` 对未知名称返回 [`SpecError::UnknownMatcher`]。
pub trait MatcherFactory: Default + 'static {
    fn create<T: 'static, E: 'static>(&self, name: &str, expected: E) -> Result<Box<dyn Matcher<T>>>;
}

/// 由期望值构造匹配器的函数。
pub type MatcherBuilder<T, E> = fn(E) -> Box<dyn Matcher<T>>;

type RegistryKey = (String, TypeId);

/// 默认匹配器工厂：保存按名称注册的构造函数。
///
/// # 教案式说明
/// - **逻辑 (How)**：键为 `(名称, TypeId::<(T, E)>)`，值为类型擦除后的 [`MatcherBuilder`]；
///   取出时以同一对类型向下转型，因此同名匹配器可以针对不同主体类型各自注册。
/// - **契约 (What)**：重复注册同一键时后者覆盖前者。
#[derive(Default)]
pub struct MatcherRegistry {
    builders: HashMap<RegistryKey, Box<dyn Any + Send + Sync>>,
    names: Vec<(String, &'static str)>,
}

impl MatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册名为 `name`、主体类型为 `T`、期望类型为 `E` 的匹配器构造函数。
    pub fn register<T: 'static, E: 'static>(
        &mut self,
        name: impl Into<String>,
        builder: MatcherBuilder<T, E>,
    ) -> &mut Self {
        let name = name.into();
        let key = (name.clone(), TypeId::of::<(T, E)>());
        if self.builders.insert(key, Box::new(builder)).is_none() {
            self.names.push((name, type_name::<T>()));
        }
        self
    }

    /// 以构建者风格注册，便于在 `Default` 实现中链式书写。
    pub fn with<T: 'static, E: 'static>(
        mut self,
        name: impl Into<String>,
        builder: MatcherBuilder<T, E>,
    ) -> Self {
        self.register(name, builder);
        self
    }

    pub fn contains<T: 'static, E: 'static>(&self, name: &str) -> bool {
        self.builders
            .contains_key(&(name.to_owned(), TypeId::of::<(T, E)>()))
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl MatcherFactory for MatcherRegistry {
    fn create<T: 'static, E: 'static>(&self, name: &str, expected: E) -> Result<Box<dyn Matcher<T>>> {
        let key = (name.to_owned(), TypeId::of::<(T, E)>());
        let build = self
            .builders
            .get(&key)
            .and_then(|builder| builder.downcast_ref::<MatcherBuilder<T, E>>())
            .ok_or_else(|| SpecError::UnknownMatcher {
                name: name.to_owned(),
            })?;
        Ok(build(expected))
    }
}

impl fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherRegistry")
            .field("matchers", &self.names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Equal<T>(T);

    impl<T: PartialEq + fmt::Debug> Matcher<T> for Equal<T> {
        fn matches(&self, actual: &T) -> bool {
            actual == &self.0
        }

        fn failure_message(&self, actual: &T) -> String {
            format!("expected {:?}, got {actual:?}", self.0)
        }

        fn negative_failure_message(&self, actual: &T) -> String {
            format!("expected {actual:?} not to equal {:?}", self.0)
        }
    }

    fn equal_i32(expected: i32) -> Box<dyn Matcher<i32>> {
        Box::new(Equal(expected))
    }

    #[test]
    fn registered_matcher_is_created_by_name() {
        let registry = MatcherRegistry::new().with("equal", equal_i32 as MatcherBuilder<i32, i32>);
        assert!(registry.contains::<i32, i32>("equal"));

        let matcher = registry
            .create::<i32, i32>("equal", 3)
            .expect("已注册的匹配器应可构造");
        assert!(matcher.matches(&3));
        assert!(!matcher.matches(&4));
        assert_eq!(matcher.failure_message(&4), "expected 3, got 4");
    }

    #[test]
    fn unknown_name_or_type_is_an_error() {
        let registry = MatcherRegistry::new().with("equal", equal_i32 as MatcherBuilder<i32, i32>);

        let err = registry.create::<i32, i32>("be_empty", 0).err();
        assert_eq!(
            err,
            Some(SpecError::UnknownMatcher {
                name: "be_empty".to_owned()
            })
        );

        // 同名但主体类型不同，同样视为未知。
        assert!(registry.create::<u64, u64>("equal", 3).is_err());
    }

    #[test]
    fn re_registration_overwrites() {
        fn never(_: i32) -> Box<dyn Matcher<i32>> {
            struct Never;
            impl Matcher<i32> for Never {
                fn matches(&self, _: &i32) -> bool {
                    false
                }
                fn failure_message(&self, _: &i32) -> String {
                    "never".to_owned()
                }
                fn negative_failure_message(&self, _: &i32) -> String {
                    "never".to_owned()
                }
            }
            Box::new(Never)
        }

        let mut registry = MatcherRegistry::new();
        registry
            .register("equal", equal_i32 as MatcherBuilder<i32, i32>)
            .register("equal", never as MatcherBuilder<i32, i32>);
        assert_eq!(registry.len(), 1);

        let matcher = registry.create::<i32, i32>("equal", 1).expect("覆盖后仍可构造");
        assert!(!matcher.matches(&1), "后注册的构造函数应生效");
    }
}

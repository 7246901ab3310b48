//! 示例组：聚合钩子、期望入口、结果信号、替身委托与共享示例组合。
//!
//! # 教案式综述
//! - **意图 (Why)**：一个示例组对应一份规格，运行器在其上依次调用 `before_all`、逐示例的
//!   `before`/示例体/`after`，最后调用 `after_all`。示例体通过期望与结果信号报告状态。
//! - **逻辑 (How)**：
//!   1. [`GroupState`] 承载示例组独占的可变状态：`behaves_like` 引用、共享示例注册表、
//!      惰性构造的匹配器工厂、替身委托点与提供者目录；
//!   2. [`ExampleGroup`] 以提供方法的形式把这些能力暴露给示例体，实现者只需给出示例表与状态访问器；
//!   3. 钩子默认均为空实现，按需覆写。
//! - **契约 (What)**：
//!   - 钩子之间不强制调用顺序，顺序由运行器保证；钩子内的 panic 与信号原样向调用方传播；
//!   - 匹配器工厂在同一实例内只构造一次，不同实例互不共享；
//!   - `behaves_like` 的校验在每次调用时重新执行，不缓存结果。

use std::any::type_name;
use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use crate::case::Example;
use crate::double::{DoubleSupport, TestDouble};
use crate::error::{Result, SpecError};
use crate::interceptor::Interceptor;
use crate::matcher::{MatcherFactory, MatcherRegistry};
use crate::shared::{
    Hookable, SharedExample, SharedExampleCatalog, SharedExampleRegistry, SharedOwner, SharedRef,
};
use crate::signal;

/// 示例组所“行为类似”的共享示例引用。
///
/// 保留调用方给出的原始形状：单个标识或标识集合，内核不做归一化。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BehavesLike {
    One(String),
    Many(Vec<String>),
}

impl BehavesLike {
    /// 按声明顺序迭代全部引用。
    pub fn references(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            BehavesLike::One(reference) => std::slice::from_ref(reference),
            BehavesLike::Many(references) => references,
        };
        slice.iter().map(String::as_str)
    }

    /// 是否不含任何非空引用；空引用视同未设置。
    pub fn is_empty(&self) -> bool {
        self.references().all(str::is_empty)
    }
}

impl From<&str> for BehavesLike {
    fn from(reference: &str) -> Self {
        BehavesLike::One(reference.to_owned())
    }
}

impl From<String> for BehavesLike {
    fn from(reference: String) -> Self {
        BehavesLike::One(reference)
    }
}

impl From<Vec<String>> for BehavesLike {
    fn from(references: Vec<String>) -> Self {
        BehavesLike::Many(references)
    }
}

impl<const N: usize> From<[&str; N]> for BehavesLike {
    fn from(references: [&str; N]) -> Self {
        BehavesLike::Many(references.iter().map(|r| (*r).to_owned()).collect())
    }
}

/// 示例组独占的状态。
///
/// # 教案式说明
/// - **意图 (Why)**：Rust 没有可继承的基类字段，因此把基类状态收拢为一个结构体，由示例组内嵌持有，
///   再通过 [`ExampleGroup::state`] 暴露给默认方法。
/// - **逻辑 (How)**：匹配器工厂存放在 [`OnceCell`] 中，首次访问时以 `M::default()` 填充；
///   提供者目录以 `Arc` 共享，便于多个示例组复用同一份登记信息。
/// - **契约 (What)**：状态只属于一个示例组实例，不跨实例、不跨线程共享。
pub struct GroupState<M = MatcherRegistry> {
    behaves_like: Option<BehavesLike>,
    shared_examples: SharedExampleRegistry,
    matcher_factory: OnceCell<M>,
    doubles: DoubleSupport,
    catalog: Arc<SharedExampleCatalog>,
}

impl<M> Default for GroupState<M> {
    fn default() -> Self {
        Self {
            behaves_like: None,
            shared_examples: SharedExampleRegistry::new(),
            matcher_factory: OnceCell::new(),
            doubles: DoubleSupport::none(),
            catalog: Arc::new(SharedExampleCatalog::new()),
        }
    }
}

impl<M: MatcherFactory> GroupState<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 声明示例组行为类似的共享示例。
    pub fn behaves_like(mut self, reference: impl Into<BehavesLike>) -> Self {
        self.behaves_like = Some(reference.into());
        self
    }

    /// 指定解析 `behaves_like` 引用所用的提供者目录。
    pub fn with_catalog(mut self, catalog: Arc<SharedExampleCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// 注入替身委托点。
    pub fn with_doubles(mut self, doubles: DoubleSupport) -> Self {
        self.doubles = doubles;
        self
    }

    pub fn set_behaves_like(&mut self, reference: Option<BehavesLike>) {
        self.behaves_like = reference;
    }

    /// 返回匹配器工厂，必要时惰性构造。
    pub fn matcher_factory(&self) -> &M {
        self.matcher_factory.get_or_init(M::default)
    }

    /// 以给定实例替换匹配器工厂。
    pub fn set_matcher_factory(&mut self, factory: M) {
        self.matcher_factory = OnceCell::from(factory);
    }

    /// 检查示例组是否行为类似其他共享示例。
    ///
    /// # 教案式说明
    /// - **逻辑 (How)**：未设置或仅含空引用时返回 `Ok(false)`；否则逐个引用查询提供者目录，
    ///   第一个未登记的引用即以配置错误返回。
    /// - **契约 (What)**：每次调用都重新校验；错误中携带出错的引用原文。
    pub fn behaves_like_another_object(&self) -> Result<bool> {
        let Some(behaves_like) = self.behaves_like.as_ref().filter(|b| !b.is_empty()) else {
            return Ok(false);
        };
        for reference in behaves_like.references().filter(|r| !r.is_empty()) {
            if !self.catalog.is_shared_example(reference) {
                return Err(SpecError::not_a_shared_example(reference));
            }
        }
        Ok(true)
    }

    pub fn get_behaves_like(&self) -> Option<&BehavesLike> {
        self.behaves_like.as_ref()
    }

    /// 组合阶段：校验引用并挂载每个提供者的全部示例。
    ///
    /// 多个提供者按声明顺序挂载，同名示例以后挂载者为准。
    pub fn compose(&mut self) -> Result<()> {
        if !self.behaves_like_another_object()? {
            return Ok(());
        }
        let references: Vec<String> = self
            .behaves_like
            .iter()
            .flat_map(BehavesLike::references)
            .filter(|r| !r.is_empty())
            .map(str::to_owned)
            .collect();
        for reference in &references {
            self.catalog.attach(reference, &mut self.shared_examples)?;
            tracing::debug!(provider = %reference, "shared examples attached");
        }
        Ok(())
    }

    pub fn shared_examples(&self) -> &SharedExampleRegistry {
        &self.shared_examples
    }

    pub fn shared_examples_mut(&mut self) -> &mut SharedExampleRegistry {
        &mut self.shared_examples
    }

    pub fn doubles(&self) -> &DoubleSupport {
        &self.doubles
    }
}

impl<M> fmt::Debug for GroupState<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupState")
            .field("behaves_like", &self.behaves_like)
            .field("shared_examples", &self.shared_examples)
            .field("matcher_factory_ready", &self.matcher_factory.get().is_some())
            .field("doubles", &self.doubles)
            .finish()
    }
}

/// 一份行为规格。
///
/// # 教案式说明
/// - **意图 (Why)**：实现者只需声明示例表并暴露内嵌的 [`GroupState`]，其余能力
///   （期望、Pending/失败信号、替身、共享示例）均由默认方法提供。
/// - **逻辑 (How)**：逐示例钩子来自 [`Hookable`]；整组钩子 `before_all`/`after_all` 在此声明，
///   默认均为空实现。
/// - **契约 (What)**：
///   - `examples` 中的名称在组内唯一，运行器按声明顺序执行；
///   - `pending`/`fail` 从不返回；
///   - 所有查找类错误以 `Err` 返回，由调用方以 `?` 传播。
///
/// # 示例
/// ```
/// use spark_spec::prelude::*;
///
/// #[derive(Default)]
/// struct StackSpec {
///     items: Vec<i32>,
///     state: GroupState,
/// }
///
/// impl Hookable for StackSpec {
///     fn before(&mut self) {
///         self.items = vec![1, 2];
///     }
/// }
///
/// impl ExampleGroup for StackSpec {
///     type Matchers = MatcherRegistry;
///
///     fn examples() -> &'static [Example<Self>] {
///         const EXAMPLES: &[Example<StackSpec>] = &[
///             Example::new("pops_the_last_item", |spec: &mut StackSpec| {
///                 assert_eq!(spec.items.pop(), Some(2));
///             }),
///             Example::new("peeks_later", |spec: &mut StackSpec| spec.pending("no peek yet")),
///         ];
///         EXAMPLES
///     }
///
///     fn state(&self) -> &GroupState {
///         &self.state
///     }
///
///     fn state_mut(&mut self) -> &mut GroupState {
///         &mut self.state
///     }
/// }
///
/// let report = ExampleRunner::new().run::<StackSpec>();
/// assert_eq!((report.passed, report.pending, report.failed), (1, 1, 0));
/// ```
pub trait ExampleGroup: Hookable + Sized + 'static {
    /// 示例组使用的匹配器工厂。
    type Matchers: MatcherFactory;

    /// 示例组名称，默认取类型名（去掉泛型参数后）的最后一段。
    fn name() -> &'static str {
        let full = type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }

    fn examples() -> &'static [Example<Self>];

    fn state(&self) -> &GroupState<Self::Matchers>;

    fn state_mut(&mut self) -> &mut GroupState<Self::Matchers>;

    /// 全部示例执行前调用一次。
    fn before_all(&mut self) {}

    /// 全部示例执行后调用一次。
    fn after_all(&mut self) {}

    /// 以主体值构造期望拦截器，并绑定本组的匹配器工厂。
    ///
    /// 多个主体值请以元组传入，或使用 [`crate::spec!`]。
    fn spec<T>(&self, actual: T) -> Interceptor<'_, T, Self::Matchers> {
        Interceptor::new(actual, self.matcher_factory())
    }

    fn matcher_factory(&self) -> &Self::Matchers {
        self.state().matcher_factory()
    }

    fn set_matcher_factory(&mut self, factory: Self::Matchers) {
        self.state_mut().set_matcher_factory(factory);
    }

    /// 将当前示例标记为 Pending。默认原因见 [`signal::DEFAULT_PENDING_REASON`]。
    fn pending(&self, message: &str) -> ! {
        signal::pending(message)
    }

    /// 将当前示例标记为主动失败。
    fn fail(&self, message: &str) -> ! {
        signal::fail(message)
    }

    fn double(&self, target: &str) -> Result<Box<dyn TestDouble>> {
        self.state().doubles().double(target)
    }

    fn mock(&self, target: &str) -> Result<Box<dyn TestDouble>> {
        self.state().doubles().mock(target)
    }

    fn stub(&self, target: &str) -> Result<Box<dyn TestDouble>> {
        self.state().doubles().stub(target)
    }

    fn behaves_like_another_object(&self) -> Result<bool> {
        self.state().behaves_like_another_object()
    }

    fn get_behaves_like(&self) -> Option<&BehavesLike> {
        self.state().get_behaves_like()
    }

    fn add_shared_example<S: SharedExample>(
        &mut self,
        shared: &SharedRef<S>,
        method: &str,
    ) -> Result<()> {
        self.state_mut().shared_examples_mut().add(shared, method)
    }

    fn has_shared_example(&self, name: &str) -> bool {
        self.state().shared_examples().contains(name)
    }

    fn get_shared_example(&self, name: &str) -> Result<SharedOwner> {
        self.state().shared_examples().owner(name)
    }

    fn run_shared_example(&self, name: &str) -> Result<()> {
        self.state().shared_examples().run(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::double::DoubleProvider;
    use crate::shared::{is_same_instance, shared};
    use crate::signal::{DEFAULT_PENDING_REASON, Signal};
    use std::any::Any;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[derive(Default)]
    struct Greeting {
        said: Vec<&'static str>,
    }

    impl Hookable for Greeting {
        fn before(&mut self) {
            self.said.push("before");
        }

        fn after(&mut self) {
            self.said.push("after");
        }
    }

    impl SharedExample for Greeting {
        fn examples() -> &'static [Example<Self>] {
            const EXAMPLES: &[Example<Greeting>] =
                &[Example::new("says_hello", |g: &mut Greeting| g.said.push("hello"))];
            EXAMPLES
        }
    }

    #[derive(Default)]
    struct PlainSpec {
        state: GroupState,
    }

    impl Hookable for PlainSpec {}

    impl ExampleGroup for PlainSpec {
        type Matchers = MatcherRegistry;

        fn examples() -> &'static [Example<Self>] {
            &[]
        }

        fn state(&self) -> &GroupState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut GroupState {
            &mut self.state
        }
    }

    fn with_state(state: GroupState) -> PlainSpec {
        PlainSpec { state }
    }

    #[test]
    fn name_defaults_to_type_name_tail() {
        assert_eq!(PlainSpec::name(), "PlainSpec");
    }

    struct GenericSpec<T> {
        state: GroupState,
        _subject: std::marker::PhantomData<T>,
    }

    impl<T> Hookable for GenericSpec<T> {}

    impl<T: 'static> ExampleGroup for GenericSpec<T> {
        type Matchers = MatcherRegistry;

        fn examples() -> &'static [Example<Self>] {
            &[]
        }

        fn state(&self) -> &GroupState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut GroupState {
            &mut self.state
        }
    }

    #[test]
    fn name_drops_generic_arguments() {
        assert_eq!(GenericSpec::<String>::name(), "GenericSpec");
        assert_eq!(GenericSpec::<Vec<std::collections::HashMap<u8, String>>>::name(), "GenericSpec");
    }

    #[test]
    fn matcher_factory_is_a_per_instance_lazy_singleton() {
        let first = PlainSpec::default();
        let second = PlainSpec::default();
        assert!(std::ptr::eq(first.matcher_factory(), first.matcher_factory()));
        assert!(!std::ptr::eq(first.matcher_factory(), second.matcher_factory()));

        let a = first.spec(1);
        let b = first.spec("two");
        assert!(std::ptr::eq(a.matcher_factory(), b.matcher_factory()), "spec 不应重复构造工厂");
    }

    #[derive(Default)]
    struct Tagged(u32);

    impl MatcherFactory for Tagged {
        fn create<T: 'static, E: 'static>(
            &self,
            name: &str,
            _expected: E,
        ) -> Result<Box<dyn crate::matcher::Matcher<T>>> {
            Err(SpecError::UnknownMatcher {
                name: name.to_owned(),
            })
        }
    }

    #[test]
    fn set_matcher_factory_replaces_the_slot() {
        let mut state: GroupState<Tagged> = GroupState::new();
        assert_eq!(state.matcher_factory().0, 0, "首次访问应默认构造");
        state.set_matcher_factory(Tagged(7));
        assert_eq!(state.matcher_factory().0, 7);
        assert!(std::ptr::eq(state.matcher_factory(), state.matcher_factory()));
    }

    #[test]
    fn pending_defaults_and_fail_format() {
        let spec = PlainSpec::default();
        let payload = catch_unwind(AssertUnwindSafe(|| {
            spec.pending(DEFAULT_PENDING_REASON);
        }))
        .expect_err("pending 必须展开");
        assert_eq!(Signal::from_panic(payload).message(), "No reason given");

        let payload = catch_unwind(AssertUnwindSafe(|| {
            spec.fail("bad");
        }))
        .expect_err("fail 必须展开");
        assert_eq!(Signal::from_panic(payload).message(), "RuntimeError:\n       bad");
    }

    #[test]
    fn behaves_like_unset_is_false() {
        let spec = PlainSpec::default();
        assert_eq!(spec.behaves_like_another_object(), Ok(false));
        assert!(spec.get_behaves_like().is_none());

        let spec = with_state(GroupState::new().behaves_like(""));
        assert_eq!(spec.behaves_like_another_object(), Ok(false), "空引用视同未设置");
    }

    #[test]
    fn behaves_like_valid_and_invalid_references() {
        let catalog = Arc::new(SharedExampleCatalog::new().with::<Greeting>("Greeting"));

        let valid = with_state(
            GroupState::new()
                .with_catalog(catalog.clone())
                .behaves_like("Greeting"),
        );
        assert_eq!(valid.behaves_like_another_object(), Ok(true));
        assert_eq!(valid.get_behaves_like(), Some(&BehavesLike::from("Greeting")));

        let invalid = with_state(GroupState::new().with_catalog(catalog).behaves_like("Stranger"));
        assert_eq!(
            invalid.behaves_like_another_object(),
            Err(SpecError::not_a_shared_example("Stranger"))
        );
        // 不缓存：再次调用仍然报错。
        assert!(invalid.behaves_like_another_object().is_err());
    }

    #[test]
    fn behaves_like_many_validates_each_reference() {
        let catalog = Arc::new(SharedExampleCatalog::new().with::<Greeting>("Greeting"));
        let spec = with_state(
            GroupState::new()
                .with_catalog(catalog)
                .behaves_like(["Greeting", "Ghost"]),
        );
        assert_eq!(
            spec.behaves_like_another_object(),
            Err(SpecError::not_a_shared_example("Ghost"))
        );
        assert!(matches!(spec.get_behaves_like(), Some(BehavesLike::Many(refs)) if refs.len() == 2));
    }

    #[test]
    fn compose_attaches_provider_examples() {
        let catalog = Arc::new(SharedExampleCatalog::new().with::<Greeting>("Greeting"));
        let mut state: GroupState = GroupState::new().with_catalog(catalog).behaves_like("Greeting");
        state.compose().expect("合法引用应可组合");
        assert!(state.shared_examples().contains("says_hello"));
    }

    #[test]
    fn shared_example_round_trip_through_the_group() {
        let mut spec = PlainSpec::default();
        let greeting = shared(Greeting::default());
        spec.add_shared_example(&greeting, "says_hello").expect("示例存在");

        assert!(spec.has_shared_example("says_hello"));
        assert!(!spec.has_shared_example("says_bye"));
        assert!(is_same_instance(
            &spec.get_shared_example("says_hello").expect("条目存在"),
            &greeting
        ));

        spec.run_shared_example("says_hello").expect("可执行");
        assert_eq!(greeting.lock().said, ["before", "hello", "after"]);

        assert_eq!(
            spec.get_shared_example("says_bye").err(),
            Some(SpecError::shared_example_not_found("says_bye"))
        );
    }

    #[derive(Debug)]
    struct Fake(String);

    impl TestDouble for Fake {
        fn target(&self) -> &str {
            &self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct FakeProvider;

    impl DoubleProvider for FakeProvider {
        fn mock(&self, target: &str) -> Box<dyn TestDouble> {
            Box::new(Fake(target.to_owned()))
        }
    }

    #[test]
    fn doubles_delegate_to_injected_provider() {
        let spec = PlainSpec::default();
        assert_eq!(spec.double("Clock").err(), Some(SpecError::MissingDependency));

        let spec = with_state(
            GroupState::new().with_doubles(DoubleSupport::with_provider(Arc::new(FakeProvider))),
        );
        assert_eq!(spec.double("Clock").expect("协作者可用").target(), "Clock");
        assert_eq!(spec.stub("Clock").expect("stub 为别名").target(), "Clock");
        assert_eq!(spec.mock("Clock").expect("mock 为别名").target(), "Clock");
    }
}

//! 共享示例：可在多个示例组之间复用的示例块。
//!
//! # 教案式综述
//! - **意图 (Why)**：一个示例组声明“行为类似”某个共享示例提供者后，应能按名称调用提供者上的示例，
//!   并由**提供者自身**的 `before`/`after` 钩子包围调用。
//! - **逻辑 (How)**：
//!   1. [`Hookable`] 以默认空实现替代“运行期探测方法是否存在”，未覆写的钩子即为跳过；
//!   2. [`SharedExample`] 是提供者的标记 trait，附带静态示例表；
//!   3. [`SharedExampleRegistry`] 为每个名称保存延迟调用闭包与提供者实例的回指；
//!   4. [`SharedExampleCatalog`] 以标识符登记提供者类型，供组合阶段校验引用并批量挂载。
//! - **契约 (What)**：注册表按名称唯一，重复注册时后者覆盖前者；实例以 [`SharedRef`] 共享，
//!   仅在单个示例组内使用。

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::case::{self, Example};
use crate::error::{Result, SpecError};

/// 可选的逐示例钩子。
pub trait Hookable {
    /// 每个示例之前调用。
    fn before(&mut self) {}

    /// 每个示例之后调用。
    fn after(&mut self) {}
}

/// 共享示例提供者。
///
/// # 教案式说明
/// - **意图 (Why)**：以静态类型标记“可作为共享示例来源”，编译期即可排除不合格的类型。
/// - **契约 (What)**：`examples` 返回的名称在表内唯一；钩子通过 [`Hookable`] 选择性覆写。
pub trait SharedExample: Hookable + Send + 'static {
    fn examples() -> &'static [Example<Self>];
}

/// 共享示例实例的句柄。
pub type SharedRef<S> = Arc<Mutex<S>>;

/// 类型擦除后的提供者实例，作为注册表条目的回指。
pub type SharedOwner = Arc<Mutex<dyn SharedInstance>>;

/// 将提供者实例包装为可注册的句柄。
pub fn shared<S: SharedExample>(instance: S) -> SharedRef<S> {
    Arc::new(Mutex::new(instance))
}

/// 擦除后仍可访问的提供者能力。
pub trait SharedInstance: Hookable + Send {
    /// 提供者类型名，用于日志。
    fn provider_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

impl<S: SharedExample> SharedInstance for S {
    fn provider_name(&self) -> &'static str {
        type_name::<S>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// 判断回指是否指向给定句柄所持有的实例。
pub fn is_same_instance<S: SharedExample>(owner: &SharedOwner, instance: &SharedRef<S>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(owner), Arc::as_ptr(instance))
}

struct SharedEntry {
    invoke: Box<dyn Fn() + Send>,
    owner: SharedOwner,
}

/// 示例组内的共享示例注册表。
#[derive(Default)]
pub struct SharedExampleRegistry {
    entries: HashMap<String, SharedEntry>,
    order: Vec<String>,
}

impl SharedExampleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 `method` 为键登记 `instance` 上的同名示例。
    ///
    /// # 教案式说明
    /// - **逻辑 (How)**：在提供者示例表中解析 `method`，构造捕获实例句柄与函数指针的延迟调用；
    ///   同名条目被整体替换，但保留其首次登记的顺序位置。
    /// - **契约 (What)**：提供者没有该名称时返回 [`SpecError::UnknownSharedMethod`]，注册表保持不变。
    pub fn add<S: SharedExample>(&mut self, instance: &SharedRef<S>, method: &str) -> Result<()> {
        let example = case::find(S::examples(), method).ok_or_else(|| {
            SpecError::UnknownSharedMethod {
                provider: type_name::<S>().to_owned(),
                method: method.to_owned(),
            }
        })?;

        let body = example.body;
        let target = Arc::clone(instance);
        let owner: SharedOwner = Arc::clone(instance) as SharedOwner;
        let entry = SharedEntry {
            invoke: Box::new(move || body(&mut *target.lock())),
            owner,
        };

        if self.entries.insert(method.to_owned(), entry).is_none() {
            self.order.push(method.to_owned());
        }
        tracing::trace!(example = method, provider = type_name::<S>(), "shared example registered");
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// 返回 `name` 对应条目的提供者实例。
    pub fn owner(&self, name: &str) -> Result<SharedOwner> {
        self.entries
            .get(name)
            .map(|entry| Arc::clone(&entry.owner))
            .ok_or_else(|| SpecError::shared_example_not_found(name))
    }

    /// 以提供者钩子包围执行共享示例。
    ///
    /// 执行顺序固定为：提供者 `before` → 共享示例体 → 提供者 `after`。
    /// 示例体展开调用栈时 `after` 不会执行，与示例组自身的钩子语义一致。
    pub fn run(&self, name: &str) -> Result<()> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| SpecError::shared_example_not_found(name))?;

        entry.owner.lock().before();
        (entry.invoke)();
        entry.owner.lock().after();
        Ok(())
    }

    /// 按首次登记顺序列出全部名称。
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for SharedExampleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedExampleRegistry")
            .field("examples", &self.order)
            .finish()
    }
}

type Attach = Box<dyn Fn(&mut SharedExampleRegistry) -> Result<()> + Send + Sync>;

/// 共享示例提供者目录。
///
/// # 教案式说明
/// - **意图 (Why)**：`behaves_like` 以标识符引用提供者，需要一个位置把标识符映射回静态类型，
///   并判断标识符是否真的指向 [`SharedExample`] 实现。
/// - **逻辑 (How)**：`register::<S>` 记录一个挂载闭包：创建一份 `S::default()` 实例，
///   把其示例表中的每个示例登记到目标注册表，同一提供者的示例共享该实例。
/// - **契约 (What)**：只有经 `register` 登记的标识符才被视为合法引用；重复登记时后者覆盖前者。
#[derive(Default)]
pub struct SharedExampleCatalog {
    providers: HashMap<String, Attach>,
}

impl SharedExampleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: SharedExample + Default>(&mut self, id: impl Into<String>) -> &mut Self {
        let attach: Attach = Box::new(|registry: &mut SharedExampleRegistry| {
            let instance = shared(S::default());
            for example in S::examples() {
                registry.add(&instance, example.name)?;
            }
            Ok(())
        });
        self.providers.insert(id.into(), attach);
        self
    }

    pub fn with<S: SharedExample + Default>(mut self, id: impl Into<String>) -> Self {
        self.register::<S>(id);
        self
    }

    /// 标识符是否指向已登记的共享示例提供者。
    pub fn is_shared_example(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// 将 `id` 对应提供者的全部示例挂载到 `registry`。
    pub fn attach(&self, id: &str, registry: &mut SharedExampleRegistry) -> Result<()> {
        let attach = self
            .providers
            .get(id)
            .ok_or_else(|| SpecError::not_a_shared_example(id))?;
        attach(registry)
    }
}

impl fmt::Debug for SharedExampleCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("SharedExampleCatalog")
            .field("providers", &ids)
            .finish()
    }
}

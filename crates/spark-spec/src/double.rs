//! 测试替身委托点。
//!
//! # 教案式综述
//! - **意图 (Why)**：替身（mock/stub）的创建完全由外部模拟协作者负责，内核只保留一个可选注入的委托点，
//!   让示例组在协作者缺失时得到明确的“缺失依赖”错误，而不是运行期崩溃。
//! - **逻辑 (How)**：[`DoubleProvider`] 暴露可用性探测与 `mock` 创建；[`DoubleSupport`] 持有可选提供者，
//!   `double`/`mock`/`stub` 三种调用形状完全一致。
//! - **契约 (What)**：提供者缺失或报告不可用时返回 [`SpecError::MissingDependency`]；
//!   替身对象的生命周期归协作者所有。

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SpecError};

/// 未指定目标类型时替身所绑定的名称。
pub const DEFAULT_DOUBLE_TARGET: &str = "stdClass";

/// 由模拟协作者创建的替身对象。
pub trait TestDouble: fmt::Debug + Send {
    /// 替身所代表的类型名称。
    fn target(&self) -> &str;

    /// 供测试向下转型到协作者的具体替身类型，以便使用其自省能力。
    fn as_any(&self) -> &dyn Any;
}

/// 外部模拟协作者。
///
/// # 教案式说明
/// - **意图 (Why)**：以 trait 表达“是否已装载”与“按名称创建替身”两项能力，替代按名称探测类是否存在。
/// - **契约 (What)**：`is_available` 默认返回 `true`；返回 `false` 时内核不会调用 `mock`。
pub trait DoubleProvider: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    fn mock(&self, target: &str) -> Box<dyn TestDouble>;
}

/// 示例组持有的替身委托点。
#[derive(Clone, Default)]
pub struct DoubleSupport {
    provider: Option<Arc<dyn DoubleProvider>>,
}

impl DoubleSupport {
    /// 未注入协作者的委托点。
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_provider(provider: Arc<dyn DoubleProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider
            .as_ref()
            .is_some_and(|provider| provider.is_available())
    }

    /// 创建绑定到 `target` 的替身。
    pub fn double(&self, target: &str) -> Result<Box<dyn TestDouble>> {
        match &self.provider {
            Some(provider) if provider.is_available() => {
                tracing::debug!(target_type = target, "creating test double");
                Ok(provider.mock(target))
            }
            _ => Err(SpecError::MissingDependency),
        }
    }

    /// `double` 的别名。
    pub fn mock(&self, target: &str) -> Result<Box<dyn TestDouble>> {
        self.double(target)
    }

    /// `double` 的别名。
    pub fn stub(&self, target: &str) -> Result<Box<dyn TestDouble>> {
        self.double(target)
    }
}

impl fmt::Debug for DoubleSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleSupport")
            .field("available", &self.is_available())
            .finish()
    }
}

//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义示例执行内核中“可恢复”的错误语义：配置错误、查找错误、缺失依赖等；
//! - 与 [`crate::signal`] 中的结果信号区分：信号表达示例的最终状态（Pending/失败），
//!   错误则表达内核契约被违反，二者最终都会被运行器归类为失败或中断。
//!
//! ## 设计要求（What）
//! - 所有变体派生 [`thiserror::Error`]，错误文本需内嵌出错的引用或名称，便于定位；
//! - 缺失依赖错误使用固定文案，避免泛化成“未知故障”。

use thiserror::Error;

/// 内核统一使用的结果别名。
pub type Result<T, E = SpecError> = core::result::Result<T, E>;

/// 示例执行内核的错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：把共享示例组合、匹配器查找、替身创建与配置加载中的失败路径归档为细粒度枚举，
///   运行器据此给出可读的中断原因。
/// - **契约 (What)**：
///   - 所有变体均为 `Send + Sync + 'static`，可跨线程传递给汇报方；
///   - 错误文本中必须包含出错的标识，例如引用名或示例名；
///   - 内核从不吞掉错误，只通过 `?` 向调用方传播。
/// - **设计权衡 (Trade-offs)**：使用 `String` 保存上下文，牺牲少量分配换取诊断可读性。
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SpecError {
    /// `behaves_like` 引用的标识并未注册为共享示例提供者。
    #[error("{reference} is not a SharedExample")]
    NotASharedExample { reference: String },

    /// 查询未注册的共享示例。
    #[error("shared example `{name}` is not registered in this example group")]
    SharedExampleNotFound { name: String },

    /// 共享示例提供者没有声明对应名称的方法。
    #[error("shared example provider `{provider}` has no example named `{method}`")]
    UnknownSharedMethod { provider: String, method: String },

    /// 需要替身能力时未注入模拟协作者。
    #[error("mocking collaborator is not installed")]
    MissingDependency,

    /// 匹配器工厂中没有与名称及类型匹配的构造器。
    #[error("no matcher named `{name}` accepts the given subject and expectation types")]
    UnknownMatcher { name: String },

    /// 运行器配置无法解析。
    #[error("invalid runner configuration: {detail}")]
    InvalidConfig { detail: String },

    /// 日志订阅器安装失败。
    #[error("failed to install tracing subscriber: {detail}")]
    InitLogging { detail: String },
}

impl SpecError {
    /// 构造配置错误，携带出错的引用标识。
    pub fn not_a_shared_example(reference: impl Into<String>) -> Self {
        SpecError::NotASharedExample {
            reference: reference.into(),
        }
    }

    /// 构造共享示例查找错误。
    pub fn shared_example_not_found(name: impl Into<String>) -> Self {
        SpecError::SharedExampleNotFound { name: name.into() }
    }
}

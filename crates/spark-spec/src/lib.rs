//! Spark 行为规格（BDD）示例执行内核。
//!
//! # 教案式综述（Why / How / What）
//! - **为什么存在**：行为规格以“示例组 + 示例”的形式描述被测对象，本 crate 提供示例组的基础能力：
//!   生命周期钩子、期望入口、Pending/失败信号、测试替身委托以及跨示例组复用的共享示例。
//! - **如何集成**：实现 [`ExampleGroup`] 并在 `tests` 目录中以 `#[spark_spec(groups(...))]` 标注模块，
//!   宏会为每个示例组生成一个标准 `#[test]`；也可直接调用 [`ExampleRunner`] 获取结构化报告。
//! - **执行模型**：示例体通过正常返回表示通过，通过 [`signal`] 中的类型化 panic 载荷表示 Pending 或失败；
//!   运行器以 `catch_unwind` 隔离每一步并按载荷类型分类结局。
//!
//! # 契约说明（What）
//! - **错误**：所有查找与配置类错误以 [`SpecError`] 返回，调用方以 `?` 传播；
//! - **并发**：示例组实例及其状态仅在单线程内使用，运行器不会并行执行同一组内的示例；
//! - **日志**：内核通过 `tracing` 输出事件，宿主可调用 [`logging::init`] 安装订阅器。
//!
//! # 模块结构
//! - `case`：示例元信息；`group`：示例组 trait 与状态；`shared`：共享示例注册表与提供者目录；
//! - `signal`：结果信号；`matcher`/`interceptor`：期望入口；`double`：替身委托点；
//! - `runner`/`report`/`config`：生命周期驱动、结果汇总与运行配置。

pub mod case;
pub mod config;
pub mod double;
pub mod error;
pub mod group;
pub mod interceptor;
pub mod logging;
mod macros;
pub mod matcher;
pub mod prelude;
pub mod report;
pub mod runner;
pub mod shared;
pub mod signal;
mod support;

pub use case::Example;
pub use config::RunnerConfig;
pub use double::{DoubleProvider, DoubleSupport, TestDouble};
pub use error::{Result, SpecError};
pub use group::{BehavesLike, ExampleGroup, GroupState};
pub use interceptor::{Expectation, Interceptor};
pub use matcher::{Matcher, MatcherFactory, MatcherRegistry};
pub use report::{ExampleOutcome, ExampleReport, FailureKind, GroupReport};
pub use runner::{ExampleRunner, assert_group_passes};
pub use shared::{
    Hookable, SharedExample, SharedExampleCatalog, SharedExampleRegistry, SharedOwner, SharedRef,
    shared,
};
pub use spark_spec_macros::spark_spec;

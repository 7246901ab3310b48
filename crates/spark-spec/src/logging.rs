//! 日志订阅器安装入口。
//!
//! # 教案式说明
//! - **意图 (Why)**：内核通过 `tracing` 记录钩子、示例与汇总事件；宿主测试进程可一键安装
//!   `fmt + EnvFilter` 订阅器查看这些事件。
//! - **逻辑 (How)**：默认级别为 `info`，可由 `RUST_LOG` 覆盖；输出走测试写入器，
//!   因此会被 libtest 的输出捕获机制收纳。
//! - **契约 (What)**：全局订阅器只能设置一次，重复安装返回 [`SpecError::InitLogging`]。

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

use crate::error::{Result, SpecError};

/// 安装全局订阅器。
pub fn init() -> Result<()> {
    tracing::subscriber::set_global_default(subscriber()).map_err(|err| SpecError::InitLogging {
        detail: err.to_string(),
    })
}

/// 构造 [`init`] 所安装的订阅器，便于调用方以 `tracing::subscriber::with_default` 局部使用。
pub fn subscriber() -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry()
        .with(build_env_filter())
        .with(tracing_subscriber::fmt::layer().with_test_writer())
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

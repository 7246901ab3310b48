//! 全局日志订阅器安装。
//!
//! # 教案式说明
//! - **Why**：全局订阅器在进程内只能设置一次，单元测试二进制中的 `#[traced_test]` 也会争用它，
//!   因此安装行为在独立的测试进程中验证。
//! - **What**：首次 [`spark_spec::logging::init`] 成功；再次调用返回 `SpecError::InitLogging`。

use spark_spec::SpecError;
use spark_spec::logging;

#[test]
fn init_installs_once_and_reports_reinstallation() {
    logging::init().expect("首次安装应成功");
    tracing::info!("global subscriber installed");

    let err = logging::init().expect_err("重复安装应报错");
    assert!(matches!(err, SpecError::InitLogging { .. }));
    assert!(err.to_string().starts_with("failed to install tracing subscriber"));
}

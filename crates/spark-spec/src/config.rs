//! 运行器配置。
//!
//! # 教案式说明
//! - **意图 (Why)**：运行器的可调项（名称过滤、Pending 是否视为失败、是否静默信号输出）
//!   既要能在代码中构造，也要能从 TOML 片段或环境变量加载，便于 CI 统一下发。
//! - **逻辑 (How)**：结构体派生 `serde::Deserialize`，缺省字段取 [`RunnerConfig::default`]；
//!   环境变量只覆盖过滤条件。
//! - **契约 (What)**：未知字段视为配置错误，以 [`SpecError::InvalidConfig`] 返回。

use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SpecError};

/// 过滤条件的环境变量名。
pub const FILTER_ENV: &str = "SPARK_SPEC_FILTER";

/// 指向 TOML 配置文件的环境变量名。
pub const CONFIG_ENV: &str = "SPARK_SPEC_CONFIG";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// 仅执行名称包含该子串的示例。
    pub filter: Option<String>,
    /// 为真时，Pending 示例也会让 [`crate::assert_group_passes`] 失败。
    pub fail_on_pending: bool,
    /// 为真时，运行示例组期间结果信号不再打印到 stderr；运行结束后恢复。
    pub quiet_signals: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            filter: None,
            fail_on_pending: false,
            quiet_signals: true,
        }
    }
}

impl RunnerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|err| SpecError::InvalidConfig {
            detail: err.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| SpecError::InvalidConfig {
            detail: format!("{}: {err}", path.display()),
        })?;
        Self::from_toml_str(&raw)
    }

    /// 按环境装配配置：[`CONFIG_ENV`] 指向的文件（若有）叠加 [`FILTER_ENV`] 覆盖。
    pub fn discover() -> Result<Self> {
        let base = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        Ok(base.with_env())
    }

    /// 以环境变量 [`FILTER_ENV`] 覆盖过滤条件。
    pub fn with_env(self) -> Self {
        self.with_filter_override(env::var(FILTER_ENV).ok())
    }

    /// 非空的覆盖值替换过滤条件，空值或 `None` 保持原样。
    pub fn with_filter_override(mut self, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.filter = Some(value);
        }
        self
    }

    /// 名称是否通过过滤。
    pub fn selects(&self, name: &str) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|filter| name.contains(filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = RunnerConfig::from_toml_str("fail_on_pending = true").expect("合法配置");
        assert_eq!(
            config,
            RunnerConfig {
                filter: None,
                fail_on_pending: true,
                quiet_signals: true,
            }
        );
        assert_eq!(RunnerConfig::from_toml_str("").expect("空配置合法"), RunnerConfig::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = RunnerConfig::from_toml_str("parallel = true").expect_err("未知字段应报错");
        assert!(matches!(err, SpecError::InvalidConfig { .. }));
    }

    #[test]
    fn files_are_parsed_and_missing_files_reported() {
        let path = env::temp_dir().join(format!("spark-spec-config-{}.toml", std::process::id()));
        fs::write(&path, "filter = \"stack\"\nquiet_signals = false\n").expect("写入临时配置");
        let config = RunnerConfig::from_file(&path).expect("合法配置文件");
        let _ = fs::remove_file(&path);
        assert_eq!(config.filter.as_deref(), Some("stack"));
        assert!(!config.quiet_signals);

        let err = RunnerConfig::from_file(Path::new("/nonexistent/spark-spec.toml"))
            .expect_err("缺失文件应报错");
        assert!(err.to_string().contains("spark-spec.toml"));
    }

    #[test]
    fn filter_override_and_selection() {
        let config = RunnerConfig::default();
        assert!(config.selects("anything"));

        let config = config.with_filter_override(Some("stack".to_owned()));
        assert!(config.selects("pops_the_stack"));
        assert!(!config.selects("adds_numbers"));

        let config = config.with_filter_override(Some("  ".to_owned()));
        assert_eq!(config.filter.as_deref(), Some("stack"), "空白覆盖值应被忽略");
    }
}

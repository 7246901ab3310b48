//! 示例与示例组的执行结果。

use std::fmt;
use std::time::Duration;

use crate::error::SpecError;
use crate::signal::Signal;

/// 失败的来源。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// 示例作者调用了 `fail`。
    Deliberate,
    /// 匹配器判定期望未满足。
    Expectation,
    /// 普通 panic，例如 `assert!`。
    Panic,
    /// 内核错误以 `Err` 返回，例如共享示例查找失败。
    Error,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Deliberate => "deliberate",
            FailureKind::Expectation => "expectation",
            FailureKind::Panic => "panic",
            FailureKind::Error => "error",
        })
    }
}

/// 单个示例的结局。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExampleOutcome {
    Passed,
    Pending(String),
    Failed { kind: FailureKind, message: String },
}

impl ExampleOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ExampleOutcome::Passed)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ExampleOutcome::Pending(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExampleOutcome::Failed { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ExampleOutcome::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Pending 原因或失败消息；通过时为 `None`。
    pub fn message(&self) -> Option<&str> {
        match self {
            ExampleOutcome::Passed => None,
            ExampleOutcome::Pending(message) | ExampleOutcome::Failed { message, .. } => {
                Some(message)
            }
        }
    }
}

impl From<Signal> for ExampleOutcome {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Pending(pending) => ExampleOutcome::Pending(pending.message().to_owned()),
            Signal::DeliberateFailure(failure) => ExampleOutcome::Failed {
                kind: FailureKind::Deliberate,
                message: failure.message().to_owned(),
            },
            Signal::ExpectationFailure(failure) => ExampleOutcome::Failed {
                kind: FailureKind::Expectation,
                message: failure.message().to_owned(),
            },
            Signal::Panic(message) => ExampleOutcome::Failed {
                kind: FailureKind::Panic,
                message,
            },
        }
    }
}

impl From<SpecError> for ExampleOutcome {
    fn from(err: SpecError) -> Self {
        ExampleOutcome::Failed {
            kind: FailureKind::Error,
            message: err.to_string(),
        }
    }
}

/// 单个示例的执行记录。
#[derive(Clone, Debug)]
pub struct ExampleReport {
    pub name: String,
    pub outcome: ExampleOutcome,
    pub duration: Duration,
    /// 示例是否经由共享示例注册表执行。
    pub shared: bool,
}

/// 示例组的汇总。
///
/// # 教案式说明
/// - **意图 (Why)**：运行器与测试宏都需要“通过/Pending/失败”三种计数以及失败明细，
///   集中在一个结构内累加，避免调用方自行遍历。
/// - **契约 (What)**：`aborted` 表示整组在执行示例之前就已中止（组合失败或 `before_all` 失败），
///   此时 `examples` 可能为空，但 [`GroupReport::has_failures`] 必为真。
#[derive(Clone, Debug, Default)]
pub struct GroupReport {
    pub group: String,
    pub examples: Vec<ExampleReport>,
    pub passed: usize,
    pub pending: usize,
    pub failed: usize,
    pub aborted: Option<ExampleOutcome>,
    pub duration: Duration,
}

impl GroupReport {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            ..Default::default()
        }
    }

    pub fn add(&mut self, report: ExampleReport) {
        match &report.outcome {
            ExampleOutcome::Passed => self.passed += 1,
            ExampleOutcome::Pending(_) => self.pending += 1,
            ExampleOutcome::Failed { .. } => self.failed += 1,
        }
        self.duration += report.duration;
        self.examples.push(report);
    }

    pub fn total(&self) -> usize {
        self.passed + self.pending + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.aborted.is_some()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExampleReport> {
        self.examples.iter().filter(|report| report.outcome.is_failed())
    }

    pub fn pending_examples(&self) -> impl Iterator<Item = &ExampleReport> {
        self.examples.iter().filter(|report| report.outcome.is_pending())
    }

    /// 按名称查找示例记录。
    pub fn example(&self, name: &str) -> Option<&ExampleReport> {
        self.examples.iter().find(|report| report.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{DeliberateFailure, Pending};

    fn report(name: &str, outcome: ExampleOutcome) -> ExampleReport {
        ExampleReport {
            name: name.to_owned(),
            outcome,
            duration: Duration::from_millis(2),
            shared: false,
        }
    }

    #[test]
    fn signals_map_to_outcomes_by_kind() {
        assert_eq!(
            ExampleOutcome::from(Signal::Pending(Pending::new("later"))),
            ExampleOutcome::Pending("later".to_owned())
        );
        assert_eq!(
            ExampleOutcome::from(Signal::DeliberateFailure(DeliberateFailure::new(""))).failure_kind(),
            Some(FailureKind::Deliberate)
        );
        assert_eq!(
            ExampleOutcome::from(SpecError::MissingDependency).failure_kind(),
            Some(FailureKind::Error)
        );
    }

    #[test]
    fn counters_follow_outcomes() {
        let mut group = GroupReport::new("Calculator");
        group.add(report("adds", ExampleOutcome::Passed));
        group.add(report("divides", ExampleOutcome::Pending("todo".to_owned())));
        group.add(report(
            "overflows",
            ExampleOutcome::Failed {
                kind: FailureKind::Panic,
                message: "boom".to_owned(),
            },
        ));

        assert_eq!((group.passed, group.pending, group.failed), (1, 1, 1));
        assert_eq!(group.total(), 3);
        assert!(group.has_failures());
        assert_eq!(group.failures().count(), 1);
        assert_eq!(group.pending_examples().next().map(|r| r.name.as_str()), Some("divides"));
        assert_eq!(group.duration, Duration::from_millis(6));
    }

    #[test]
    fn aborted_group_counts_as_failure() {
        let mut group = GroupReport::new("Broken");
        assert!(!group.has_failures());
        group.aborted = Some(SpecError::not_a_shared_example("Ghost").into());
        assert!(group.has_failures());
    }
}

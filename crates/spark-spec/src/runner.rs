//! 示例组运行器。
//!
//! # 教案式综述
//! - **意图 (Why)**：把“调用钩子、执行示例、按信号分类结局”的生命周期落成一个可直接调用的驱动器，
//!   供测试宏与自定义脚本复用。
//! - **逻辑 (How)**：
//!   1. 组合阶段：校验 `behaves_like` 并挂载共享示例，失败则整组中止；
//!   2. `before_all` 一次，失败则跳过全部示例；
//!   3. 每个示例：`before` → 示例体或共享示例 → `after`，每一步都以 `catch_unwind` 隔离；
//!   4. 无论示例成败，`after_all` 恰好执行一次。
//! - **契约 (What)**：结局只按信号类型分类；一个示例的展开永远不会越过示例边界影响下一个示例。

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::case::Example;
use crate::config::RunnerConfig;
use crate::error::Result;
use crate::group::ExampleGroup;
use crate::report::{ExampleOutcome, ExampleReport, GroupReport};
use crate::signal::Signal;
use crate::support;

/// 计划执行的一步。
enum Step<G> {
    Own(Example<G>),
    Shared(String),
}

impl<G> Step<G> {
    fn name(&self) -> &str {
        match self {
            Step::Own(example) => example.name,
            Step::Shared(name) => name,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ExampleRunner {
    config: RunnerConfig,
}

impl ExampleRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// 以默认构造的实例运行示例组 `G`。
    pub fn run<G: ExampleGroup + Default>(&self) -> GroupReport {
        let mut group = G::default();
        self.run_group(&mut group)
    }

    /// 在给定实例上运行完整生命周期。
    pub fn run_group<G: ExampleGroup>(&self, group: &mut G) -> GroupReport {
        let _quiet = self.config.quiet_signals.then(support::quiet_signals);

        let span = tracing::info_span!("example_group", group = G::name());
        let _entered = span.enter();
        let started = Instant::now();
        let mut report = GroupReport::new(G::name());

        if let Err(err) = group.state_mut().compose() {
            tracing::warn!(error = %err, "shared example composition failed");
            report.aborted = Some(err.into());
            report.duration = started.elapsed();
            return report;
        }

        let before_all = guarded(|| {
            group.before_all();
            Ok(())
        });
        if before_all.is_passed() {
            for step in self.plan(group) {
                let example = self.run_step(group, step);
                report.add(example);
            }
        } else {
            tracing::warn!(outcome = ?before_all, "before_all did not complete; examples skipped");
            report.aborted = Some(before_all);
        }

        let after_all = guarded(|| {
            group.after_all();
            Ok(())
        });
        if after_all.is_failed() && report.aborted.is_none() {
            tracing::warn!(outcome = ?after_all, "after_all failed");
            report.aborted = Some(after_all);
        }

        report.duration = started.elapsed();
        tracing::info!(
            passed = report.passed,
            pending = report.pending,
            failed = report.failed,
            "example group finished"
        );
        report
    }

    /// 生成执行计划：先按声明顺序执行自有示例（同名共享示例优先），
    /// 再执行仅存在于共享注册表中的示例。
    fn plan<G: ExampleGroup>(&self, group: &G) -> Vec<Step<G>> {
        let own = G::examples();
        let mut steps: Vec<Step<G>> = own
            .iter()
            .map(|example| {
                if group.has_shared_example(example.name) {
                    Step::Shared(example.name.to_owned())
                } else {
                    Step::Own(*example)
                }
            })
            .collect();

        let shared_only = group
            .state()
            .shared_examples()
            .names()
            .filter(|name| own.iter().all(|example| example.name != *name))
            .map(|name| Step::Shared(name.to_owned()));
        steps.extend(shared_only);

        steps.retain(|step| self.config.selects(step.name()));
        steps
    }

    fn run_step<G: ExampleGroup>(&self, group: &mut G, step: Step<G>) -> ExampleReport {
        let started = Instant::now();
        let name = step.name().to_owned();
        let shared = matches!(step, Step::Shared(_));
        tracing::debug!(example = %name, shared, "running example");

        let mut outcome = guarded(|| {
            group.before();
            Ok(())
        });
        if outcome.is_passed() {
            outcome = match &step {
                Step::Own(example) => guarded(|| {
                    (example.body)(group);
                    Ok(())
                }),
                Step::Shared(name) => guarded(|| group.run_shared_example(name)),
            };

            let after = guarded(|| {
                group.after();
                Ok(())
            });
            if after.is_failed() && !outcome.is_failed() {
                outcome = after;
            }
        }

        match &outcome {
            ExampleOutcome::Failed { kind, message } => {
                tracing::warn!(example = %name, %kind, %message, "example failed");
            }
            other => tracing::debug!(example = %name, outcome = ?other, "example finished"),
        }

        ExampleReport {
            name,
            outcome,
            duration: started.elapsed(),
            shared,
        }
    }
}

/// 执行一步并把任何展开或错误归一为结局。
fn guarded(action: impl FnOnce() -> Result<()>) -> ExampleOutcome {
    match panic::catch_unwind(AssertUnwindSafe(action)) {
        Ok(Ok(())) => ExampleOutcome::Passed,
        Ok(Err(err)) => err.into(),
        Err(payload) => Signal::from_panic(payload).into(),
    }
}

/// 运行示例组，存在失败时以上下文信息 panic。
///
/// # 教案式说明
/// - **意图 (Why)**：`#[spark_spec]` 宏为每个示例组生成一个 `#[test]`，其函数体只需调用本函数。
/// - **逻辑 (How)**：通过 [`RunnerConfig::discover`] 读取环境配置，运行示例组，
///   失败（或在 `fail_on_pending` 下存在 Pending）时交由 [`support::panic_with_context`] 汇总。
/// - **契约 (What)**：配置无法解析时直接 panic 并给出原因；全部通过时正常返回。
pub fn assert_group_passes<G: ExampleGroup + Default>() {
    let config = match RunnerConfig::discover() {
        Ok(config) => config,
        Err(err) => panic!("[spark-spec::{}] {err}", G::name()),
    };
    let fail_on_pending = config.fail_on_pending;
    let report = ExampleRunner::with_config(config).run::<G>();
    if report.has_failures() || (fail_on_pending && report.pending > 0) {
        support::panic_with_context(&report, fail_on_pending);
    }
}

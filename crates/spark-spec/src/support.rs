use std::any::Any;
use std::cell::Cell;
use std::fmt::Write;
use std::panic;
use std::sync::Once;

use crate::report::GroupReport;
use crate::signal;

static QUIET_HOOK: Once = Once::new();

thread_local! {
    /// 当前线程上尚未结束的静默区间数。
    static QUIET_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// 静默区间守卫，析构时退出区间。
#[must_use = "守卫析构即结束静默区间"]
pub struct QuietSignals {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl Drop for QuietSignals {
    fn drop(&mut self) {
        QUIET_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// 在当前线程上静默结果信号，直到返回的守卫被析构。
///
/// # 教案式说明
/// - **意图 (Why)**：Pending 与失败信号借助 panic 展开调用栈，默认 hook 会把每个信号都打印成
///   “thread panicked”，淹没真正的异常输出；但运行器之外的普通 `#[test]` 仍需看到这些输出。
/// - **逻辑 (How)**：首次调用时包装原有 hook（借助 [`Once`] 只包装一次）；包装后的 hook 只在
///   当前线程处于静默区间内时忽略信号载荷，其余情况一律转交原 hook。
/// - **契约 (What)**：区间按线程计数，可嵌套；普通 panic 的输出行为始终不变。
pub fn quiet_signals() -> QuietSignals {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if suppresses(info.payload()) {
                return;
            }
            previous(info);
        }));
    });
    QUIET_DEPTH.with(|depth| depth.set(depth.get() + 1));
    QuietSignals {
        _not_send: std::marker::PhantomData,
    }
}

/// 静默 hook 是否会吞掉该载荷。
fn suppresses(payload: &(dyn Any + Send)) -> bool {
    signal::is_outcome_signal(payload) && QUIET_DEPTH.with(|depth| depth.get() > 0)
}

/// 汇总示例组失败并以上下文信息 panic。
///
/// # 教案式说明
/// - **意图 (Why)**：测试宏生成的 `#[test]` 需要在一次失败中展示全部失败示例，
///   并标注“示例组/示例”来源，便于快速定位。
/// - **逻辑 (How)**：逐条追加 `[spark-spec::组::示例]` 前缀的失败消息；`include_pending` 为真时
///   Pending 示例也计入。
/// - **契约 (What)**：调用前应确认存在需要报告的条目；函数不会正常返回。
pub fn panic_with_context(report: &GroupReport, include_pending: bool) -> ! {
    let group = &report.group;
    let mut message = String::new();
    let _ = write!(&mut message, "[spark-spec::{group}] 示例组未通过：");

    if let Some(aborted) = &report.aborted {
        let _ = write!(
            &mut message,
            "\n[spark-spec::{group}] 组级中止：{}",
            aborted.message().unwrap_or("<无消息>")
        );
    }
    for failure in report.failures() {
        let _ = write!(
            &mut message,
            "\n[spark-spec::{group}::{}] 测试失败：{}",
            failure.name,
            failure.outcome.message().unwrap_or("<无消息>")
        );
    }
    if include_pending {
        for pending in report.pending_examples() {
            let _ = write!(
                &mut message,
                "\n[spark-spec::{group}::{}] 尚未实现：{}",
                pending.name,
                pending.outcome.message().unwrap_or("<无消息>")
            );
        }
    }

    panic::resume_unwind(Box::new(message));
}

//! 示例结果信号：Pending、主动失败与期望失败。
//!
//! # 教案式综述
//! - **意图 (Why)**：示例体需要在任意调用深度上宣告“本示例的结局”，且宣告之后不得继续执行后续语句。
//!   因此信号以 panic 载荷的形式展开调用栈，由运行器的 `catch_unwind` 捕获后按**载荷类型**分类，
//!   与匹配器断言失败共用同一条退出通道。
//! - **逻辑 (How)**：[`pending`]、[`fail`] 与 [`expectation_failed`] 均以 [`std::panic::panic_any`] 抛出强类型载荷，
//!   返回类型为 `!`，编译器保证调用点之后的代码不可达；[`Signal::from_panic`] 负责把任意载荷还原为信号。
//! - **契约 (What)**：分类只依赖载荷类型，绝不解析消息文本；普通 `panic!`/`assert!` 归为 [`Signal::Panic`]。

use std::any::Any;
use std::fmt;
use std::panic;

/// `pending` 未给出原因时使用的默认消息。
pub const DEFAULT_PENDING_REASON: &str = "No reason given";

/// 主动失败消息的固定前缀。
pub const FAILURE_PREFIX: &str = "RuntimeError:";

/// 主动失败详情前的缩进（换行后 7 个空格）。
const FAILURE_INDENT: &str = "       ";

/// 示例尚未实现的信号。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pending {
    message: String,
}

impl Pending {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// 示例作者主动请求的失败。
///
/// # 教案式说明
/// - **意图 (Why)**：与匹配器断言失败区分来源，但在汇报时同样记为失败。
/// - **契约 (What)**：`message` 已经过 [`format_failure_message`] 格式化，始终以 [`FAILURE_PREFIX`] 开头。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliberateFailure {
    message: String,
}

impl DeliberateFailure {
    /// 以未格式化的详情构造失败信号。
    pub fn new(detail: &str) -> Self {
        Self {
            message: format_failure_message(detail),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DeliberateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// 匹配器判定期望未满足时抛出的失败。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpectationFailure {
    message: String,
}

impl ExpectationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ExpectationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// 生成主动失败的最终消息。
///
/// 非空详情会以“换行 + 7 个空格”缩进后拼接在 [`FAILURE_PREFIX`] 之后；空详情只保留前缀本身。
pub fn format_failure_message(detail: &str) -> String {
    if detail.is_empty() {
        FAILURE_PREFIX.to_owned()
    } else {
        format!("{FAILURE_PREFIX}\n{FAILURE_INDENT}{detail}")
    }
}

/// 将当前示例标记为 Pending，并立即展开调用栈。
pub fn pending(message: impl Into<String>) -> ! {
    panic::panic_any(Pending::new(message))
}

/// 将当前示例标记为主动失败，并立即展开调用栈。
pub fn fail(detail: &str) -> ! {
    panic::panic_any(DeliberateFailure::new(detail))
}

/// 报告期望失败，供拦截器在匹配结果不符时调用。
pub fn expectation_failed(message: impl Into<String>) -> ! {
    panic::panic_any(ExpectationFailure::new(message))
}

/// 从 panic 载荷还原出的示例结局。
///
/// # 教案式说明
/// - **意图 (Why)**：运行器只拿到 `Box<dyn Any + Send>`，需要一个集中位置完成类型分派，
///   以免各处重复 `downcast` 样板。
/// - **逻辑 (How)**：依次尝试三种内核载荷；均不匹配时按 `&str` / `String` 取出普通 panic 文本，
///   其余类型统一记为 `<未知 panic 类型>`。
/// - **契约 (What)**：返回值可无损还原三类信号的原始消息。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    Pending(Pending),
    DeliberateFailure(DeliberateFailure),
    ExpectationFailure(ExpectationFailure),
    /// 非内核信号的普通 panic，例如 `assert!` 失败。
    Panic(String),
}

impl Signal {
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Pending>() {
            Ok(pending) => return Signal::Pending(*pending),
            Err(other) => other,
        };
        let payload = match payload.downcast::<DeliberateFailure>() {
            Ok(failure) => return Signal::DeliberateFailure(*failure),
            Err(other) => other,
        };
        let payload = match payload.downcast::<ExpectationFailure>() {
            Ok(failure) => return Signal::ExpectationFailure(*failure),
            Err(other) => other,
        };

        if let Some(text) = payload.downcast_ref::<&str>() {
            Signal::Panic((*text).to_owned())
        } else if let Some(text) = payload.downcast_ref::<String>() {
            Signal::Panic(text.clone())
        } else {
            Signal::Panic("<未知 panic 类型>".to_owned())
        }
    }

    /// 信号携带的人类可读消息。
    pub fn message(&self) -> &str {
        match self {
            Signal::Pending(pending) => pending.message(),
            Signal::DeliberateFailure(failure) => failure.message(),
            Signal::ExpectationFailure(failure) => failure.message(),
            Signal::Panic(text) => text,
        }
    }
}

/// 判断载荷是否为内核自身的结果信号。
///
/// 静默 panic hook 依赖此函数过滤信号输出，普通 panic 仍交给原有 hook 打印。
pub fn is_outcome_signal(payload: &(dyn Any + Send)) -> bool {
    payload.is::<Pending>() || payload.is::<DeliberateFailure>() || payload.is::<ExpectationFailure>()
}

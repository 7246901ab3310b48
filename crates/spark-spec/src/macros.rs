//! 示例体语法辅助宏。
//!
//! - 仅是对 [`crate::signal`] 与 [`crate::group::ExampleGroup::spec`] 的薄包装，不引入隐式状态；
//! - 当前提供 [`pending!`]、[`fail!`]、[`spec!`] 以及替身的 [`double!`]、[`mock!`]、[`stub!`]。

/// 将当前示例标记为 Pending。
///
/// # 设计动机（Why）
/// - 示例体常以“尚未实现”占位，无参调用时应自动带上默认原因，避免每处手写同一句话。
///
/// # 展开逻辑（How）
/// - 无参数时展开为 [`crate::signal::pending`] 并传入 [`crate::signal::DEFAULT_PENDING_REASON`]；
/// - 带参数时按 `format!` 语法拼接原因。
///
/// # 契约说明（What）
/// - 表达式类型为 `!`，可出现在任何需要值的位置。
#[macro_export]
macro_rules! pending {
    () => {
        $crate::signal::pending($crate::signal::DEFAULT_PENDING_REASON)
    };
    ($($arg:tt)+) => {
        $crate::signal::pending(::std::format!($($arg)+))
    };
}

/// 将当前示例标记为主动失败。
///
/// # 展开逻辑（How）
/// - 无参数时以空详情调用 [`crate::signal::fail`]，消息仅为 `RuntimeError:`；
/// - 带参数时按 `format!` 语法拼接详情。
///
/// # 契约说明（What）
/// - 表达式类型为 `!`。
#[macro_export]
macro_rules! fail {
    () => {
        $crate::signal::fail("")
    };
    ($($arg:tt)+) => {
        $crate::signal::fail(&::std::format!($($arg)+))
    };
}

/// 以一个或多个主体值构造期望拦截器。
///
/// # 展开逻辑（How）
/// - 单值展开为 `group.spec(value)`；
/// - 多值打包为元组后调用，匹配器以元组整体作为主体。
///
/// # 风险提示（Trade-offs）
/// - 第一个参数需为实现 [`crate::group::ExampleGroup`] 的值或引用，且调用处需引入该 trait；
///   否则编译器给出常规的方法解析错误。
#[macro_export]
macro_rules! spec {
    ($group:expr, $value:expr $(,)?) => {
        ($group).spec($value)
    };
    ($group:expr, $($value:expr),+ $(,)?) => {
        ($group).spec(($($value),+))
    };
}

/// 通过示例组的替身委托点创建替身。
///
/// # 展开逻辑（How）
/// - 仅传入示例组时，目标类型取 [`crate::double::DEFAULT_DOUBLE_TARGET`]；
/// - 额外传入目标名称时原样转交。
///
/// # 契约说明（What）
/// - 返回 `Result<Box<dyn TestDouble>>`，协作者缺失时为 [`crate::SpecError::MissingDependency`]；
/// - [`mock!`] 与 [`stub!`] 展开形状相同，默认目标一致。
#[macro_export]
macro_rules! double {
    ($group:expr $(,)?) => {
        ($group).double($crate::double::DEFAULT_DOUBLE_TARGET)
    };
    ($group:expr, $target:expr $(,)?) => {
        ($group).double($target)
    };
}

/// [`double!`] 的 `mock` 形状。
#[macro_export]
macro_rules! mock {
    ($group:expr $(,)?) => {
        ($group).mock($crate::double::DEFAULT_DOUBLE_TARGET)
    };
    ($group:expr, $target:expr $(,)?) => {
        ($group).mock($target)
    };
}

/// [`double!`] 的 `stub` 形状。
#[macro_export]
macro_rules! stub {
    ($group:expr $(,)?) => {
        ($group).stub($crate::double::DEFAULT_DOUBLE_TARGET)
    };
    ($group:expr, $target:expr $(,)?) => {
        ($group).stub($target)
    };
}

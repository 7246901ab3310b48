//! 示例元信息。

use std::fmt;

/// 表示单个示例：名称加上在目标实例上执行的函数。
///
/// # 教案式说明
/// - **意图 (Why)**：以结构体封装示例函数与名称，便于运行器统一遍历、按名称调度，
///   也让示例表可以写成 `const` 切片。
/// - **逻辑 (How)**：`name` 为 `'static` 字符串，`body` 为接收目标实例可变引用的函数指针；
///   示例组与共享示例提供者共用此结构。
/// - **契约 (What)**：`body` 通过结果信号或 panic 报告非通过状态，正常返回即视为通过。
pub struct Example<T: ?Sized> {
    /// 示例的人类可读名称，在同一示例表内唯一。
    pub name: &'static str,
    /// 实际执行的示例体。
    pub body: fn(&mut T),
}

impl<T: ?Sized> Example<T> {
    pub const fn new(name: &'static str, body: fn(&mut T)) -> Self {
        Self { name, body }
    }
}

// 手写实现：派生宏会给 `T` 追加多余的 `Clone`/`Copy` 约束。
impl<T: ?Sized> Clone for Example<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Example<T> {}

impl<T: ?Sized> fmt::Debug for Example<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Example").field("name", &self.name).finish()
    }
}

/// 在示例表中按名称查找示例。
pub fn find<'a, T: ?Sized>(examples: &'a [Example<T>], name: &str) -> Option<&'a Example<T>> {
    examples.iter().find(|example| example.name == name)
}

//! 编写示例组时常用的名称。
//!
//! ```
//! use spark_spec::prelude::*;
//! ```

pub use crate::case::Example;
pub use crate::config::RunnerConfig;
pub use crate::error::{Result, SpecError};
pub use crate::group::{BehavesLike, ExampleGroup, GroupState};
pub use crate::matcher::{Matcher, MatcherFactory, MatcherRegistry};
pub use crate::runner::ExampleRunner;
pub use crate::shared::{Hookable, SharedExample, SharedExampleCatalog, shared};
pub use crate::{double, fail, mock, pending, spark_spec, spec, stub};

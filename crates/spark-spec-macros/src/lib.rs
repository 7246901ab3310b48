//! # spark-spec-macros
//!
//! 该 crate 提供 `spark_spec` 属性宏，为声明了示例组的测试模块注入标准化的 `#[test]` 入口。
//! 每个示例组对应一个测试函数，函数体只调用 `spark_spec::assert_group_passes`，
//! 从而让示例组无需手写样板即可被 `cargo test` 发现。宏的实现分为两个阶段：
//! 解析 `groups(...)` 参数，以及将测试桩植入目标模块。

use heck::ToSnakeCase;
use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{ItemMod, Meta, Path, Result as SynResult, Token, parse_macro_input};

#[proc_macro_attribute]
/// 教案级说明：
/// - **意图（Why）**：示例组以 trait 实现声明，`cargo test` 无法直接发现它们；属性宏负责把
///   “示例组清单”翻译为测试入口。
/// - **逻辑（How）**：先解析属性参数（见 `parse_groups`），再调用 `inject_tests` 将 `#[test]`
///   函数追加到模块。任一阶段出错都转为编译期诊断。
/// - **契约（What）**：属性必须形如 `groups(A, b::B)` 且至少列出一个示例组；每个示例组需实现
///   `ExampleGroup + Default`，否则由生成代码处的 trait 约束报错。
/// - **权衡（Trade-offs）**：测试函数名由示例组类型名转蛇形命名得到，同名类型位于不同路径时
///   会产生重名函数，此时需拆分到不同模块。
pub fn spark_spec(attr: TokenStream, item: TokenStream) -> TokenStream {
    let module = parse_macro_input!(item as ItemMod);

    match parse_groups(attr).and_then(|groups| inject_tests(groups, module)) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// 教案级说明：
/// - **意图**：解析属性参数，确定需要生成测试入口的示例组。
/// - **逻辑**：要求参数解析为 `Meta::List` 且路径为 `groups`，其中每一项都是类型路径。
/// - **契约**：成功返回非空的路径列表；空属性、空列表或非路径项均返回 `syn::Error`。
fn parse_groups(attr: TokenStream) -> SynResult<Vec<Path>> {
    if attr.is_empty() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "spark_spec 需要 groups(...) 参数",
        ));
    }

    let meta = syn::parse::<Meta>(attr)?;
    match meta {
        Meta::List(list) if list.path.is_ident("groups") => {
            let nested: Punctuated<Meta, Token![,]> =
                list.parse_args_with(Punctuated::parse_terminated)?;
            let mut groups = Vec::new();
            for meta in nested {
                match meta {
                    Meta::Path(path) => groups.push(path),
                    other => {
                        return Err(syn::Error::new(other.span(), "groups(...) 仅接受类型路径"));
                    }
                }
            }
            if groups.is_empty() {
                Err(syn::Error::new(list.span(), "groups(...) 至少需要一个示例组"))
            } else {
                Ok(groups)
            }
        }
        other => Err(syn::Error::new(
            other.span(),
            "spark_spec 属性仅支持 groups(...)",
        )),
    }
}

/// 教案级说明：
/// - **意图**：为每个示例组生成一个 `#[test]` 函数。
/// - **逻辑**：
///   1. 取路径最后一段转蛇形命名作为测试函数名；
///   2. 生成调用 `::spark_spec::assert_group_passes::<Group>()` 的函数；
///   3. 内联模块直接追加，文件模块则重新拼装并保留可见性与属性。
/// - **契约**：原有条目保持不变，仅追加测试函数。
fn inject_tests(groups: Vec<Path>, mut module: ItemMod) -> SynResult<proc_macro2::TokenStream> {
    let mut generated = Vec::new();
    for group in groups {
        let last = group
            .segments
            .last()
            .ok_or_else(|| syn::Error::new(group.span(), "示例组路径不能为空"))?;
        let test_ident = format_ident!("{}", last.ident.to_string().to_snake_case());
        let item: syn::Item = syn::parse_quote! {
            #[test]
            fn #test_ident() {
                ::spark_spec::assert_group_passes::<#group>();
            }
        };
        generated.push(item);
    }

    if let Some((_, ref mut items)) = module.content {
        items.extend(generated);
        Ok(quote! { #module })
    } else {
        let ident = &module.ident;
        let vis = &module.vis;
        let attrs = &module.attrs;
        Ok(quote! {
            #(#attrs)*
            #vis mod #ident {
                #(#generated)*
            }
        })
    }
}

//! DDD 过程宏（ddd-macros）
//!
//! - `#[mapped_command]`：为创建类命令生成 `Command` 与 `MappedCommand` 实现。
//!
mod derive_utils;
mod mapped_command;

use proc_macro::TokenStream;

/// 可自动映射的命令
///
/// 用法：
/// ```ignore
/// #[mapped_command(aggregate = Account)]
/// pub struct OpenAccount {
///     id: String,
///     #[mapping(rename = "holder")]
///     owner: String,
///     #[mapping(skip)]
///     request_id: String,
/// }
/// ```
///
/// - `aggregate = Type`：目标聚合类型；缺省时命令不映射到任何构造函数
/// - `name = "..."`：覆写 `Command::NAME`，默认结构体名
/// - 字段按声明顺序映射；`#[mapping(skip)]` 排除字段，`#[mapping(rename = "..")]` 覆写属性名
/// - 追加派生 `Debug, Clone`（与已有 derive 合并去重）
#[proc_macro_attribute]
pub fn mapped_command(attr: TokenStream, item: TokenStream) -> TokenStream {
    mapped_command::expand(attr, item)
}

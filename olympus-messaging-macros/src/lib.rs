use proc_macro::TokenStream;

mod message_kind;
mod utils;

/// 消息类型宏
/// - 仅支持具名字段结构体：`struct JoinApplication { join_data: ... }`
/// - 合并默认派生：`Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize`
/// - 追加 `#[serde(deny_unknown_fields)]`，使多余的 body 字段在重建时报错
/// - 生成 `::olympus_messaging::message::MessageKind` 实现（`MESSAGE_TYPE` 与 `serialize_body`）
/// - 参数：`#[message_kind(message_type = "...")]`，也可简写为 `#[message_kind("...")]`
/// - 可选：`serialize_body = false` 不生成 `serialize_body`，调用时返回 `UnimplementedSerialization`
///
/// 注册仍需显式调用 `MessageRegistry::register::<K>()`。
#[proc_macro_attribute]
pub fn message_kind(attr: TokenStream, item: TokenStream) -> TokenStream {
    message_kind::expand(attr, item)
}

//! 消息模型（Message）与序列化契约
//!
//! 定义所有消息共有的头部字段（`MessageHeader`）、每类消息需要实现的最小接口
//! （`MessageKind`）、不可变的消息值 `Message<K>`，以及供注册表与分发器使用的
//! 类型擦除视图 `AnyMessage`。
//!
//! 传输层只看到 `(Metadata, Body)`：
//! - `Metadata`：字符串到字符串的路由/身份字段，可直接作为传输头；
//! - `Body`：各类消息自有的 JSON 对象载荷。

mod any_message;
mod header;
mod kind;
mod typed;

pub use any_message::AnyMessage;
pub use header::MessageHeader;
pub use kind::{MessageKind, kind_name, serialize_body};
pub use typed::Message;

use std::collections::BTreeMap;

/// 传输元数据（键使用连字符形式的线上名称）
pub type Metadata = BTreeMap<String, String>;

/// 消息体
pub type Body = serde_json::Map<String, serde_json::Value>;

/// 线上元数据键
pub mod keys {
    pub const TYPE: &str = "type";
    pub const CHANNEL: &str = "channel";
    pub const TRANSACTION_ID: &str = "transaction-id";
    pub const BINK_USER_ID: &str = "bink-user-id";
    pub const REQUEST_ID: &str = "request-id";
    pub const LOYALTY_PLAN: &str = "loyalty-plan";
    pub const ACCOUNT_ID: &str = "account-id";
}

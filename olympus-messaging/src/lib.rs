//! 消息信封基础库（olympus-messaging）
//!
//! 为发布/订阅消息网络提供类型化的消息表示与路由：
//! - 消息模型（`message`）：公共头部 + 各类型载荷，拆分为传输无关的 `(metadata, body)`；
//! - 类型注册表（`registry`）：线上类型字符串到具体类型的映射，启动时显式注册；
//! - 消息工厂（`factory`）：由 `(metadata, body)` 重建具体类型的消息；
//! - 分发器（`dispatcher`）：按具体类型连接/断开处理器并扇出分发；
//! - 传输协作（`transport`）：信封、传输协议与进程内队列。
//!
//! 典型用法：
//! 1. 使用 `#[message_kind(message_type = "...")]` 声明消息类型；
//! 2. 启动时构建 `MessageRegistry` 并注册全部类型（可选 `MessageRegistry::install`）；
//! 3. 生产者构造 `Message<K>`，取出 `metadata()` / `body()` 交给传输层；
//! 4. 消费者调用 `build_message` 重建消息，交给 `MessageDispatcher::dispatch`。
//!
//! ```
//! use olympus_messaging::prelude::*;
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! let header = MessageHeader::builder()
//!     .channel("barclays.tba")
//!     .request_id("test-request-123")
//!     .loyalty_plan("iceland-bonus-card")
//!     .build();
//! let join = Message::new(
//!     header,
//!     JoinApplication {
//!         join_data: BTreeMap::from([("barcode".to_string(), "Y".to_string())]),
//!     },
//! )?;
//!
//! let dispatcher = MessageDispatcher::new();
//! dispatcher.connect::<JoinApplication, _>(Arc::new(
//!     |message: &Message<JoinApplication>| -> anyhow::Result<()> {
//!         assert_eq!(message.loyalty_plan(), "iceland-bonus-card");
//!         Ok(())
//!     },
//! ));
//!
//! let received = build_message(&join.metadata(), join.body()?)?;
//! assert_eq!(dispatcher.dispatch(received.as_ref())?, 1);
//! # Ok::<(), olympus_messaging::error::MessageError>(())
//! ```
//!
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod factory;
pub mod kinds;
pub mod message;
pub mod registry;
pub mod transport;

pub use olympus_messaging_macros::message_kind;

pub mod prelude {
    pub use crate::config::{DispatcherConfig, DuplicatePolicy, FailurePolicy, RegistryConfig};
    pub use crate::dispatcher::{MessageDispatcher, MessageHandler};
    pub use crate::error::{MessageError, MessageResult};
    pub use crate::factory::build_message;
    pub use crate::kinds::{JoinApplication, LoyaltyCardRemovedBink};
    pub use crate::message::{AnyMessage, Body, Message, MessageHeader, MessageKind, Metadata};
    pub use crate::message_kind;
    pub use crate::registry::{MessageDescriptor, MessageRegistry};
    pub use crate::transport::{Consumer, Envelope, InMemoryQueue, Transport, publish};
}

// 允许在本 crate 内部通过 ::olympus_messaging 进行自引用，
// 以便过程宏在本 crate（含单元测试）中也能解析到 ::olympus_messaging 路径。
extern crate self as olympus_messaging;

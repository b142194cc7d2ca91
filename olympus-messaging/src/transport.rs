//! 传输协作方（Transport）
//!
//! 核心只要求传输层能一次搬运一个 `(metadata, body)`，这里提供：
//! - `Envelope`：可序列化的 `(metadata, body)` 对，便于写入任意字节传输；
//! - `Transport`：发送/接收信封的最小协议；
//! - `InMemoryQueue`：进程内 FIFO 实现，用于测试、示例与本地开发；
//! - `Consumer`：接收 → 重建 → 分发的消费循环。
//!
//! 注意：内存队列不提供任何持久化或投递保证。

use crate::dispatcher::MessageDispatcher;
use crate::error::{MessageError, MessageResult};
use crate::message::{AnyMessage, Body, Message, MessageKind, Metadata};
use crate::registry::MessageRegistry;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// 信封：传输层看到的消息形态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub metadata: Metadata,
    pub body: Body,
}

impl Envelope {
    pub fn new(metadata: Metadata, body: Body) -> Self {
        Self { metadata, body }
    }

    /// 封装消息
    pub fn seal<K: MessageKind>(message: &Message<K>) -> MessageResult<Self> {
        Ok(Self {
            metadata: message.metadata(),
            body: message.body()?,
        })
    }

    /// 借助注册表拆封为具体消息
    pub fn open(self, registry: &MessageRegistry) -> MessageResult<Box<dyn AnyMessage>> {
        registry.build_message(&self.metadata, self.body)
    }

    pub fn message_type(&self) -> Option<&str> {
        self.metadata
            .get(crate::message::keys::TYPE)
            .map(String::as_str)
    }

    pub fn to_json(&self) -> MessageResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(bytes: &[u8]) -> MessageResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn into_parts(self) -> (Metadata, Body) {
        (self.metadata, self.body)
    }
}

/// 传输协议：一次搬运一个信封，顺序与投递保证由实现决定
pub trait Transport: Send + Sync {
    fn send(&self, envelope: Envelope) -> MessageResult<()>;

    /// 取出下一个信封；暂无消息时返回 `None`
    fn receive(&self) -> MessageResult<Option<Envelope>>;
}

impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    fn send(&self, envelope: Envelope) -> MessageResult<()> {
        (**self).send(envelope)
    }

    fn receive(&self) -> MessageResult<Option<Envelope>> {
        (**self).receive()
    }
}

/// 封装消息并发送
pub fn publish<K, T>(transport: &T, message: &Message<K>) -> MessageResult<()>
where
    K: MessageKind,
    T: Transport + ?Sized,
{
    let envelope = Envelope::seal(message)?;
    debug!(
        message_type = K::MESSAGE_TYPE,
        request_id = message.request_id(),
        "Publishing message"
    );
    transport.send(envelope)
}

/// 进程内 FIFO 队列，克隆后共享同一底层队列
#[derive(Clone, Default)]
pub struct InMemoryQueue {
    inner: Arc<Mutex<VecDeque<Envelope>>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前排队的信封数量；锁中毒时与收发一样返回 `Transport` 错误
    pub fn len(&self) -> MessageResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> MessageResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> MessageResult<MutexGuard<'_, VecDeque<Envelope>>> {
        self.inner
            .lock()
            .map_err(|e| MessageError::transport(e.to_string()))
    }
}

impl Transport for InMemoryQueue {
    fn send(&self, envelope: Envelope) -> MessageResult<()> {
        self.lock()?.push_back(envelope);
        Ok(())
    }

    fn receive(&self) -> MessageResult<Option<Envelope>> {
        Ok(self.lock()?.pop_front())
    }
}

/// 消费者：从传输层取出信封，重建消息并分发
pub struct Consumer<'a> {
    registry: &'a MessageRegistry,
    dispatcher: &'a MessageDispatcher,
}

impl<'a> Consumer<'a> {
    pub fn new(registry: &'a MessageRegistry, dispatcher: &'a MessageDispatcher) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    /// 使用进程级注册表
    pub fn with_global_registry(dispatcher: &'a MessageDispatcher) -> Self {
        Self::new(MessageRegistry::global(), dispatcher)
    }

    /// 处理一个信封；队列为空时返回 `false`
    pub fn consume_one<T: Transport + ?Sized>(&self, transport: &T) -> MessageResult<bool> {
        let Some(envelope) = transport.receive()? else {
            return Ok(false);
        };

        let message = envelope.open(self.registry)?;
        let handled = self.dispatcher.dispatch(message.as_ref())?;
        debug!(
            message_type = message.message_type(),
            handlers = handled,
            "Message consumed"
        );
        Ok(true)
    }

    /// 处理直到队列为空，返回处理的消息数量；遇到错误立即返回
    pub fn drain<T: Transport + ?Sized>(&self, transport: &T) -> MessageResult<usize> {
        let mut consumed = 0;
        while self.consume_one(transport)? {
            consumed += 1;
        }
        Ok(consumed)
    }
}

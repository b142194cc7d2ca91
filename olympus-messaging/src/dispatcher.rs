//! 消息分发器（MessageDispatcher）
//!
//! 按具体消息类型（`TypeId`）维护处理器集合：
//! - `connect`：按 `Arc` 身份去重，重复连接不会增加调用次数；
//! - `disconnect`：未连接时返回 `UnknownHandler`；
//! - `dispatch`：仅匹配消息的具体类型，依次同步调用处理器，顺序不保证。
//!
//! 分发前会对处理器集合做快照，处理器内部可以安全地 connect/disconnect。
//! 处理器失败时的行为由 `DispatcherConfig::failure_policy` 决定。
//!
use crate::config::{DispatcherConfig, FailurePolicy};
use crate::error::{HandlerFailure, MessageError, MessageResult};
use crate::message::{AnyMessage, Message, MessageKind, kind_name};
use dashmap::DashMap;
use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{debug, warn};

/// 消息处理器：处理某一具体类型的消息
pub trait MessageHandler<K>: Send + Sync
where
    K: MessageKind,
{
    /// 处理器名称（用于日志与失败记录）
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn handle(&self, message: &Message<K>) -> anyhow::Result<()>;
}

impl<K, F> MessageHandler<K> for F
where
    K: MessageKind,
    F: Fn(&Message<K>) -> anyhow::Result<()> + Send + Sync,
{
    fn handle(&self, message: &Message<K>) -> anyhow::Result<()> {
        self(message)
    }
}

type ErasedHandlerFn = Arc<dyn Fn(&dyn AnyMessage) -> anyhow::Result<()> + Send + Sync>;

/// 处理器身份：调用方传入的 `Arc` 所指向的地址
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct HandlerKey(usize);

impl HandlerKey {
    fn of<H: ?Sized>(handler: &Arc<H>) -> Self {
        Self(Arc::as_ptr(handler).cast::<()>() as usize)
    }
}

#[derive(Clone)]
struct ErasedHandler {
    name: String,
    invoke: ErasedHandlerFn,
}

impl ErasedHandler {
    fn new<K, H>(handler: Arc<H>) -> Self
    where
        K: MessageKind,
        H: MessageHandler<K> + ?Sized + 'static,
    {
        let name = handler.handler_name().to_string();

        // 键与闭包同一泛型 K，正常情况下 downcast 不会失败
        let invoke: ErasedHandlerFn = Arc::new(move |message: &dyn AnyMessage| {
            match message.downcast_ref::<K>() {
                Some(message) => handler.handle(message),
                None => Err(MessageError::TypeMismatch {
                    expected: kind_name::<K>(),
                    found: message.kind_name(),
                }
                .into()),
            }
        });

        Self { name, invoke }
    }
}

/// 按具体消息类型分发的观察者注册表
///
/// 每个实例独立维护自己的处理器集合；需要跨线程共享时包一层 `Arc`。
pub struct MessageDispatcher {
    handlers: DashMap<TypeId, HashMap<HandlerKey, ErasedHandler>>,
    config: DispatcherConfig,
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::with_config(DispatcherConfig::default())
    }
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            handlers: DashMap::new(),
            config,
        }
    }

    /// 为类型 `K` 连接处理器；同一个 `Arc` 重复连接为无操作
    pub fn connect<K, H>(&self, handler: Arc<H>)
    where
        K: MessageKind,
        H: MessageHandler<K> + ?Sized + 'static,
    {
        // 处理器名称由调用方实现，须在持有分片锁之前取得
        let key = HandlerKey::of(&handler);
        let erased = ErasedHandler::new::<K, H>(handler);

        let inserted = {
            let mut set = self.handlers.entry(TypeId::of::<K>()).or_default();
            match set.entry(key) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(erased.clone());
                    true
                }
            }
        };

        if inserted {
            debug!(kind = kind_name::<K>(), handler = %erased.name, "Handler connected");
        } else {
            debug!(kind = kind_name::<K>(), handler = %erased.name, "Handler already connected");
        }
    }

    /// 断开类型 `K` 上的处理器
    pub fn disconnect<K, H>(&self, handler: &Arc<H>) -> MessageResult<()>
    where
        K: MessageKind,
        H: MessageHandler<K> + ?Sized + 'static,
    {
        let key = HandlerKey::of(handler);
        let removed = self
            .handlers
            .get_mut(&TypeId::of::<K>())
            .and_then(|mut set| set.remove(&key));

        match removed {
            Some(erased) => {
                debug!(kind = kind_name::<K>(), handler = %erased.name, "Handler disconnected");
                Ok(())
            }
            None => Err(MessageError::UnknownHandler {
                kind: kind_name::<K>(),
            }),
        }
    }

    /// 将消息分发给其具体类型上的全部处理器，返回被调用的处理器数量
    pub fn dispatch(&self, message: &dyn AnyMessage) -> MessageResult<usize> {
        let handlers: Vec<ErasedHandler> = self
            .handlers
            .get(&message.kind_id())
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default();

        debug!(
            message_type = message.message_type(),
            request_id = %message.header().request_id,
            handlers = handlers.len(),
            "Dispatching message"
        );

        let mut failures = Vec::new();
        for handler in &handlers {
            let Err(error) = (handler.invoke)(message) else {
                continue;
            };

            warn!(
                handler = %handler.name,
                message_type = message.message_type(),
                error = %error,
                "Message handler failed"
            );

            match self.config.failure_policy {
                FailurePolicy::FailFast => {
                    return Err(MessageError::HandlerFailed {
                        handler: handler.name.clone(),
                        message_type: message.message_type(),
                        source: error,
                    });
                }
                FailurePolicy::RunAll => failures.push(HandlerFailure {
                    handler: handler.name.clone(),
                    error,
                }),
            }
        }

        if failures.is_empty() {
            Ok(handlers.len())
        } else {
            Err(MessageError::HandlersFailed {
                message_type: message.message_type(),
                failures,
            })
        }
    }

    /// 类型 `K` 上已连接的处理器数量
    pub fn handler_count<K: MessageKind>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<K>())
            .map(|set| set.len())
            .unwrap_or(0)
    }

    pub fn is_connected<K, H>(&self, handler: &Arc<H>) -> bool
    where
        K: MessageKind,
        H: MessageHandler<K> + ?Sized + 'static,
    {
        let key = HandlerKey::of(handler);
        self.handlers
            .get(&TypeId::of::<K>())
            .is_some_and(|set| set.contains_key(&key))
    }
}

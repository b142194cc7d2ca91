//! 消息类型注册表（MessageRegistry）
//!
//! 线上类型字符串 → 具体消息类型描述（`MessageDescriptor`）的映射。
//! - 每个类型在启动时通过显式调用 `register::<K>()` 注册一次，无删除接口；
//! - 冲突策略由 `RegistryConfig::duplicate_policy` 决定，默认拒绝；
//! - 进程级实例通过 `MessageRegistry::install` 显式安装，未安装时首次访问
//!   `MessageRegistry::global()` 会使用内置注册表。安装后只读，无需加锁。
//!
use crate::config::{DuplicatePolicy, RegistryConfig};
use crate::error::{MessageError, MessageResult};
use crate::kinds::{JoinApplication, LoyaltyCardRemovedBink};
use crate::message::{AnyMessage, Body, Message, MessageHeader, MessageKind, kind_name};
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

type Constructor = fn(MessageHeader, Body) -> MessageResult<Box<dyn AnyMessage>>;

/// 具体消息类型的描述：足以从字段映射构造出该类型的值
#[derive(Clone, Copy, Debug)]
pub struct MessageDescriptor {
    message_type: &'static str,
    kind_name: &'static str,
    kind_id: TypeId,
    constructor: Constructor,
}

impl MessageDescriptor {
    pub fn of<K: MessageKind>() -> Self {
        Self {
            message_type: K::MESSAGE_TYPE,
            kind_name: kind_name::<K>(),
            kind_id: TypeId::of::<K>(),
            constructor: construct::<K>,
        }
    }

    pub fn message_type(&self) -> &'static str {
        self.message_type
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    pub fn kind_id(&self) -> TypeId {
        self.kind_id
    }

    /// 以头部字段与消息体构造具体消息
    pub fn construct(&self, header: MessageHeader, body: Body) -> MessageResult<Box<dyn AnyMessage>> {
        (self.constructor)(header, body)
    }
}

fn construct<K: MessageKind>(
    header: MessageHeader,
    body: Body,
) -> MessageResult<Box<dyn AnyMessage>> {
    let payload: K = serde_json::from_value(Value::Object(body))
        .map_err(|err| MessageError::from_body_error(K::MESSAGE_TYPE, err))?;

    Ok(Box::new(Message::new(header, payload)?))
}

static GLOBAL: OnceLock<MessageRegistry> = OnceLock::new();

/// 消息类型注册表
#[derive(Debug, Default)]
pub struct MessageRegistry {
    kinds: HashMap<&'static str, MessageDescriptor>,
    config: RegistryConfig,
}

impl MessageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            kinds: HashMap::new(),
            config,
        }
    }

    pub fn builder() -> MessageRegistryBuilder {
        MessageRegistryBuilder::default()
    }

    /// 包含全部内置消息类型的注册表
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for descriptor in builtin_descriptors() {
            registry.kinds.insert(descriptor.message_type, descriptor);
        }
        registry
    }

    /// 注册具体消息类型
    pub fn register<K: MessageKind>(&mut self) -> MessageResult<()> {
        self.register_descriptor(MessageDescriptor::of::<K>())
    }

    /// 注册消息类型描述
    ///
    /// - 类型字符串为空：`InvalidKindDefinition`
    /// - 同一类型重复注册：无操作
    /// - 不同类型使用同一字符串：按 `DuplicatePolicy` 拒绝或覆盖
    pub fn register_descriptor(&mut self, descriptor: MessageDescriptor) -> MessageResult<()> {
        if descriptor.message_type.is_empty() {
            return Err(MessageError::InvalidKindDefinition {
                kind: descriptor.kind_name,
            });
        }

        if let Some(existing) = self.kinds.get(descriptor.message_type) {
            if existing.kind_id == descriptor.kind_id {
                return Ok(());
            }

            match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    return Err(MessageError::DuplicateMessageType {
                        message_type: descriptor.message_type.to_string(),
                        existing: existing.kind_name,
                        incoming: descriptor.kind_name,
                    });
                }
                DuplicatePolicy::Replace => {
                    warn!(
                        message_type = descriptor.message_type,
                        existing = existing.kind_name,
                        incoming = descriptor.kind_name,
                        "Message type registered twice, replacing previous kind"
                    );
                }
            }
        }

        debug!(
            message_type = descriptor.message_type,
            kind = descriptor.kind_name,
            "Message kind registered"
        );
        self.kinds.insert(descriptor.message_type, descriptor);
        Ok(())
    }

    /// 按线上类型字符串查找描述
    pub fn resolve(&self, message_type: &str) -> MessageResult<&MessageDescriptor> {
        self.kinds
            .get(message_type)
            .ok_or_else(|| MessageError::UnknownMessageType {
                message_type: message_type.to_string(),
            })
    }

    pub fn contains(&self, message_type: &str) -> bool {
        self.kinds.contains_key(message_type)
    }

    /// 已注册的类型字符串（排序后）
    pub fn message_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.kinds.keys().copied().collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// 进程级注册表；未显式安装时使用 `builtin()`
    pub fn global() -> &'static MessageRegistry {
        GLOBAL.get_or_init(Self::builtin)
    }

    /// 安装进程级注册表，须在首次访问 `global()` 之前调用
    pub fn install(registry: MessageRegistry) -> MessageResult<()> {
        GLOBAL
            .set(registry)
            .map_err(|_| MessageError::RegistryAlreadyInitialized)?;
        debug!(
            kinds = MessageRegistry::global().len(),
            "Global message registry installed"
        );
        Ok(())
    }
}

fn builtin_descriptors() -> [MessageDescriptor; 2] {
    [
        MessageDescriptor::of::<JoinApplication>(),
        MessageDescriptor::of::<LoyaltyCardRemovedBink>(),
    ]
}

/// 链式构建注册表
#[derive(Debug, Default)]
pub struct MessageRegistryBuilder {
    registry: MessageRegistry,
}

impl MessageRegistryBuilder {
    /// 设置配置；已注册的类型不会被重新校验
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.registry.config = config;
        self
    }

    pub fn with_kind<K: MessageKind>(mut self) -> MessageResult<Self> {
        self.registry.register::<K>()?;
        Ok(self)
    }

    pub fn with_builtin_kinds(mut self) -> MessageResult<Self> {
        for descriptor in builtin_descriptors() {
            self.registry.register_descriptor(descriptor)?;
        }
        Ok(self)
    }

    pub fn build(self) -> MessageRegistry {
        self.registry
    }
}

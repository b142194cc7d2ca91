use std::any::{Any, TypeId};
use std::fmt;

use super::{Body, Message, MessageHeader, MessageKind, Metadata, kind_name};
use crate::error::MessageResult;

/// 类型擦除的消息视图
///
/// 工厂（`build_message`）返回 `Box<dyn AnyMessage>`，分发器按 `kind_id` 精确路由；
/// 需要具体类型时通过 `downcast_ref::<K>()` 还原。
pub trait AnyMessage: fmt::Debug + Send + Sync + 'static {
    /// 具体消息类型的标识（用于精确匹配，不做继承层次上的匹配）
    fn kind_id(&self) -> TypeId;

    fn kind_name(&self) -> &'static str;

    fn message_type(&self) -> &'static str;

    fn header(&self) -> &MessageHeader;

    fn metadata(&self) -> Metadata;

    fn body(&self) -> MessageResult<Body>;

    fn as_any(&self) -> &dyn Any;

    fn clone_boxed(&self) -> Box<dyn AnyMessage>;

    /// 结构相等：具体类型相同且字段逐一相等
    fn eq_message(&self, other: &dyn AnyMessage) -> bool;
}

impl<K> AnyMessage for Message<K>
where
    K: MessageKind,
{
    fn kind_id(&self) -> TypeId {
        TypeId::of::<K>()
    }

    fn kind_name(&self) -> &'static str {
        kind_name::<K>()
    }

    fn message_type(&self) -> &'static str {
        K::MESSAGE_TYPE
    }

    fn header(&self) -> &MessageHeader {
        Message::header(self)
    }

    fn metadata(&self) -> Metadata {
        Message::metadata(self)
    }

    fn body(&self) -> MessageResult<Body> {
        Message::body(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn AnyMessage> {
        Box::new(self.clone())
    }

    fn eq_message(&self, other: &dyn AnyMessage) -> bool {
        other
            .as_any()
            .downcast_ref::<Message<K>>()
            .is_some_and(|other| self == other)
    }
}

impl dyn AnyMessage {
    /// 是否为具体类型 `K` 的消息
    pub fn is<K: MessageKind>(&self) -> bool {
        self.kind_id() == TypeId::of::<K>()
    }

    pub fn downcast_ref<K: MessageKind>(&self) -> Option<&Message<K>> {
        self.as_any().downcast_ref::<Message<K>>()
    }
}

impl PartialEq for dyn AnyMessage {
    fn eq(&self, other: &Self) -> bool {
        self.eq_message(other)
    }
}

impl<K> PartialEq<Message<K>> for dyn AnyMessage
where
    K: MessageKind,
{
    fn eq(&self, other: &Message<K>) -> bool {
        self.downcast_ref::<K>().is_some_and(|message| message == other)
    }
}

impl Clone for Box<dyn AnyMessage> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

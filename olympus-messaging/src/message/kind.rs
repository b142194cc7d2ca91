use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use super::Body;
use crate::error::{MessageError, MessageResult};

/// 具体消息类型（kind）需要满足的能力边界
///
/// 实现者即消息体的载荷结构，通常通过 `#[message_kind(...)]` 宏声明：
///
/// ```
/// use olympus_messaging::message_kind;
/// use olympus_messaging::message::MessageKind;
///
/// #[message_kind(message_type = "loyalty_card.added.demo")]
/// struct CardAdded {
///     loyalty_id: String,
/// }
///
/// assert_eq!(CardAdded::MESSAGE_TYPE, "loyalty_card.added.demo");
/// ```
pub trait MessageKind:
    Clone + PartialEq + fmt::Debug + DeserializeOwned + Send + Sync + 'static
{
    /// 线上类型字符串，同时作为注册表键与元数据中的 `type`
    const MESSAGE_TYPE: &'static str;

    /// 序列化消息体；未覆写时在调用处报 `UnimplementedSerialization`
    fn serialize_body(&self) -> MessageResult<Body> {
        Err(MessageError::UnimplementedSerialization {
            kind: kind_name::<Self>(),
        })
    }
}

/// 以 serde 将载荷序列化为消息体，载荷必须序列化为 JSON 对象
pub fn serialize_body<K>(payload: &K) -> MessageResult<Body>
where
    K: MessageKind + Serialize,
{
    match serde_json::to_value(payload)? {
        Value::Object(body) => Ok(body),
        other => Err(MessageError::MalformedBody {
            message_type: K::MESSAGE_TYPE.to_string(),
            reason: format!("body must serialize to a JSON object, got {other}"),
        }),
    }
}

/// 类型的短名称（去掉模块路径与泛型参数），用于错误与日志
pub fn kind_name<K: ?Sized>() -> &'static str {
    let full = std::any::type_name::<K>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod nested {
        pub struct Probe<T>(pub T);
    }

    #[test]
    fn kind_name_strips_path_and_generics() {
        assert_eq!(kind_name::<nested::Probe<String>>(), "Probe");
        assert_eq!(kind_name::<String>(), "String");
    }

    #[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
    struct Scalar(u32);

    impl MessageKind for Scalar {
        const MESSAGE_TYPE: &'static str = "test.scalar";
    }

    #[test]
    fn default_serialize_body_is_unimplemented() {
        match Scalar(1).serialize_body().unwrap_err() {
            MessageError::UnimplementedSerialization { kind } => assert_eq!(kind, "Scalar"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn serialize_body_rejects_non_objects() {
        match serialize_body(&Scalar(1)).unwrap_err() {
            MessageError::MalformedBody { message_type, .. } => {
                assert_eq!(message_type, "test.scalar")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

//! 消息层统一错误定义
//!
//! 覆盖消息类型定义、序列化/重建、注册表与分发器的最小必要集合，
//! 全部为本地、同步、立即上抛的错误，不做重试或吞掉处理。
//!
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MessageError {
    // --- 消息类型定义 ---
    #[error("{kind} has no message type")]
    InvalidKindDefinition { kind: &'static str },
    #[error("{kind} must implement serialize_body")]
    UnimplementedSerialization { kind: &'static str },

    // --- 重建（工厂） ---
    #[error("unknown message type: {message_type}")]
    UnknownMessageType { message_type: String },
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },
    #[error("malformed body: type={message_type}, reason={reason}")]
    MalformedBody {
        message_type: String,
        reason: String,
    },
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // --- 注册表 ---
    #[error(
        "duplicate message type: type={message_type}, existing={existing}, incoming={incoming}"
    )]
    DuplicateMessageType {
        message_type: String,
        existing: &'static str,
        incoming: &'static str,
    },
    #[error("global message registry already initialized")]
    RegistryAlreadyInitialized,

    // --- 分发器 ---
    #[error("handler not connected for {kind}")]
    UnknownHandler { kind: &'static str },
    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("handler failed: handler={handler}, type={message_type}, reason={source}")]
    HandlerFailed {
        handler: String,
        message_type: &'static str,
        source: anyhow::Error,
    },
    #[error("{} handler(s) failed for {message_type}", failures.len())]
    HandlersFailed {
        message_type: &'static str,
        failures: Vec<HandlerFailure>,
    },

    // --- 传输 ---
    #[error("transport error: {reason}")]
    Transport { reason: String },
}

/// 单个处理器的失败记录（`FailurePolicy::RunAll` 下汇总返回）
#[derive(Debug)]
pub struct HandlerFailure {
    pub handler: String,
    pub error: anyhow::Error,
}

impl MessageError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// 将 body 反序列化失败归类：缺字段为 `MissingRequiredField`，其余为 `MalformedBody`
    pub(crate) fn from_body_error(message_type: &str, err: serde_json::Error) -> Self {
        let reason = err.to_string();
        match missing_field_name(&reason) {
            Some(field) => Self::missing_field(field),
            None => Self::MalformedBody {
                message_type: message_type.to_string(),
                reason,
            },
        }
    }
}

// serde 没有公开“缺字段”的错误种类，只能识别 `de::Error::missing_field` 的 Display 文本
// "missing field `name`"（serde_json 会在末尾附加位置信息）。
// serde 若调整该文本，缺字段会退化为 `MalformedBody`，由 `missing_body_field_is_classified` 兜底。
fn missing_field_name(reason: &str) -> Option<&str> {
    let rest = reason.strip_prefix("missing field `")?;
    rest.split_once('`').map(|(field, _)| field)
}

/// 统一 Result 类型别名
pub type MessageResult<T> = Result<T, MessageError>;

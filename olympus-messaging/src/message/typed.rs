use super::{Body, MessageHeader, MessageKind, Metadata, keys, kind_name};
use crate::error::{MessageError, MessageResult};

/// 消息，包含公共头部与具体类型的载荷
///
/// 构造后不可变：所谓"修改"总是通过 [`Message::replace`] / [`Message::with_payload`]
/// 得到一个新值。相等性为逐字段的结构相等。
#[derive(Debug, Clone, PartialEq)]
pub struct Message<K>
where
    K: MessageKind,
{
    header: MessageHeader,
    payload: K,
}

impl<K> Message<K>
where
    K: MessageKind,
{
    /// 构造消息；类型字符串为空时返回 `InvalidKindDefinition`
    pub fn new(header: MessageHeader, payload: K) -> MessageResult<Self> {
        if K::MESSAGE_TYPE.is_empty() {
            return Err(MessageError::InvalidKindDefinition {
                kind: kind_name::<K>(),
            });
        }

        Ok(Self {
            header: header.normalized(),
            payload,
        })
    }

    pub fn message_type(&self) -> &'static str {
        K::MESSAGE_TYPE
    }

    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    pub fn payload(&self) -> &K {
        &self.payload
    }

    pub fn channel(&self) -> &str {
        &self.header.channel
    }

    pub fn request_id(&self) -> &str {
        &self.header.request_id
    }

    pub fn loyalty_plan(&self) -> &str {
        &self.header.loyalty_plan
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.header.transaction_id.as_deref()
    }

    pub fn bink_user_id(&self) -> Option<&str> {
        self.header.bink_user_id.as_deref()
    }

    pub fn account_id(&self) -> Option<&str> {
        self.header.account_id.as_deref()
    }

    /// 传输元数据：`type`、`channel`、`request-id`、`loyalty-plan` 必有，
    /// 其余可选键仅在字段存在时出现
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(keys::TYPE.to_string(), K::MESSAGE_TYPE.to_string());
        self.header.write_metadata(&mut metadata);
        metadata
    }

    /// 消息体，委托给具体类型的 `serialize_body`
    pub fn body(&self) -> MessageResult<Body> {
        self.payload.serialize_body()
    }

    /// 拷贝并覆写头部字段
    ///
    /// ```
    /// use olympus_messaging::kinds::LoyaltyCardRemovedBink;
    /// use olympus_messaging::message::{Message, MessageHeader};
    ///
    /// let header = MessageHeader::builder()
    ///     .channel("bink")
    ///     .request_id("req-1")
    ///     .loyalty_plan("iceland-bonus-card")
    ///     .build();
    /// let payload = LoyaltyCardRemovedBink {
    ///     loyalty_id: "card-1".into(),
    /// };
    /// let removed = Message::new(header, payload).unwrap();
    ///
    /// let with_account = removed.replace(|h| h.account_id = Some("acc-9".into()));
    /// assert_eq!(with_account.account_id(), Some("acc-9"));
    /// assert_eq!(removed.account_id(), None);
    /// ```
    pub fn replace(&self, overrides: impl FnOnce(&mut MessageHeader)) -> Self {
        let mut header = self.header.clone();
        overrides(&mut header);

        Self {
            header: header.normalized(),
            payload: self.payload.clone(),
        }
    }

    /// 拷贝并替换载荷
    pub fn with_payload(&self, payload: K) -> Self {
        Self {
            header: self.header.clone(),
            payload,
        }
    }

    pub fn into_parts(self) -> (MessageHeader, K) {
        (self.header, self.payload)
    }
}

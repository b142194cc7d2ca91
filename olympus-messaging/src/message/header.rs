use bon::Builder;
use serde::{Deserialize, Serialize};

use super::{Metadata, keys};
use crate::error::{MessageError, MessageResult};

/// 所有消息共有的头部字段
///
/// 可选字段以"是否存在"区分，而非空值：`Some("")` 在构造消息时会被归一化为 `None`，
/// 序列化到元数据时不存在的字段直接省略。
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageHeader {
    #[builder(into)]
    pub channel: String,
    #[builder(into)]
    pub transaction_id: Option<String>,
    #[builder(into)]
    pub bink_user_id: Option<String>,
    #[builder(into)]
    pub request_id: String,
    #[builder(into)]
    pub loyalty_plan: String,
    #[builder(into)]
    pub account_id: Option<String>,
}

impl MessageHeader {
    /// 从线上元数据还原头部字段
    ///
    /// `channel`、`request-id`、`loyalty-plan` 缺失时返回 `MissingRequiredField`；
    /// 可选键缺失或为空时取 `None`。`type` 键由注册表处理，这里忽略。
    pub fn from_metadata(metadata: &Metadata) -> MessageResult<Self> {
        let required = |key: &str| {
            metadata
                .get(key)
                .cloned()
                .ok_or_else(|| MessageError::missing_field(key))
        };
        let optional = |key: &str| metadata.get(key).filter(|v| !v.is_empty()).cloned();

        Ok(Self {
            channel: required(keys::CHANNEL)?,
            transaction_id: optional(keys::TRANSACTION_ID),
            bink_user_id: optional(keys::BINK_USER_ID),
            request_id: required(keys::REQUEST_ID)?,
            loyalty_plan: required(keys::LOYALTY_PLAN)?,
            account_id: optional(keys::ACCOUNT_ID),
        })
    }

    /// 将头部字段写入元数据，可选字段仅在非空时写入
    pub(crate) fn write_metadata(&self, metadata: &mut Metadata) {
        metadata.insert(keys::CHANNEL.to_string(), self.channel.clone());
        metadata.insert(keys::REQUEST_ID.to_string(), self.request_id.clone());
        metadata.insert(keys::LOYALTY_PLAN.to_string(), self.loyalty_plan.clone());

        let optional = [
            (keys::TRANSACTION_ID, &self.transaction_id),
            (keys::BINK_USER_ID, &self.bink_user_id),
            (keys::ACCOUNT_ID, &self.account_id),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                metadata.insert(key.to_string(), value.to_string());
            }
        }
    }

    pub(crate) fn normalized(mut self) -> Self {
        for value in [
            &mut self.transaction_id,
            &mut self.bink_user_id,
            &mut self.account_id,
        ] {
            if value.as_deref().is_some_and(str::is_empty) {
                *value = None;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn from_metadata_reads_wire_keys() {
        let header = MessageHeader::from_metadata(&metadata(&[
            ("type", "ignored"),
            ("channel", "barclays.tba"),
            ("request-id", "req-1"),
            ("loyalty-plan", "iceland-bonus-card"),
            ("bink-user-id", "42"),
        ]))
        .unwrap();

        assert_eq!(header.channel, "barclays.tba");
        assert_eq!(header.request_id, "req-1");
        assert_eq!(header.loyalty_plan, "iceland-bonus-card");
        assert_eq!(header.bink_user_id.as_deref(), Some("42"));
        assert_eq!(header.transaction_id, None);
        assert_eq!(header.account_id, None);
    }

    #[test]
    fn from_metadata_requires_request_id() {
        let err = MessageHeader::from_metadata(&metadata(&[
            ("channel", "barclays.tba"),
            ("loyalty-plan", "iceland-bonus-card"),
        ]))
        .unwrap_err();

        match err {
            MessageError::MissingRequiredField { field } => assert_eq!(field, "request-id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_optional_values_are_absent() {
        let header = MessageHeader::from_metadata(&metadata(&[
            ("channel", "c"),
            ("request-id", "r"),
            ("loyalty-plan", "p"),
            ("account-id", ""),
        ]))
        .unwrap();
        assert_eq!(header.account_id, None);

        let mut out = Metadata::new();
        MessageHeader::builder()
            .channel("c")
            .request_id("r")
            .loyalty_plan("p")
            .transaction_id("")
            .build()
            .write_metadata(&mut out);
        assert!(!out.contains_key(keys::TRANSACTION_ID));
    }

    #[test]
    fn normalized_drops_empty_optionals() {
        let header = MessageHeader::builder()
            .channel("c")
            .request_id("r")
            .loyalty_plan("p")
            .account_id("")
            .bink_user_id("7")
            .build()
            .normalized();

        assert_eq!(header.account_id, None);
        assert_eq!(header.bink_user_id.as_deref(), Some("7"));
    }
}

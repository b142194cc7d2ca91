//! 消息工厂（build_message）
//!
//! 由传输层收到的 `(Metadata, Body)` 借助注册表重建具体类型的消息：
//! `build_message(&m.metadata(), m.body()?) == m` 对任意合法消息成立。
//!
use crate::error::{MessageError, MessageResult};
use crate::message::{AnyMessage, Body, MessageHeader, Metadata, keys};
use crate::registry::MessageRegistry;

impl MessageRegistry {
    /// 从元数据与消息体重建消息
    ///
    /// - 缺少 `type`：`MissingRequiredField`
    /// - 类型未注册：`UnknownMessageType`
    /// - 头部或消息体缺少必需字段：`MissingRequiredField`
    /// - 消息体含多余或类型不符的字段：`MalformedBody`
    pub fn build_message(
        &self,
        metadata: &Metadata,
        body: Body,
    ) -> MessageResult<Box<dyn AnyMessage>> {
        let message_type = metadata
            .get(keys::TYPE)
            .ok_or_else(|| MessageError::missing_field(keys::TYPE))?;
        let descriptor = self.resolve(message_type)?;
        let header = MessageHeader::from_metadata(metadata)?;

        descriptor.construct(header, body)
    }
}

/// 使用进程级注册表重建消息
pub fn build_message(metadata: &Metadata, body: Body) -> MessageResult<Box<dyn AnyMessage>> {
    MessageRegistry::global().build_message(metadata, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{JoinApplication, LoyaltyCardRemovedBink};
    use crate::message::{Message, MessageKind};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn join_message() -> Message<JoinApplication> {
        let header = MessageHeader::builder()
            .channel("barclays.tba")
            .request_id("test-request-123")
            .loyalty_plan("iceland-bonus-card")
            .build();
        Message::new(
            header,
            JoinApplication {
                join_data: BTreeMap::from([
                    ("card_number".to_string(), "test-card-number-123".to_string()),
                    ("barcode".to_string(), "test-barcode-123".to_string()),
                ]),
            },
        )
        .unwrap()
    }

    fn body(value: serde_json::Value) -> Body {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn build_message_round_trips() {
        let message = join_message();
        let built = build_message(&message.metadata(), message.body().unwrap()).unwrap();

        assert!(*built == message);
        assert_eq!(built.downcast_ref::<JoinApplication>(), Some(&message));
    }

    #[test]
    fn round_trip_keeps_optional_fields() {
        let message = join_message().replace(|h| {
            h.transaction_id = Some("test-transaction-id-123".into());
            h.bink_user_id = Some("test-bink-user-id-123".into());
            h.account_id = Some("test-account-id-123".into());
        });
        let built = MessageRegistry::builtin()
            .build_message(&message.metadata(), message.body().unwrap())
            .unwrap();

        assert!(*built == message);
    }

    #[test]
    fn removed_bink_round_trips_with_all_optional_fields() {
        let header = MessageHeader::builder()
            .channel("bink")
            .request_id("test-request-456")
            .loyalty_plan("iceland-bonus-card")
            .transaction_id("test-transaction-id-456")
            .bink_user_id("test-bink-user-id-456")
            .account_id("test-account-id-456")
            .build();
        let message = Message::new(
            header,
            LoyaltyCardRemovedBink {
                loyalty_id: "card-7".into(),
            },
        )
        .unwrap();

        let built = build_message(&message.metadata(), message.body().unwrap()).unwrap();

        assert_eq!(built.downcast_ref::<LoyaltyCardRemovedBink>(), Some(&message));
        assert_eq!(built.metadata(), message.metadata());
    }

    #[test]
    fn missing_type_key_fails() {
        let mut metadata = join_message().metadata();
        metadata.remove(keys::TYPE);

        match build_message(&metadata, Body::new()).unwrap_err() {
            MessageError::MissingRequiredField { field } => assert_eq!(field, "type"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_fails_without_building() {
        let mut metadata = join_message().metadata();
        metadata.insert(keys::TYPE.to_string(), "nonexistent.kind".to_string());

        match build_message(&metadata, join_message().body().unwrap()).unwrap_err() {
            MessageError::UnknownMessageType { message_type } => {
                assert_eq!(message_type, "nonexistent.kind")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_header_field_fails() {
        let mut metadata = join_message().metadata();
        metadata.remove(keys::LOYALTY_PLAN);

        match build_message(&metadata, join_message().body().unwrap()).unwrap_err() {
            MessageError::MissingRequiredField { field } => assert_eq!(field, "loyalty-plan"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_body_field_fails() {
        let metadata = join_message().metadata();

        match build_message(&metadata, Body::new()).unwrap_err() {
            MessageError::MissingRequiredField { field } => assert_eq!(field, "join_data"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn extra_body_field_is_malformed() {
        let mut metadata = join_message().metadata();
        metadata.insert(
            keys::TYPE.to_string(),
            LoyaltyCardRemovedBink::MESSAGE_TYPE.to_string(),
        );

        let err = build_message(
            &metadata,
            body(json!({ "loyalty_id": "card-1", "unexpected": true })),
        )
        .unwrap_err();
        match err {
            MessageError::MalformedBody { message_type, .. } => {
                assert_eq!(message_type, "loyalty_card.removed.bink")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

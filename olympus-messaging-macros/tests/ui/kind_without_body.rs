use olympus_messaging::error::MessageError;
use olympus_messaging::message::MessageKind;
use olympus_messaging_macros::message_kind;

#[message_kind(message_type = "test.no_body", serialize_body = false)]
struct Silent {}

fn main() {
    let silent = Silent {};
    match silent.serialize_body() {
        Err(MessageError::UnimplementedSerialization { kind }) => assert_eq!(kind, "Silent"),
        other => panic!("unexpected: {other:?}"),
    }
}

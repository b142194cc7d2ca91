use olympus_messaging::message::MessageKind;
use olympus_messaging_macros::message_kind;

#[message_kind(message_type = "loyalty_card.bound.test")]
#[serde(bound(deserialize = "String: Default"), deny_unknown_fields)]
struct Bound {
    loyalty_id: String,
}

fn main() {
    let body = Bound {
        loyalty_id: "x".into(),
    }
    .serialize_body()
    .unwrap();
    assert_eq!(body["loyalty_id"], "x");
    assert_eq!(Bound::MESSAGE_TYPE, "loyalty_card.bound.test");
}

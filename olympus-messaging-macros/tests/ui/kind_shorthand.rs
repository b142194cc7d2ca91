use olympus_messaging::message::MessageKind;
use olympus_messaging_macros::message_kind;
use serde::Serialize;

#[message_kind("loyalty_card.removed.test")]
#[derive(Serialize, Eq)]
#[serde(rename_all = "camelCase")]
struct Removed {
    loyalty_id: String,
}

fn main() {
    let body = Removed {
        loyalty_id: "x".into(),
    }
    .serialize_body()
    .unwrap();
    assert!(body.contains_key("loyaltyId"));
    assert_eq!(Removed::MESSAGE_TYPE, "loyalty_card.removed.test");
}

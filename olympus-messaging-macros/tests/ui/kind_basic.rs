use olympus_messaging::message::MessageKind;
use olympus_messaging_macros::message_kind;
use std::collections::BTreeMap;

#[message_kind(message_type = "loyalty_account.add.application")]
struct AddApplication {
    add_fields: BTreeMap<String, String>,
}

fn main() {
    let payload = AddApplication {
        add_fields: BTreeMap::new(),
    };
    assert_eq!(AddApplication::MESSAGE_TYPE, "loyalty_account.add.application");
    assert!(payload.serialize_body().is_ok());
    assert_eq!(payload.clone(), payload);
}

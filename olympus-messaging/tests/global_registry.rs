use olympus_messaging::prelude::*;
use std::collections::BTreeMap;

#[message_kind(message_type = "loyalty_account.join.failed")]
struct JoinFailed {
    reason: String,
}

// 单独的测试二进制：进程级注册表只会被安装一次
#[test]
fn installed_registry_serves_build_message() {
    let registry = MessageRegistry::builder()
        .with_builtin_kinds()
        .unwrap()
        .with_kind::<JoinFailed>()
        .unwrap()
        .build();
    MessageRegistry::install(registry).unwrap();

    let header = MessageHeader::builder()
        .channel("barclays.tba")
        .request_id("req-9")
        .loyalty_plan("iceland-bonus-card")
        .bink_user_id("12345")
        .build();
    let failed = Message::new(
        header.clone(),
        JoinFailed {
            reason: "card number rejected".into(),
        },
    )
    .unwrap();
    let built = build_message(&failed.metadata(), failed.body().unwrap()).unwrap();
    assert!(*built == failed);

    let join = Message::new(
        header,
        JoinApplication {
            join_data: BTreeMap::new(),
        },
    )
    .unwrap();
    let built = build_message(&join.metadata(), join.body().unwrap()).unwrap();
    assert!(built.is::<JoinApplication>());

    assert!(matches!(
        MessageRegistry::install(MessageRegistry::builtin()),
        Err(MessageError::RegistryAlreadyInitialized)
    ));
}

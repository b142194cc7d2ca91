//! 发布者 → 内存队列 → 消费者 的完整流程示例
//!
//! 运行：`RUST_LOG=debug cargo run -p demo`

use anyhow::Result;
use olympus_messaging::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn publisher(queue: &InMemoryQueue) -> Result<()> {
    let header = MessageHeader::builder()
        .channel("barclays.tba")
        .transaction_id("example-transaction")
        .bink_user_id("12345")
        .request_id(Uuid::new_v4().to_string())
        .loyalty_plan("iceland-bonus-card")
        .account_id("example@testbink.com")
        .build();
    let message = Message::new(
        header,
        JoinApplication {
            join_data: BTreeMap::from([
                ("name".to_string(), "mr example".to_string()),
                ("postcode".to_string(), "AB12 3CD".to_string()),
            ]),
        },
    )?;

    publish(queue, &message)?;
    publish(
        queue,
        &Message::new(
            message.header().clone(),
            JoinSuccess {
                scheme_account_id: "sa-001".into(),
            },
        )?,
    )?;

    println!("Publisher sent: {}", message.message_type());
    println!("{}", serde_json::to_string_pretty(&Envelope::seal(&message)?)?);
    println!();
    Ok(())
}

/// 示例自定义类型：需在首次使用全局注册表前安装
#[message_kind(message_type = "loyalty_account.join.success")]
struct JoinSuccess {
    scheme_account_id: String,
}

struct PrintJoin;

impl MessageHandler<JoinApplication> for PrintJoin {
    fn handler_name(&self) -> &str {
        "print-join"
    }

    fn handle(&self, message: &Message<JoinApplication>) -> Result<()> {
        println!("Consumer received: {}", message.message_type());
        println!("{message:#?}");
        println!();
        Ok(())
    }
}

fn consumer(queue: &InMemoryQueue) -> Result<()> {
    let dispatcher = MessageDispatcher::new();
    dispatcher.connect::<JoinApplication, _>(Arc::new(PrintJoin));
    dispatcher.connect::<JoinSuccess, _>(Arc::new(
        |message: &Message<JoinSuccess>| -> Result<()> {
            println!(
                "Consumer received: {} for {}",
                message.message_type(),
                message.payload().scheme_account_id
            );
            Ok(())
        },
    ));

    let consumed = Consumer::with_global_registry(&dispatcher).drain(queue)?;
    info!(consumed, "Queue drained");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    MessageRegistry::install(
        MessageRegistry::builder()
            .with_builtin_kinds()?
            .with_kind::<JoinSuccess>()?
            .build(),
    )?;

    let queue = InMemoryQueue::new();
    publisher(&queue)?;
    consumer(&queue)?;
    Ok(())
}

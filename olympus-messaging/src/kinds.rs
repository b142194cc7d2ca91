//! 内置消息类型
//!
//! 每个类型都需要在启动时显式注册到 `MessageRegistry`（`MessageRegistry::builtin()`
//! 已包含以下全部类型）。

use olympus_messaging_macros::message_kind;
use std::collections::BTreeMap;

/// 会员卡加入申请
#[message_kind(message_type = "loyalty_account.join.application")]
pub struct JoinApplication {
    pub join_data: BTreeMap<String, String>,
}

/// 会员卡已被 Bink 用户移除
#[message_kind(message_type = "loyalty_card.removed.bink")]
pub struct LoyaltyCardRemovedBink {
    pub loyalty_id: String,
}

//! 注册表与分发器配置

/// 两个类型注册相同线上类型字符串时的处理方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// 注册时报 `DuplicateMessageType`
    #[default]
    Reject,
    /// 后注册者覆盖先注册者（记录 warn 日志）
    Replace,
}

/// 某个处理器失败后，同一次分发中其余处理器如何处理
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// 第一个失败即中止本次分发
    #[default]
    FailFast,
    /// 执行全部处理器后汇总失败
    RunAll,
}

/// 注册表配置
#[derive(Clone, Copy, Debug, Default)]
pub struct RegistryConfig {
    pub duplicate_policy: DuplicatePolicy,
}

/// 分发器配置
#[derive(Clone, Copy, Debug, Default)]
pub struct DispatcherConfig {
    pub failure_policy: FailurePolicy,
}

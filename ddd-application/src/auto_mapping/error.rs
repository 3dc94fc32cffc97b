use thiserror::Error;

/// 命令与聚合构造函数之间的映射错误
///
/// 使用相同的命令与聚合重试只会得到相同结果，因此从不自动重试。
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("No constructor found with {count} parameters on aggregate root {aggregate_type}.")]
    NoConstructor {
        count: usize,
        aggregate_type: &'static str,
    },

    #[error(
        "Multiple constructors found with {count} parameters on aggregate root {aggregate_type}."
    )]
    AmbiguousConstructor {
        count: usize,
        aggregate_type: &'static str,
    },

    #[error("command {command} is not mapped to an aggregate constructor")]
    NotACreationCommand { command: &'static str },

    #[error("command {command} maps to aggregate {declared}, expected {expected}")]
    AggregateMismatch {
        command: &'static str,
        declared: &'static str,
        expected: &'static str,
    },

    #[error("constructor {constructor} of aggregate root {aggregate_type} produced no creation events")]
    EmptyCreation {
        constructor: &'static str,
        aggregate_type: &'static str,
    },

    #[error("argument count mismatch: expected={expected}, found={found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error("argument type mismatch: position={position}, expected={expected}, found={found}")]
    ArgumentType {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
}

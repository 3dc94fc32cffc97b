use super::error::MappingError;
use super::mapped_command::{MappedCommand, MappingTarget};
use ddd_domain::aggregate::Aggregate;

/// 创建类命令的元信息：命令名称与目标聚合类型
///
/// 每个创建动作构建一次，之后不再变化。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectCreationCommandInfo {
    command: &'static str,
    aggregate_type: &'static str,
}

impl ObjectCreationCommandInfo {
    /// 从命令推导元信息
    ///
    /// 命令未声明构造函数映射，或声明的聚合类型不是 `A` 时返回错误。
    pub fn from_command<A, C>(command: &C) -> Result<Self, MappingError>
    where
        A: Aggregate,
        C: MappedCommand,
    {
        match command.mapping_target() {
            MappingTarget::Constructor { aggregate_type } if aggregate_type == A::TYPE => {
                Ok(Self {
                    command: C::NAME,
                    aggregate_type,
                })
            }
            MappingTarget::Constructor { aggregate_type } => Err(MappingError::AggregateMismatch {
                command: C::NAME,
                declared: aggregate_type,
                expected: A::TYPE,
            }),
            MappingTarget::None => Err(MappingError::NotACreationCommand { command: C::NAME }),
        }
    }

    pub fn command(&self) -> &'static str {
        self.command
    }

    pub fn aggregate_type(&self) -> &'static str {
        self.aggregate_type
    }
}

use super::constructor::{Arguments, Parameter};
use super::error::MappingError;
use super::property::{MappedProperty, PropertyValue};
use crate::command::Command;
use ddd_domain::aggregate::Aggregate;

/// 命令声明的映射目标
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MappingTarget {
    /// 映射到指定聚合类型的构造函数（以 `Aggregate::TYPE` 标识）
    Constructor { aggregate_type: &'static str },
    /// 未声明映射
    None,
}

impl MappingTarget {
    pub fn constructor_of<A: Aggregate>() -> Self {
        Self::Constructor {
            aggregate_type: A::TYPE,
        }
    }
}

/// 可自动映射的命令
///
/// 通常由 `#[mapped_command]` 宏生成实现；手写实现时需保证
/// `mapped_properties` 与 `property_values` 的顺序与数量一致。
pub trait MappedCommand: Command {
    /// 命令的映射目标
    fn mapping_target(&self) -> MappingTarget;

    /// 参与映射的属性，按位置排列
    fn mapped_properties(&self) -> Vec<MappedProperty>;

    /// 参与映射的属性值，与 `mapped_properties` 一一对应
    fn property_values(&self) -> Vec<PropertyValue>;

    /// 为已解析构造函数的形参按位置提取实参
    fn parameter_values(&self, parameters: &[Parameter]) -> Result<Arguments, MappingError> {
        let values = self.property_values();
        if values.len() != parameters.len() {
            return Err(MappingError::ArgumentCount {
                expected: parameters.len(),
                found: values.len(),
            });
        }

        Ok(Arguments::new(values))
    }
}

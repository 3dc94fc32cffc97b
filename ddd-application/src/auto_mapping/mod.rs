//! 命令自动映射（auto mapping）
//!
//! 将“创建类”命令映射为聚合的新建：
//! - `MappedCommand`：命令暴露映射目标、参与映射的属性及其取值；
//! - `AggregateConstructors`：聚合显式注册的构造函数表，形参列表由函数签名生成；
//! - `resolve_constructor`：按属性的数量与类型（按位置）选出唯一匹配的构造函数；
//! - `ObjectCreationAction`：在工作单元中完成解析、调用与提交；
//! - `AutoMappedCommandHandler`：将上述动作接入命令总线。
//!
//! 匹配纯粹基于结构与位置：多个构造函数同时兼容时直接报错，从不做启发式择优。
//!
mod action;
mod command_info;
mod constructor;
mod error;
mod handler;
mod mapped_command;
mod property;
mod resolver;

pub use action::ObjectCreationAction;
pub use command_info::ObjectCreationCommandInfo;
pub use constructor::{
    AggregateConstructors, Arguments, ConstructibleAggregate, Constructor, ConstructorFn,
    Invocation, Parameter,
};
pub use error::MappingError;
pub use handler::AutoMappedCommandHandler;
pub use mapped_command::{MappedCommand, MappingTarget};
pub use property::{MappedProperty, ParamType, PropertyValue};
pub use resolver::resolve_constructor;

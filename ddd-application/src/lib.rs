//! DDD 应用层（ddd-application）
//!
//! - 命令（`command`）、处理器（`command_handler`）与命令总线（`command_bus`）；
//! - 应用上下文（`context`）：业务语境、幂等键与工作单元作用域；
//! - 自动映射（`auto_mapping`）：将创建类命令映射到聚合构造函数并在工作单元中执行。
//!
pub mod auto_mapping;
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod context;
pub mod error;
pub mod inmemory_command_bus;

pub use inmemory_command_bus::InMemoryCommandBus;

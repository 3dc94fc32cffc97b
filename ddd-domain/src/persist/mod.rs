//! 持久化与事件溯源（persist）
//!
//! 定义聚合仓储协议与事件的持久化形态，支持：
//! - 聚合的加载与新事件的保存（`AggregateRepository`）；
//! - 事件与 `SerializedEvent` 之间的批量序列化/反序列化；
//! - 基于内存的事件溯源仓储（`InMemoryAggregateRepository`），用于测试与示例。
//!
//! 具体存储后端（如 Postgres）由上层提供实现并注入。
//!
mod aggregate_repository;
mod inmemory_repository;
mod serialized_event;

pub use aggregate_repository::AggregateRepository;
pub use inmemory_repository::InMemoryAggregateRepository;
pub use serialized_event::{SerializedEvent, deserialize_events, serialize_events};

//! DDD 领域层基础库（ddd-domain）
//!
//! 提供以聚合创建为中心的领域层抽象：
//! - 聚合（`aggregate`）与实体（`entity`）建模，以及新建聚合的载体 `NewAggregate`
//! - 领域事件（`domain_event`）与事件信封
//! - 基于事件溯源的聚合仓储（`persist`）
//! - 工作单元（`unit_of_work`）：绑定仓储的事务边界，接受即提交、未接受即回滚
//! - 值对象（`value_object`），如版本号 `Version`
//!
//! 本 crate 不绑定具体存储实现，仅定义领域层接口、最小必要的错误类型，
//! 以及一个用于测试与示例的内存仓储。
//!
//! 典型用法：
//! 1. 定义聚合与事件，实现 `Aggregate::apply`；
//! 2. 以构造函数（返回 `NewAggregate`）表达聚合的创建；
//! 3. 通过 `UnitOfWork` 登记新聚合，并在成功后 `accept` 持久化其创建事件。
//!
pub mod aggregate;
pub mod domain_event;
pub mod entity;
pub mod error;
pub mod persist;
pub mod unit_of_work;
pub mod value_object;

//! 聚合（Aggregate）抽象
//!
//! 约束一个聚合的核心行为：
//! - `apply` 将事件投影到状态（改变状态）；
//! - 通过 `Entity` 约束聚合具备标识与版本。
//!
//! 聚合的创建由构造函数表达：构造函数校验入参并产出创建事件，
//! 结果以 [`NewAggregate`] 返回，事件在工作单元被接受时才会持久化。
//!
use crate::domain_event::DomainEvent;
use crate::entity::Entity;
use crate::value_object::Version;
use std::error::Error;
use std::fmt;

/// 聚合根接口
pub trait Aggregate: Entity + Send + Sync + 'static {
    const TYPE: &'static str;

    /// 该聚合产生的领域事件类型
    type Event: DomainEvent;
    /// 构造或持久化环节的错误类型
    type Error: Error + Send + Sync + 'static;

    /// 应用事件，更新聚合状态
    fn apply(&mut self, event: &Self::Event);
}

/// 新建的聚合：已应用创建事件的聚合实例，以及尚未提交的事件
pub struct NewAggregate<A>
where
    A: Aggregate,
{
    aggregate: A,
    events: Vec<A::Event>,
}

impl<A> NewAggregate<A>
where
    A: Aggregate,
{
    /// 以初始版本创建聚合，并按顺序应用创建事件
    pub fn from_events(aggregate_id: A::Id, events: Vec<A::Event>) -> Self {
        let mut aggregate = A::new(aggregate_id, Version::new());
        for event in &events {
            aggregate.apply(event);
        }

        Self { aggregate, events }
    }

    pub fn aggregate(&self) -> &A {
        &self.aggregate
    }

    /// 未提交的创建事件
    pub fn events(&self) -> &[A::Event] {
        &self.events
    }

    pub fn into_parts(self) -> (A, Vec<A::Event>) {
        (self.aggregate, self.events)
    }
}

impl<A> fmt::Debug for NewAggregate<A>
where
    A: Aggregate,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAggregate")
            .field("aggregate_type", &A::TYPE)
            .field("aggregate_id", &self.aggregate.id().to_string())
            .field("events", &self.events)
            .finish()
    }
}

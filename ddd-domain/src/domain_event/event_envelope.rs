use crate::aggregate::Aggregate;
use chrono::Utc;
use std::fmt;

use super::event_context::EventContext;
use super::metadata::Metadata;

/// 事件信封，包含事件载荷、元数据与业务上下文
pub struct EventEnvelope<A>
where
    A: Aggregate,
{
    pub metadata: Metadata,
    pub payload: A::Event,
    pub context: EventContext,
}

impl<A> EventEnvelope<A>
where
    A: Aggregate,
{
    pub fn new(aggregate_id: &A::Id, payload: A::Event, context: EventContext) -> Self {
        let metadata = Metadata::builder()
            .aggregate_id(aggregate_id.to_string())
            .aggregate_type(A::TYPE.to_string())
            .occurred_at(Utc::now())
            .build();

        Self {
            metadata,
            payload,
            context,
        }
    }
}

// 手动实现，避免派生宏对聚合类型本身追加 Clone/Debug 约束
impl<A> Clone for EventEnvelope<A>
where
    A: Aggregate,
{
    fn clone(&self) -> Self {
        Self {
            metadata: self.metadata.clone(),
            payload: self.payload.clone(),
            context: self.context.clone(),
        }
    }
}

impl<A> fmt::Debug for EventEnvelope<A>
where
    A: Aggregate,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEnvelope")
            .field("metadata", &self.metadata)
            .field("payload", &self.payload)
            .field("context", &self.context)
            .finish()
    }
}

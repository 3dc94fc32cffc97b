//! 内存版聚合仓储（InMemoryAggregateRepository）
//!
//! 以 `DashMap` 按聚合标识保存事件流（`SerializedEvent`）：
//! - `save`：序列化事件并追加到事件流，要求首个新事件版本紧接当前流末尾；
//! - `load`：反序列化事件流并依次重放，重建聚合。
//!
//! 典型用途：测试环境、示例与本地开发。
//!
use super::{AggregateRepository, SerializedEvent, deserialize_events, serialize_events};
use crate::{
    aggregate::Aggregate,
    domain_event::{EventContext, EventEnvelope},
    entity::Entity,
    error::DomainError,
    value_object::Version,
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::marker::PhantomData;

pub struct InMemoryAggregateRepository<A> {
    streams: DashMap<String, Vec<SerializedEvent>>,
    _marker: PhantomData<fn() -> A>,
}

impl<A> Default for InMemoryAggregateRepository<A> {
    fn default() -> Self {
        Self {
            streams: DashMap::new(),
            _marker: PhantomData,
        }
    }
}

impl<A> InMemoryAggregateRepository<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定聚合的已持久化事件（只读副本）
    pub fn events(&self, aggregate_id: &str) -> Vec<SerializedEvent> {
        self.streams
            .get(aggregate_id)
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// 已持久化的聚合数量
    pub fn len(&self) -> usize {
        self.streams.iter().filter(|s| !s.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<A> AggregateRepository<A> for InMemoryAggregateRepository<A>
where
    A: Aggregate,
    A::Error: From<DomainError>,
{
    async fn load(&self, aggregate_id: &A::Id) -> Result<Option<A>, A::Error> {
        let stream = self.events(&aggregate_id.to_string());
        if stream.is_empty() {
            return Ok(None);
        }

        let envelopes = deserialize_events::<A>(&stream)?;

        let mut aggregate = A::new(aggregate_id.clone(), Version::new());
        for env in &envelopes {
            aggregate.apply(&env.payload);
        }

        Ok(Some(aggregate))
    }

    async fn save(
        &self,
        aggregate: &A,
        events: Vec<A::Event>,
        context: EventContext,
    ) -> Result<Vec<EventEnvelope<A>>, A::Error> {
        let envelopes: Vec<EventEnvelope<A>> = events
            .into_iter()
            .map(|e| EventEnvelope::new(aggregate.id(), e, context.clone()))
            .collect();

        if envelopes.is_empty() {
            return Ok(envelopes);
        }

        let serialized = serialize_events(&envelopes)?;

        let key = aggregate.id().to_string();
        let first = serialized[0].aggregate_version();

        // 版本检查与追加在同一个分片锁内完成；冲突时不创建空事件流
        match self.streams.entry(key.clone()) {
            Entry::Occupied(mut stream) => {
                let current = stream
                    .get()
                    .last()
                    .map(|e| e.aggregate_version())
                    .unwrap_or(0);
                if first != current + 1 {
                    return Err(version_conflict(key, current, first).into());
                }
                stream.get_mut().extend(serialized);
            }
            Entry::Vacant(slot) => {
                if first != 1 {
                    return Err(version_conflict(key, 0, first).into());
                }
                slot.insert(serialized);
            }
        }

        tracing::debug!(
            aggregate_type = A::TYPE,
            aggregate_id = %key,
            count = envelopes.len(),
            "events appended"
        );

        Ok(envelopes)
    }
}

fn version_conflict(aggregate_id: String, current: usize, actual: usize) -> DomainError {
    DomainError::VersionConflict {
        aggregate_id,
        expected: current + 1,
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::DomainEvent;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default)]
    struct Note {
        id: String,
        version: Version,
        text: String,
    }

    impl Entity for Note {
        type Id = String;

        fn new(aggregate_id: Self::Id, version: Version) -> Self {
            Self {
                id: aggregate_id,
                version,
                ..Default::default()
            }
        }

        fn id(&self) -> &Self::Id {
            &self.id
        }

        fn version(&self) -> Version {
            self.version
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    enum NoteEvent {
        Written {
            id: String,
            aggregate_version: Version,
            text: String,
        },
    }

    impl DomainEvent for NoteEvent {
        fn event_id(&self) -> &str {
            match self {
                NoteEvent::Written { id, .. } => id,
            }
        }

        fn event_type(&self) -> &str {
            "NoteEvent.Written"
        }

        fn event_version(&self) -> usize {
            1
        }

        fn aggregate_version(&self) -> Version {
            match self {
                NoteEvent::Written {
                    aggregate_version, ..
                } => *aggregate_version,
            }
        }
    }

    impl Aggregate for Note {
        const TYPE: &'static str = "note";
        type Event = NoteEvent;
        type Error = DomainError;

        fn apply(&mut self, event: &Self::Event) {
            match event {
                NoteEvent::Written {
                    aggregate_version,
                    text,
                    ..
                } => {
                    self.text = text.clone();
                    self.version = *aggregate_version;
                }
            }
        }
    }

    fn written(version: usize, text: &str) -> NoteEvent {
        NoteEvent::Written {
            id: ulid::Ulid::new().to_string(),
            aggregate_version: Version::from_value(version),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn save_then_load_replays_events() {
        let repo = InMemoryAggregateRepository::<Note>::new();
        let note = Note::new("n-1".to_string(), Version::new());

        let ctx = EventContext::builder()
            .maybe_correlation_id(Some("cor-1".into()))
            .build();
        let envs = repo
            .save(&note, vec![written(1, "hello"), written(2, "world")], ctx)
            .await
            .unwrap();
        assert_eq!(envs.len(), 2);
        assert_eq!(envs[0].metadata.aggregate_type(), "note");
        assert_eq!(envs[0].context.correlation_id(), Some("cor-1"));

        let loaded = repo.load(&"n-1".to_string()).await.unwrap().unwrap();
        assert_eq!(loaded.text, "world");
        assert_eq!(loaded.version().value(), 2);
        assert_eq!(repo.events("n-1").len(), 2);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn load_unknown_returns_none() {
        let repo = InMemoryAggregateRepository::<Note>::new();
        assert!(repo.load(&"missing".to_string()).await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn saving_same_creation_twice_conflicts() {
        let repo = InMemoryAggregateRepository::<Note>::new();
        let note = Note::new("n-2".to_string(), Version::new());

        repo.save(&note, vec![written(1, "a")], EventContext::default())
            .await
            .unwrap();
        let err = repo
            .save(&note, vec![written(1, "b")], EventContext::default())
            .await
            .unwrap_err();
        match err {
            DomainError::VersionConflict {
                expected, actual, ..
            } => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(repo.events("n-2").len(), 1);
    }

    #[tokio::test]
    async fn empty_save_is_noop() {
        let repo = InMemoryAggregateRepository::<Note>::new();
        let note = Note::new("n-3".to_string(), Version::new());
        let envs = repo
            .save(&note, vec![], EventContext::default())
            .await
            .unwrap();
        assert!(envs.is_empty());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn conflict_on_unknown_aggregate_leaves_no_stream() {
        let repo = InMemoryAggregateRepository::<Note>::new();
        let note = Note::new("n-4".to_string(), Version::new());

        let err = repo
            .save(&note, vec![written(2, "skipped")], EventContext::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::VersionConflict {
                expected: 1,
                actual: 2,
                ..
            }
        ));
        assert!(!repo.streams.contains_key("n-4"));
        assert!(repo.is_empty());
    }
}

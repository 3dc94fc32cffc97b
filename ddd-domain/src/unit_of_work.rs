//! 工作单元（Unit of Work）
//!
//! 一次写操作的事务边界，与仓储一一绑定：
//! - `begin`：在给定作用域（`UnitOfWorkScope`）中开启，同一作用域同时至多一个活动的工作单元；
//! - `register`：登记新建的聚合及其创建事件，每个工作单元至多登记一个聚合；
//! - `accept`：通过一次仓储保存持久化登记的事件（提交）；
//! - 未被接受即被丢弃（`Drop`）时，登记内容全部丢弃（回滚）。
//!
//! 仓储的单次 `save` 是提交的最小单位，因此工作单元只跟踪一个聚合，
//! 任何失败路径都不会留下部分提交。
//!
//! 作用域由调用方显式传递（通常位于应用层上下文中），而非进程级的全局状态。
//!
use crate::{
    aggregate::{Aggregate, NewAggregate},
    domain_event::{EventContext, EventEnvelope},
    entity::Entity,
    error::DomainError,
    persist::AggregateRepository,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 工作单元作用域：代表一条逻辑执行上下文
///
/// 克隆得到的作用域与原作用域共享同一状态。
#[derive(Clone, Debug, Default)]
pub struct UnitOfWorkScope {
    active: Arc<AtomicBool>,
}

impl UnitOfWorkScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前作用域中是否存在活动的工作单元
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// 绑定到单个仓储的工作单元
pub struct UnitOfWork<'a, A, R>
where
    A: Aggregate,
    R: AggregateRepository<A> + ?Sized,
{
    scope: &'a UnitOfWorkScope,
    repository: &'a R,
    tracked: Option<NewAggregate<A>>,
    accepted: bool,
}

impl<'a, A, R> UnitOfWork<'a, A, R>
where
    A: Aggregate,
    R: AggregateRepository<A> + ?Sized,
{
    /// 在作用域中开启工作单元
    ///
    /// # Panics
    ///
    /// 作用域中已存在活动的工作单元时 panic：这表示调用方的执行顺序有误
    /// （嵌套或重入执行），不属于可恢复的错误。
    #[track_caller]
    pub fn begin(scope: &'a UnitOfWorkScope, repository: &'a R) -> Self {
        let already_active = scope.active.swap(true, Ordering::AcqRel);
        assert!(
            !already_active,
            "a unit of work is already active in this scope"
        );

        tracing::debug!(aggregate_type = A::TYPE, "unit of work opened");

        Self {
            scope,
            repository,
            tracked: None,
            accepted: false,
        }
    }

    /// 登记新建的聚合，其创建事件在 `accept` 时持久化
    ///
    /// 已登记过聚合时返回 `InvalidState`，原先登记的内容保持不变。
    pub fn register(&mut self, created: NewAggregate<A>) -> Result<(), DomainError> {
        if let Some(tracked) = &self.tracked {
            return Err(DomainError::InvalidState {
                reason: format!(
                    "unit of work already tracks {} {}, cannot register {}",
                    A::TYPE,
                    tracked.aggregate().id(),
                    created.aggregate().id()
                ),
            });
        }

        self.tracked = Some(created);
        Ok(())
    }

    /// 已登记、待提交的聚合数量（0 或 1）
    pub fn pending(&self) -> usize {
        usize::from(self.tracked.is_some())
    }

    /// 接受（提交）工作单元：通过仓储的一次 `save` 持久化登记的事件
    ///
    /// 仓储返回错误时工作单元视为未接受，登记内容被丢弃。
    pub async fn accept(
        mut self,
        context: EventContext,
    ) -> Result<Vec<EventEnvelope<A>>, A::Error> {
        let Some(created) = self.tracked.take() else {
            self.accepted = true;
            return Ok(Vec::new());
        };

        let (aggregate, events) = created.into_parts();
        let envelopes = self.repository.save(&aggregate, events, context).await?;

        tracing::debug!(
            aggregate_type = A::TYPE,
            aggregate_id = %aggregate.id(),
            events = envelopes.len(),
            "aggregate committed"
        );

        self.accepted = true;
        Ok(envelopes)
    }
}

impl<A, R> Drop for UnitOfWork<'_, A, R>
where
    A: Aggregate,
    R: AggregateRepository<A> + ?Sized,
{
    fn drop(&mut self) {
        if !self.accepted {
            tracing::warn!(
                aggregate_type = A::TYPE,
                discarded = self.pending(),
                "unit of work rolled back"
            );
        }

        self.scope.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::DomainEvent;
    use crate::error::DomainError;
    use crate::persist::InMemoryAggregateRepository;
    use crate::value_object::Version;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default)]
    struct Ticket {
        id: String,
        version: Version,
        title: String,
    }

    impl Entity for Ticket {
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
    enum TicketEvent {
        Opened {
            id: String,
            aggregate_version: Version,
            title: String,
        },
    }

    impl DomainEvent for TicketEvent {
        fn event_id(&self) -> &str {
            match self {
                TicketEvent::Opened { id, .. } => id,
            }
        }

        fn event_type(&self) -> &str {
            "TicketEvent.Opened"
        }

        fn event_version(&self) -> usize {
            1
        }

        fn aggregate_version(&self) -> Version {
            match self {
                TicketEvent::Opened {
                    aggregate_version, ..
                } => *aggregate_version,
            }
        }
    }

    impl Aggregate for Ticket {
        const TYPE: &'static str = "ticket";
        type Event = TicketEvent;
        type Error = DomainError;

        fn apply(&mut self, event: &Self::Event) {
            match event {
                TicketEvent::Opened {
                    aggregate_version,
                    title,
                    ..
                } => {
                    self.title = title.clone();
                    self.version = *aggregate_version;
                }
            }
        }
    }

    fn opened(id: &str, title: &str) -> NewAggregate<Ticket> {
        NewAggregate::from_events(
            id.to_string(),
            vec![TicketEvent::Opened {
                id: ulid::Ulid::new().to_string(),
                aggregate_version: Version::from_value(1),
                title: title.into(),
            }],
        )
    }

    #[tokio::test]
    async fn accept_commits_registered_aggregate() {
        let scope = UnitOfWorkScope::new();
        let repo = InMemoryAggregateRepository::<Ticket>::new();

        let mut work = UnitOfWork::begin(&scope, &repo);
        assert!(scope.is_active());
        work.register(opened("t-1", "first")).unwrap();
        assert_eq!(work.pending(), 1);

        let envs = work.accept(EventContext::default()).await.unwrap();
        assert_eq!(envs.len(), 1);
        assert!(!scope.is_active());

        let loaded = repo.load(&"t-1".to_string()).await.unwrap().unwrap();
        assert_eq!(loaded.title, "first");
    }

    #[tokio::test]
    async fn accept_without_registration_commits_nothing() {
        let scope = UnitOfWorkScope::new();
        let repo = InMemoryAggregateRepository::<Ticket>::new();

        let work = UnitOfWork::begin(&scope, &repo);
        let envs = work.accept(EventContext::default()).await.unwrap();
        assert!(envs.is_empty());
        assert!(repo.is_empty());
        assert!(!scope.is_active());
    }

    // 第二个聚合被拒绝，且失败后丢弃的工作单元不会留下已登记聚合的事件
    #[tokio::test]
    async fn second_registration_is_rejected_and_nothing_is_partially_committed() {
        let scope = UnitOfWorkScope::new();
        let repo = InMemoryAggregateRepository::<Ticket>::new();

        let mut work = UnitOfWork::begin(&scope, &repo);
        work.register(opened("dup", "existing")).unwrap();
        work.accept(EventContext::default()).await.unwrap();

        {
            let mut work = UnitOfWork::begin(&scope, &repo);
            work.register(opened("fresh", "new")).unwrap();
            let err = work.register(opened("dup", "again")).unwrap_err();
            assert!(matches!(err, DomainError::InvalidState { .. }));
            assert_eq!(work.pending(), 1);
        }

        assert!(repo.events("fresh").is_empty());
        assert_eq!(repo.events("dup").len(), 1);
        assert!(!scope.is_active());

        // 单个聚合提交失败时同样没有任何残留
        let mut work = UnitOfWork::begin(&scope, &repo);
        work.register(opened("dup", "again")).unwrap();
        assert!(work.accept(EventContext::default()).await.is_err());
        assert!(repo.events("fresh").is_empty());
        assert_eq!(repo.events("dup").len(), 1);
    }

    #[tokio::test]
    async fn dropping_without_accept_rolls_back() {
        let scope = UnitOfWorkScope::new();
        let repo = InMemoryAggregateRepository::<Ticket>::new();

        {
            let mut work = UnitOfWork::begin(&scope, &repo);
            work.register(opened("t-3", "never")).unwrap();
        }

        assert!(!scope.is_active());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn failed_accept_releases_scope() {
        let scope = UnitOfWorkScope::new();
        let repo = InMemoryAggregateRepository::<Ticket>::new();

        let mut work = UnitOfWork::begin(&scope, &repo);
        work.register(opened("t-4", "one")).unwrap();
        work.accept(EventContext::default()).await.unwrap();

        // 同一标识再次创建：仓储报告版本冲突
        let mut work = UnitOfWork::begin(&scope, &repo);
        work.register(opened("t-4", "again")).unwrap();
        let err = work.accept(EventContext::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::VersionConflict { .. }));
        assert!(!scope.is_active());
        assert_eq!(repo.events("t-4").len(), 1);
    }

    #[test]
    #[should_panic(expected = "a unit of work is already active in this scope")]
    fn nested_begin_in_same_scope_panics() {
        let scope = UnitOfWorkScope::new();
        let repo = InMemoryAggregateRepository::<Ticket>::new();

        let _outer = UnitOfWork::begin(&scope, &repo);
        let _inner = UnitOfWork::begin(&scope, &repo);
    }

    #[test]
    fn cloned_scope_shares_state_and_separate_scopes_do_not() {
        let scope = UnitOfWorkScope::new();
        let other = UnitOfWorkScope::new();
        let repo = InMemoryAggregateRepository::<Ticket>::new();

        let _work = UnitOfWork::begin(&scope, &repo);
        assert!(scope.clone().is_active());
        assert!(!other.is_active());

        let _independent = UnitOfWork::begin(&other, &repo);
        assert!(other.is_active());
    }
}

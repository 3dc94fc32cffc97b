use ddd_application::InMemoryCommandBus;
use ddd_application::auto_mapping::{
    AggregateConstructors, AutoMappedCommandHandler, ConstructibleAggregate, ObjectCreationAction,
};
use ddd_application::command_bus::CommandBus;
use ddd_application::context::AppContext;
use ddd_domain::aggregate::{Aggregate, NewAggregate};
use ddd_domain::domain_event::{DomainEvent, EventContext};
use ddd_domain::entity::Entity;
use ddd_domain::error::DomainError;
use ddd_domain::persist::{AggregateRepository, InMemoryAggregateRepository};
use ddd_domain::value_object::Version;
use ddd_macros::mapped_command;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use ulid::Ulid;

#[derive(Debug, Default)]
struct Account {
    id: String,
    version: Version,
    owner: String,
    balance: i64,
}

#[derive(Debug, thiserror::Error)]
enum AccountError {
    #[error("initial deposit must not be negative: {0}")]
    NegativeDeposit(i64),
    #[error("owner must not be blank")]
    BlankOwner,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum AccountEvent {
    Opened {
        id: String,
        aggregate_version: Version,
        owner: String,
        initial_balance: i64,
    },
}

impl DomainEvent for AccountEvent {
    fn event_id(&self) -> &str {
        match self {
            AccountEvent::Opened { id, .. } => id,
        }
    }

    fn event_type(&self) -> &str {
        match self {
            AccountEvent::Opened { .. } => "account.opened",
        }
    }

    fn event_version(&self) -> usize {
        1
    }

    fn aggregate_version(&self) -> Version {
        match self {
            AccountEvent::Opened {
                aggregate_version, ..
            } => *aggregate_version,
        }
    }
}

impl Entity for Account {
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

impl Aggregate for Account {
    const TYPE: &'static str = "account";

    type Event = AccountEvent;
    type Error = AccountError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            AccountEvent::Opened {
                aggregate_version,
                owner,
                initial_balance,
                ..
            } => {
                self.owner = owner.clone();
                self.balance = *initial_balance;
                self.version = *aggregate_version;
            }
        }
    }
}

impl Account {
    fn open(id: String, owner: String) -> Result<NewAggregate<Self>, AccountError> {
        Self::open_with_deposit(id, owner, 0)
    }

    fn open_with_deposit(
        id: String,
        owner: String,
        initial_balance: i64,
    ) -> Result<NewAggregate<Self>, AccountError> {
        if owner.trim().is_empty() {
            return Err(AccountError::BlankOwner);
        }
        if initial_balance < 0 {
            return Err(AccountError::NegativeDeposit(initial_balance));
        }

        Ok(NewAggregate::from_events(
            id,
            vec![AccountEvent::Opened {
                id: Ulid::new().to_string(),
                aggregate_version: Version::new().next(),
                owner,
                initial_balance,
            }],
        ))
    }
}

impl ConstructibleAggregate for Account {
    fn constructors() -> AggregateConstructors<Self> {
        AggregateConstructors::new()
            .with("open", Account::open)
            .with("open_with_deposit", Account::open_with_deposit)
    }
}

#[mapped_command(aggregate = Account)]
struct OpenAccount {
    id: String,
    owner: String,
}

#[mapped_command(aggregate = Account, name = "account.open_with_deposit")]
struct OpenAccountWithDeposit {
    id: String,
    owner: String,
    #[mapping(rename = "initial_balance")]
    deposit: i64,
    #[mapping(skip)]
    #[allow(dead_code)]
    channel: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ddd_application=debug")),
        )
        .init();

    let repo = Arc::new(InMemoryAggregateRepository::<Account>::new());
    let handler = Arc::new(AutoMappedCommandHandler::<Account, _>::new(repo.clone()));

    let bus = InMemoryCommandBus::new();
    bus.register::<OpenAccount, _>(handler.clone())?;
    bus.register::<OpenAccountWithDeposit, _>(handler)?;

    let ctx = AppContext {
        biz: EventContext::builder()
            .maybe_correlation_id(Some(Ulid::new().to_string()))
            .maybe_actor_type(Some("user".into()))
            .maybe_actor_id(Some("u-1".into()))
            .build(),
        ..Default::default()
    };

    // 两个参数 -> open
    bus.dispatch(
        &ctx,
        OpenAccount {
            id: "acc-1".into(),
            owner: "alice".into(),
        },
    )
    .await?;

    // 三个参数 -> open_with_deposit
    bus.dispatch(
        &ctx,
        OpenAccountWithDeposit {
            id: "acc-2".into(),
            owner: "bob".into(),
            deposit: 1000,
            channel: "web".into(),
        },
    )
    .await?;

    for id in ["acc-1", "acc-2"] {
        if let Some(acc) = repo.load(&id.to_string()).await? {
            tracing::info!(
                id = %acc.id(),
                owner = %acc.owner,
                balance = acc.balance,
                version = %acc.version(),
                "account loaded"
            );
        }
    }

    // 构造失败：不产生任何事件
    let rejected = bus
        .dispatch(
            &ctx,
            OpenAccountWithDeposit {
                id: "acc-3".into(),
                owner: "carol".into(),
                deposit: -1,
                channel: "web".into(),
            },
        )
        .await;
    if let Err(e) = rejected {
        // 聚合自定义的错误类型原样保留
        let negative = matches!(
            e.aggregate_error::<AccountError>(),
            Some(AccountError::NegativeDeposit(_))
        );
        tracing::warn!(
            error = %e,
            negative,
            stored = repo.events("acc-3").len(),
            "open rejected"
        );
    }

    // 直接使用创建动作；同一动作的重复执行由仓储拒绝
    let action = ObjectCreationAction::<Account, _, _>::builder()
        .repository(repo.clone())
        .command(OpenAccount {
            id: "acc-4".into(),
            owner: "dave".into(),
        })
        .build()?;

    let envelopes = action.execute(&ctx).await?;
    tracing::info!(
        events = envelopes.len(),
        command = action.info().command(),
        "created directly"
    );

    if let Err(e) = action.execute(&ctx).await {
        let conflict = matches!(
            e.aggregate_error::<AccountError>(),
            Some(AccountError::Domain(DomainError::VersionConflict { .. }))
        );
        tracing::warn!(error = %e, conflict, "second attempt rejected");
    }

    tracing::info!(accounts = repo.len(), "done");
    Ok(())
}

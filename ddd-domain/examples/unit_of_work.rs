/// 工作单元示例
/// 演示新建聚合的登记、接受（提交）与丢弃（回滚）
use ddd_domain::aggregate::{Aggregate, NewAggregate};
use ddd_domain::domain_event::{DomainEvent, EventContext};
use ddd_domain::entity::Entity;
use ddd_domain::error::DomainError;
use ddd_domain::persist::{AggregateRepository, InMemoryAggregateRepository};
use ddd_domain::unit_of_work::{UnitOfWork, UnitOfWorkScope};
use ddd_domain::value_object::Version;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

// ============================================================================
// 领域模型定义
// ============================================================================

#[derive(Debug, Default)]
struct Wallet {
    id: String,
    version: Version,
    currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum WalletEvent {
    Created {
        id: String,
        aggregate_version: Version,
        currency: String,
    },
}

impl DomainEvent for WalletEvent {
    fn event_id(&self) -> &str {
        match self {
            WalletEvent::Created { id, .. } => id,
        }
    }

    fn event_type(&self) -> &str {
        "wallet.created"
    }

    fn event_version(&self) -> usize {
        1
    }

    fn aggregate_version(&self) -> Version {
        match self {
            WalletEvent::Created {
                aggregate_version, ..
            } => *aggregate_version,
        }
    }
}

impl Entity for Wallet {
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

impl Aggregate for Wallet {
    const TYPE: &'static str = "wallet";
    type Event = WalletEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            WalletEvent::Created {
                aggregate_version,
                currency,
                ..
            } => {
                self.currency = currency.clone();
                self.version = *aggregate_version;
            }
        }
    }
}

fn create_wallet(id: &str, currency: &str) -> NewAggregate<Wallet> {
    NewAggregate::from_events(
        id.to_string(),
        vec![WalletEvent::Created {
            id: Ulid::new().to_string(),
            aggregate_version: Version::new().next(),
            currency: currency.to_string(),
        }],
    )
}

#[tokio::main]
async fn main() -> Result<(), DomainError> {
    println!("=== 工作单元示例 ===\n");
    let repo = InMemoryAggregateRepository::<Wallet>::new();
    let scope = UnitOfWorkScope::new();

    // 接受：持久化创建事件
    let mut work = UnitOfWork::begin(&scope, &repo);
    work.register(create_wallet("w-1", "CNY"))?;
    let envelopes = work.accept(EventContext::default()).await?;
    println!("✅ 提交 w-1，产生 {} 个事件", envelopes.len());

    // 未接受即丢弃：不产生任何事件
    {
        let mut work = UnitOfWork::begin(&scope, &repo);
        work.register(create_wallet("w-2", "USD"))?;
        println!("↩️  丢弃 w-2（待提交 {} 个聚合）", work.pending());
    }
    println!("   w-2 事件数: {}", repo.events("w-2").len());

    // 重新加载
    if let Some(wallet) = repo.load(&"w-1".to_string()).await? {
        println!(
            "reloaded: id={}, currency={}, version={}",
            wallet.id(),
            wallet.currency,
            wallet.version()
        );
    }

    println!("作用域是否仍有活动的工作单元: {}", scope.is_active());
    Ok(())
}

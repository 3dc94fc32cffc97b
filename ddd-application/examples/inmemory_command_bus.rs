use async_trait::async_trait;
use ddd_application::InMemoryCommandBus;
use ddd_application::command::Command;
use ddd_application::command_bus::CommandBus;
use ddd_application::command_handler::CommandHandler;
use ddd_application::context::AppContext;
use ddd_application::error::AppError;
use ddd_domain::domain_event::EventContext;
use std::sync::Arc;

#[derive(Debug)]
struct CreateUser {
    name: String,
}

impl Command for CreateUser {
    const NAME: &'static str = "CreateUser";
}

struct CreateUserHandler;

#[async_trait]
impl CommandHandler<CreateUser> for CreateUserHandler {
    async fn handle(&self, ctx: &AppContext, cmd: CreateUser) -> Result<(), AppError> {
        tracing::info!(
            name = %cmd.name,
            actor = ctx.biz.actor_id().unwrap_or("-"),
            "user created"
        );
        Ok(())
    }
}

#[derive(Debug)]
#[allow(dead_code)]
struct DeleteUser {
    id: u32,
}

impl Command for DeleteUser {
    const NAME: &'static str = "DeleteUser";
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let bus = InMemoryCommandBus::new();
    bus.register::<CreateUser, _>(Arc::new(CreateUserHandler))?;

    // 同一命令只能注册一次
    if let Err(e) = bus.register::<CreateUser, _>(Arc::new(CreateUserHandler)) {
        tracing::warn!(error = %e, "duplicate registration rejected");
    }

    let ctx = AppContext {
        biz: EventContext::builder()
            .maybe_correlation_id(Some("cor-1".into()))
            .maybe_causation_id(Some("cau-1".into()))
            .maybe_actor_type(Some("user".into()))
            .maybe_actor_id(Some("u-1".into()))
            .build(),
        idempotency_key: Some("idem-1".into()),
        ..Default::default()
    };

    bus.dispatch(
        &ctx,
        CreateUser {
            name: "Alice".into(),
        },
    )
    .await?;

    // 未注册的命令 -> HandlerNotFound
    if let Err(AppError::HandlerNotFound(name)) = bus.dispatch(&ctx, DeleteUser { id: 42 }).await {
        tracing::warn!(command = name, "no handler registered");
    }

    Ok(())
}

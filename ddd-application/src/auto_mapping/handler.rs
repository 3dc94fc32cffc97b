use super::action::ObjectCreationAction;
use super::constructor::ConstructibleAggregate;
use super::mapped_command::MappedCommand;
use crate::{command_handler::CommandHandler, context::AppContext, error::AppError};
use async_trait::async_trait;
use ddd_domain::persist::AggregateRepository;
use std::marker::PhantomData;
use std::sync::Arc;

/// 自动映射的命令处理器
///
/// 对每个到达的创建类命令构建一次 `ObjectCreationAction` 并执行，
/// 可直接注册到命令总线：
///
/// ```ignore
/// let handler = AutoMappedCommandHandler::<Account, _>::new(repo.clone());
/// bus.register::<OpenAccount, _>(Arc::new(handler))?;
/// ```
pub struct AutoMappedCommandHandler<A, R> {
    repository: Arc<R>,
    _marker: PhantomData<fn() -> A>,
}

impl<A, R> AutoMappedCommandHandler<A, R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            _marker: PhantomData,
        }
    }
}

impl<A, R> Clone for AutoMappedCommandHandler<A, R> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.repository))
    }
}

#[async_trait]
impl<A, R, C> CommandHandler<C> for AutoMappedCommandHandler<A, R>
where
    A: ConstructibleAggregate,
    R: AggregateRepository<A> + 'static,
    C: MappedCommand,
{
    async fn handle(&self, ctx: &AppContext, cmd: C) -> Result<(), AppError> {
        let action = ObjectCreationAction::<A, R, C>::builder()
            .repository(Arc::clone(&self.repository))
            .command(cmd)
            .build()?;

        action.execute(ctx).await?;
        Ok(())
    }
}

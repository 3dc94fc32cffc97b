//! 对象创建动作（ObjectCreationAction）
//!
//! 由仓储与命令构建，在 `execute` 中完成：
//! 1. 在上下文的作用域中开启绑定仓储的工作单元；
//! 2. 按命令的映射属性解析唯一的构造函数；
//! 3. 按位置提取实参并调用构造函数；
//! 4. 登记新聚合并接受工作单元，持久化其创建事件。
//!
//! 任一步骤失败都会在工作单元被接受前返回，工作单元随之回滚。
//! 聚合自身的错误（构造失败、仓储拒绝）经 `AppError::from_aggregate` 原样传递。
//!
use super::command_info::ObjectCreationCommandInfo;
use super::constructor::ConstructibleAggregate;
use super::error::MappingError;
use super::mapped_command::MappedCommand;
use super::resolver::resolve_constructor;
use crate::{context::AppContext, error::AppError};
use bon::bon;
use ddd_domain::{
    aggregate::NewAggregate, domain_event::EventEnvelope, persist::AggregateRepository,
    unit_of_work::UnitOfWork,
};
use std::marker::PhantomData;
use std::sync::Arc;

/// 将创建类命令映射为聚合新建的动作
///
/// 构建后仓储、命令与命令元信息均不再变化。同一实例可多次执行，
/// 每次执行都是一次独立的创建尝试；重复标识由仓储的并发控制拒绝。
pub struct ObjectCreationAction<A, R, C> {
    repository: Arc<R>,
    command: C,
    info: ObjectCreationCommandInfo,
    _marker: PhantomData<fn() -> A>,
}

impl<A, R, C> std::fmt::Debug for ObjectCreationAction<A, R, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectCreationAction")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

#[bon]
impl<A, R, C> ObjectCreationAction<A, R, C>
where
    A: ConstructibleAggregate,
    R: AggregateRepository<A>,
    C: MappedCommand,
{
    /// 构建动作：仓储与命令缺一不可，随后从命令推导元信息
    #[builder]
    pub fn new(repository: Option<Arc<R>>, command: Option<C>) -> Result<Self, AppError> {
        let repository = repository.ok_or(AppError::InvalidArgument("repository"))?;
        let command = command.ok_or(AppError::InvalidArgument("command"))?;
        let info = ObjectCreationCommandInfo::from_command::<A, C>(&command)?;

        Ok(Self {
            repository,
            command,
            info,
            _marker: PhantomData,
        })
    }

    pub fn command(&self) -> &C {
        &self.command
    }

    pub fn info(&self) -> &ObjectCreationCommandInfo {
        &self.info
    }

    /// 执行动作，返回已持久化的创建事件
    ///
    /// # Panics
    ///
    /// `ctx.work` 中已存在活动的工作单元时 panic（见 `UnitOfWork::begin`）。
    #[tracing::instrument(
        skip_all,
        fields(command = self.info.command(), aggregate_type = self.info.aggregate_type())
    )]
    pub async fn execute(&self, ctx: &AppContext) -> Result<Vec<EventEnvelope<A>>, AppError> {
        let mut work = UnitOfWork::<A, R>::begin(&ctx.work, self.repository.as_ref());

        let created = self.construct()?;
        work.register(created)?;

        let envelopes = work
            .accept(ctx.biz.clone())
            .await
            .map_err(AppError::from_aggregate)?;

        tracing::info!(events = envelopes.len(), "aggregate created");
        Ok(envelopes)
    }

    fn construct(&self) -> Result<NewAggregate<A>, AppError> {
        let constructors = A::constructors();
        let properties = self.command.mapped_properties();
        let constructor = resolve_constructor(&constructors, &properties)?;

        tracing::debug!(
            constructor = constructor.name(),
            arity = constructor.arity(),
            "constructor resolved"
        );

        let arguments = self.command.parameter_values(constructor.parameters())?;
        let created = constructor
            .invoke(arguments)?
            .map_err(AppError::from_aggregate)?;

        if created.events().is_empty() {
            return Err(MappingError::EmptyCreation {
                constructor: constructor.name(),
                aggregate_type: A::TYPE,
            }
            .into());
        }

        Ok(created)
    }
}

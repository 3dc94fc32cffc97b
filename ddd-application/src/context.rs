use ddd_domain::domain_event::EventContext;
use ddd_domain::unit_of_work::UnitOfWorkScope;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用所需的横切信息，例如：
/// - 业务语境（`EventContext`）：关联追踪 `correlation_id`、因果链 `causation_id`、
///   执行者类型/ID 等，随事件一起持久化；
/// - 幂等键（`idempotency_key`）：用于在基础设施层实现请求幂等；
/// - 工作单元作用域（`work`）：代表当前逻辑执行上下文，同一作用域内同时至多一个工作单元。
///
/// 典型用法：
/// ```rust
/// use ddd_application::context::AppContext;
/// use ddd_domain::domain_event::EventContext;
///
/// let ctx = AppContext {
///     biz: EventContext::builder()
///         .maybe_correlation_id(Some("cor-123".into()))
///         .maybe_actor_type(Some("user".into()))
///         .maybe_actor_id(Some("u-1".into()))
///         .build(),
///     idempotency_key: Some("idem-xyz".into()),
///     ..Default::default()
/// };
/// assert!(!ctx.work.is_active());
/// ```
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    /// 业务语境（链路追踪、审计主体、操作因果）
    pub biz: EventContext,
    /// 幂等键（可选）
    pub idempotency_key: Option<String>,
    /// 工作单元作用域；克隆的上下文共享同一作用域
    pub work: UnitOfWorkScope,
}

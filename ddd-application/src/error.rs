use crate::auto_mapping::MappingError;
use ddd_domain::error::DomainError;
use std::error::Error as StdError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// 领域错误：聚合构造失败、仓储失败等，原样传递
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    /// 聚合自定义的错误类型，保留原始错误以便调用方 downcast
    #[error("aggregate: {0}")]
    Aggregate(#[source] Box<dyn StdError + Send + Sync>),

    /// 命令与聚合构造函数之间的结构性不匹配
    #[error("mapping: {0}")]
    Mapping(#[from] MappingError),

    #[error("invalid argument: {0} is required")]
    InvalidArgument(&'static str),

    #[error("handler not found: {0}")]
    HandlerNotFound(&'static str),

    #[error("handler already registered: command={command}")]
    AlreadyRegisteredCommand { command: &'static str },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl AppError {
    /// 包装聚合的错误类型（`Aggregate::Error`）
    ///
    /// `DomainError` 归入 `Domain`，其余类型原样装箱到 `Aggregate`。
    pub fn from_aggregate<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(error);
        match boxed.downcast::<DomainError>() {
            Ok(domain) => AppError::Domain(*domain),
            Err(other) => AppError::Aggregate(other),
        }
    }

    /// 聚合自定义错误的引用（仅 `Aggregate` 变体）
    pub fn aggregate_error<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self {
            AppError::Aggregate(e) => e.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    enum QuotaError {
        #[error("quota exceeded: {0}")]
        Exceeded(u32),
    }

    #[test]
    fn domain_errors_stay_in_domain_variant() {
        let err = AppError::from_aggregate(DomainError::InvalidValue {
            reason: "bad".into(),
        });
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidValue { .. })
        ));
        assert!(err.aggregate_error::<QuotaError>().is_none());
    }

    #[test]
    fn custom_errors_keep_their_type() {
        let err = AppError::from_aggregate(QuotaError::Exceeded(3));
        assert_eq!(
            err.aggregate_error::<QuotaError>(),
            Some(&QuotaError::Exceeded(3))
        );
        assert_eq!(err.to_string(), "aggregate: quota exceeded: 3");
    }
}

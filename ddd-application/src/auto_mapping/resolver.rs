use super::constructor::{AggregateConstructors, Constructor};
use super::error::MappingError;
use super::property::MappedProperty;
use ddd_domain::aggregate::Aggregate;

/// 为给定的映射属性选出唯一匹配的构造函数
///
/// 1. 形参数量等于属性数量；
/// 2. 每个位置上的形参类型都能接收对应属性的类型（按位置，不按名称）；
/// 3. 无候选返回 `NoConstructor`，多于一个候选返回 `AmbiguousConstructor`。
///
/// 多个候选即视为歧义，不尝试挑选“更具体”的构造函数。
pub fn resolve_constructor<'c, A>(
    constructors: &'c AggregateConstructors<A>,
    properties: &[MappedProperty],
) -> Result<&'c Constructor<A>, MappingError>
where
    A: Aggregate,
{
    let count = properties.len();
    let mut candidates = constructors
        .iter()
        .filter(|ctor| ctor.arity() == count)
        .filter(|ctor| ctor.accepts(properties));

    match (candidates.next(), candidates.next()) {
        (Some(ctor), None) => Ok(ctor),
        (None, _) => Err(MappingError::NoConstructor {
            count,
            aggregate_type: A::TYPE,
        }),
        (Some(_), Some(_)) => Err(MappingError::AmbiguousConstructor {
            count,
            aggregate_type: A::TYPE,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auto_mapping::PropertyValue;
    use ddd_domain::aggregate::NewAggregate;
    use ddd_domain::domain_event::DomainEvent;
    use ddd_domain::entity::Entity;
    use ddd_domain::error::DomainError;
    use ddd_domain::value_object::Version;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default)]
    struct Person {
        id: i32,
        version: Version,
    }

    impl Entity for Person {
        type Id = i32;

        fn new(aggregate_id: Self::Id, version: Version) -> Self {
            Self {
                id: aggregate_id,
                version,
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
    struct PersonCreated {
        id: String,
    }

    impl DomainEvent for PersonCreated {
        fn event_id(&self) -> &str {
            &self.id
        }

        fn event_type(&self) -> &str {
            "PersonCreated"
        }

        fn event_version(&self) -> usize {
            1
        }

        fn aggregate_version(&self) -> Version {
            Version::from_value(1)
        }
    }

    impl Aggregate for Person {
        const TYPE: &'static str = "person";
        type Event = PersonCreated;
        type Error = DomainError;

        fn apply(&mut self, event: &Self::Event) {
            self.version = event.aggregate_version();
        }
    }

    fn created(id: i32) -> Result<NewAggregate<Person>, DomainError> {
        Ok(NewAggregate::from_events(id, vec![]))
    }

    fn by_id(id: i32) -> Result<NewAggregate<Person>, DomainError> {
        created(id)
    }

    fn by_id_and_name(id: i32, _name: String) -> Result<NewAggregate<Person>, DomainError> {
        created(id)
    }

    fn by_name_and_id(_name: String, id: i32) -> Result<NewAggregate<Person>, DomainError> {
        created(id)
    }

    fn by_anything_and_name(
        _id: PropertyValue,
        _name: String,
    ) -> Result<NewAggregate<Person>, DomainError> {
        created(0)
    }

    fn props(list: &[MappedProperty]) -> Vec<MappedProperty> {
        list.to_vec()
    }

    #[test]
    fn single_compatible_constructor_is_resolved() {
        let ctors = AggregateConstructors::<Person>::new()
            .with("by_id", by_id)
            .with("by_id_and_name", by_id_and_name)
            .with("by_name_and_id", by_name_and_id);

        let properties = props(&[
            MappedProperty::of::<i32>("id"),
            MappedProperty::of::<String>("name"),
        ]);
        let ctor = resolve_constructor(&ctors, &properties).unwrap();
        assert_eq!(ctor.name(), "by_id_and_name");

        let properties = props(&[MappedProperty::of::<i32>("id")]);
        assert_eq!(
            resolve_constructor(&ctors, &properties).unwrap().name(),
            "by_id"
        );
    }

    // 匹配按位置进行，属性名称不参与
    #[test]
    fn matching_is_positional_not_by_name() {
        let ctors = AggregateConstructors::<Person>::new().with("by_name_and_id", by_name_and_id);

        let properties = props(&[
            MappedProperty::of::<String>("id"),
            MappedProperty::of::<i32>("name"),
        ]);
        assert_eq!(
            resolve_constructor(&ctors, &properties).unwrap().name(),
            "by_name_and_id"
        );
    }

    #[test]
    fn no_constructor_with_matching_count() {
        let ctors = AggregateConstructors::<Person>::new().with("by_id", by_id);

        let properties = props(&[
            MappedProperty::of::<i32>("id"),
            MappedProperty::of::<String>("name"),
            MappedProperty::of::<bool>("active"),
        ]);
        let err = resolve_constructor(&ctors, &properties).unwrap_err();
        assert_eq!(
            err,
            MappingError::NoConstructor {
                count: 3,
                aggregate_type: "person"
            }
        );
        assert_eq!(
            err.to_string(),
            "No constructor found with 3 parameters on aggregate root person."
        );
    }

    #[test]
    fn matching_count_but_incompatible_types_is_not_found() {
        let ctors = AggregateConstructors::<Person>::new().with("by_id_and_name", by_id_and_name);

        let properties = props(&[
            MappedProperty::of::<i64>("id"),
            MappedProperty::of::<String>("name"),
        ]);
        assert!(matches!(
            resolve_constructor(&ctors, &properties),
            Err(MappingError::NoConstructor { count: 2, .. })
        ));
    }

    #[test]
    fn empty_registry_is_not_found() {
        let ctors = AggregateConstructors::<Person>::new();
        assert!(matches!(
            resolve_constructor(&ctors, &[]),
            Err(MappingError::NoConstructor { count: 0, .. })
        ));
    }

    // 两个不同但都兼容的构造函数：直接报歧义
    #[test]
    fn compatible_but_distinct_constructors_are_ambiguous() {
        let ctors = AggregateConstructors::<Person>::new()
            .with("by_id_and_name", by_id_and_name)
            .with("by_anything_and_name", by_anything_and_name);

        let properties = props(&[
            MappedProperty::of::<i32>("id"),
            MappedProperty::of::<String>("name"),
        ]);
        let err = resolve_constructor(&ctors, &properties).unwrap_err();
        assert_eq!(
            err,
            MappingError::AmbiguousConstructor {
                count: 2,
                aggregate_type: "person"
            }
        );
        assert_eq!(
            err.to_string(),
            "Multiple constructors found with 2 parameters on aggregate root person."
        );
    }

    #[test]
    fn identical_signatures_are_ambiguous() {
        let ctors = AggregateConstructors::<Person>::new()
            .with("by_id", by_id)
            .with("created", created);

        let properties = props(&[MappedProperty::of::<i32>("id")]);
        assert!(matches!(
            resolve_constructor(&ctors, &properties),
            Err(MappingError::AmbiguousConstructor { count: 1, .. })
        ));
    }

    #[test]
    fn dynamic_constructor_alone_is_resolved() {
        let ctors = AggregateConstructors::<Person>::new()
            .with("by_anything_and_name", by_anything_and_name);

        let properties = props(&[
            MappedProperty::of::<u64>("key"),
            MappedProperty::of::<String>("name"),
        ]);
        assert_eq!(
            resolve_constructor(&ctors, &properties).unwrap().name(),
            "by_anything_and_name"
        );
    }
}

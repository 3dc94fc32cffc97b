//! 聚合构造函数的显式注册
//!
//! 聚合通过 `ConstructibleAggregate::constructors` 声明可用于自动映射的构造函数，
//! 每个构造函数的形参类型序列由其 Rust 函数签名生成（支持 0 到 8 个参数），
//! 调用时按位置将类型擦除的实参还原为具体类型。
//!
use super::error::MappingError;
use super::property::{MappedProperty, ParamType, PropertyValue};
use ddd_domain::aggregate::{Aggregate, NewAggregate};
use std::any::{Any, TypeId, type_name};
use std::fmt;

/// 构造函数调用结果：外层为实参映射错误，内层为聚合自身的构造错误
pub type Invocation<A> = Result<Result<NewAggregate<A>, <A as Aggregate>::Error>, MappingError>;

type InvokeFn<A> = Box<dyn Fn(Arguments) -> Invocation<A> + Send + Sync>;

/// 可由命令自动创建的聚合
pub trait ConstructibleAggregate: Aggregate {
    /// 聚合的构造函数表；每次解析时重新获取，不做缓存
    fn constructors() -> AggregateConstructors<Self>
    where
        Self: Sized;
}

/// 构造函数形参描述
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameter {
    position: usize,
    ty: ParamType,
}

impl Parameter {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn ty(&self) -> ParamType {
        self.ty
    }
}

/// 按位置排列的构造函数实参
#[derive(Debug)]
pub struct Arguments {
    values: std::vec::IntoIter<PropertyValue>,
    position: usize,
}

impl Arguments {
    pub fn new(values: Vec<PropertyValue>) -> Self {
        Self {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// 剩余未取出的实参数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按顺序取出下一个实参并还原为 `T`
    ///
    /// `T` 为 `PropertyValue` 时直接交出类型擦除的值。
    pub fn take<T: Send + 'static>(&mut self) -> Result<T, MappingError> {
        let position = self.position;
        let Some(value) = self.values.next() else {
            return Err(MappingError::ArgumentCount {
                expected: position + 1,
                found: position,
            });
        };
        self.position += 1;

        if TypeId::of::<T>() == TypeId::of::<PropertyValue>() {
            let erased: Box<dyn Any> = Box::new(value);
            return match erased.downcast::<T>() {
                Ok(value) => Ok(*value),
                Err(_) => Err(MappingError::ArgumentType {
                    position,
                    expected: type_name::<T>(),
                    found: type_name::<PropertyValue>(),
                }),
            };
        }

        let found = value.ty().name();
        value
            .downcast::<T>()
            .map_err(|_| MappingError::ArgumentType {
                position,
                expected: type_name::<T>(),
                found,
            })
    }
}

/// 可注册为聚合构造函数的函数：`Fn(T1, .., Tn) -> Result<NewAggregate<A>, A::Error>`
pub trait ConstructorFn<A, Args>: Send + Sync + 'static
where
    A: Aggregate,
{
    fn parameter_types() -> Vec<ParamType>;

    fn invoke(&self, arguments: Arguments) -> Invocation<A>;
}

macro_rules! impl_constructor_fn {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<A, F, $($ty,)*> ConstructorFn<A, ($($ty,)*)> for F
        where
            A: Aggregate,
            F: Fn($($ty),*) -> Result<NewAggregate<A>, A::Error> + Send + Sync + 'static,
            $($ty: Send + 'static,)*
        {
            fn parameter_types() -> Vec<ParamType> {
                vec![$(ParamType::of::<$ty>()),*]
            }

            fn invoke(&self, mut arguments: Arguments) -> Invocation<A> {
                $(let $ty = arguments.take::<$ty>()?;)*
                Ok((self)($($ty),*))
            }
        }
    };
}

impl_constructor_fn!();
impl_constructor_fn!(T1);
impl_constructor_fn!(T1, T2);
impl_constructor_fn!(T1, T2, T3);
impl_constructor_fn!(T1, T2, T3, T4);
impl_constructor_fn!(T1, T2, T3, T4, T5);
impl_constructor_fn!(T1, T2, T3, T4, T5, T6);
impl_constructor_fn!(T1, T2, T3, T4, T5, T6, T7);
impl_constructor_fn!(T1, T2, T3, T4, T5, T6, T7, T8);

/// 已注册的聚合构造函数
pub struct Constructor<A>
where
    A: Aggregate,
{
    name: &'static str,
    parameters: Vec<Parameter>,
    invoke: InvokeFn<A>,
}

impl<A> Constructor<A>
where
    A: Aggregate,
{
    pub fn new<Args, F>(name: &'static str, f: F) -> Self
    where
        Args: 'static,
        F: ConstructorFn<A, Args>,
    {
        let parameters = F::parameter_types()
            .into_iter()
            .enumerate()
            .map(|(position, ty)| Parameter { position, ty })
            .collect();

        Self {
            name,
            parameters,
            invoke: Box::new(move |arguments| f.invoke(arguments)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// 逐位置判断形参能否接收对应属性；数量不同时视为不匹配
    pub fn accepts(&self, properties: &[MappedProperty]) -> bool {
        self.parameters.len() == properties.len()
            && self
                .parameters
                .iter()
                .zip(properties)
                .all(|(param, prop)| param.ty.is_assignable_from(&prop.ty()))
    }

    pub fn invoke(&self, arguments: Arguments) -> Invocation<A> {
        (self.invoke)(arguments)
    }
}

impl<A> fmt::Debug for Constructor<A>
where
    A: Aggregate,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("aggregate_type", &A::TYPE)
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// 聚合类型描述：按注册顺序排列的构造函数表
pub struct AggregateConstructors<A>
where
    A: Aggregate,
{
    constructors: Vec<Constructor<A>>,
}

impl<A> Default for AggregateConstructors<A>
where
    A: Aggregate,
{
    fn default() -> Self {
        Self {
            constructors: Vec::new(),
        }
    }
}

impl<A> AggregateConstructors<A>
where
    A: Aggregate,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册构造函数（链式）
    pub fn with<Args, F>(mut self, name: &'static str, f: F) -> Self
    where
        Args: 'static,
        F: ConstructorFn<A, Args>,
    {
        self.push(Constructor::new(name, f));
        self
    }

    pub fn push(&mut self, constructor: Constructor<A>) {
        self.constructors.push(constructor);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Constructor<A>> {
        self.constructors.iter()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<A> fmt::Debug for AggregateConstructors<A>
where
    A: Aggregate,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.constructors).finish()
    }
}

use std::any::{Any, TypeId, type_name};
use std::fmt;

/// 运行时类型描述：用于属性与构造函数形参之间的兼容性判断
#[derive(Clone, Copy)]
pub struct ParamType {
    id: TypeId,
    name: &'static str,
}

impl ParamType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 形参为 `PropertyValue` 时接收任意类型的属性
    pub fn is_dynamic(&self) -> bool {
        self.id == TypeId::of::<PropertyValue>()
    }

    /// 以本类型为形参时，能否接收 `other` 类型的属性值
    pub fn is_assignable_from(&self, other: &ParamType) -> bool {
        self.is_dynamic() || self.id == other.id
    }
}

impl PartialEq for ParamType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ParamType {}

impl fmt::Debug for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 参与映射的命令属性（名称 + 类型），其顺序即按位置匹配的依据
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedProperty {
    name: &'static str,
    ty: ParamType,
}

impl MappedProperty {
    pub fn new(name: &'static str, ty: ParamType) -> Self {
        Self { name, ty }
    }

    pub fn of<T: 'static>(name: &'static str) -> Self {
        Self::new(name, ParamType::of::<T>())
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ty(&self) -> ParamType {
        self.ty
    }
}

/// 类型擦除后的属性值，作为构造函数的实参
pub struct PropertyValue {
    ty: ParamType,
    value: Box<dyn Any + Send>,
}

impl PropertyValue {
    pub fn new<T: Send + 'static>(value: T) -> Self {
        Self {
            ty: ParamType::of::<T>(),
            value: Box::new(value),
        }
    }

    pub fn ty(&self) -> ParamType {
        self.ty
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// 取出具体类型的值；类型不符时原样返回
    pub fn downcast<T: 'static>(self) -> Result<T, Self> {
        let ty = self.ty;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { ty, value }),
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyValue").field(&self.ty).finish()
    }
}

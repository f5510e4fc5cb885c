//! 值的形状 - 遍历分派的依据

use model::HasInfo;

/// 类型身份 (命名空间 + 类型名)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    pub namespace: &'static str,
    pub name: &'static str,
}

impl TypeIdentity {
    pub const fn new(namespace: &'static str, name: &'static str) -> Self {
        Self { namespace, name }
    }

    /// 组件 id: hash("<namespace>.<name>")
    pub fn id(&self) -> String {
        model::hash(&format!("{}.{}", self.namespace, self.name))
    }

    /// 规则匹配用的名字: "<命名空间最后一段>::<类型名>"
    pub fn qualified_name(&self) -> String {
        match self.namespace.rsplit("::").next() {
            Some(last) if !last.is_empty() => format!("{}::{}", last, self.name),
            _ => self.name.to_string(),
        }
    }
}

/// 转换为 `&dyn Scrape`
///
/// 对 `dyn Trait` (Trait: Scrape) 同样可用，经由虚表取回具体类型。
pub trait AsScrape {
    fn as_scrape(&self) -> &dyn Scrape;
}

impl<T: Scrape> AsScrape for T {
    fn as_scrape(&self) -> &dyn Scrape {
        self
    }
}

/// 可被抓取的值
pub trait Scrape: AsScrape {
    fn shape(&self) -> Shape<'_>;
}

/// 静态声明信息: 值缺失时用于规则匹配或构造占位值
pub trait Declare {
    fn declared_type() -> Option<TypeIdentity> {
        None
    }

    fn zeroed() -> Option<Box<dyn Scrape>> {
        None
    }
}

/// 值的形状，每种形状对应一个处理器
pub enum Shape<'a> {
    /// Option 之类的包装
    Wrapper(Wrapped<'a>),
    /// 指针、引用、锁
    Reference(Pointee<'a>),
    /// 只遍历 value
    Map(Box<dyn Iterator<Item = &'a dyn Scrape> + 'a>),
    Sequence(Box<dyn Iterator<Item = &'a dyn Scrape> + 'a>),
    /// 函数指针: 只看声明的返回类型，从不调用
    Function(Vec<Declared>),
    Record(Record<'a>),
    Scalar,
}

pub enum Wrapped<'a> {
    Held(&'a dyn Scrape),
    Empty(Option<TypeIdentity>),
}

pub enum Pointee<'a> {
    Held(&'a dyn Scrape),
    /// 持有借用守卫 (Ref, MutexGuard, 升级后的 Rc ...)
    Borrowed(Box<dyn Borrowed + 'a>),
    /// 空指针，只剩声明类型
    Null(Declared),
    /// 无法在不阻塞的情况下访问
    Unavailable,
}

/// 借用守卫
pub trait Borrowed {
    fn get(&self) -> &dyn Scrape;
}

/// 声明类型
pub struct Declared {
    pub identity: Option<TypeIdentity>,
    pub zeroed: Option<Box<dyn Scrape>>,
}

impl Declared {
    pub fn of<T: ?Sized + Declare>() -> Self {
        Self {
            identity: T::declared_type(),
            zeroed: T::zeroed(),
        }
    }
}

/// 结构体/枚举的展开
pub struct Record<'a> {
    pub identity: TypeIdentity,
    /// 自描述能力 (优先于规则)
    pub describe: Option<&'a dyn HasInfo>,
    pub fields: Vec<Field<'a>>,
}

pub struct Field<'a> {
    pub name: &'static str,
    pub value: &'a dyn Scrape,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, value: &'a dyn Scrape) -> Self {
        Self { name, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_uses_last_segment() {
        let identity = TypeIdentity::new("shop::orders", "OrderService");
        assert_eq!(identity.qualified_name(), "orders::OrderService");

        let flat = TypeIdentity::new("shop", "Cart");
        assert_eq!(flat.qualified_name(), "shop::Cart");

        let bare = TypeIdentity::new("", "Loose");
        assert_eq!(bare.qualified_name(), "Loose");
    }

    #[test]
    fn test_identity_id_depends_on_namespace() {
        let a = TypeIdentity::new("shop::orders", "Service");
        let b = TypeIdentity::new("shop::billing", "Service");
        assert_eq!(a.id(), TypeIdentity::new("shop::orders", "Service").id());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), model::hash("shop::orders.Service"));
    }
}

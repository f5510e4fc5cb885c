//! scrape - 对象图抓取
//!
//! 按形状遍历内存中的对象图，依自描述或规则识别组件，生成结构图

extern crate self as scrape;

mod config;
mod impls;
mod rule;
mod scraper;
mod shape;

pub use config::{Configuration, DEFAULT_MAX_REVISITS};
pub use model::{HasInfo, Info, Structure};
pub use rule::{expand_template, ApplyFn, PatternRule, Result, Rule, RuleBuilder, RuleError};
pub use scrape_derive::Scrape;
pub use scraper::Scraper;
pub use shape::{
    AsScrape, Borrowed, Declare, Declared, Field, Pointee, Record, Scrape, Shape, TypeIdentity,
    Wrapped,
};

/// 为 trait 对象声明类型身份
///
/// 空的 `Option<Box<dyn Trait>>` 或悬空的 `Weak<dyn Trait>` 借此仍可按规则分类。
///
/// ```ignore
/// pub trait Repository: scrape::Scrape {}
/// scrape::interface!(Repository);
/// ```
#[macro_export]
macro_rules! interface {
    ($($name:ident),+ $(,)?) => {
        $(
            $crate::interface!(@impl dyn $name, $name);
            $crate::interface!(@impl dyn $name + Send, $name);
            $crate::interface!(@impl dyn $name + Send + Sync, $name);
        )+
    };
    (@impl $ty:ty, $name:ident) => {
        impl $crate::Declare for $ty {
            fn declared_type() -> ::core::option::Option<$crate::TypeIdentity> {
                ::core::option::Option::Some($crate::TypeIdentity::new(
                    ::core::module_path!(),
                    ::core::stringify!($name),
                ))
            }
        }
    };
}

//! 标准库类型的 Scrape / Declare 实现

use crate::shape::{AsScrape, Borrowed, Declare, Declared, Pointee, Scrape, Shape, Wrapped};
use std::borrow::Cow;
use std::cell::{Ref, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::rc::{self, Rc};
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicU32, AtomicU64, AtomicUsize};
use std::sync::{self, Arc, Mutex, MutexGuard, RwLock, RwLockReadGuard, TryLockError};
use std::time::Duration;

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scrape for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Scalar
                }
            }

            impl Declare for $ty {}
        )*
    };
}

scalar!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    Cow<'static, str>,
    PathBuf,
    Duration,
    AtomicBool,
    AtomicI32,
    AtomicI64,
    AtomicU32,
    AtomicU64,
    AtomicUsize,
);

impl<T: ?Sized> Scrape for PhantomData<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar
    }
}

impl<T: ?Sized> Declare for PhantomData<T> {}

// ---------- 包装 ----------

impl<T: Scrape + Declare> Scrape for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => Shape::Wrapper(Wrapped::Held(value)),
            None => Shape::Wrapper(Wrapped::Empty(T::declared_type())),
        }
    }
}

impl<T: Scrape + Declare, E> Scrape for Result<T, E> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Ok(value) => Shape::Wrapper(Wrapped::Held(value)),
            Err(_) => Shape::Wrapper(Wrapped::Empty(T::declared_type())),
        }
    }
}

// ---------- 指针 ----------

macro_rules! owning_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: ?Sized + Scrape> Scrape for $ptr<T> {
                fn shape(&self) -> Shape<'_> {
                    Shape::Reference(Pointee::Held((**self).as_scrape()))
                }
            }
        )*
    };
}

owning_pointer!(Box, Rc, Arc);

// Weak 升级后的强引用作为借用守卫
impl<T: ?Sized + Scrape> Borrowed for Rc<T> {
    fn get(&self) -> &dyn Scrape {
        (**self).as_scrape()
    }
}

impl<T: ?Sized + Scrape> Borrowed for Arc<T> {
    fn get(&self) -> &dyn Scrape {
        (**self).as_scrape()
    }
}

impl<T: ?Sized + Scrape> Scrape for &T {
    fn shape(&self) -> Shape<'_> {
        Shape::Reference(Pointee::Held((**self).as_scrape()))
    }
}

impl<T: ?Sized + Scrape> Scrape for &mut T {
    fn shape(&self) -> Shape<'_> {
        Shape::Reference(Pointee::Held((**self).as_scrape()))
    }
}

impl<T: ?Sized + Scrape + Declare> Scrape for rc::Weak<T> {
    fn shape(&self) -> Shape<'_> {
        match self.upgrade() {
            Some(strong) => Shape::Reference(Pointee::Borrowed(Box::new(strong))),
            None => Shape::Reference(Pointee::Null(Declared::of::<T>())),
        }
    }
}

impl<T: ?Sized + Scrape + Declare> Scrape for sync::Weak<T> {
    fn shape(&self) -> Shape<'_> {
        match self.upgrade() {
            Some(strong) => Shape::Reference(Pointee::Borrowed(Box::new(strong))),
            None => Shape::Reference(Pointee::Null(Declared::of::<T>())),
        }
    }
}

// ---------- 内部可变性 ----------

impl<T: Scrape> Scrape for RefCell<T> {
    fn shape(&self) -> Shape<'_> {
        match self.try_borrow() {
            Ok(guard) => Shape::Reference(Pointee::Borrowed(Box::new(guard))),
            Err(_) => Shape::Reference(Pointee::Unavailable),
        }
    }
}

impl<T: Scrape> Scrape for Mutex<T> {
    fn shape(&self) -> Shape<'_> {
        match self.try_lock() {
            Ok(guard) => Shape::Reference(Pointee::Borrowed(Box::new(guard))),
            // 中毒的锁数据仍可读
            Err(TryLockError::Poisoned(poisoned)) => {
                Shape::Reference(Pointee::Borrowed(Box::new(poisoned.into_inner())))
            }
            Err(TryLockError::WouldBlock) => Shape::Reference(Pointee::Unavailable),
        }
    }
}

impl<T: Scrape> Scrape for RwLock<T> {
    fn shape(&self) -> Shape<'_> {
        match self.try_read() {
            Ok(guard) => Shape::Reference(Pointee::Borrowed(Box::new(guard))),
            Err(TryLockError::Poisoned(poisoned)) => {
                Shape::Reference(Pointee::Borrowed(Box::new(poisoned.into_inner())))
            }
            Err(TryLockError::WouldBlock) => Shape::Reference(Pointee::Unavailable),
        }
    }
}

impl<T: ?Sized + Scrape> Borrowed for Ref<'_, T> {
    fn get(&self) -> &dyn Scrape {
        (**self).as_scrape()
    }
}

impl<T: ?Sized + Scrape> Borrowed for MutexGuard<'_, T> {
    fn get(&self) -> &dyn Scrape {
        (**self).as_scrape()
    }
}

impl<T: ?Sized + Scrape> Borrowed for RwLockReadGuard<'_, T> {
    fn get(&self) -> &dyn Scrape {
        (**self).as_scrape()
    }
}

// 指针与容器的声明类型即指向的类型
macro_rules! declare_as_pointee {
    ($($ptr:ident),*) => {
        $(
            impl<T: ?Sized + Declare> Declare for $ptr<T> {
                fn declared_type() -> Option<crate::TypeIdentity> {
                    T::declared_type()
                }

                fn zeroed() -> Option<Box<dyn Scrape>> {
                    T::zeroed()
                }
            }
        )*
    };
}

declare_as_pointee!(Box, Rc, Arc, RefCell, Mutex, RwLock);

impl<T: ?Sized + Declare> Declare for rc::Weak<T> {
    fn declared_type() -> Option<crate::TypeIdentity> {
        T::declared_type()
    }

    fn zeroed() -> Option<Box<dyn Scrape>> {
        T::zeroed()
    }
}

impl<T: ?Sized + Declare> Declare for sync::Weak<T> {
    fn declared_type() -> Option<crate::TypeIdentity> {
        T::declared_type()
    }

    fn zeroed() -> Option<Box<dyn Scrape>> {
        T::zeroed()
    }
}

impl<T: ?Sized + Declare> Declare for &T {
    fn declared_type() -> Option<crate::TypeIdentity> {
        T::declared_type()
    }
}

impl<T: ?Sized + Declare> Declare for &mut T {
    fn declared_type() -> Option<crate::TypeIdentity> {
        T::declared_type()
    }
}

impl<T: Declare> Declare for Option<T> {
    fn declared_type() -> Option<crate::TypeIdentity> {
        T::declared_type()
    }
}

impl<T: Declare, E> Declare for Result<T, E> {
    fn declared_type() -> Option<crate::TypeIdentity> {
        T::declared_type()
    }
}

// ---------- 集合 ----------

fn sequence<'a, T: Scrape + 'a>(items: impl Iterator<Item = &'a T> + 'a) -> Shape<'a> {
    Shape::Sequence(Box::new(items.map(|item| item as &dyn Scrape)))
}

fn map_values<'a, V: Scrape + 'a>(values: impl Iterator<Item = &'a V> + 'a) -> Shape<'a> {
    Shape::Map(Box::new(values.map(|value| value as &dyn Scrape)))
}

impl<T: Scrape> Scrape for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        sequence(self.iter())
    }
}

impl<T: Scrape> Scrape for VecDeque<T> {
    fn shape(&self) -> Shape<'_> {
        sequence(self.iter())
    }
}

impl<T: Scrape, const N: usize> Scrape for [T; N] {
    fn shape(&self) -> Shape<'_> {
        sequence(self.iter())
    }
}

impl<T: Scrape, S> Scrape for HashSet<T, S> {
    fn shape(&self) -> Shape<'_> {
        sequence(self.iter())
    }
}

impl<T: Scrape> Scrape for BTreeSet<T> {
    fn shape(&self) -> Shape<'_> {
        sequence(self.iter())
    }
}

impl<K, V: Scrape, S> Scrape for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        map_values(self.values())
    }
}

impl<K, V: Scrape> Scrape for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        map_values(self.values())
    }
}

impl<T> Declare for Vec<T> {}
impl<T> Declare for VecDeque<T> {}
impl<T, const N: usize> Declare for [T; N] {}
impl<T, S> Declare for HashSet<T, S> {}
impl<T> Declare for BTreeSet<T> {}
impl<K, V, S> Declare for HashMap<K, V, S> {}
impl<K, V> Declare for BTreeMap<K, V> {}

impl<A: Scrape, B: Scrape> Scrape for (A, B) {
    fn shape(&self) -> Shape<'_> {
        let items: [&dyn Scrape; 2] = [&self.0, &self.1];
        Shape::Sequence(Box::new(items.into_iter()))
    }
}

impl<A: Scrape, B: Scrape, C: Scrape> Scrape for (A, B, C) {
    fn shape(&self) -> Shape<'_> {
        let items: [&dyn Scrape; 3] = [&self.0, &self.1, &self.2];
        Shape::Sequence(Box::new(items.into_iter()))
    }
}

impl<A, B> Declare for (A, B) {}
impl<A, B, C> Declare for (A, B, C) {}

// ---------- 函数 ----------

macro_rules! function {
    ($($arg:ident),*) => {
        impl<$($arg,)* R: Declare> Scrape for fn($($arg),*) -> R {
            fn shape(&self) -> Shape<'_> {
                Shape::Function(vec![Declared::of::<R>()])
            }
        }

        impl<$($arg,)* R> Declare for fn($($arg),*) -> R {}
    };
}

function!();
function!(A);
function!(A, B);
function!(A, B, C);

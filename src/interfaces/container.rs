
use std::any::{type_name, Any};
use std::sync::Arc;

use crate::error::{RegistryError, RegistryResult};

/// An opaque, shared value stored in a container.
pub type Entry = Arc<dyn Any + Send + Sync>;

pub trait Container: Send + Sync {
    /// Store `value` under `name`, replacing whatever was there before.
    fn register(&self, name: String, value: Entry);

    /// Look up the value stored under `name`.
    fn resolve(&self, name: &str) -> RegistryResult<Entry>;

    fn contains(&self, name: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered names, sorted.
    fn names(&self) -> Vec<String>;
}

/// Typed helpers available on every [`Container`], including `dyn Container`.
pub trait ContainerExt: Container {
    /// Wrap `value` in an `Arc` and register it under `name`.
    fn provide<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        self.provide_shared(name, Arc::new(value));
    }

    /// Register an already shared value. Resolving `name` hands back the same
    /// allocation.
    fn provide_shared<T: Any + Send + Sync>(&self, name: impl Into<String>, value: Arc<T>) {
        self.register(name.into(), value);
    }

    /// Resolve `name` and downcast it to `T`.
    ///
    /// Fails with [`RegistryError::NotFound`] when nothing is registered and
    /// with [`RegistryError::TypeMismatch`] when the stored value is some
    /// other type.
    fn resolve_as<T: Any + Send + Sync>(&self, name: &str) -> RegistryResult<Arc<T>> {
        let entry = self.resolve(name)?;
        downcast(name, entry)
    }

    /// Like [`ContainerExt::resolve_as`], but a missing entry is `Ok(None)`.
    fn try_resolve_as<T: Any + Send + Sync>(&self, name: &str) -> RegistryResult<Option<Arc<T>>> {
        match self.resolve(name) {
            Ok(entry) => downcast(name, entry).map(Some),
            Err(RegistryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<C: Container + ?Sized> ContainerExt for C {}

fn downcast<T: Any + Send + Sync>(name: &str, entry: Entry) -> RegistryResult<Arc<T>> {
    entry.downcast::<T>().map_err(|_| RegistryError::TypeMismatch {
        name: name.to_string(),
        expected: type_name::<T>(),
    })
}

/// A value that can be pulled out of a container by name. Field types of
/// `#[derive(Injectable)]` structs must implement this.
pub trait Resolvable: Sized {
    fn resolve_from<C: Container + ?Sized>(container: &C, name: &str) -> RegistryResult<Self>;
}

impl<T: Any + Send + Sync> Resolvable for Arc<T> {
    fn resolve_from<C: Container + ?Sized>(container: &C, name: &str) -> RegistryResult<Self> {
        container.resolve_as::<T>(name)
    }
}

impl<T: Any + Send + Sync> Resolvable for Option<Arc<T>> {
    fn resolve_from<C: Container + ?Sized>(container: &C, name: &str) -> RegistryResult<Self> {
        container.try_resolve_as::<T>(name)
    }
}

/// Build a value out of named container entries.
///
/// Usually derived:
///
/// ```rust
/// use std::sync::Arc;
/// use iregistry::{BasicContainer, ContainerExt, Injectable};
///
/// #[derive(Injectable)]
/// struct Repository {
///     #[inject(name = "db.url")]
///     url: Arc<String>,
///     #[inject]
///     pool_size: Option<Arc<i64>>,
/// }
///
/// let container = BasicContainer::new();
/// container.provide("db.url", String::from("postgres://localhost"));
///
/// let repo = Repository::inject(&container).unwrap();
/// assert_eq!(repo.url.as_str(), "postgres://localhost");
/// assert!(repo.pool_size.is_none());
/// ```
pub trait Injectable: Sized {
    fn inject<C: Container + ?Sized>(container: &C) -> RegistryResult<Self>;

    /// Inject from the process-wide container.
    fn from_global() -> RegistryResult<Self> {
        Self::inject(crate::global::get_instance())
    }
}

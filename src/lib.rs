//! # iregistry
//!
//! A small process-wide service registry. Values of any type are stored under
//! a string name and looked up again by that name, either as an opaque
//! [`Entry`] or downcast to a concrete type.
//!
//! ```rust
//! use std::sync::Arc;
//! use iregistry::{get_instance, Container, ContainerExt, RegistryError};
//!
//! struct Database {
//!     url: String,
//! }
//!
//! let db = Arc::new(Database { url: "postgres://localhost".into() });
//! get_instance().provide_shared("db", Arc::clone(&db));
//!
//! let resolved = get_instance().resolve_as::<Database>("db").unwrap();
//! assert!(Arc::ptr_eq(&db, &resolved));
//! assert_eq!(resolved.url, "postgres://localhost");
//!
//! assert_eq!(
//!     get_instance().resolve("cache").unwrap_err(),
//!     RegistryError::NotFound("cache".into()),
//! );
//! ```
//!
//! The global container is only a convenience. A [`BasicContainer`] can be
//! built with [`BasicContainer::new`] and passed around like any other value.

pub mod containers;
pub mod error;
pub mod global;
pub mod interfaces;

pub use containers::basic::BasicContainer;
pub use error::{RegistryError, RegistryResult};
pub use global::{get_instance, initialization_count};
pub use interfaces::container::{Container, ContainerExt, Entry, Injectable, Resolvable};

pub use iregistry_derives::Injectable;
